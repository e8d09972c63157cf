//! External language-model judge used for factual accuracy.

mod rig_judge;

use crate::config::Config;
use crate::error::ScoringError;
use anyhow::Result;
use async_trait::async_trait;
use rig::providers::{anthropic, gemini, openai};
pub use rig_judge::RigJudge;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const OPENAI_DEFAULT_URL: &str = "https://api.openai.com/v1";
const ANTHROPIC_DEFAULT_URL: &str = "https://api.anthropic.com";

/// A black-box judge: takes a prompt, returns free-form text that is
/// expected (but not guaranteed) to contain a JSON verdict.
#[async_trait]
pub trait Judge: Send + Sync {
    async fn judge(&self, prompt: &str) -> Result<String, ScoringError>;
}

/// Stand-in used when no judge is configured; every call reports the judge
/// as unavailable so accuracy degrades instead of failing.
pub struct UnconfiguredJudge;

#[async_trait]
impl Judge for UnconfiguredJudge {
    async fn judge(&self, _prompt: &str) -> Result<String, ScoringError> {
        Err(ScoringError::JudgeUnavailable("no judge configured".into()))
    }
}

pub fn create_judge(config: &Config) -> Result<Arc<dyn Judge>> {
    let Some(judge) = config.judge.as_ref() else {
        info!("No [judge] section configured; accuracy will fall back to 0.0");
        return Ok(Arc::new(UnconfiguredJudge));
    };

    let timeout = Duration::from_secs(judge.timeout_secs);
    let attempts = judge.max_attempts.max(1);
    info!(
        "Accuracy judge: {} / {} (timeout {}s, {} attempts)",
        judge.provider, judge.model, judge.timeout_secs, attempts
    );

    let judge: Arc<dyn Judge> = match judge.provider.as_str() {
        "openai" => {
            let client: openai::CompletionsClient = openai::CompletionsClient::builder()
                .api_key(&judge.key)
                .base_url(judge.url.as_deref().unwrap_or(OPENAI_DEFAULT_URL))
                .build()?;
            Arc::new(RigJudge::new(client, &judge.model, timeout, attempts))
        }
        "gemini" => {
            let client = gemini::Client::new(&judge.key)?;
            Arc::new(RigJudge::new(client, &judge.model, timeout, attempts))
        }
        "anthropic" => {
            let client: anthropic::Client = anthropic::Client::builder()
                .api_key(&judge.key)
                .base_url(judge.url.as_deref().unwrap_or(ANTHROPIC_DEFAULT_URL))
                .build()?;
            Arc::new(RigJudge::new(client, &judge.model, timeout, attempts))
        }
        other => anyhow::bail!("unknown judge provider: {other}"),
    };
    Ok(judge)
}
