use super::Judge;
use crate::error::ScoringError;
use async_trait::async_trait;
use rig::{client::CompletionClient, completion::Prompt};
use std::time::Duration;
use tracing::{debug, warn};

const JUDGE_PREAMBLE: &str = "You are a meticulous fact-checker. You assess whether an \
assistant's replies in a conversation are factually correct. Respond with a single JSON \
object and nothing else.";
const JUDGE_MAX_TOKENS: u64 = 256;

pub struct RigJudge<C: CompletionClient> {
    client: C,
    model: String,
    timeout: Duration,
    max_attempts: u32,
}

impl<C: CompletionClient> RigJudge<C> {
    pub fn new(client: C, model: &str, timeout: Duration, max_attempts: u32) -> Self {
        Self {
            client,
            model: model.to_string(),
            timeout,
            max_attempts: max_attempts.max(1),
        }
    }
}

#[async_trait]
impl<C> Judge for RigJudge<C>
where
    C: CompletionClient + Send + Sync,
    C::CompletionModel: 'static,
{
    async fn judge(&self, prompt: &str) -> Result<String, ScoringError> {
        let agent = self
            .client
            .agent(&self.model)
            .preamble(JUDGE_PREAMBLE)
            .max_tokens(JUDGE_MAX_TOKENS)
            .build();

        let mut last_error = ScoringError::JudgeUnavailable("judge was never called".into());
        for attempt in 1..=self.max_attempts {
            match tokio::time::timeout(self.timeout, agent.prompt(prompt.to_string())).await {
                Ok(Ok(response)) => {
                    debug!("Judge answered on attempt {}", attempt);
                    return Ok(response);
                }
                Ok(Err(e)) => {
                    warn!(
                        "Judge call failed (attempt {}/{}): {}",
                        attempt, self.max_attempts, e
                    );
                    last_error = ScoringError::JudgeUnavailable(e.to_string());
                }
                Err(_) => {
                    warn!(
                        "Judge call timed out after {}s (attempt {}/{})",
                        self.timeout.as_secs(),
                        attempt,
                        self.max_attempts
                    );
                    last_error = ScoringError::JudgeUnavailable(format!(
                        "timed out after {}s",
                        self.timeout.as_secs()
                    ));
                }
            }
        }
        Err(last_error)
    }
}
