use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub judge: Option<JudgeConfig>,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_provider")]
    pub provider: String,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub dimensions: Option<usize>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            model: None,
            api_key: None,
            dimensions: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JudgeConfig {
    pub provider: String,
    pub key: String,
    pub url: Option<String>,
    pub model: String,
    #[serde(default = "default_judge_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_judge_attempts")]
    pub max_attempts: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// A conversation counts as resolved when its resolution score is
    /// strictly above this value.
    #[serde(default)]
    pub resolution_threshold: f64,
    #[serde(default = "default_batch_concurrency")]
    pub batch_concurrency: usize,
    /// Softmax temperature inverse for the zero-shot classifiers.
    #[serde(default = "default_classifier_sharpness")]
    pub classifier_sharpness: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            resolution_threshold: 0.0,
            batch_concurrency: default_batch_concurrency(),
            classifier_sharpness: default_classifier_sharpness(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_cron")]
    pub cron: String,
    #[serde(default)]
    pub run_on_start: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            cron: default_cron(),
            run_on_start: false,
        }
    }
}

fn default_embedding_provider() -> String {
    "local".to_string()
}

fn default_judge_timeout() -> u64 {
    30
}

fn default_judge_attempts() -> u32 {
    2
}

fn default_batch_concurrency() -> usize {
    4
}

fn default_classifier_sharpness() -> f64 {
    20.0
}

fn default_cron() -> String {
    "0 0 0 * * *".to_string()
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.analysis.batch_concurrency == 0 {
            anyhow::bail!("analysis.batch_concurrency must be at least 1");
        }
        Ok(config)
    }

    pub fn model_cache_dir(&self) -> PathBuf {
        self.storage.data_dir.join("models")
    }
}
