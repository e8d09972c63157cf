mod cache;
mod gemini;
mod local;
mod types;

use crate::config::Config;
use anyhow::Result;
pub use cache::CachedEmbeddings;
pub use gemini::GeminiEmbedding;
pub use local::LocalEmbedding;
use std::sync::Arc;
pub use types::EmbeddingService;

pub fn create_embedding_service(config: &Config) -> Result<Arc<dyn EmbeddingService>> {
    match config.embedding.provider.as_str() {
        "gemini" => {
            let api_key = config
                .embedding
                .api_key
                .as_deref()
                .or(config.judge.as_ref().map(|j| j.key.as_str()))
                .ok_or_else(|| anyhow::anyhow!("gemini embeddings require embedding.api_key"))?;
            Ok(Arc::new(GeminiEmbedding::new(
                api_key,
                config.embedding.model.as_deref(),
                config.embedding.dimensions,
            )))
        }
        "local" => Ok(Arc::new(LocalEmbedding::new(&config.model_cache_dir())?)),
        other => anyhow::bail!("unknown embedding provider: {other}"),
    }
}
