use crate::embeddings::types::EmbeddingService;
use anyhow::{Context, Result};
use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

const LOCAL_DIM: usize = 384;

/// Sentence embeddings from a local all-MiniLM-L6-v2 ONNX model.
///
/// The model is loaded once at construction and shared read-only; inference
/// runs on the blocking pool.
pub struct LocalEmbedding {
    model: Arc<Mutex<TextEmbedding>>,
}

impl LocalEmbedding {
    pub fn new(cache_dir: &Path) -> Result<Self> {
        info!("Loading embedding model (all-MiniLM-L6-v2)...");

        let model = TextEmbedding::try_new(
            InitOptions::new(EmbeddingModel::AllMiniLML6V2)
                .with_cache_dir(cache_dir.to_path_buf())
                .with_show_download_progress(true),
        )
        .context("Failed to initialize embedding model")?;

        info!("Embedding model ready");

        Ok(Self {
            model: Arc::new(Mutex::new(model)),
        })
    }

    async fn run(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let model = self.model.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = model
                .lock()
                .map_err(|e| anyhow::anyhow!("model lock poisoned: {e}"))?;
            guard.embed(texts, None)
        })
        .await
        .context("Embedding task panicked")?
    }
}

#[async_trait]
impl EmbeddingService for LocalEmbedding {
    fn dimensions(&self) -> usize {
        LOCAL_DIM
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.run(vec![text.to_string()])
            .await?
            .into_iter()
            .next()
            .context("embedding model returned empty result")
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.run(texts.to_vec()).await
    }
}
