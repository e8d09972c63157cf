use crate::embeddings::types::EmbeddingService;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Memoizes vectors for the lifetime of one analysis run, so the scorers
/// that each embed the same turns only pay for it once.
pub struct CachedEmbeddings {
    inner: Arc<dyn EmbeddingService>,
    memo: Mutex<HashMap<String, Vec<f32>>>,
}

impl CachedEmbeddings {
    pub fn new(inner: Arc<dyn EmbeddingService>) -> Self {
        Self {
            inner,
            memo: Mutex::new(HashMap::new()),
        }
    }

    fn lookup(&self, text: &str) -> Result<Option<Vec<f32>>> {
        let memo = self
            .memo
            .lock()
            .map_err(|e| anyhow::anyhow!("embedding cache poisoned: {e}"))?;
        Ok(memo.get(text).cloned())
    }

    fn store(&self, text: &str, vector: &[f32]) -> Result<()> {
        self.memo
            .lock()
            .map_err(|e| anyhow::anyhow!("embedding cache poisoned: {e}"))?
            .insert(text.to_string(), vector.to_vec());
        Ok(())
    }

    /// Embeds every text not already cached in a single batch call.
    pub async fn warm(&self, texts: &[&str]) -> Result<()> {
        let mut missing: Vec<String> = Vec::new();
        for text in texts {
            if self.lookup(text)?.is_none() && !missing.iter().any(|m| m == text) {
                missing.push(text.to_string());
            }
        }
        if missing.is_empty() {
            return Ok(());
        }
        let vectors = self.inner.embed_batch(&missing).await?;
        if vectors.len() != missing.len() {
            anyhow::bail!(
                "embedding batch returned {} vectors for {} texts",
                vectors.len(),
                missing.len()
            );
        }
        for (text, vector) in missing.iter().zip(&vectors) {
            self.store(text, vector)?;
        }
        Ok(())
    }
}

#[async_trait]
impl EmbeddingService for CachedEmbeddings {
    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if let Some(hit) = self.lookup(text)? {
            return Ok(hit);
        }
        let vector = self.inner.embed(text).await?;
        self.store(text, &vector)?;
        Ok(vector)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        self.warm(&refs).await?;
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(
                self.lookup(text)?
                    .context("embedding missing from cache after warm")?,
            );
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubEmbedding;

    #[tokio::test]
    async fn test_cache_returns_identical_vectors_and_skips_repeat_calls() {
        let inner = Arc::new(StubEmbedding::default());
        let cached = CachedEmbeddings::new(inner.clone());

        cached
            .warm(&["refund my order", "refund my order", "hello"])
            .await
            .unwrap();
        assert_eq!(inner.calls(), 2);

        let direct = inner.embed("refund my order").await.unwrap();
        let via_cache = cached.embed("refund my order").await.unwrap();
        assert_eq!(direct, via_cache);
        assert_eq!(inner.calls(), 3);
    }
}
