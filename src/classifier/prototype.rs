use super::{ClassDistribution, TextClassifier};
use crate::embeddings::EmbeddingService;
use crate::metrics::cosine_similarity;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

const DEFAULT_SHARPNESS: f64 = 20.0;

/// Zero-shot classifier: each label is represented by the mean embedding of
/// a few anchor sentences, and a text's distribution is a softmax over its
/// cosine similarity to every prototype.
pub struct PrototypeClassifier {
    name: String,
    embeddings: Arc<dyn EmbeddingService>,
    labels: Vec<String>,
    prototypes: Vec<Vec<f32>>,
    sharpness: f64,
}

impl PrototypeClassifier {
    pub async fn build(
        name: &str,
        embeddings: Arc<dyn EmbeddingService>,
        anchors: &[(&str, &[&str])],
    ) -> Result<Self> {
        let mut labels = Vec::with_capacity(anchors.len());
        let mut prototypes = Vec::with_capacity(anchors.len());

        for (label, sentences) in anchors {
            let texts: Vec<String> = sentences.iter().map(|s| s.to_string()).collect();
            let vectors = embeddings
                .embed_batch(&texts)
                .await
                .with_context(|| format!("Failed to embed anchors for {name}/{label}"))?;
            let prototype = centroid(&vectors)
                .with_context(|| format!("No anchor vectors for {name}/{label}"))?;
            labels.push(label.to_string());
            prototypes.push(prototype);
        }

        info!("{} classifier ready ({} labels)", name, labels.len());
        Ok(Self {
            name: name.to_string(),
            embeddings,
            labels,
            prototypes,
            sharpness: DEFAULT_SHARPNESS,
        })
    }

    pub fn with_sharpness(mut self, sharpness: f64) -> Self {
        self.sharpness = sharpness;
        self
    }
}

fn centroid(vectors: &[Vec<f32>]) -> Option<Vec<f32>> {
    let first = vectors.first()?;
    let mut sum = vec![0.0f32; first.len()];
    for v in vectors {
        for (acc, x) in sum.iter_mut().zip(v) {
            *acc += x;
        }
    }
    let n = vectors.len() as f32;
    Some(sum.into_iter().map(|x| x / n).collect())
}

#[async_trait]
impl TextClassifier for PrototypeClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    async fn classify(&self, text: &str) -> Result<ClassDistribution> {
        let vector = self.embeddings.embed(text).await?;
        let logits: Vec<f64> = self
            .prototypes
            .iter()
            .map(|p| cosine_similarity(&vector, p) * self.sharpness)
            .collect();
        Ok(ClassDistribution::from_logits(&self.labels, &logits))
    }
}
