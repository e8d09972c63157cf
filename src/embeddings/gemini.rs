use crate::embeddings::types::EmbeddingService;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const DEFAULT_MODEL: &str = "gemini-embedding-001";
const DEFAULT_DIMENSIONS: usize = 768;
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const TASK_TYPE: &str = "SEMANTIC_SIMILARITY";
/// Upper bound on requests per `batchEmbedContents` call.
const MAX_BATCH: usize = 100;

/// Remote embeddings from the Gemini API, tuned for semantic similarity.
pub struct GeminiEmbedding {
    http: reqwest::Client,
    api_key: String,
    model: String,
    dimensions: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedRequest<'a> {
    model: &'a str,
    content: Content<'a>,
    task_type: &'static str,
    output_dimensionality: usize,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct BatchRequest<'a> {
    requests: Vec<EmbedRequest<'a>>,
}

#[derive(Deserialize)]
struct Values {
    values: Vec<f32>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Values,
}

#[derive(Deserialize)]
struct BatchResponse {
    embeddings: Vec<Values>,
}

impl GeminiEmbedding {
    pub fn new(api_key: &str, model: Option<&str>, dimensions: Option<usize>) -> Self {
        let model = model.unwrap_or(DEFAULT_MODEL);
        let dimensions = dimensions.unwrap_or(DEFAULT_DIMENSIONS);
        info!("Gemini embeddings: {} ({} dims)", model, dimensions);
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.to_string(),
            model: format!("models/{model}"),
            dimensions,
        }
    }

    fn request<'a>(&'a self, text: &'a str) -> EmbedRequest<'a> {
        EmbedRequest {
            model: &self.model,
            content: Content {
                parts: [Part { text }],
            },
            task_type: TASK_TYPE,
            output_dimensionality: self.dimensions,
        }
    }

    async fn call<B, R>(&self, method: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned + Send,
    {
        let url = format!("{API_BASE}/{}:{method}", self.model);
        let resp = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .with_context(|| format!("Gemini {method} request failed"))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            anyhow::bail!("Gemini {method} returned {status}: {detail}");
        }

        resp.json()
            .await
            .with_context(|| format!("Gemini {method} response was not understood"))
    }
}

#[async_trait]
impl EmbeddingService for GeminiEmbedding {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let reply: EmbedResponse = self.call("embedContent", &self.request(text)).await?;
        Ok(reply.embedding.values)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(MAX_BATCH) {
            let body = BatchRequest {
                requests: chunk.iter().map(|t| self.request(t)).collect(),
            };
            let reply: BatchResponse = self.call("batchEmbedContents", &body).await?;
            if reply.embeddings.len() != chunk.len() {
                anyhow::bail!(
                    "Gemini returned {} embeddings for {} texts",
                    reply.embeddings.len(),
                    chunk.len()
                );
            }
            debug!("Gemini embedded {} texts", chunk.len());
            out.extend(reply.embeddings.into_iter().map(|e| e.values));
        }
        Ok(out)
    }
}
