//! Deterministic doubles for the model services.

use crate::classifier::{ClassDistribution, TextClassifier};
use crate::embeddings::EmbeddingService;
use crate::error::ScoringError;
use crate::judge::Judge;
use crate::metrics::text::words;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};

const STUB_DIM: usize = 256;

/// Hashed bag-of-words vectors: texts sharing words are similar, texts
/// sharing none are orthogonal (up to hash collisions).
#[derive(Default)]
pub struct StubEmbedding {
    calls: AtomicUsize,
    fail: bool,
}

impl StubEmbedding {
    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingService for StubEmbedding {
    fn dimensions(&self) -> usize {
        STUB_DIM
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            anyhow::bail!("stub embedding offline");
        }
        let mut vector = vec![0.0f32; STUB_DIM];
        for word in words(text) {
            let mut hasher = DefaultHasher::new();
            word.hash(&mut hasher);
            vector[(hasher.finish() % STUB_DIM as u64) as usize] += 1.0;
        }
        Ok(vector)
    }
}

pub struct StubClassifier {
    name: String,
    scores: Vec<(String, f64)>,
    fail: bool,
}

impl StubClassifier {
    pub fn fixed(name: &str, scores: &[(&str, f64)]) -> Self {
        Self {
            name: name.to_string(),
            scores: scores.iter().map(|(l, p)| (l.to_string(), *p)).collect(),
            fail: false,
        }
    }

    pub fn failing(name: &str) -> Self {
        Self {
            name: name.to_string(),
            scores: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl TextClassifier for StubClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    async fn classify(&self, _text: &str) -> Result<ClassDistribution> {
        if self.fail {
            anyhow::bail!("stub classifier offline");
        }
        Ok(ClassDistribution {
            scores: self.scores.clone(),
        })
    }
}

pub struct StubJudge {
    reply: Option<String>,
    calls: AtomicUsize,
}

impl StubJudge {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Judge for StubJudge {
    async fn judge(&self, _prompt: &str) -> Result<String, ScoringError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .clone()
            .ok_or_else(|| ScoringError::JudgeUnavailable("stub judge offline".into()))
    }
}
