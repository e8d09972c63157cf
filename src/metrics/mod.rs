//! Independent conversation quality scorers.
//!
//! Every scorer returns a [`MetricResult`]: a bounded score and a label from a
//! small closed set. Scorers never see each other's outputs, except for
//! [`escalation`], which is a pure function over five of them.

pub mod accuracy;
pub mod clarity;
pub mod completeness;
pub mod empathy;
pub mod escalation;
pub mod fallback;
pub mod lexicon;
pub mod relevance;
pub mod resolution;
pub mod response_time;
pub mod satisfaction;
pub mod sentiment;
pub mod text;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricResult<L> {
    pub score: f64,
    pub label: L,
}

impl<L> MetricResult<L> {
    pub fn new(score: f64, label: L) -> Self {
        Self { score, label }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "positive" => Some(Self::Positive),
            "neutral" => Some(Self::Neutral),
            "negative" => Some(Self::Negative),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClarityLabel {
    Clear,
    Average,
    Difficult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletenessLabel {
    Complete,
    Partial,
    Incomplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccuracyLabel {
    #[serde(rename = "accurate")]
    Accurate,
    #[serde(rename = "partially accurate")]
    PartiallyAccurate,
    #[serde(rename = "inaccurate")]
    Inaccurate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseTimeLabel {
    #[serde(rename = "fast")]
    Fast,
    #[serde(rename = "moderate")]
    Moderate,
    #[serde(rename = "slow")]
    Slow,
    #[serde(rename = "no data")]
    NoData,
}

/// Cosine similarity of two dense vectors; `0.0` when either has zero norm
/// or the dimensions disagree.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
