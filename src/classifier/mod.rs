//! Text classifiers used by the empathy scorer.

mod labels;
mod prototype;

use anyhow::Result;
use async_trait::async_trait;
pub use labels::{EMOTION_ANCHORS, EMPATHETIC, EMPATHY_ANCHORS};
pub use prototype::PrototypeClassifier;
use serde::Serialize;

/// Probability distribution over a classifier's labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassDistribution {
    pub scores: Vec<(String, f64)>,
}

impl ClassDistribution {
    /// Softmax over raw logits, paired with their labels in order.
    pub fn from_logits(labels: &[String], logits: &[f64]) -> Self {
        let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = logits.iter().map(|l| (l - max).exp()).collect();
        let total: f64 = exps.iter().sum();
        let scores = labels
            .iter()
            .zip(exps)
            .map(|(label, e)| (label.clone(), if total > 0.0 { e / total } else { 0.0 }))
            .collect();
        Self { scores }
    }

    pub fn probability(&self, label: &str) -> f64 {
        self.scores
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, p)| *p)
            .unwrap_or(0.0)
    }

    /// Probability of the most likely label.
    pub fn confidence(&self) -> f64 {
        self.scores.iter().map(|(_, p)| *p).fold(0.0, f64::max)
    }

    pub fn top_label(&self) -> Option<&str> {
        self.scores
            .iter()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(l, _)| l.as_str())
    }
}

#[async_trait]
pub trait TextClassifier: Send + Sync {
    fn name(&self) -> &str;

    async fn classify(&self, text: &str) -> Result<ClassDistribution>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_softmax_sums_to_one_and_orders() {
        let names = labels(&["joy", "anger", "fear"]);
        let dist = ClassDistribution::from_logits(&names, &[2.0, 1.0, 0.0]);
        let total: f64 = dist.scores.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert_eq!(dist.top_label(), Some("joy"));
        assert!(dist.probability("joy") > dist.probability("anger"));
        assert!((dist.confidence() - dist.probability("joy")).abs() < 1e-12);
        assert_eq!(dist.probability("surprise"), 0.0);
    }

    #[test]
    fn test_uniform_logits_give_uniform_distribution() {
        let dist = ClassDistribution::from_logits(&labels(&["a", "b", "c", "d"]), &[0.3; 4]);
        for (_, p) in &dist.scores {
            assert!((p - 0.25).abs() < 1e-9);
        }
    }
}
