use super::relevance::pair_similarity;
use super::text::{content_words, sentence_count};
use super::{CompletenessLabel, MetricResult};
use crate::conversation::DialogueTurnPair;
use crate::embeddings::EmbeddingService;
use anyhow::Result;

const COVERAGE_WEIGHT: f64 = 0.4;
const SEMANTIC_WEIGHT: f64 = 0.4;
const DEPTH_WEIGHT: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletenessBreakdown {
    pub coverage: f64,
    pub semantic_relevance: f64,
    pub depth_ratio: f64,
}

impl CompletenessBreakdown {
    pub fn combined(&self) -> f64 {
        COVERAGE_WEIGHT * self.coverage
            + SEMANTIC_WEIGHT * self.semantic_relevance
            + DEPTH_WEIGHT * self.depth_ratio
    }
}

/// Share of the user's content words that reappear in the reply.
pub fn coverage(user_text: &str, assistant_text: &str) -> f64 {
    let user = content_words(user_text);
    if user.is_empty() {
        return 0.0;
    }
    let assistant = content_words(assistant_text);
    user.intersection(&assistant).count() as f64 / user.len() as f64
}

/// Reply sentences per question sentence, capped at 1.
pub fn depth_ratio(user_text: &str, assistant_text: &str) -> f64 {
    let user_sentences = sentence_count(user_text);
    if user_sentences == 0 {
        return 0.0;
    }
    (sentence_count(assistant_text) as f64 / user_sentences as f64).min(1.0)
}

pub fn completeness_label(score: f64) -> CompletenessLabel {
    if score >= 0.7 {
        CompletenessLabel::Complete
    } else if score >= 0.4 {
        CompletenessLabel::Partial
    } else {
        CompletenessLabel::Incomplete
    }
}

pub async fn pair_completeness(
    embeddings: &dyn EmbeddingService,
    pair: &DialogueTurnPair<'_>,
) -> Result<CompletenessBreakdown> {
    Ok(CompletenessBreakdown {
        coverage: coverage(pair.user_text(), pair.assistant_text()),
        semantic_relevance: pair_similarity(embeddings, pair).await?,
        depth_ratio: depth_ratio(pair.user_text(), pair.assistant_text()),
    })
}

pub async fn score_completeness(
    embeddings: &dyn EmbeddingService,
    pairs: &[DialogueTurnPair<'_>],
) -> Result<MetricResult<CompletenessLabel>> {
    let mut combined = Vec::with_capacity(pairs.len());
    for pair in pairs {
        combined.push(pair_completeness(embeddings, pair).await?.combined());
    }
    let avg = super::mean(&combined).unwrap_or(0.0);
    Ok(MetricResult::new(avg, completeness_label(avg)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{Message, Sender};
    use crate::testing::StubEmbedding;

    #[test]
    fn test_coverage_counts_shared_content_words() {
        let c = coverage(
            "How do I export invoices to spreadsheet?",
            "Open billing, choose invoices, then export them as a spreadsheet.",
        );
        assert!((c - 1.0).abs() < 1e-9, "coverage = {c}");
        assert_eq!(coverage("Hi there!", "Hello, how can I help?"), 0.0);
        assert_eq!(coverage("refund", "we ship on mondays"), 0.0);
    }

    #[test]
    fn test_depth_ratio_caps_at_one() {
        assert_eq!(depth_ratio("One. Two.", "Only one."), 0.5);
        assert_eq!(depth_ratio("Why?", "Because. Also this. And that."), 1.0);
        assert_eq!(depth_ratio("", "Anything."), 0.0);
    }

    #[test]
    fn test_breakdown_weights() {
        let b = CompletenessBreakdown {
            coverage: 1.0,
            semantic_relevance: 0.5,
            depth_ratio: 0.0,
        };
        assert!((b.combined() - 0.6).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_thorough_answer_is_complete() {
        let u = Message::new(Sender::User, "How do I export invoices to a spreadsheet?");
        let a = Message::new(
            Sender::Assistant,
            "To export invoices to a spreadsheet, open invoices and press export.",
        );
        let embeddings = StubEmbedding::default();
        let pairs = [DialogueTurnPair::new(&u, &a)];
        let result = score_completeness(&embeddings, &pairs).await.unwrap();
        assert_eq!(
            result.label,
            CompletenessLabel::Complete,
            "score = {}",
            result.score
        );
        assert!(result.score <= 1.0);
    }

    #[tokio::test]
    async fn test_empty_pairs() {
        let embeddings = StubEmbedding::default();
        let result = score_completeness(&embeddings, &[]).await.unwrap();
        assert_eq!(
            result,
            MetricResult::new(0.0, CompletenessLabel::Incomplete)
        );
    }

    #[test]
    fn test_label_boundaries() {
        assert_eq!(completeness_label(0.7), CompletenessLabel::Complete);
        assert_eq!(completeness_label(0.69), CompletenessLabel::Partial);
        assert_eq!(completeness_label(0.4), CompletenessLabel::Partial);
        assert_eq!(completeness_label(0.39), CompletenessLabel::Incomplete);
        assert_eq!(completeness_label(0.0), CompletenessLabel::Incomplete);
    }
}
