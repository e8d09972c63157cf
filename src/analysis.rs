//! Turns one conversation into an analysis record and a verbose report.

use crate::classifier::TextClassifier;
use crate::conversation::{Conversation, pair_turns};
use crate::embeddings::{CachedEmbeddings, EmbeddingService};
use crate::error::ScoringError;
use crate::judge::Judge;
use crate::metrics::accuracy::score_accuracy;
use crate::metrics::clarity::score_clarity;
use crate::metrics::completeness::score_completeness;
use crate::metrics::empathy::score_empathy;
use crate::metrics::escalation::{EscalationInputs, score_escalation};
use crate::metrics::fallback::score_fallback;
use crate::metrics::relevance::score_relevance;
use crate::metrics::resolution::{is_resolved, score_resolution};
use crate::metrics::response_time::score_response_time;
use crate::metrics::satisfaction::score_satisfaction;
use crate::metrics::sentiment::score_sentiment;
use crate::metrics::{
    AccuracyLabel, ClarityLabel, CompletenessLabel, Level, MetricResult, ResponseTimeLabel,
    SentimentLabel,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The persisted, one-per-conversation summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRecord {
    pub conversation_id: i64,
    pub clarity: f64,
    pub relevance: f64,
    pub accuracy: f64,
    pub completeness: f64,
    pub sentiment: SentimentLabel,
    pub empathy: f64,
    /// Fallback rate in [0, 1], not a count.
    pub fallback_count: f64,
    pub resolution: bool,
    pub escalation: bool,
    pub response_time: f64,
    pub overall_score: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolutionReport {
    pub score: f64,
    pub resolved: bool,
}

/// Every intermediate score and label, for callers that want more than the
/// record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub conversation_id: i64,
    pub pair_count: usize,
    pub sentiment: MetricResult<SentimentLabel>,
    pub relevance: MetricResult<Level>,
    pub clarity: MetricResult<ClarityLabel>,
    pub completeness: MetricResult<CompletenessLabel>,
    pub accuracy: MetricResult<AccuracyLabel>,
    pub empathy: MetricResult<Level>,
    pub fallback_frequency: MetricResult<Level>,
    pub resolution: ResolutionReport,
    pub escalation: MetricResult<Level>,
    pub response_time: MetricResult<ResponseTimeLabel>,
    pub satisfaction: MetricResult<Level>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    InsufficientData,
    Complete {
        record: AnalysisRecord,
        report: AnalysisReport,
    },
}

impl AnalysisOutcome {
    pub fn to_json(&self) -> Value {
        match self {
            Self::InsufficientData => {
                json!({ "error": ScoringError::InsufficientData.to_string() })
            }
            Self::Complete { report, .. } => serde_json::to_value(report).unwrap_or(Value::Null),
        }
    }
}

pub struct Analyzer {
    embeddings: Arc<dyn EmbeddingService>,
    emotion: Arc<dyn TextClassifier>,
    empathy: Arc<dyn TextClassifier>,
    judge: Arc<dyn Judge>,
    resolution_threshold: f64,
}

/// Unwraps a model-backed metric, falling back to its empty-input value and
/// noting the failure.
fn or_default<T>(
    metric: &str,
    result: anyhow::Result<T>,
    default: T,
    warnings: &mut Vec<String>,
) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!("{} defaulted after model failure: {:#}", metric, e);
            warnings.push(format!("{metric}: {e:#}"));
            default
        }
    }
}

impl Analyzer {
    pub fn new(
        embeddings: Arc<dyn EmbeddingService>,
        emotion: Arc<dyn TextClassifier>,
        empathy: Arc<dyn TextClassifier>,
        judge: Arc<dyn Judge>,
        resolution_threshold: f64,
    ) -> Self {
        Self {
            embeddings,
            emotion,
            empathy,
            judge,
            resolution_threshold,
        }
    }

    pub async fn analyze(&self, conversation: &Conversation) -> AnalysisOutcome {
        let turns = match pair_turns(&conversation.messages) {
            Ok(turns) => turns,
            Err(e) => {
                info!("Conversation {}: {}", conversation.id, e);
                return AnalysisOutcome::InsufficientData;
            }
        };
        let pairs = &turns.pairs;
        let user_texts = turns.user_texts();
        let assistant_texts = turns.assistant_texts();
        debug!(
            "Conversation {}: {} user turns, {} assistant turns, {} pairs",
            conversation.id,
            user_texts.len(),
            assistant_texts.len(),
            pairs.len()
        );

        let embeddings = CachedEmbeddings::new(self.embeddings.clone());
        let paired_texts: Vec<&str> = pairs
            .iter()
            .flat_map(|p| [p.user_text(), p.assistant_text()])
            .collect();
        if let Err(e) = embeddings.warm(&paired_texts).await {
            debug!(
                "Embedding warm-up failed, scorers will embed per turn: {:#}",
                e
            );
        }

        let (relevance, completeness, resolution, empathy, accuracy) = tokio::join!(
            score_relevance(&embeddings, pairs),
            score_completeness(&embeddings, pairs),
            score_resolution(&embeddings, pairs),
            score_empathy(self.emotion.as_ref(), self.empathy.as_ref(), pairs),
            score_accuracy(self.judge.as_ref(), pairs),
        );

        let mut warnings = Vec::new();
        let relevance = or_default(
            "relevance",
            relevance,
            MetricResult::new(0.0, Level::Low),
            &mut warnings,
        );
        let completeness = or_default(
            "completeness",
            completeness,
            MetricResult::new(0.0, CompletenessLabel::Incomplete),
            &mut warnings,
        );
        let resolution = or_default("resolution", resolution, 0.0, &mut warnings);
        let empathy = or_default(
            "empathy",
            empathy,
            MetricResult::new(0.0, Level::Low),
            &mut warnings,
        );
        warnings.extend(accuracy.warning);
        let accuracy = accuracy.result;

        let sentiment = score_sentiment(&user_texts);
        let clarity = score_clarity(&assistant_texts);
        let fallback = score_fallback(&assistant_texts);
        let response_time = score_response_time(pairs);
        let satisfaction = score_satisfaction(pairs);

        let escalation = score_escalation(&EscalationInputs {
            sentiment: sentiment.score,
            completeness: completeness.score,
            accuracy: accuracy.score,
            fallback_frequency: fallback.score,
            resolution,
        });
        let resolved = is_resolved(resolution, self.resolution_threshold);

        let record = AnalysisRecord {
            conversation_id: conversation.id,
            clarity: clarity.score,
            relevance: relevance.score,
            accuracy: accuracy.score,
            completeness: completeness.score,
            sentiment: sentiment.label,
            empathy: empathy.score,
            fallback_count: fallback.score,
            resolution: resolved,
            escalation: escalation.label == Level::High,
            response_time: response_time.score,
            overall_score: satisfaction.score,
            created_at: Utc::now(),
        };

        let report = AnalysisReport {
            conversation_id: conversation.id,
            pair_count: pairs.len(),
            sentiment,
            relevance,
            clarity,
            completeness,
            accuracy,
            empathy,
            fallback_frequency: fallback,
            resolution: ResolutionReport {
                score: resolution,
                resolved,
            },
            escalation,
            response_time,
            satisfaction,
            warnings,
        };

        info!(
            "Conversation {} analyzed: overall {:.3}, escalation {}",
            conversation.id, record.overall_score, record.escalation
        );
        AnalysisOutcome::Complete { record, report }
    }
}
