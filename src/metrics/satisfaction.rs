use super::sentiment::polarity;
use super::{Level, MetricResult};
use crate::conversation::DialogueTurnPair;

const QUALITY_WEIGHT: f64 = 0.6;
const FLOW_WEIGHT: f64 = 0.4;

pub fn satisfaction_label(score: f64) -> Level {
    if score >= 0.75 {
        Level::High
    } else if score >= 0.45 {
        Level::Medium
    } else {
        Level::Low
    }
}

/// Per pair: how positive the reply reads, and how closely its tone tracks
/// the user's. Flow is floored at zero so the score stays in [0, 1].
pub fn pair_satisfaction(pair: &DialogueTurnPair<'_>) -> f64 {
    let user = polarity(pair.user_text());
    let assistant = polarity(pair.assistant_text());
    let response_quality = (assistant + 1.0) / 2.0;
    let conversation_flow = (1.0 - (user - assistant).abs()).max(0.0);
    QUALITY_WEIGHT * response_quality + FLOW_WEIGHT * conversation_flow
}

pub fn score_satisfaction(pairs: &[DialogueTurnPair<'_>]) -> MetricResult<Level> {
    let scores: Vec<f64> = pairs.iter().map(pair_satisfaction).collect();
    let avg = super::mean(&scores).unwrap_or(0.0);
    MetricResult::new(avg, satisfaction_label(avg))
}
