use super::{Level, MetricResult};
use serde::Serialize;

/// The five upstream signals escalation is derived from.
///
/// `sentiment` is the raw signed sentiment average in [-1, 1], not a [0, 1]
/// score, so its inverse spans [0, 2]. The mean is clamped into [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EscalationInputs {
    pub sentiment: f64,
    pub completeness: f64,
    pub accuracy: f64,
    pub fallback_frequency: f64,
    pub resolution: f64,
}

pub fn escalation_label(score: f64) -> Level {
    if score <= 0.3 {
        Level::Low
    } else if score <= 0.6 {
        Level::Medium
    } else {
        Level::High
    }
}

pub fn score_escalation(inputs: &EscalationInputs) -> MetricResult<Level> {
    let inverse = |x: f64| 1.0 - x;
    let terms = [
        inverse(inputs.sentiment),
        inverse(inputs.completeness),
        inverse(inputs.accuracy),
        inputs.fallback_frequency,
        inverse(inputs.resolution),
    ];
    let score = (terms.iter().sum::<f64>() / terms.len() as f64).clamp(0.0, 1.0);
    MetricResult::new(score, escalation_label(score))
}
