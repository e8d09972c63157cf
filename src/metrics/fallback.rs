use super::lexicon::HEDGES;
use super::{Level, MetricResult};

/// True when the turn contains any hedging phrase, case-insensitively.
pub fn is_fallback(text: &str) -> bool {
    let lower = text.to_lowercase().replace('\u{2019}', "'");
    HEDGES.iter().any(|h| lower.contains(h))
}

pub fn fallback_label(rate: f64) -> Level {
    if rate <= 0.10 {
        Level::Low
    } else if rate <= 0.30 {
        Level::Medium
    } else {
        Level::High
    }
}

/// Fraction of assistant turns that hedge or fall back.
pub fn score_fallback(assistant_texts: &[&str]) -> MetricResult<Level> {
    if assistant_texts.is_empty() {
        return MetricResult::new(0.0, Level::Low);
    }
    let hits = assistant_texts.iter().filter(|t| is_fallback(t)).count();
    let rate = hits as f64 / assistant_texts.len() as f64;
    MetricResult::new(rate, fallback_label(rate))
}
