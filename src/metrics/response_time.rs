use super::{MetricResult, ResponseTimeLabel};
use crate::conversation::DialogueTurnPair;
use tracing::debug;

pub fn response_time_label(seconds: f64) -> ResponseTimeLabel {
    if seconds <= 2.0 {
        ResponseTimeLabel::Fast
    } else if seconds <= 5.0 {
        ResponseTimeLabel::Moderate
    } else {
        ResponseTimeLabel::Slow
    }
}

/// Mean signed seconds from each user turn to its paired assistant turn.
/// Pairs without two parseable timestamps are skipped. Negative deltas come
/// from positional pairing and are averaged like any other.
pub fn score_response_time(pairs: &[DialogueTurnPair<'_>]) -> MetricResult<ResponseTimeLabel> {
    let deltas: Vec<f64> = pairs
        .iter()
        .enumerate()
        .filter_map(|(i, pair)| {
            let asked = pair.user.parsed_timestamp();
            let answered = pair.assistant.parsed_timestamp();
            match (asked, answered) {
                (Ok(asked), Ok(answered)) => {
                    let seconds = (answered - asked).num_milliseconds() as f64 / 1000.0;
                    if seconds < 0.0 {
                        debug!("Pair {} answered {}s before it was asked", i, -seconds);
                    }
                    Some(seconds)
                }
                (Err(e), _) | (_, Err(e)) => {
                    debug!("Pair {} skipped for latency: {}", i, e);
                    None
                }
            }
        })
        .collect();

    match super::mean(&deltas) {
        Some(avg) => MetricResult::new(avg, response_time_label(avg)),
        None => MetricResult::new(0.0, ResponseTimeLabel::NoData),
    }
}
