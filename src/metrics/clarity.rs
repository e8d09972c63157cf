use super::text::flesch_reading_ease;
use super::{ClarityLabel, MetricResult};

/// Nominal Flesch reading ease range used for min-max normalization.
const FLESCH_MIN: f64 = -100.0;
const FLESCH_MAX: f64 = 121.0;

/// Raw Flesch cut points, applied on the normalized scale.
const CLEAR_RAW: f64 = 60.0;
const AVERAGE_RAW: f64 = 30.0;

pub fn normalize_flesch(raw: f64) -> f64 {
    if FLESCH_MAX <= FLESCH_MIN {
        return 0.0;
    }
    (raw.clamp(FLESCH_MIN, FLESCH_MAX) - FLESCH_MIN) / (FLESCH_MAX - FLESCH_MIN)
}

pub fn clarity_label(normalized: f64) -> ClarityLabel {
    if normalized >= normalize_flesch(CLEAR_RAW) {
        ClarityLabel::Clear
    } else if normalized >= normalize_flesch(AVERAGE_RAW) {
        ClarityLabel::Average
    } else {
        ClarityLabel::Difficult
    }
}

/// Mean normalized readability of the assistant turns that contain words.
pub fn score_clarity(assistant_texts: &[&str]) -> MetricResult<ClarityLabel> {
    let normalized: Vec<f64> = assistant_texts
        .iter()
        .filter(|t| !t.trim().is_empty())
        .filter_map(|t| flesch_reading_ease(t))
        .map(normalize_flesch)
        .collect();

    match super::mean(&normalized) {
        Some(avg) => MetricResult::new(avg, clarity_label(avg)),
        None => MetricResult::new(0.0, ClarityLabel::Difficult),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization_is_clamped() {
        assert_eq!(normalize_flesch(-500.0), 0.0);
        assert_eq!(normalize_flesch(500.0), 1.0);
        assert!((normalize_flesch(10.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_simple_reply_is_clear() {
        let result = score_clarity(&["Click the red button. Then wait a bit."]);
        assert_eq!(result.label, ClarityLabel::Clear);
        assert!(result.score <= 1.0);
    }

    #[test]
    fn test_dense_reply_is_difficult() {
        let result = score_clarity(&[
            "Notwithstanding considerable organizational complexity, implementation \
             necessitates comprehensive administrative authorization procedures.",
        ]);
        assert_eq!(result.label, ClarityLabel::Difficult);
        assert!(result.score >= 0.0);
    }

    #[test]
    fn test_cut_points_map_to_normalized_scale() {
        assert_eq!(clarity_label(normalize_flesch(60.0)), ClarityLabel::Clear);
        assert_eq!(clarity_label(normalize_flesch(59.9)), ClarityLabel::Average);
        assert_eq!(clarity_label(normalize_flesch(30.0)), ClarityLabel::Average);
        assert_eq!(
            clarity_label(normalize_flesch(29.9)),
            ClarityLabel::Difficult
        );
    }

    #[test]
    fn test_blank_only_input() {
        assert_eq!(
            score_clarity(&[]),
            MetricResult::new(0.0, ClarityLabel::Difficult)
        );
        assert_eq!(
            score_clarity(&["  ", ""]),
            MetricResult::new(0.0, ClarityLabel::Difficult)
        );
    }
}
