use super::lexicon::{BOOSTERS, INTENSIFIERS, NEGATIONS, POLARITY, VALENCE};
use super::text::words;
use super::{MetricResult, SentimentLabel};

const VALENCE_WEIGHT: f64 = 0.7;
const POLARITY_WEIGHT: f64 = 0.3;
const NEGATION_SCALAR: f64 = -0.74;
const EXCLAMATION_BOOST: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const NORMALIZATION_ALPHA: f64 = 15.0;

/// Signed polarity in [-1, 1] blending the two lexicon estimators.
pub fn polarity(text: &str) -> f64 {
    if text.trim().is_empty() {
        return 0.0;
    }
    VALENCE_WEIGHT * valence_compound(text) + POLARITY_WEIGHT * adjective_polarity(text)
}

/// Valence-lexicon estimator: sums word valences adjusted for boosters,
/// negation and contrast, then squashes the sum into (-1, 1).
pub fn valence_compound(text: &str) -> f64 {
    let tokens = words(text);
    let mut valences = vec![0.0; tokens.len()];

    for (i, token) in tokens.iter().enumerate() {
        let Some(&base) = VALENCE.get(token.as_str()) else {
            continue;
        };
        let mut v = base;

        for (distance, decay) in [(1, 1.0), (2, 0.95), (3, 0.9)] {
            if i < distance {
                break;
            }
            if let Some(&shift) = BOOSTERS.get(tokens[i - distance].as_str()) {
                v += shift * v.signum() * decay;
            }
        }

        if (1..=3).any(|d| i >= d && NEGATIONS.contains(tokens[i - d].as_str())) {
            v *= NEGATION_SCALAR;
        }
        valences[i] = v;
    }

    if let Some(pivot) = tokens.iter().position(|t| t == "but") {
        for (i, v) in valences.iter_mut().enumerate() {
            if i < pivot {
                *v *= 0.5;
            } else if i > pivot {
                *v *= 1.5;
            }
        }
    }

    let mut sum: f64 = valences.iter().sum();
    if sum == 0.0 {
        return 0.0;
    }
    let emphasis = text.matches('!').count().min(MAX_EXCLAMATIONS) as f64 * EXCLAMATION_BOOST;
    sum += emphasis.copysign(sum);

    (sum / (sum * sum + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

/// Adjective-polarity estimator: mean polarity of matched words, with
/// intensifiers scaling and negation flipping at half strength.
pub fn adjective_polarity(text: &str) -> f64 {
    let tokens = words(text);
    let mut matched = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        let Some(&base) = POLARITY.get(token.as_str()) else {
            continue;
        };
        let mut p = base;
        if i >= 1
            && let Some(&factor) = INTENSIFIERS.get(tokens[i - 1].as_str())
        {
            p *= factor;
        }
        if (1..=2).any(|d| i >= d && NEGATIONS.contains(tokens[i - d].as_str())) {
            p *= -0.5;
        }
        matched.push(p.clamp(-1.0, 1.0));
    }

    super::mean(&matched).unwrap_or(0.0).clamp(-1.0, 1.0)
}

pub fn sentiment_label(score: f64) -> SentimentLabel {
    if score > 0.2 {
        SentimentLabel::Positive
    } else if score < -0.2 {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

/// Average polarity over user turns. Blank turns count as zero.
pub fn score_sentiment(user_texts: &[&str]) -> MetricResult<SentimentLabel> {
    let scores: Vec<f64> = user_texts.iter().map(|t| polarity(t)).collect();
    let avg = super::mean(&scores).unwrap_or(0.0);
    MetricResult::new(avg, sentiment_label(avg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thanks_is_positive() {
        let result = score_sentiment(&["Thanks!"]);
        assert_eq!(result.label, SentimentLabel::Positive);
        assert!(result.score > 0.2 && result.score <= 1.0);
    }

    #[test]
    fn test_complaint_is_negative() {
        let result = score_sentiment(&["This is terrible and I hate it"]);
        assert_eq!(result.label, SentimentLabel::Negative);
        assert!(result.score >= -1.0);
    }

    #[test]
    fn test_negation_flips_polarity() {
        assert!(polarity("good") > 0.0);
        assert!(polarity("not good") < 0.0);
        assert!(adjective_polarity("not good") < 0.0);
    }

    #[test]
    fn test_booster_and_exclamation_increase_intensity() {
        assert!(valence_compound("very good") > valence_compound("good"));
        assert!(valence_compound("good!!") > valence_compound("good"));
    }

    #[test]
    fn test_contrast_weights_clause_after_but() {
        assert!(valence_compound("the setup was good but the result is terrible") < 0.0);
    }

    #[test]
    fn test_empty_and_blank_turns() {
        let empty = score_sentiment(&[]);
        assert_eq!(empty.score, 0.0);
        assert_eq!(empty.label, SentimentLabel::Neutral);

        let diluted = score_sentiment(&["Thanks!", "   "]);
        let single = score_sentiment(&["Thanks!"]);
        assert!((diluted.score - single.score / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_polarity_stays_in_bounds() {
        let gushing = "amazing awesome best excellent perfect wonderful love great!!!!!!";
        let furious = "worst horrible terrible awful hate stupid useless!!!!!!";
        assert!(polarity(gushing) <= 1.0 && polarity(gushing) > 0.8);
        assert!(polarity(furious) >= -1.0 && polarity(furious) < -0.8);
    }
}
