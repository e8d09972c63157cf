use super::{Level, MetricResult};
use crate::classifier::{EMPATHETIC, TextClassifier};
use crate::conversation::DialogueTurnPair;
use anyhow::Result;
use tracing::debug;

const EMPATHY_WEIGHT: f64 = 0.6;
const ALIGNMENT_WEIGHT: f64 = 0.4;

pub fn empathy_label(score: f64) -> Level {
    if score >= 0.75 {
        Level::High
    } else if score >= 0.45 {
        Level::Medium
    } else {
        Level::Low
    }
}

pub fn empathy_input(user: &str, assistant: &str) -> String {
    format!("User said: {user} Assistant replied: {assistant}")
}

/// Rewards user emotion that is neither flat nor overwhelming.
pub fn alignment(emotion_confidence: f64) -> f64 {
    1.0 - (0.5 - emotion_confidence).abs()
}

pub async fn pair_empathy(
    emotion: &dyn TextClassifier,
    empathy: &dyn TextClassifier,
    pair: &DialogueTurnPair<'_>,
) -> Result<f64> {
    let framed = empathy_input(pair.user_text(), pair.assistant_text());
    let (feelings, verdict) = tokio::try_join!(
        emotion.classify(pair.user_text()),
        empathy.classify(&framed)
    )?;
    debug!(
        "Empathy pair: user emotion {:?} ({:.3}), {} p={:.3}",
        feelings.top_label(),
        feelings.confidence(),
        empathy.name(),
        verdict.probability(EMPATHETIC)
    );
    Ok(EMPATHY_WEIGHT * verdict.probability(EMPATHETIC)
        + ALIGNMENT_WEIGHT * alignment(feelings.confidence()))
}

pub async fn score_empathy(
    emotion: &dyn TextClassifier,
    empathy: &dyn TextClassifier,
    pairs: &[DialogueTurnPair<'_>],
) -> Result<MetricResult<Level>> {
    let mut scores = Vec::with_capacity(pairs.len());
    for pair in pairs {
        if pair.user.is_blank() || pair.assistant.is_blank() {
            continue;
        }
        scores.push(pair_empathy(emotion, empathy, pair).await?);
    }
    let avg = super::mean(&scores).unwrap_or(0.0);
    Ok(MetricResult::new(avg, empathy_label(avg)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{Message, Sender};
    use crate::testing::StubClassifier;

    fn empathy_stub(empathetic: f64) -> StubClassifier {
        let rest = 1.0 - empathetic;
        StubClassifier::fixed(
            "empathy",
            &[("empathetic", empathetic), ("not_empathetic", rest)],
        )
    }

    #[tokio::test]
    async fn test_combines_empathy_and_alignment() {
        let emotion = StubClassifier::fixed(
            "emotion",
            &[("sadness", 0.5), ("neutral", 0.3), ("anger", 0.2)],
        );
        let empathy = empathy_stub(0.8);
        let u = Message::new(Sender::User, "My dog passed away.");
        let a = Message::new(Sender::Assistant, "I'm so sorry for your loss.");
        let pairs = [DialogueTurnPair::new(&u, &a)];
        let result = score_empathy(&emotion, &empathy, &pairs).await.unwrap();
        assert!((result.score - (0.6 * 0.8 + 0.4 * 1.0)).abs() < 1e-12);
        assert_eq!(result.label, Level::High);
    }

    #[tokio::test]
    async fn test_overconfident_emotion_lowers_alignment() {
        let emotion = StubClassifier::fixed("emotion", &[("anger", 1.0)]);
        let empathy = empathy_stub(0.5);
        let u = Message::new(Sender::User, "This is outrageous!");
        let a = Message::new(Sender::Assistant, "Please hold.");
        let pairs = [DialogueTurnPair::new(&u, &a)];
        let result = score_empathy(&emotion, &empathy, &pairs).await.unwrap();
        assert!((result.score - 0.5).abs() < 1e-12);
        assert_eq!(result.label, Level::Medium);
    }

    #[tokio::test]
    async fn test_blank_pairs_are_skipped() {
        let emotion = StubClassifier::failing("emotion");
        let empathy = StubClassifier::failing("empathy");
        let u = Message::new(Sender::User, "   ");
        let a = Message::new(Sender::Assistant, "Hello");
        let pairs = [DialogueTurnPair::new(&u, &a)];
        let result = score_empathy(&emotion, &empathy, &pairs).await.unwrap();
        assert_eq!(result, MetricResult::new(0.0, Level::Low));
    }

    #[tokio::test]
    async fn test_classifier_failure_propagates() {
        let emotion = StubClassifier::failing("emotion");
        let empathy = empathy_stub(1.0);
        let u = Message::new(Sender::User, "Hi");
        let a = Message::new(Sender::Assistant, "Hello");
        let pairs = [DialogueTurnPair::new(&u, &a)];
        assert!(score_empathy(&emotion, &empathy, &pairs).await.is_err());
    }

    #[test]
    fn test_label_boundaries() {
        assert_eq!(empathy_label(0.75), Level::High);
        assert_eq!(empathy_label(0.74), Level::Medium);
        assert_eq!(empathy_label(0.45), Level::Medium);
        assert_eq!(empathy_label(0.44), Level::Low);
        assert_eq!(empathy_label(0.0), Level::Low);
    }
}
