use super::{AccuracyLabel, MetricResult};
use crate::conversation::DialogueTurnPair;
use crate::error::ScoringError;
use crate::judge::Judge;
use serde_json::Value;
use tracing::warn;

/// Accuracy verdict plus the reason it was defaulted, if it was.
#[derive(Debug, Clone, PartialEq)]
pub struct AccuracyOutcome {
    pub result: MetricResult<AccuracyLabel>,
    pub warning: Option<String>,
}

impl AccuracyOutcome {
    fn degraded(warning: String) -> Self {
        Self {
            result: MetricResult::new(0.0, AccuracyLabel::Inaccurate),
            warning: Some(warning),
        }
    }
}

pub fn build_prompt(pairs: &[DialogueTurnPair<'_>]) -> String {
    let mut transcript = String::new();
    for (i, pair) in pairs.iter().enumerate() {
        transcript.push_str(&format!(
            "Turn {}\nUser: {}\nAssistant: {}\n\n",
            i + 1,
            pair.user_text(),
            pair.assistant_text()
        ));
    }

    format!(
        "Evaluate the factual accuracy of the assistant's replies in the conversation below.\n\n\
         {transcript}\
         Respond with JSON only, in exactly this shape:\n\
         {{\"score\": <number between 0 and 1>, \"label\": \"accurate\" | \"partially accurate\" | \"inaccurate\"}}"
    )
}

/// The first balanced `{...}` block in `text`, skipping braces that appear
/// inside JSON strings.
pub fn extract_first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

pub fn normalize_label(raw: &str) -> AccuracyLabel {
    let label = raw
        .trim()
        .to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    match label.as_str() {
        "accurate" => AccuracyLabel::Accurate,
        "partially accurate" | "partial" | "partially" => AccuracyLabel::PartiallyAccurate,
        _ => AccuracyLabel::Inaccurate,
    }
}

pub fn parse_verdict(reply: &str) -> Result<MetricResult<AccuracyLabel>, ScoringError> {
    let block = extract_first_json_object(reply)
        .ok_or_else(|| ScoringError::JudgeMalformed(format!("no JSON object in {reply:?}")))?;
    let verdict: Value = serde_json::from_str(block)
        .map_err(|e| ScoringError::JudgeMalformed(format!("invalid JSON: {e}")))?;

    let score = match verdict.get("score") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|s| s.is_finite())
    .ok_or_else(|| ScoringError::JudgeMalformed(format!("missing or invalid score in {block}")))?;

    let label = verdict
        .get("label")
        .and_then(Value::as_str)
        .map(normalize_label)
        .unwrap_or(AccuracyLabel::Inaccurate);

    Ok(MetricResult::new(score.clamp(0.0, 1.0), label))
}

/// Asks the judge for one verdict over the whole transcript. Never fails:
/// any judge problem yields `(0.0, inaccurate)` with a warning attached.
pub async fn score_accuracy(judge: &dyn Judge, pairs: &[DialogueTurnPair<'_>]) -> AccuracyOutcome {
    if pairs.is_empty() {
        return AccuracyOutcome {
            result: MetricResult::new(0.0, AccuracyLabel::Inaccurate),
            warning: None,
        };
    }

    let verdict = match judge.judge(&build_prompt(pairs)).await {
        Ok(reply) => parse_verdict(&reply),
        Err(e) => Err(e),
    };

    match verdict {
        Ok(result) => AccuracyOutcome {
            result,
            warning: None,
        },
        Err(e) => {
            warn!("Accuracy defaulted to 0.0: {}", e);
            AccuracyOutcome::degraded(format!("accuracy: {e}"))
        }
    }
}
