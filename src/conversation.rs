use crate::error::{ScoringError, ServiceError};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const MAX_MESSAGE_CHARS: usize = 500;
const MAX_TITLE_CHARS: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    #[serde(alias = "ai")]
    Assistant,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        }
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(Sender::User),
            "ai" | "assistant" => Ok(Sender::Assistant),
            other => Err(format!("sender must be 'user' or 'ai', got '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    /// Raw timestamp as submitted; parsed lazily because malformed values
    /// only disqualify the pair they belong to.
    pub timestamp: Option<String>,
}

impl Message {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            timestamp: None,
        }
    }

    pub fn at(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn parsed_timestamp(&self) -> Result<DateTime<Utc>, ScoringError> {
        let raw = self
            .timestamp
            .as_deref()
            .ok_or_else(|| ScoringError::UnparseableTimestamp("missing".into()))?;
        parse_timestamp(raw)
    }
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ScoringError> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ScoringError::UnparseableTimestamp(raw.to_string()))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    pub title: String,
    pub messages: Vec<Message>,
}

/// One user turn positionally matched with one assistant turn.
#[derive(Debug, Clone, Copy)]
pub struct DialogueTurnPair<'a> {
    pub user: &'a Message,
    pub assistant: &'a Message,
}

impl<'a> DialogueTurnPair<'a> {
    pub fn new(user: &'a Message, assistant: &'a Message) -> Self {
        Self { user, assistant }
    }

    pub fn user_text(&self) -> &'a str {
        &self.user.text
    }

    pub fn assistant_text(&self) -> &'a str {
        &self.assistant.text
    }
}

#[derive(Debug, Clone)]
pub struct TurnPairs<'a> {
    pub user_messages: Vec<&'a Message>,
    pub assistant_messages: Vec<&'a Message>,
    pub pairs: Vec<DialogueTurnPair<'a>>,
}

impl<'a> TurnPairs<'a> {
    pub fn user_texts(&self) -> Vec<&'a str> {
        self.user_messages.iter().map(|m| m.text.as_str()).collect()
    }

    pub fn assistant_texts(&self) -> Vec<&'a str> {
        self.assistant_messages
            .iter()
            .map(|m| m.text.as_str())
            .collect()
    }
}

/// Splits a message log into user and assistant turns and zips them by
/// ordinal position.
///
/// The i-th user message is paired with the i-th assistant message, not with
/// the reply that follows it in time. Extra turns on the longer side are
/// dropped, so `pairs.len() == min(users, assistants)`. Every pair-based
/// metric inherits this approximation.
pub fn pair_turns(messages: &[Message]) -> Result<TurnPairs<'_>, ScoringError> {
    let (user_messages, assistant_messages): (Vec<&Message>, Vec<&Message>) = messages
        .iter()
        .filter(|m| !m.is_blank())
        .partition(|m| m.sender == Sender::User);

    if user_messages.is_empty() || assistant_messages.is_empty() {
        return Err(ScoringError::InsufficientData);
    }

    let pairs = user_messages
        .iter()
        .zip(assistant_messages.iter())
        .map(|(&user, &assistant)| DialogueTurnPair::new(user, assistant))
        .collect();

    Ok(TurnPairs {
        user_messages,
        assistant_messages,
        pairs,
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageUpload {
    pub sender: String,
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConversationUpload {
    #[serde(default)]
    pub title: Option<String>,
    pub messages: Vec<MessageUpload>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewConversation {
    pub title: String,
    pub messages: Vec<Message>,
}

impl ConversationUpload {
    pub fn validate(self) -> Result<NewConversation, ServiceError> {
        let title = self.title.unwrap_or_default().trim().to_string();
        if title.chars().count() > MAX_TITLE_CHARS {
            return Err(ServiceError::Invalid(format!(
                "title exceeds {MAX_TITLE_CHARS} characters"
            )));
        }

        let messages = self
            .messages
            .into_iter()
            .enumerate()
            .map(|(i, m)| {
                let sender: Sender = m
                    .sender
                    .parse()
                    .map_err(|e| ServiceError::Invalid(format!("message {i}: {e}")))?;
                let text = m.message.trim();
                if text.is_empty() {
                    return Err(ServiceError::Invalid(format!(
                        "message {i}: text cannot be empty"
                    )));
                }
                if text.chars().count() > MAX_MESSAGE_CHARS {
                    return Err(ServiceError::Invalid(format!(
                        "message {i}: text exceeds {MAX_MESSAGE_CHARS} characters"
                    )));
                }
                let message = Message::new(sender, text);
                Ok(match m.timestamp {
                    Some(raw) => message.at(raw),
                    None => message,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NewConversation { title, messages })
    }
}
