use crate::analysis::AnalysisRecord;
use crate::conversation::{Conversation, Message, NewConversation, Sender};
use crate::entity::{analyses, conversations, messages};
use crate::metrics::SentimentLabel;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

const DB_FILE: &str = "convoscore.db";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationSummary {
    pub id: i64,
    pub title: String,
    pub message_count: u64,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<Message>>,
}

/// SQLite-backed conversations and their analysis records.
///
/// Each operation opens its own connection on the blocking pool. Operations
/// are serialized because SQLite admits a single writer.
pub struct ConversationStore {
    db_url: String,
    lock: Mutex<()>,
}

fn from_micros(us: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_micros(us).with_context(|| format!("timestamp out of range: {us}"))
}

fn load_messages(db: &DatabaseConnection, conversation_id: i64) -> Result<Vec<Message>> {
    messages::Entity::find()
        .filter(messages::Column::ConversationId.eq(conversation_id))
        .order_by_asc(messages::Column::Position)
        .all(db)?
        .into_iter()
        .map(|r| -> Result<Message> {
            let sender: Sender = r.sender.parse().map_err(anyhow::Error::msg)?;
            Ok(Message {
                sender,
                text: r.text,
                timestamp: r.timestamp,
            })
        })
        .collect()
}

impl ConversationStore {
    pub async fn new(data_dir: &Path) -> Result<Arc<Self>> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data dir: {}", data_dir.display()))?;
        let db_url = format!("sqlite:{}?mode=rwc", data_dir.join(DB_FILE).display());

        tokio::task::spawn_blocking({
            let db_url = db_url.clone();
            move || -> Result<()> {
                let db = Database::connect(&db_url)?;

                db.get_schema_builder()
                    .register(conversations::Entity)
                    .register(messages::Entity)
                    .register(analyses::Entity)
                    .apply(&db)?;

                Ok(())
            }
        })
        .await??;

        info!(
            "Conversation store ready ({})",
            data_dir.join(DB_FILE).display()
        );
        Ok(Arc::new(Self {
            db_url,
            lock: Mutex::new(()),
        }))
    }

    async fn with_db<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&DatabaseConnection) -> Result<T> + Send + 'static,
    {
        let _guard = self.lock.lock().await;
        let db_url = self.db_url.clone();
        tokio::task::spawn_blocking(move || {
            let db = Database::connect(&db_url)?;
            op(&db)
        })
        .await?
    }

    /// Stores a validated upload and its messages in one transaction.
    pub async fn insert_conversation(&self, conversation: NewConversation) -> Result<i64> {
        let now = Utc::now().timestamp_micros();

        let id = self
            .with_db(move |db| {
                let txn = db.begin()?;

                let header = conversations::ActiveModel {
                    id: NotSet,
                    title: Set(conversation.title),
                    created_at_us: Set(now),
                };
                let id = conversations::Entity::insert(header)
                    .exec(&txn)?
                    .last_insert_id;

                let rows: Vec<messages::ActiveModel> = conversation
                    .messages
                    .into_iter()
                    .enumerate()
                    .map(|(position, m)| messages::ActiveModel {
                        id: NotSet,
                        conversation_id: Set(id),
                        position: Set(position as i32),
                        sender: Set(m.sender.as_str().to_string()),
                        text: Set(m.text),
                        timestamp: Set(m.timestamp),
                    })
                    .collect();
                if !rows.is_empty() {
                    messages::Entity::insert_many(rows).exec(&txn)?;
                }

                txn.commit()?;
                Ok(id)
            })
            .await?;

        info!("Stored conversation {}", id);
        Ok(id)
    }

    pub async fn conversation(&self, id: i64) -> Result<Option<Conversation>> {
        self.with_db(move |db| {
            let Some(header) = conversations::Entity::find_by_id(id).one(db)? else {
                return Ok(None);
            };

            Ok(Some(Conversation {
                id: header.id,
                title: header.title,
                messages: load_messages(db, id)?,
            }))
        })
        .await
    }

    pub async fn conversation_ids(&self) -> Result<Vec<i64>> {
        self.with_db(|db| {
            let rows = conversations::Entity::find()
                .order_by_asc(conversations::Column::Id)
                .all(db)?;
            Ok(rows.into_iter().map(|r| r.id).collect())
        })
        .await
    }

    /// Summaries in id order. With `full` each summary also carries the
    /// ordered message list.
    pub async fn list_conversations(&self, full: bool) -> Result<Vec<ConversationSummary>> {
        self.with_db(move |db| {
            let rows = conversations::Entity::find()
                .order_by_asc(conversations::Column::Id)
                .all(db)?;

            let mut summaries = Vec::with_capacity(rows.len());
            for row in rows {
                let message_count = messages::Entity::find()
                    .filter(messages::Column::ConversationId.eq(row.id))
                    .count(db)?;
                let messages = full.then(|| load_messages(db, row.id)).transpose()?;
                summaries.push(ConversationSummary {
                    id: row.id,
                    title: row.title,
                    message_count,
                    created_at: from_micros(row.created_at_us)?,
                    messages,
                });
            }
            Ok(summaries)
        })
        .await
    }

    /// Inserts the record, or overwrites the existing one for the same
    /// conversation.
    pub async fn upsert_analysis(&self, record: &AnalysisRecord) -> Result<()> {
        let conversation_id = record.conversation_id;
        let row = analyses::ActiveModel {
            id: NotSet,
            conversation_id: Set(record.conversation_id),
            clarity: Set(record.clarity),
            relevance: Set(record.relevance),
            accuracy: Set(record.accuracy),
            completeness: Set(record.completeness),
            sentiment: Set(record.sentiment.as_str().to_string()),
            empathy: Set(record.empathy),
            fallback_count: Set(record.fallback_count),
            resolution: Set(record.resolution),
            escalation: Set(record.escalation),
            response_time: Set(record.response_time),
            overall_score: Set(record.overall_score),
            created_at_us: Set(record.created_at.timestamp_micros()),
        };

        self.with_db(move |db| {
            analyses::Entity::insert(row)
                .on_conflict(
                    OnConflict::column(analyses::Column::ConversationId)
                        .update_columns([
                            analyses::Column::Clarity,
                            analyses::Column::Relevance,
                            analyses::Column::Accuracy,
                            analyses::Column::Completeness,
                            analyses::Column::Sentiment,
                            analyses::Column::Empathy,
                            analyses::Column::FallbackCount,
                            analyses::Column::Resolution,
                            analyses::Column::Escalation,
                            analyses::Column::ResponseTime,
                            analyses::Column::OverallScore,
                            analyses::Column::CreatedAtUs,
                        ])
                        .to_owned(),
                )
                .exec_without_returning(db)?;
            Ok(())
        })
        .await?;

        debug!("Upserted analysis for conversation {}", conversation_id);
        Ok(())
    }

    pub async fn analysis(&self, conversation_id: i64) -> Result<Option<AnalysisRecord>> {
        self.with_db(move |db| {
            analyses::Entity::find()
                .filter(analyses::Column::ConversationId.eq(conversation_id))
                .one(db)?
                .map(AnalysisRecord::try_from)
                .transpose()
        })
        .await
    }

    pub async fn list_analyses(&self) -> Result<Vec<AnalysisRecord>> {
        self.with_db(|db| {
            analyses::Entity::find()
                .order_by_asc(analyses::Column::ConversationId)
                .all(db)?
                .into_iter()
                .map(AnalysisRecord::try_from)
                .collect()
        })
        .await
    }
}

impl TryFrom<analyses::Model> for AnalysisRecord {
    type Error = anyhow::Error;

    fn try_from(r: analyses::Model) -> Result<Self> {
        let sentiment = SentimentLabel::parse(&r.sentiment)
            .with_context(|| format!("unknown sentiment label: {}", r.sentiment))?;
        Ok(Self {
            conversation_id: r.conversation_id,
            clarity: r.clarity,
            relevance: r.relevance,
            accuracy: r.accuracy,
            completeness: r.completeness,
            sentiment,
            empathy: r.empathy,
            fallback_count: r.fallback_count,
            resolution: r.resolution,
            escalation: r.escalation,
            response_time: r.response_time,
            overall_score: r.overall_score,
            created_at: from_micros(r.created_at_us)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn upload() -> NewConversation {
        NewConversation {
            title: "Router trouble".into(),
            messages: vec![
                Message::new(Sender::User, "My router keeps dropping.").at("2024-05-01 10:00:00"),
                Message::new(Sender::Assistant, "Try moving it away from the microwave."),
                Message::new(Sender::User, "That fixed it, thanks!"),
            ],
        }
    }

    fn record(conversation_id: i64, clarity: f64) -> AnalysisRecord {
        AnalysisRecord {
            conversation_id,
            clarity,
            relevance: 0.5,
            accuracy: 0.8,
            completeness: 0.6,
            sentiment: SentimentLabel::Positive,
            empathy: 0.4,
            fallback_count: 0.0,
            resolution: true,
            escalation: false,
            response_time: 1.25,
            overall_score: 0.77,
            created_at: from_micros(1_714_557_600_000_000).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_conversation_round_trip_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConversationStore::new(dir.path()).await.unwrap();

        let id = store.insert_conversation(upload()).await.unwrap();
        let loaded = store.conversation(id).await.unwrap().unwrap();

        assert_eq!(loaded.id, id);
        assert_eq!(loaded.title, "Router trouble");
        assert_eq!(loaded.messages, upload().messages);
        assert_eq!(store.conversation(id + 100).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_listing_counts_messages() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConversationStore::new(dir.path()).await.unwrap();

        let first = store.insert_conversation(upload()).await.unwrap();
        let second = store
            .insert_conversation(NewConversation {
                title: String::new(),
                messages: vec![Message::new(Sender::User, "Anyone there?")],
            })
            .await
            .unwrap();

        assert_eq!(store.conversation_ids().await.unwrap(), vec![first, second]);
        let summaries = store.list_conversations(false).await.unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].message_count, 3);
        assert_eq!(summaries[1].message_count, 1);
        assert_eq!(summaries[0].messages, None);
    }

    #[tokio::test]
    async fn test_listing_with_messages() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConversationStore::new(dir.path()).await.unwrap();
        store.insert_conversation(upload()).await.unwrap();

        let summaries = store.list_conversations(true).await.unwrap();
        assert_eq!(summaries[0].messages, Some(upload().messages));

        let json = serde_json::to_value(&summaries[0]).unwrap();
        assert_eq!(json["messages"][1]["sender"], "assistant");
        let bare = store.list_conversations(false).await.unwrap();
        let json = serde_json::to_value(&bare[0]).unwrap();
        assert!(json.get("messages").is_none());
    }

    #[tokio::test]
    async fn test_upsert_overwrites_instead_of_duplicating() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConversationStore::new(dir.path()).await.unwrap();
        let id = store.insert_conversation(upload()).await.unwrap();

        store.upsert_analysis(&record(id, 0.3)).await.unwrap();
        store.upsert_analysis(&record(id, 0.9)).await.unwrap();

        let all = store.list_analyses().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], record(id, 0.9));
        assert_eq!(store.analysis(id).await.unwrap(), Some(record(id, 0.9)));
        assert_eq!(store.analysis(id + 1).await.unwrap(), None);
    }
}
