use crate::analysis::{AnalysisOutcome, AnalysisReport, Analyzer};
use crate::error::ServiceError;
use crate::store::ConversationStore;
use anyhow::Result;
use futures_util::{StreamExt, stream};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub analyzed: usize,
    pub skipped: usize,
    pub failed: usize,
}

enum BatchItem {
    Analyzed,
    Skipped,
    Failed,
}

pub struct AnalysisService {
    store: Arc<ConversationStore>,
    analyzer: Arc<Analyzer>,
    batch_concurrency: usize,
}

impl AnalysisService {
    pub fn new(
        store: Arc<ConversationStore>,
        analyzer: Arc<Analyzer>,
        batch_concurrency: usize,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            analyzer,
            batch_concurrency: batch_concurrency.max(1),
        })
    }

    /// Scores one conversation and persists the record. Nothing is written
    /// when the conversation lacks a user or an assistant turn.
    pub async fn analyze_conversation(&self, id: i64) -> Result<AnalysisReport, ServiceError> {
        let conversation = self
            .store
            .conversation(id)
            .await?
            .ok_or(ServiceError::NotFound(id))?;

        match self.analyzer.analyze(&conversation).await {
            AnalysisOutcome::InsufficientData => Err(ServiceError::InsufficientData(id)),
            AnalysisOutcome::Complete { record, report } => {
                self.store.upsert_analysis(&record).await?;
                Ok(report)
            }
        }
    }

    pub async fn run_batch(&self) -> Result<BatchSummary> {
        let run_id = Uuid::new_v4().to_string()[..8].to_string();
        let ids = self.store.conversation_ids().await?;
        info!(
            "[{}] Batch analysis of {} conversations started",
            run_id,
            ids.len()
        );

        let results: Vec<BatchItem> = stream::iter(ids)
            .map(|id| self.batch_item(&run_id, id))
            .buffer_unordered(self.batch_concurrency)
            .collect()
            .await;

        let mut summary = BatchSummary::default();
        for item in results {
            match item {
                BatchItem::Analyzed => summary.analyzed += 1,
                BatchItem::Skipped => summary.skipped += 1,
                BatchItem::Failed => summary.failed += 1,
            }
        }

        info!(
            "[{}] Batch finished: {} analyzed, {} skipped, {} failed",
            run_id, summary.analyzed, summary.skipped, summary.failed
        );
        Ok(summary)
    }

    async fn batch_item(&self, run_id: &str, id: i64) -> BatchItem {
        match self.analyze_conversation(id).await {
            Ok(_) => BatchItem::Analyzed,
            Err(ServiceError::InsufficientData(_)) => BatchItem::Skipped,
            Err(ServiceError::NotFound(_)) => {
                warn!("[{}] Conversation {} vanished before analysis", run_id, id);
                BatchItem::Skipped
            }
            Err(e) => {
                error!("[{}] Conversation {} failed: {:#}", run_id, id, e);
                BatchItem::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{ConversationUpload, MessageUpload};
    use crate::testing::{StubClassifier, StubEmbedding, StubJudge};
    use pretty_assertions::assert_eq;

    async fn service(dir: &tempfile::TempDir) -> (Arc<AnalysisService>, Arc<ConversationStore>) {
        let store = ConversationStore::new(dir.path()).await.unwrap();
        let emotion = StubClassifier::fixed("emotion", &[("neutral", 0.7), ("joy", 0.3)]);
        let empathy = StubClassifier::fixed(
            "empathy",
            &[("empathetic", 0.4), ("not_empathetic", 0.6)],
        );
        let judge = StubJudge::replying("{\"score\": 0.7, \"label\": \"accurate\"}");
        let analyzer = Analyzer::new(
            Arc::new(StubEmbedding::default()),
            Arc::new(emotion),
            Arc::new(empathy),
            Arc::new(judge),
            0.0,
        );
        (AnalysisService::new(store.clone(), Arc::new(analyzer), 2), store)
    }

    async fn import(store: &ConversationStore, turns: &[(&str, &str)]) -> i64 {
        let upload = ConversationUpload {
            title: Some("test".into()),
            messages: turns
                .iter()
                .map(|(sender, message)| MessageUpload {
                    sender: sender.to_string(),
                    message: message.to_string(),
                    timestamp: None,
                })
                .collect(),
        };
        let conversation = upload.validate().unwrap();
        store.insert_conversation(conversation).await.unwrap()
    }

    const EXCHANGE: &[(&str, &str)] = &[
        ("user", "How do I update my billing address?"),
        ("AI", "Open billing settings and edit your address."),
    ];

    #[tokio::test]
    async fn test_analyze_persists_record() {
        let dir = tempfile::tempdir().unwrap();
        let (service, store) = service(&dir).await;
        let id = import(&store, EXCHANGE).await;

        let report = service.analyze_conversation(id).await.unwrap();
        assert_eq!(report.conversation_id, id);

        let stored = store.list_analyses().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].accuracy, report.accuracy.score);
        assert_eq!(stored[0].overall_score, report.satisfaction.score);
    }

    #[tokio::test]
    async fn test_unknown_and_insufficient_conversations() {
        let dir = tempfile::tempdir().unwrap();
        let (service, store) = service(&dir).await;

        let err = service.analyze_conversation(42).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(42)));
        assert_eq!(err.status_code(), 404);

        let id = import(&store, &[("user", "Hello?")]).await;
        let err = service.analyze_conversation(id).await.unwrap_err();
        assert!(matches!(err, ServiceError::InsufficientData(_)));
        assert_eq!(err.status_code(), 400);
        assert!(store.list_analyses().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_batch_skips_insufficient_and_overwrites_on_rerun() {
        let dir = tempfile::tempdir().unwrap();
        let (service, store) = service(&dir).await;
        import(&store, EXCHANGE).await;
        import(&store, EXCHANGE).await;
        import(&store, &[("assistant", "Anyone there?")]).await;

        let summary = service.run_batch().await.unwrap();
        assert_eq!(
            summary,
            BatchSummary {
                analyzed: 2,
                skipped: 1,
                failed: 0
            }
        );

        let first = store.list_analyses().await.unwrap();
        service.run_batch().await.unwrap();
        let second = store.list_analyses().await.unwrap();
        assert_eq!(second.len(), 2);
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.conversation_id, b.conversation_id);
            assert_eq!(a.overall_score, b.overall_score);
            assert_eq!(a.relevance, b.relevance);
        }
    }
}
