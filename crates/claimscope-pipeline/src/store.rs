//! In-memory stores for documents and assessment records.
//!
//! Assessment and document state is session-scoped; nothing persists across
//! restarts. Stores are cheap to clone and share via `Arc`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use claimscope_core::models::*;
use claimscope_core::{AssessmentStore, DocumentStore, Error, Result};

// =============================================================================
// DOCUMENTS
// =============================================================================

/// In-memory store for uploaded documents.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    docs: Arc<RwLock<HashMap<Uuid, StoredDocument>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn store(&self, doc: StoredDocument) -> Result<Uuid> {
        let id = doc.id;
        self.docs.write().await.insert(id, doc);
        Ok(id)
    }

    async fn fetch(&self, id: Uuid) -> Result<StoredDocument> {
        self.docs
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(Error::DocumentNotFound(id))
    }

    async fn exists(&self, id: Uuid) -> Result<bool> {
        Ok(self.docs.read().await.contains_key(&id))
    }
}

// =============================================================================
// ASSESSMENTS
// =============================================================================

/// In-memory store for assessment run records.
#[derive(Clone, Default)]
pub struct InMemoryAssessmentStore {
    records: Arc<RwLock<HashMap<Uuid, AssessmentRecord>>>,
}

impl InMemoryAssessmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn update<F>(&self, id: Uuid, apply: F) -> Result<()>
    where
        F: FnOnce(&mut AssessmentRecord),
    {
        let mut records = self.records.write().await;
        let record = records.get_mut(&id).ok_or(Error::AssessmentNotFound(id))?;
        apply(record);
        Ok(())
    }
}

#[async_trait]
impl AssessmentStore for InMemoryAssessmentStore {
    async fn create(&self, submission: AssessmentSubmission) -> Result<AssessmentRecord> {
        // UUIDv7 so record ids sort chronologically
        let record = AssessmentRecord {
            id: Uuid::now_v7(),
            submission,
            status: AssessmentStatus::Pending,
            stage: None,
            progress_percent: 0,
            progress_message: None,
            error_message: None,
            result: None,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        };
        self.records.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn fetch(&self, id: Uuid) -> Result<AssessmentRecord> {
        self.records
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(Error::AssessmentNotFound(id))
    }

    async fn mark_running(&self, id: Uuid) -> Result<()> {
        self.update(id, |record| {
            record.status = AssessmentStatus::Running;
            record.started_at = Some(Utc::now());
        })
        .await
    }

    async fn set_stage(&self, id: Uuid, stage: AssessmentStage) -> Result<()> {
        self.update(id, |record| {
            record.stage = Some(stage);
            record.progress_percent = stage.target_percent();
            record.progress_message = Some(stage.status_message().to_string());
        })
        .await
    }

    async fn complete(&self, id: Uuid, result: AssessmentResult) -> Result<()> {
        self.update(id, |record| {
            record.status = AssessmentStatus::Completed;
            record.stage = Some(AssessmentStage::Completed);
            record.progress_percent = AssessmentStage::Completed.target_percent();
            record.progress_message = Some(AssessmentStage::Completed.status_message().to_string());
            record.result = Some(result);
            record.completed_at = Some(Utc::now());
        })
        .await
    }

    async fn fail(&self, id: Uuid, error: &str) -> Result<()> {
        self.update(id, |record| {
            record.status = AssessmentStatus::Failed;
            record.error_message = Some(error.to_string());
            record.completed_at = Some(Utc::now());
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> AssessmentSubmission {
        AssessmentSubmission {
            project_title: "Widget".to_string(),
            description: "d".repeat(120),
            technical_field: TechnicalField::Software,
            keywords: vec![],
            document_id: None,
        }
    }

    fn document() -> StoredDocument {
        StoredDocument {
            id: Uuid::new_v4(),
            filename: "spec.txt".to_string(),
            content_type: "text/plain".to_string(),
            size_bytes: 10,
            sha256: "abc".to_string(),
            text: Some("notes".to_string()),
            uploaded_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn document_store_roundtrip() {
        let store = InMemoryDocumentStore::new();
        let doc = document();
        let id = store.store(doc.clone()).await.unwrap();
        assert_eq!(id, doc.id);
        assert!(store.exists(id).await.unwrap());
        assert_eq!(store.fetch(id).await.unwrap(), doc);
    }

    #[tokio::test]
    async fn document_store_missing_id() {
        let store = InMemoryDocumentStore::new();
        let id = Uuid::new_v4();
        assert!(!store.exists(id).await.unwrap());
        let err = store.fetch(id).await.unwrap_err();
        assert!(matches!(err, Error::DocumentNotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn assessment_record_lifecycle() {
        let store = InMemoryAssessmentStore::new();
        let record = store.create(submission()).await.unwrap();
        assert_eq!(record.status, AssessmentStatus::Pending);
        assert_eq!(record.progress_percent, 0);
        assert!(record.stage.is_none());

        store.mark_running(record.id).await.unwrap();
        store
            .set_stage(record.id, AssessmentStage::AiAnalysis)
            .await
            .unwrap();

        let running = store.fetch(record.id).await.unwrap();
        assert_eq!(running.status, AssessmentStatus::Running);
        assert_eq!(running.stage, Some(AssessmentStage::AiAnalysis));
        assert_eq!(running.progress_percent, 50);
        assert_eq!(
            running.progress_message.as_deref(),
            Some("Running AI patentability analysis...")
        );
        assert!(running.started_at.is_some());
    }

    #[tokio::test]
    async fn complete_stores_result_and_terminal_state() {
        let store = InMemoryAssessmentStore::new();
        let record = store.create(submission()).await.unwrap();

        let result = AssessmentResult {
            assessment_id: record.id,
            scores: CriterionScores::from_criteria(0.8, 0.7, 0.9, 0.6),
            confidence_level: 0.7,
            summary: "ok".to_string(),
            recommendations: vec![],
            key_features: vec![],
            risk_factors: vec![],
            prior_art: None,
            created_at: Utc::now(),
            completed_at: Utc::now(),
        };
        store.complete(record.id, result).await.unwrap();

        let done = store.fetch(record.id).await.unwrap();
        assert_eq!(done.status, AssessmentStatus::Completed);
        assert_eq!(done.stage, Some(AssessmentStage::Completed));
        assert_eq!(done.progress_percent, 100);
        assert!(done.result.is_some());
        assert!(done.completed_at.is_some());
    }

    #[tokio::test]
    async fn fail_is_terminal_with_message() {
        let store = InMemoryAssessmentStore::new();
        let record = store.create(submission()).await.unwrap();
        store
            .set_stage(record.id, AssessmentStage::AiAnalysis)
            .await
            .unwrap();
        store.fail(record.id, "Analysis error: boom").await.unwrap();

        let failed = store.fetch(record.id).await.unwrap();
        assert_eq!(failed.status, AssessmentStatus::Failed);
        assert_eq!(failed.error_message.as_deref(), Some("Analysis error: boom"));
        // Failing stage is preserved for diagnostics
        assert_eq!(failed.stage, Some(AssessmentStage::AiAnalysis));
    }

    #[tokio::test]
    async fn updates_on_unknown_record_fail() {
        let store = InMemoryAssessmentStore::new();
        let id = Uuid::new_v4();
        assert!(store.mark_running(id).await.is_err());
        assert!(store.fail(id, "x").await.is_err());
    }

    #[tokio::test]
    async fn record_ids_sort_chronologically() {
        let store = InMemoryAssessmentStore::new();
        let first = store.create(submission()).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let second = store.create(submission()).await.unwrap();
        assert!(first.id < second.id);
    }
}
