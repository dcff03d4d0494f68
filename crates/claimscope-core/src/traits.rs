//! Core traits for claimscope abstractions.
//!
//! These traits define the interfaces that concrete implementations must
//! satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// ANALYSIS BACKEND
// =============================================================================

/// Backend that scores an invention against the patentability criteria.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Run the full criterion analysis for the given invention text.
    async fn analyze(&self, req: &AnalysisRequest) -> Result<CriterionAssessment>;

    /// Classify invention text into a technical field.
    async fn classify_field(&self, text: &str) -> Result<TechnicalField>;

    /// Model identifier, for logging and provenance.
    fn model_name(&self) -> &str;
}

// =============================================================================
// PRIOR-ART BACKEND
// =============================================================================

/// Backend that searches external patent databases for prior art.
#[async_trait]
pub trait PriorArtBackend: Send + Sync {
    /// Run one prior-art search. Zero matches is a successful outcome.
    async fn search(&self, query: &PriorArtQuery) -> Result<PriorArtSearchResult>;
}

// =============================================================================
// STORES
// =============================================================================

/// Store for uploaded documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store a document, returning its id.
    async fn store(&self, doc: StoredDocument) -> Result<Uuid>;

    /// Fetch a document by id.
    async fn fetch(&self, id: Uuid) -> Result<StoredDocument>;

    /// Check whether a document exists.
    async fn exists(&self, id: Uuid) -> Result<bool>;
}

/// Store for assessment run records.
#[async_trait]
pub trait AssessmentStore: Send + Sync {
    /// Create a pending record for a submission, returning the record.
    async fn create(&self, submission: AssessmentSubmission) -> Result<AssessmentRecord>;

    /// Fetch a record by id.
    async fn fetch(&self, id: Uuid) -> Result<AssessmentRecord>;

    /// Mark a record as running (sets `started_at`).
    async fn mark_running(&self, id: Uuid) -> Result<()>;

    /// Enter a stage: updates stage, target percent, and status message.
    async fn set_stage(&self, id: Uuid, stage: AssessmentStage) -> Result<()>;

    /// Complete the run with its result.
    async fn complete(&self, id: Uuid, result: AssessmentResult) -> Result<()>;

    /// Fail the run terminally with an error message.
    async fn fail(&self, id: Uuid, error: &str) -> Result<()>;
}
