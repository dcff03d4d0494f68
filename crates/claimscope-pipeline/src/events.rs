//! Pipeline progress events.

use uuid::Uuid;

use claimscope_core::models::AssessmentStage;

/// Event emitted by the assessment runner at stage boundaries.
///
/// These are real backend stage transitions, not simulated progress; the
/// status endpoint clients poll is updated at the same boundaries.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// A stage began executing.
    StageStarted {
        assessment_id: Uuid,
        stage: AssessmentStage,
    },
    /// A stage's unit of work resolved successfully.
    StageCompleted {
        assessment_id: Uuid,
        stage: AssessmentStage,
    },
    /// The whole run completed and the result is stored.
    RunCompleted { assessment_id: Uuid },
    /// The run failed terminally at the given stage.
    RunFailed {
        assessment_id: Uuid,
        stage: AssessmentStage,
        error: String,
    },
}
