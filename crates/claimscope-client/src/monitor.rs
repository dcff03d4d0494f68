//! Processing monitor: polls assessment status during a run.
//!
//! Stage progression comes from the backend's explicit status field, not
//! from client-side timers. The monitor additionally enforces the display
//! invariants: the shown stage never moves backward and progress is
//! non-decreasing within a run (a lagging poll can observe an older
//! snapshot; it must not rewind the UI).

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

use claimscope_core::models::{AssessmentRecord, AssessmentStage, AssessmentStatus};
use claimscope_core::{defaults, Error, Result};

use crate::api::ApiClient;

/// Display state of an assessment run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingState {
    pub stage: Option<AssessmentStage>,
    pub progress_percent: u8,
    pub status_message: String,
    pub assessment_id: Option<Uuid>,
    /// Terminal error message; `Some` means the run is over and failed.
    pub error: Option<String>,
}

impl ProcessingState {
    fn queued(assessment_id: Uuid) -> Self {
        Self {
            stage: None,
            progress_percent: 0,
            status_message: "Queued for processing...".to_string(),
            assessment_id: Some(assessment_id),
            error: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.stage == Some(AssessmentStage::Completed) && self.error.is_none()
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    pub fn is_terminal(&self) -> bool {
        self.is_completed() || self.is_failed()
    }
}

/// Polls `GET /api/assess/{id}` and maps records into `ProcessingState`.
pub struct ProcessingMonitor {
    assessment_id: Uuid,
    state: ProcessingState,
    poll_interval: Duration,
}

impl ProcessingMonitor {
    pub fn new(assessment_id: Uuid) -> Self {
        Self {
            assessment_id,
            state: ProcessingState::queued(assessment_id),
            poll_interval: Duration::from_millis(defaults::POLL_INTERVAL_MS),
        }
    }

    /// Override the polling interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn state(&self) -> &ProcessingState {
        &self.state
    }

    /// Fold a polled record into the display state, enforcing monotonic
    /// stage and progress transitions.
    pub fn apply_record(&mut self, record: &AssessmentRecord) {
        match record.status {
            AssessmentStatus::Failed => {
                // Terminal: fixed retry message, progress reset to 0
                self.state.error = Some(defaults::ASSESSMENT_FAILED_MESSAGE.to_string());
                self.state.status_message = defaults::ASSESSMENT_FAILED_MESSAGE.to_string();
                self.state.progress_percent = 0;
            }
            AssessmentStatus::Completed => {
                self.state.stage = Some(AssessmentStage::Completed);
                self.state.progress_percent = AssessmentStage::Completed.target_percent();
                self.state.status_message =
                    AssessmentStage::Completed.status_message().to_string();
            }
            AssessmentStatus::Pending | AssessmentStatus::Running => {
                if let Some(stage) = record.stage {
                    let moves_forward = self
                        .state
                        .stage
                        .map_or(true, |current| stage.ordinal() >= current.ordinal());
                    if moves_forward {
                        self.state.stage = Some(stage);
                        self.state.status_message = record
                            .progress_message
                            .clone()
                            .unwrap_or_else(|| stage.status_message().to_string());
                    } else {
                        debug!(?stage, current = ?self.state.stage, "Ignoring backward stage snapshot");
                    }
                }
                // Progress never decreases within a run
                self.state.progress_percent =
                    self.state.progress_percent.max(record.progress_percent);
            }
        }
    }

    /// Poll the status endpoint once and fold the result in.
    ///
    /// A transport failure is terminal for the monitored run: the state
    /// flips to the fixed error message and the error is returned.
    pub async fn poll_once(&mut self, client: &ApiClient) -> Result<&ProcessingState> {
        match client.get_assessment(self.assessment_id).await {
            Ok(record) => {
                self.apply_record(&record);
                Ok(&self.state)
            }
            Err(e) => {
                self.state.error = Some(defaults::ASSESSMENT_FAILED_MESSAGE.to_string());
                self.state.status_message = defaults::ASSESSMENT_FAILED_MESSAGE.to_string();
                self.state.progress_percent = 0;
                Err(e)
            }
        }
    }

    /// Poll until the run reaches a terminal state or `cancel` fires.
    ///
    /// Cancelling abandons the run: polling stops, partial state is
    /// discarded by the caller, and there is no resume.
    pub async fn watch(
        &mut self,
        client: &ApiClient,
        cancel: &CancellationToken,
    ) -> Result<ProcessingState> {
        loop {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            self.poll_once(client).await?;
            if self.state.is_terminal() {
                return Ok(self.state.clone());
            }

            tokio::select! {
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use claimscope_core::models::*;

    fn record(
        id: Uuid,
        status: AssessmentStatus,
        stage: Option<AssessmentStage>,
        progress: u8,
    ) -> AssessmentRecord {
        AssessmentRecord {
            id,
            submission: AssessmentSubmission {
                project_title: "t".to_string(),
                description: "d".repeat(120),
                technical_field: TechnicalField::Software,
                keywords: vec![],
                document_id: None,
            },
            status,
            stage,
            progress_percent: progress,
            progress_message: stage.map(|s| s.status_message().to_string()),
            error_message: None,
            result: None,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }

    #[test]
    fn initial_state_is_queued() {
        let id = Uuid::new_v4();
        let monitor = ProcessingMonitor::new(id);
        let state = monitor.state();
        assert_eq!(state.progress_percent, 0);
        assert!(state.stage.is_none());
        assert_eq!(state.assessment_id, Some(id));
        assert!(!state.is_terminal());
    }

    #[test]
    fn stages_advance_with_records() {
        let id = Uuid::new_v4();
        let mut monitor = ProcessingMonitor::new(id);

        for stage in [
            AssessmentStage::DocumentProcessing,
            AssessmentStage::AiAnalysis,
            AssessmentStage::PriorArtSearch,
            AssessmentStage::ReportGeneration,
        ] {
            monitor.apply_record(&record(
                id,
                AssessmentStatus::Running,
                Some(stage),
                stage.target_percent(),
            ));
            assert_eq!(monitor.state().stage, Some(stage));
            assert_eq!(monitor.state().progress_percent, stage.target_percent());
            assert_eq!(monitor.state().status_message, stage.status_message());
        }
    }

    #[test]
    fn backward_stage_snapshot_is_ignored() {
        let id = Uuid::new_v4();
        let mut monitor = ProcessingMonitor::new(id);

        monitor.apply_record(&record(
            id,
            AssessmentStatus::Running,
            Some(AssessmentStage::PriorArtSearch),
            75,
        ));
        // A lagging snapshot from an earlier stage arrives late
        monitor.apply_record(&record(
            id,
            AssessmentStatus::Running,
            Some(AssessmentStage::AiAnalysis),
            50,
        ));

        assert_eq!(monitor.state().stage, Some(AssessmentStage::PriorArtSearch));
        assert_eq!(monitor.state().progress_percent, 75);
    }

    #[test]
    fn progress_is_non_decreasing_within_a_run() {
        let id = Uuid::new_v4();
        let mut monitor = ProcessingMonitor::new(id);

        monitor.apply_record(&record(id, AssessmentStatus::Running, Some(AssessmentStage::AiAnalysis), 50));
        monitor.apply_record(&record(id, AssessmentStatus::Running, Some(AssessmentStage::AiAnalysis), 30));
        assert_eq!(monitor.state().progress_percent, 50);
    }

    #[test]
    fn completed_record_is_terminal_at_100() {
        let id = Uuid::new_v4();
        let mut monitor = ProcessingMonitor::new(id);
        monitor.apply_record(&record(
            id,
            AssessmentStatus::Completed,
            Some(AssessmentStage::Completed),
            100,
        ));

        let state = monitor.state();
        assert!(state.is_completed());
        assert!(state.is_terminal());
        assert_eq!(state.progress_percent, 100);
        assert_eq!(state.status_message, "Assessment complete");
    }

    #[test]
    fn failed_record_shows_retry_message_and_resets_progress() {
        let id = Uuid::new_v4();
        let mut monitor = ProcessingMonitor::new(id);
        monitor.apply_record(&record(
            id,
            AssessmentStatus::Running,
            Some(AssessmentStage::AiAnalysis),
            50,
        ));

        let mut failed = record(id, AssessmentStatus::Failed, Some(AssessmentStage::AiAnalysis), 50);
        failed.error_message = Some("Analysis error: model unavailable".to_string());
        monitor.apply_record(&failed);

        let state = monitor.state();
        assert!(state.is_failed());
        assert!(state.is_terminal());
        assert_eq!(state.progress_percent, 0);
        assert_eq!(
            state.status_message,
            "Assessment failed. Please try again."
        );
    }

    #[tokio::test]
    async fn watch_stops_when_cancelled() {
        let id = Uuid::new_v4();
        let mut monitor = ProcessingMonitor::new(id);
        let client = ApiClient::new("http://127.0.0.1:9");
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = monitor.watch(&client, &cancel).await.unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }
}
