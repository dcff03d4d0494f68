//! Assessment runner: drives a submission through the stage sequence.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use claimscope_core::models::*;
use claimscope_core::{
    defaults, AnalysisBackend, AssessmentStore, DocumentStore, Error, PriorArtBackend, Result,
};

use crate::events::PipelineEvent;

/// Configuration for the assessment runner.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Per-stage execution timeout in seconds.
    pub stage_timeout_secs: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            stage_timeout_secs: defaults::STAGE_TIMEOUT_SECS,
        }
    }
}

impl RunnerConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `CLAIMSCOPE_STAGE_TIMEOUT_SECS` | `180` | Per-stage timeout |
    pub fn from_env() -> Self {
        let stage_timeout_secs = std::env::var("CLAIMSCOPE_STAGE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::STAGE_TIMEOUT_SECS);

        Self { stage_timeout_secs }
    }

    /// Set the per-stage timeout.
    pub fn with_stage_timeout(mut self, secs: u64) -> Self {
        self.stage_timeout_secs = secs;
        self
    }
}

/// Drives assessments through the fixed forward stage sequence.
///
/// Strictly sequential: stage k+1 is never initiated before stage k's
/// asynchronous unit of work resolves. Failure of any stage is terminal for
/// the run; there is no automatic retry.
pub struct AssessmentRunner {
    analysis: Arc<dyn AnalysisBackend>,
    prior_art: Arc<dyn PriorArtBackend>,
    documents: Arc<dyn DocumentStore>,
    store: Arc<dyn AssessmentStore>,
    config: RunnerConfig,
    event_tx: broadcast::Sender<PipelineEvent>,
}

impl AssessmentRunner {
    /// Create a new runner over the given backends and stores.
    pub fn new(
        analysis: Arc<dyn AnalysisBackend>,
        prior_art: Arc<dyn PriorArtBackend>,
        documents: Arc<dyn DocumentStore>,
        store: Arc<dyn AssessmentStore>,
        config: RunnerConfig,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(defaults::EVENT_BUS_CAPACITY);
        Self {
            analysis,
            prior_art,
            documents,
            store,
            config,
            event_tx,
        }
    }

    /// Get a receiver for pipeline events.
    pub fn events(&self) -> broadcast::Receiver<PipelineEvent> {
        self.event_tx.subscribe()
    }

    /// Run the assessment with the given record id to completion.
    ///
    /// `include_prior_art` controls whether the prior-art stage issues a
    /// search; the stage itself is always entered so the observable sequence
    /// is fixed. Cancelling `cancel` aborts between and during stages and
    /// leaves the record failed.
    #[instrument(skip(self, cancel), fields(subsystem = "pipeline", component = "runner", op = "run", assessment_id = %id))]
    pub async fn run(
        &self,
        id: Uuid,
        include_prior_art: bool,
        cancel: CancellationToken,
    ) -> Result<()> {
        let start = Instant::now();

        self.store.mark_running(id).await?;
        let record = self.store.fetch(id).await?;

        match self
            .execute(id, &record, include_prior_art, &cancel)
            .await
        {
            Ok(result) => {
                self.store.complete(id, result).await?;
                let _ = self
                    .event_tx
                    .send(PipelineEvent::RunCompleted { assessment_id: id });
                info!(
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Assessment completed"
                );
                Ok(())
            }
            Err(e) => {
                let stage = self
                    .store
                    .fetch(id)
                    .await
                    .ok()
                    .and_then(|r| r.stage)
                    .unwrap_or(AssessmentStage::DocumentProcessing);
                let error = e.to_string();
                if let Err(store_err) = self.store.fail(id, &error).await {
                    warn!(error = %store_err, "Failed to record assessment failure");
                }
                let _ = self.event_tx.send(PipelineEvent::RunFailed {
                    assessment_id: id,
                    stage,
                    error: error.clone(),
                });
                warn!(
                    stage = ?stage,
                    error = %error,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Assessment failed"
                );
                Err(e)
            }
        }
    }

    /// The stage sequence proper. Any error exits immediately; no later
    /// stage's request is issued.
    async fn execute(
        &self,
        id: Uuid,
        record: &AssessmentRecord,
        include_prior_art: bool,
        cancel: &CancellationToken,
    ) -> Result<AssessmentResult> {
        let submission = &record.submission;

        // Resolve the referenced document. Plain-text payloads are folded
        // into the analysis text; binary formats contribute metadata only.
        let documents = self.documents.clone();
        let analysis_text = self
            .with_stage(id, AssessmentStage::DocumentProcessing, cancel, async {
                let mut text = submission.description.clone();
                if let Some(doc_id) = submission.document_id {
                    let doc = documents.fetch(doc_id).await?;
                    if let Some(doc_text) = doc.text {
                        text.push_str("\n\n");
                        text.push_str(&doc_text);
                    }
                }
                Ok(text)
            })
            .await?;

        let analysis = self.analysis.clone();
        let analysis_request = AnalysisRequest {
            project_title: submission.project_title.clone(),
            text: analysis_text,
            technical_field: Some(submission.technical_field),
        };
        let assessment = self
            .with_stage(id, AssessmentStage::AiAnalysis, cancel, async {
                analysis.analyze(&analysis_request).await
            })
            .await?;

        let prior_art_backend = self.prior_art.clone();
        let prior_art = self
            .with_stage(id, AssessmentStage::PriorArtSearch, cancel, async {
                if !include_prior_art {
                    return Ok(None);
                }
                let query = PriorArtQuery {
                    invention_description: submission.description.clone(),
                    technical_field: submission.technical_field,
                    keywords: if submission.keywords.is_empty() {
                        None
                    } else {
                        Some(submission.keywords.clone())
                    },
                    max_results: defaults::DEFAULT_MAX_RESULTS,
                };
                prior_art_backend.search(&query).await.map(Some)
            })
            .await?;

        let created_at = record.created_at;
        self.with_stage(id, AssessmentStage::ReportGeneration, cancel, async {
            Ok(AssessmentResult {
                assessment_id: id,
                scores: CriterionScores::from_criteria(
                    assessment.novelty,
                    assessment.non_obviousness,
                    assessment.utility,
                    assessment.enablement,
                ),
                confidence_level: clamp_score(assessment.confidence),
                summary: assessment.summary.clone(),
                recommendations: assessment.recommendations.clone(),
                key_features: assessment.key_features.clone(),
                risk_factors: assessment.risk_factors.clone(),
                prior_art,
                created_at,
                completed_at: Utc::now(),
            })
        })
        .await
    }

    /// Enter a stage, then run its unit of work under the stage timeout and
    /// the caller's cancellation token.
    async fn with_stage<T, F>(
        &self,
        id: Uuid,
        stage: AssessmentStage,
        cancel: &CancellationToken,
        work: F,
    ) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.store.set_stage(id, stage).await?;
        let _ = self.event_tx.send(PipelineEvent::StageStarted {
            assessment_id: id,
            stage,
        });
        info!(stage = ?stage, "Stage started");

        let timeout = Duration::from_secs(self.config.stage_timeout_secs);
        let result = tokio::select! {
            _ = cancel.cancelled() => Err(Error::Cancelled),
            outcome = tokio::time::timeout(timeout, work) => match outcome {
                Ok(r) => r,
                Err(_) => Err(Error::Timeout(format!(
                    "Stage {:?} exceeded {}s",
                    stage, self.config.stage_timeout_secs
                ))),
            },
        };

        if result.is_ok() {
            let _ = self.event_tx.send(PipelineEvent::StageCompleted {
                assessment_id: id,
                stage,
            });
        }
        result
    }
}
