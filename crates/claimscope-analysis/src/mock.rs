//! Mock analysis backend for deterministic testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use claimscope_core::models::{AnalysisRequest, CriterionAssessment, TechnicalField};
use claimscope_core::{AnalysisBackend, Error, Result};

/// A canned assessment suitable as a default fixture.
pub fn sample_assessment() -> CriterionAssessment {
    CriterionAssessment {
        novelty: 0.75,
        non_obviousness: 0.68,
        utility: 0.9,
        enablement: 0.82,
        confidence: 0.68,
        summary: "This invention shows strong potential for patentability with novel technical features.".to_string(),
        recommendations: vec![
            "Consider broadening claim scope in communications technology".to_string(),
            "Additional prior art search recommended in machine learning domain".to_string(),
            "Strong technical merit for patent application".to_string(),
        ],
        key_features: vec![
            "Adaptive signal processing".to_string(),
            "Self-calibrating hardware".to_string(),
        ],
        risk_factors: vec!["Crowded prior-art landscape".to_string()],
    }
}

/// Deterministic analysis backend for tests.
///
/// Returns a configurable canned assessment, optionally fails every call,
/// and records inputs for assertions.
#[derive(Clone)]
pub struct MockAnalysisBackend {
    assessment: Arc<Mutex<CriterionAssessment>>,
    field: TechnicalField,
    fail_with: Option<String>,
    calls: Arc<AtomicUsize>,
    inputs: Arc<Mutex<Vec<String>>>,
}

impl MockAnalysisBackend {
    pub fn new() -> Self {
        Self {
            assessment: Arc::new(Mutex::new(sample_assessment())),
            field: TechnicalField::Other,
            fail_with: None,
            calls: Arc::new(AtomicUsize::new(0)),
            inputs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Replace the canned assessment.
    pub fn with_assessment(self, assessment: CriterionAssessment) -> Self {
        *self.assessment.lock().unwrap() = assessment;
        self
    }

    /// Fixed answer for `classify_field`.
    pub fn with_field(mut self, field: TechnicalField) -> Self {
        self.field = field;
        self
    }

    /// Make every call fail with the given message.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.fail_with = Some(message.into());
        self
    }

    /// Number of `analyze` calls issued against this backend.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Analysis texts received, in call order.
    pub fn received_inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

impl Default for MockAnalysisBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnalysisBackend for MockAnalysisBackend {
    async fn analyze(&self, req: &AnalysisRequest) -> Result<CriterionAssessment> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().unwrap().push(req.text.clone());

        if let Some(ref msg) = self.fail_with {
            return Err(Error::Analysis(msg.clone()));
        }
        Ok(self.assessment.lock().unwrap().clone())
    }

    async fn classify_field(&self, _text: &str) -> Result<TechnicalField> {
        if let Some(ref msg) = self.fail_with {
            return Err(Error::Analysis(msg.clone()));
        }
        Ok(self.field)
    }

    fn model_name(&self) -> &str {
        "mock-analysis"
    }
}
