//! Shared application state.

use std::sync::Arc;

use claimscope_core::PriorArtBackend;
use claimscope_pipeline::{AssessmentRunner, InMemoryAssessmentStore, InMemoryDocumentStore};

/// State handed to every handler. All context is explicit and passed in;
/// there are no process-wide singletons.
#[derive(Clone)]
pub struct AppState {
    pub documents: Arc<InMemoryDocumentStore>,
    pub assessments: Arc<InMemoryAssessmentStore>,
    pub runner: Arc<AssessmentRunner>,
    pub prior_art: Arc<dyn PriorArtBackend>,
}
