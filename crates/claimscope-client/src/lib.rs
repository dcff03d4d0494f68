//! # claimscope-client
//!
//! Typed API client and session components for the claimscope platform.
//!
//! This crate provides:
//! - `ApiClient`: typed HTTP client over the claimscope API, with bounded
//!   timeouts and cooperative cancellation
//! - `UploadCollector`: per-file upload session state with client-side
//!   validation and failure isolation
//! - `IntakeForm`: submit-time validation with per-field error clearing
//! - `ProcessingMonitor`: polls assessment status, enforcing monotonic
//!   stage/progress transitions
//! - `PriorArtPanel`: standalone prior-art query flow with redundant-request
//!   suppression
//! - `ResultsView`: fetch-once result rendering with an LRU cache and a
//!   built-in demonstration result

pub mod api;
pub mod intake;
pub mod monitor;
pub mod prior_art;
pub mod results;
pub mod upload;

// Re-export core types
pub use claimscope_core::*;

pub use api::ApiClient;
pub use intake::IntakeForm;
pub use monitor::{ProcessingMonitor, ProcessingState};
pub use prior_art::{PriorArtPanel, PriorArtPresentation, ResultLimit};
pub use results::{sample_result, PriorArtView, ResultsView};
pub use upload::{UploadCollector, UploadStatus, UploadedFile};
