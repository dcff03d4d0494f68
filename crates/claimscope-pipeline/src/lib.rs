//! # claimscope-pipeline
//!
//! Staged assessment pipeline for claimscope.
//!
//! This crate provides:
//! - `AssessmentRunner`: drives a submission through the fixed stage
//!   sequence, strictly sequentially, with per-stage timeouts and
//!   cancellation
//! - Progress events via a broadcast channel
//! - In-memory document and assessment stores
//!
//! ## Example
//!
//! ```ignore
//! use claimscope_pipeline::{AssessmentRunner, RunnerConfig, InMemoryAssessmentStore};
//! use tokio_util::sync::CancellationToken;
//!
//! let runner = AssessmentRunner::new(analysis, prior_art, documents, store, RunnerConfig::default());
//!
//! let mut events = runner.events();
//! let record = store.create(submission).await?;
//! runner.run(record.id, true, CancellationToken::new()).await?;
//!
//! while let Ok(event) = events.recv().await {
//!     println!("Event: {:?}", event);
//! }
//! ```

pub mod events;
pub mod runner;
pub mod store;

// Re-export core types
pub use claimscope_core::*;

pub use events::PipelineEvent;
pub use runner::{AssessmentRunner, RunnerConfig};
pub use store::{InMemoryAssessmentStore, InMemoryDocumentStore};

/// Default per-stage timeout in seconds.
pub const DEFAULT_STAGE_TIMEOUT_SECS: u64 = claimscope_core::defaults::STAGE_TIMEOUT_SECS;
