//! # claimscope-analysis
//!
//! AI analysis backend abstraction for claimscope.
//!
//! This crate provides:
//! - `ChatAnalysisBackend`: OpenAI-compatible chat-completions client that
//!   scores inventions against the four patentability criteria
//! - Prompt construction for analysis and field classification
//! - Lenient JSON response parsing (models wrap and fence their output)
//! - `MockAnalysisBackend` for deterministic tests
//!
//! # Example
//!
//! ```rust,no_run
//! use claimscope_analysis::ChatAnalysisBackend;
//! use claimscope_core::{AnalysisBackend, AnalysisRequest};
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = ChatAnalysisBackend::from_env();
//!     let req = AnalysisRequest {
//!         project_title: "Adaptive antenna array".into(),
//!         text: "An antenna array that ...".into(),
//!         technical_field: None,
//!     };
//!     let assessment = backend.analyze(&req).await.unwrap();
//!     println!("novelty: {}", assessment.novelty);
//! }
//! ```

pub mod backend;
pub mod mock;
pub mod parse;
pub mod prompt;

// Re-export core types
pub use claimscope_core::*;

pub use backend::ChatAnalysisBackend;
pub use mock::MockAnalysisBackend;
