//! # claimscope-core
//!
//! Core types, traits, and abstractions for the claimscope patent
//! assessment platform.
//!
//! This crate provides the foundational data structures, validation rules,
//! and trait definitions that the other claimscope crates depend on.

pub mod defaults;
pub mod error;
pub mod file_safety;
pub mod logging;
pub mod models;
pub mod risk;
pub mod traits;
pub mod validate;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use file_safety::{
    detect_content_type, is_text_content_type, sanitize_filename, validate_upload,
    UploadValidation,
};
pub use models::*;
pub use risk::RiskLevel;
pub use traits::*;
pub use validate::{parse_keywords, validate_submission, FieldErrors};
