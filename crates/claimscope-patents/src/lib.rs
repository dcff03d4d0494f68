//! # claimscope-patents
//!
//! Prior-art patent search for claimscope.
//!
//! This crate provides:
//! - Multi-strategy search query generation from invention descriptions
//! - `GooglePatentsClient`: custom-search client over patents.google.com
//! - Deduplication, lexical similarity ranking, and search confidence scoring
//! - `MockPriorArtBackend` for deterministic tests

pub mod client;
pub mod mock;
pub mod query;
pub mod ranking;

// Re-export core types
pub use claimscope_core::*;

pub use client::GooglePatentsClient;
pub use mock::MockPriorArtBackend;
