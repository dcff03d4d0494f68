//! Centralized default constants for the claimscope system.
//!
//! **This module is the single source of truth** for all shared default
//! values. Crates should reference these constants instead of defining
//! their own magic numbers.

// =============================================================================
// UPLOADS
// =============================================================================

/// Maximum file upload size in bytes (10 MB).
/// Enforced client-side before any network call and again in the upload
/// handler. A file of exactly this size is accepted.
pub const MAX_UPLOAD_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Maximum request body size for the multipart upload route.
/// Slightly above the payload cap to leave room for multipart framing.
pub const MAX_BODY_SIZE_BYTES: usize = 12 * 1024 * 1024;

/// Maximum filename length (ext4/NTFS compatible).
pub const FILENAME_MAX_LENGTH: usize = 255;

// =============================================================================
// INTAKE VALIDATION
// =============================================================================

/// Minimum invention description length in characters.
/// A description of exactly this length is accepted.
pub const DESCRIPTION_MIN_CHARS: usize = 100;

/// Maximum project title length in characters.
pub const TITLE_MAX_CHARS: usize = 500;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 8000;

/// Default broadcast channel capacity for pipeline events.
pub const EVENT_BUS_CAPACITY: usize = 64;

// =============================================================================
// ANALYSIS
// =============================================================================

/// Timeout for analysis requests in seconds.
pub const ANALYSIS_TIMEOUT_SECS: u64 = 120;

/// Sampling temperature for analysis generation. Low for consistent scoring.
pub const ANALYSIS_TEMPERATURE: f32 = 0.3;

/// Characters of invention text sent to the analysis model.
pub const ANALYSIS_TEXT_LIMIT: usize = 8000;

/// Default chat completion endpoint.
pub const ANALYSIS_BASE_URL: &str = "https://api.openai.com/v1";

/// Default analysis model slug.
pub const ANALYSIS_MODEL: &str = "gpt-4o-mini";

// =============================================================================
// PRIOR-ART SEARCH
// =============================================================================

/// Timeout for patent search requests in seconds.
pub const SEARCH_TIMEOUT_SECS: u64 = 30;

/// Results per page on the custom-search endpoint (hard API limit).
pub const SEARCH_PAGE_SIZE: usize = 10;

/// Maximum search queries generated per request.
pub const MAX_QUERIES_GENERATED: usize = 5;

/// Maximum search queries actually executed (rate-limit budget).
pub const MAX_QUERIES_EXECUTED: usize = 3;

/// Default maximum results returned by a prior-art search.
pub const DEFAULT_MAX_RESULTS: usize = 20;

/// Result-count choices offered by the query panel.
pub const RESULT_LIMIT_CHOICES: [usize; 3] = [10, 20, 50];

/// Characters of patent abstract kept from a search snippet.
pub const ABSTRACT_MAX_CHARS: usize = 500;

/// Recency boost decay window in years. Patents older than this get no boost.
pub const RECENCY_DECAY_YEARS: f32 = 20.0;

/// Maximum recency boost applied to a similarity score (20%).
pub const RECENCY_BOOST_MAX: f32 = 0.2;

// =============================================================================
// RISK BUCKETS
// =============================================================================

/// Similarity at or above this is "High Risk".
pub const RISK_HIGH_THRESHOLD: f32 = 0.7;

/// Similarity at or above this (and below high) is "Medium Risk".
pub const RISK_MEDIUM_THRESHOLD: f32 = 0.5;

/// Similarity at or above this (and below medium) is "Low Risk".
/// Anything below is "Minimal Risk".
pub const RISK_LOW_THRESHOLD: f32 = 0.3;

// =============================================================================
// PIPELINE
// =============================================================================

/// Per-stage execution timeout in seconds. A hung external call fails the
/// stage instead of stalling the run indefinitely.
pub const STAGE_TIMEOUT_SECS: u64 = 180;

// =============================================================================
// CLIENT
// =============================================================================

/// Default request timeout for the typed API client in seconds.
pub const CLIENT_TIMEOUT_SECS: u64 = 30;

/// Status polling interval for the processing monitor in milliseconds.
pub const POLL_INTERVAL_MS: u64 = 750;

/// Client-side result cache capacity (assessments are small).
pub const RESULT_CACHE_CAPACITY: usize = 32;

/// Terminal status message shown when an assessment run fails.
pub const ASSESSMENT_FAILED_MESSAGE: &str = "Assessment failed. Please try again.";
