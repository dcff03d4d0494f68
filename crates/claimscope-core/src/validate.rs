//! Intake form validation.
//!
//! Validation is local: it runs on submit, reports per-field errors, and
//! never reaches the network layer.

use std::collections::BTreeMap;

use crate::defaults::{DESCRIPTION_MIN_CHARS, TITLE_MAX_CHARS};
use crate::models::TechnicalField;

/// Field key for the project title.
pub const FIELD_TITLE: &str = "project_title";
/// Field key for the invention description.
pub const FIELD_DESCRIPTION: &str = "description";
/// Field key for the technical field selector.
pub const FIELD_TECHNICAL_FIELD: &str = "technical_field";

/// Inline error shown for a missing title.
pub const MSG_TITLE_REQUIRED: &str = "Project title is required";
/// Inline error shown for an over-long title.
pub const MSG_TITLE_TOO_LONG: &str = "Project title must be at most 500 characters";
/// Inline error shown for a short description.
pub const MSG_DESCRIPTION_TOO_SHORT: &str = "Description must be at least 100 characters";
/// Inline error shown when no technical field is selected.
pub const MSG_FIELD_REQUIRED: &str = "Select a technical field";

/// Per-field validation errors, keyed by field name.
///
/// Ordered map so error listings render deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<&'static str, &'static str>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &'static str, message: &'static str) {
        self.errors.insert(field, message);
    }

    /// Clear the error for a single field (called as the user edits it).
    pub fn clear(&mut self, field: &str) {
        self.errors.remove(field);
    }

    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.errors.get(field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.errors.iter().map(|(k, v)| (*k, *v))
    }
}

/// Validate an intake submission. Returns the collected per-field errors;
/// an empty set means the submission may proceed.
///
/// Rules: title non-empty after trim (and bounded), description at least
/// `DESCRIPTION_MIN_CHARS` characters (exactly the minimum is accepted),
/// technical field selected from the fixed set.
pub fn validate_submission(
    title: &str,
    description: &str,
    technical_field: Option<TechnicalField>,
) -> FieldErrors {
    let mut errors = FieldErrors::new();

    let title = title.trim();
    if title.is_empty() {
        errors.insert(FIELD_TITLE, MSG_TITLE_REQUIRED);
    } else if title.chars().count() > TITLE_MAX_CHARS {
        errors.insert(FIELD_TITLE, MSG_TITLE_TOO_LONG);
    }

    if description.chars().count() < DESCRIPTION_MIN_CHARS {
        errors.insert(FIELD_DESCRIPTION, MSG_DESCRIPTION_TOO_SHORT);
    }

    if technical_field.is_none() {
        errors.insert(FIELD_TECHNICAL_FIELD, MSG_FIELD_REQUIRED);
    }

    errors
}

/// Split freeform keyword input: comma-separated, trimmed, empties dropped.
pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}
