//! Upload validation for assessment documents.
//!
//! Two-layer check:
//! 1. Extension allowlist + size bounds (cheap, runs client-side before any
//!    network call and again in the upload handler)
//! 2. Magic byte content detection server-side

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Accepted upload extensions (case-insensitive).
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "docx", "txt", "png", "jpg", "jpeg"];

static ALLOWED_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ALLOWED_EXTENSIONS.iter().copied().collect());

/// Result of upload validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadValidation {
    pub allowed: bool,
    pub block_reason: Option<String>,
}

impl UploadValidation {
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            block_reason: None,
        }
    }

    pub fn blocked(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            block_reason: Some(reason.into()),
        }
    }
}

/// Lowercased extension of a filename, if any.
fn extension_of(filename: &str) -> Option<String> {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Validate an upload candidate by name and size.
///
/// Per-file contract: an empty file, a file over `max_size_bytes`
/// (exactly the limit is accepted), or an extension outside the allowlist
/// is rejected with a human-readable reason. This check never reads file
/// content, so callers can run it before issuing any network call.
pub fn validate_upload(filename: &str, size_bytes: u64, max_size_bytes: u64) -> UploadValidation {
    if size_bytes == 0 {
        return UploadValidation::blocked("File is empty");
    }

    if size_bytes > max_size_bytes {
        return UploadValidation::blocked(format!(
            "File too large. Maximum size: {} MB",
            max_size_bytes / (1024 * 1024)
        ));
    }

    match extension_of(filename) {
        Some(ext) if ALLOWED_SET.contains(ext.as_str()) => UploadValidation::allowed(),
        Some(ext) => UploadValidation::blocked(format!(
            "Unsupported file type: .{}. Supported: PDF, DOCX, TXT, PNG, JPG, JPEG",
            ext
        )),
        None => UploadValidation::blocked(
            "Unsupported file type. Supported: PDF, DOCX, TXT, PNG, JPG, JPEG",
        ),
    }
}

/// Detect the content type of an uploaded payload.
///
/// Magic bytes win; text formats (no magic bytes) fall back to the
/// extension; otherwise the client's claimed type is kept.
pub fn detect_content_type(filename: &str, data: &[u8], claimed: &str) -> String {
    if let Some(kind) = infer::get(data) {
        return kind.mime_type().to_string();
    }

    if let Some(ext) = extension_of(filename) {
        if ext == "txt" {
            return "text/plain".to_string();
        }
    }

    claimed.to_string()
}

/// Returns true for content types whose payload is directly usable as text.
pub fn is_text_content_type(content_type: &str) -> bool {
    content_type.starts_with("text/")
}

/// Sanitize filename for safe storage.
pub fn sanitize_filename(filename: &str) -> String {
    // Remove path components
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);

    // Replace dangerous characters
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '|' | '?' | '*' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let sanitized = sanitized.trim();
    if sanitized.is_empty() {
        return "unnamed_file".to_string();
    }

    // Truncate if too long (preserve extension)
    let max = crate::defaults::FILENAME_MAX_LENGTH;
    if sanitized.len() > max {
        if let Some(dot_pos) = sanitized.rfind('.') {
            let ext = &sanitized[dot_pos..];
            let name = &sanitized[..max - ext.len()];
            return format!("{}{}", name, ext);
        }
        return sanitized[..max].to_string();
    }

    sanitized.to_string()
}
