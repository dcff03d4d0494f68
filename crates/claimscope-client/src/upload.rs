//! Upload collector session state.

use uuid::Uuid;

use claimscope_core::models::UploadReceipt;
use claimscope_core::{defaults, validate_upload, Error};

use crate::api::ApiClient;

/// Status of one file in the collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Pending,
    Uploading,
    Success,
    Error,
}

/// One file tracked by the collector.
///
/// `local_id` is an opaque session-unique token; `document_id` is assigned
/// by the server on success.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub local_id: Uuid,
    pub filename: String,
    pub size_bytes: u64,
    pub status: UploadStatus,
    pub progress: u8,
    pub error_message: Option<String>,
    pub document_id: Option<Uuid>,
}

struct Entry {
    file: UploadedFile,
    content_type: String,
    data: Vec<u8>,
}

/// Collects candidate files, validates them locally, and uploads the
/// accepted ones sequentially.
///
/// Per-file contract: rejection and upload failure are scoped to the single
/// file; no batch-level failure exists. Files rejected locally never cause
/// a network call.
#[derive(Default)]
pub struct UploadCollector {
    entries: Vec<Entry>,
}

impl UploadCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a candidate file. Runs the local size/type validation; rejected
    /// files land directly in `Error` state with a message and will never
    /// be sent. Returns the file's session-local id.
    pub fn add_file(&mut self, filename: &str, content_type: &str, data: Vec<u8>) -> Uuid {
        let local_id = Uuid::new_v4();
        let size_bytes = data.len() as u64;
        let validation = validate_upload(filename, size_bytes, defaults::MAX_UPLOAD_SIZE_BYTES);

        let file = UploadedFile {
            local_id,
            filename: filename.to_string(),
            size_bytes,
            status: if validation.allowed {
                UploadStatus::Pending
            } else {
                UploadStatus::Error
            },
            progress: 0,
            error_message: validation.block_reason,
            document_id: None,
        };

        self.entries.push(Entry {
            file,
            content_type: content_type.to_string(),
            data,
        });
        local_id
    }

    /// Snapshot of all tracked files, in submission order.
    pub fn files(&self) -> Vec<UploadedFile> {
        self.entries.iter().map(|e| e.file.clone()).collect()
    }

    /// Look up one file by its session-local id.
    pub fn file(&self, local_id: Uuid) -> Option<&UploadedFile> {
        self.entries
            .iter()
            .find(|e| e.file.local_id == local_id)
            .map(|e| &e.file)
    }

    /// Remove a file from visible state. In-flight network work is not
    /// cancelled; the entry simply disappears from the session.
    pub fn remove(&mut self, local_id: Uuid) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.file.local_id != local_id);
        self.entries.len() != before
    }

    /// Document ids of successfully uploaded files, in submission order.
    pub fn document_ids(&self) -> Vec<Uuid> {
        self.entries
            .iter()
            .filter_map(|e| e.file.document_id)
            .collect()
    }

    /// Upload every pending file, sequentially in submission order.
    ///
    /// Each request is awaited before the next is issued. A failed upload
    /// is terminal for that file (no retry) and does not block the next
    /// file's upload. Returns the document ids assigned in this pass.
    pub async fn upload_all(&mut self, client: &ApiClient) -> Vec<Uuid> {
        let mut assigned = Vec::new();

        for entry in &mut self.entries {
            if entry.file.status != UploadStatus::Pending {
                continue;
            }

            entry.file.status = UploadStatus::Uploading;
            let outcome = client
                .upload_document(&entry.file.filename, &entry.content_type, entry.data.clone())
                .await;

            match outcome {
                Ok(UploadReceipt { document_id, .. }) => {
                    entry.file.status = UploadStatus::Success;
                    entry.file.progress = 100;
                    entry.file.document_id = Some(document_id);
                    assigned.push(document_id);
                }
                Err(e) => {
                    entry.file.status = UploadStatus::Error;
                    // The raw status text, shown next to the file
                    entry.file.error_message = Some(match e {
                        Error::Request(msg) => msg,
                        other => other.to_string(),
                    });
                }
            }
        }

        assigned
    }
}
