//! HTTP handlers for the claimscope API.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

use claimscope_core::models::*;
use claimscope_core::{
    defaults, detect_content_type, is_text_content_type, sanitize_filename, validate_submission,
    validate_upload, AssessmentStore, DocumentStore,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Health check endpoint for monitoring.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

/// Upload an assessment document.
///
/// Multipart body with a single file field. Validation (size, extension,
/// magic bytes) runs again server-side even though clients pre-validate.
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
        .ok_or_else(|| ApiError::BadRequest("No file field in upload".to_string()))?;

    let filename = sanitize_filename(field.file_name().unwrap_or("unnamed_file"));
    let claimed_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    let data = field
        .bytes()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?;

    let validation = validate_upload(&filename, data.len() as u64, defaults::MAX_UPLOAD_SIZE_BYTES);
    if !validation.allowed {
        let reason = validation
            .block_reason
            .unwrap_or_else(|| "Upload rejected".to_string());
        warn!(filename = %filename, reason = %reason, "Upload rejected");
        return Err(ApiError::BadRequest(reason));
    }

    let content_type = detect_content_type(&filename, &data, &claimed_type);
    let sha256 = hex::encode(Sha256::digest(&data));
    let text = if is_text_content_type(&content_type) {
        Some(String::from_utf8_lossy(&data).into_owned())
    } else {
        None
    };

    let document = StoredDocument {
        id: Uuid::now_v7(),
        filename: filename.clone(),
        content_type: content_type.clone(),
        size_bytes: data.len() as u64,
        sha256,
        text,
        uploaded_at: Utc::now(),
    };
    let document_id = state.documents.store(document).await?;

    info!(document_id = %document_id, filename = %filename, size = data.len(), "Document uploaded");

    Ok(Json(UploadReceipt {
        message: "File uploaded successfully".to_string(),
        document_id,
        filename,
        size_bytes: data.len() as u64,
        content_type,
    }))
}

/// Wire body for the assessment endpoints.
///
/// `technical_field` arrives as a string so that out-of-enumeration values
/// get a clean 400 with a JSON error body instead of a deserializer reject.
#[derive(Debug, Deserialize)]
pub struct AssessRequestBody {
    pub project_title: String,
    pub description: String,
    pub technical_field: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub document_id: Option<Uuid>,
}

fn parse_technical_field(raw: &str) -> Result<TechnicalField, ApiError> {
    serde_json::from_value::<TechnicalField>(serde_json::Value::String(raw.to_string()))
        .map_err(|_| ApiError::BadRequest(format!("Invalid technical_field: {}", raw)))
}

/// Validate an assessment request and create a pending record.
async fn accept_submission(
    state: &AppState,
    body: AssessRequestBody,
) -> Result<AssessmentRecord, ApiError> {
    let technical_field = parse_technical_field(&body.technical_field)?;

    let errors = validate_submission(&body.project_title, &body.description, Some(technical_field));
    if !errors.is_empty() {
        let joined = errors
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ApiError::BadRequest(joined));
    }

    if let Some(document_id) = body.document_id {
        if !state.documents.exists(document_id).await? {
            return Err(ApiError::NotFound(format!(
                "Document not found: {}",
                document_id
            )));
        }
    }

    let submission = AssessmentSubmission {
        project_title: body.project_title.trim().to_string(),
        description: body.description,
        technical_field,
        keywords: body.keywords,
        document_id: body.document_id,
    };

    Ok(state.assessments.create(submission).await?)
}

/// Spawn the pipeline for a created record and build the 202 response.
fn spawn_run(state: &AppState, record: &AssessmentRecord, include_prior_art: bool) -> AssessAccepted {
    let runner = state.runner.clone();
    let id = record.id;
    tokio::spawn(async move {
        // Run errors are recorded on the assessment itself; nothing to
        // surface here beyond the log the runner already writes.
        let _ = runner.run(id, include_prior_art, CancellationToken::new()).await;
    });

    AssessAccepted {
        assessment_id: record.id,
        status: record.status,
    }
}

/// Create a new assessment (no prior-art search).
pub async fn create_assessment(
    State(state): State<AppState>,
    Json(body): Json<AssessRequestBody>,
) -> Result<impl IntoResponse, ApiError> {
    let record = accept_submission(&state, body).await?;
    let accepted = spawn_run(&state, &record, false);
    Ok((StatusCode::ACCEPTED, Json(accepted)))
}

/// Create a new assessment including the prior-art search stage.
pub async fn create_assessment_with_prior_art(
    State(state): State<AppState>,
    Json(body): Json<AssessRequestBody>,
) -> Result<impl IntoResponse, ApiError> {
    let record = accept_submission(&state, body).await?;
    let accepted = spawn_run(&state, &record, true);
    Ok((StatusCode::ACCEPTED, Json(accepted)))
}

/// Fetch the status/result record clients poll during processing.
pub async fn get_assessment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AssessmentRecord>, ApiError> {
    let record = state.assessments.fetch(id).await?;
    Ok(Json(record))
}

/// Wire body for the standalone prior-art search endpoint.
#[derive(Debug, Deserialize)]
pub struct PriorArtSearchBody {
    pub invention_description: String,
    pub technical_field: String,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    #[serde(default)]
    pub max_results: Option<usize>,
}

/// Run a standalone prior-art search, independent of any assessment run.
pub async fn search_prior_art(
    State(state): State<AppState>,
    Json(body): Json<PriorArtSearchBody>,
) -> Result<Json<PriorArtSearchResult>, ApiError> {
    if body.invention_description.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "invention_description is required".to_string(),
        ));
    }
    let technical_field = parse_technical_field(&body.technical_field)?;

    let max_results = body
        .max_results
        .unwrap_or(defaults::DEFAULT_MAX_RESULTS)
        .clamp(1, 50);

    let query = PriorArtQuery {
        invention_description: body.invention_description,
        technical_field,
        keywords: body.keywords.filter(|k| !k.is_empty()),
        max_results,
    };

    let result = state.prior_art.search(&query).await?;
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_technical_field_accepts_enumeration() {
        for field in TechnicalField::ALL {
            let raw = field.to_string();
            assert_eq!(parse_technical_field(&raw).unwrap(), field);
        }
    }

    #[test]
    fn parse_technical_field_rejects_unknown() {
        let err = parse_technical_field("warp_drives").unwrap_err();
        match err {
            ApiError::BadRequest(msg) => assert!(msg.contains("warp_drives")),
            other => panic!("Expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn assess_body_deserializes_with_optional_fields() {
        let body: AssessRequestBody = serde_json::from_str(
            r#"{"project_title": "t", "description": "d", "technical_field": "software"}"#,
        )
        .unwrap();
        assert!(body.keywords.is_empty());
        assert!(body.document_id.is_none());
    }
}
