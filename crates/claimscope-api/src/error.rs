//! API error mapping.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

/// Error type for HTTP handlers.
///
/// Non-2xx responses carry a JSON body `{"error": "..."}`; the message is
/// what clients surface verbatim in their error banners.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(claimscope_core::Error),
}

impl From<claimscope_core::Error> for ApiError {
    fn from(err: claimscope_core::Error) -> Self {
        use claimscope_core::Error;
        match &err {
            Error::NotFound(msg) => ApiError::NotFound(msg.clone()),
            Error::DocumentNotFound(_) | Error::AssessmentNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            Error::InvalidInput(msg) => ApiError::BadRequest(msg.clone()),
            _ => ApiError::Internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimscope_core::Error;
    use uuid::Uuid;

    #[test]
    fn maps_not_found_variants_to_404() {
        let err: ApiError = Error::AssessmentNotFound(Uuid::nil()).into();
        assert!(matches!(err, ApiError::NotFound(_)));
        let err: ApiError = Error::DocumentNotFound(Uuid::nil()).into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn maps_invalid_input_to_400() {
        let err: ApiError = Error::InvalidInput("bad".to_string()).into();
        assert!(matches!(err, ApiError::BadRequest(msg) if msg == "bad"));
    }

    #[test]
    fn maps_backend_errors_to_500() {
        let err: ApiError = Error::Analysis("upstream".to_string()).into();
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
