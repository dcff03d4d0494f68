//! Typed HTTP client for the claimscope API.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

use claimscope_core::models::*;
use claimscope_core::{defaults, Error, Result};

/// Typed client over the claimscope API.
///
/// All endpoints are reached via a single configurable base URL. Every
/// request runs under a bounded timeout and the client's cancellation
/// token, so navigating away aborts in-flight work cleanly.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    cancel: CancellationToken,
}

impl ApiClient {
    /// Create a client for the given base URL (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        let timeout_secs = std::env::var("CLAIMSCOPE_CLIENT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::CLIENT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url: base_url.into(),
            cancel: CancellationToken::new(),
        }
    }

    /// Create from the `CLAIMSCOPE_API_BASE_URL` environment variable.
    pub fn from_env() -> Self {
        let base_url = std::env::var("CLAIMSCOPE_API_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", defaults::SERVER_PORT));
        Self::new(base_url)
    }

    /// Attach a cancellation token. Cancelling it aborts every subsequent
    /// (and in-flight) request issued through this client.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// The client's cancellation token.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Issue a request under the cancellation token and map non-2xx
    /// responses to `Error::Request` carrying the status text clients
    /// surface verbatim.
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let response = tokio::select! {
            _ = self.cancel.cancelled() => return Err(Error::Cancelled),
            result = request.send() => result.map_err(|e| Error::Request(e.to_string()))?,
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            // Prefer the server's JSON error message; fall back to the
            // HTTP status line.
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error")?.as_str().map(String::from))
                .unwrap_or_else(|| status.to_string());
            debug!(status = %status, "Request rejected");
            return Err(Error::Request(message));
        }

        Ok(response)
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<HealthResponse> {
        let response = self.execute(self.http.get(self.url("/health"))).await?;
        Ok(response.json().await?)
    }

    /// `POST /api/upload` — multipart body with a single file field.
    pub async fn upload_document(
        &self,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<UploadReceipt> {
        let part = Part::bytes(data)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(|e| Error::InvalidInput(format!("Invalid content type: {}", e)))?;
        let form = Form::new().part("file", part);

        let response = self
            .execute(self.http.post(self.url("/api/upload")).multipart(form))
            .await?;
        Ok(response.json().await?)
    }

    /// `POST /api/assess` or `POST /api/assess-with-prior-art`.
    pub async fn assess(
        &self,
        submission: &AssessmentSubmission,
        include_prior_art: bool,
    ) -> Result<AssessAccepted> {
        let path = if include_prior_art {
            "/api/assess-with-prior-art"
        } else {
            "/api/assess"
        };
        let response = self
            .execute(self.http.post(self.url(path)).json(submission))
            .await?;
        Ok(response.json().await?)
    }

    /// `GET /api/assess/{id}` — the pollable status/result record.
    pub async fn get_assessment(&self, id: Uuid) -> Result<AssessmentRecord> {
        let response = self
            .execute(self.http.get(self.url(&format!("/api/assess/{}", id))))
            .await?;
        Ok(response.json().await?)
    }

    /// `POST /api/prior-art/search`
    pub async fn search_prior_art(&self, query: &PriorArtQuery) -> Result<PriorArtSearchResult> {
        let response = self
            .execute(self.http.post(self.url("/api/prior-art/search")).json(query))
            .await?;
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimscope_core::models::TechnicalField;
    use wiremock::matchers::{body_json_string, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn submission() -> AssessmentSubmission {
        AssessmentSubmission {
            project_title: "Widget".to_string(),
            description: "d".repeat(120),
            technical_field: TechnicalField::Software,
            keywords: vec![],
            document_id: None,
        }
    }

    #[tokio::test]
    async fn assess_posts_to_the_right_route() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();
        Mock::given(method("POST"))
            .and(path("/api/assess-with-prior-art"))
            .respond_with(ResponseTemplate::new(202).set_body_json(serde_json::json!({
                "assessment_id": id,
                "status": "pending"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let accepted = client.assess(&submission(), true).await.unwrap();
        assert_eq!(accepted.assessment_id, id);
        assert_eq!(accepted.status, AssessmentStatus::Pending);
    }

    #[tokio::test]
    async fn non_2xx_surfaces_server_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/assess"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({"error": "description: too short"})),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let err = client.assess(&submission(), false).await.unwrap_err();
        assert!(matches!(err, Error::Request(msg) if msg == "description: too short"));
    }

    #[tokio::test]
    async fn non_2xx_without_json_body_falls_back_to_status_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let err = client.get_assessment(Uuid::new_v4()).await.unwrap_err();
        match err {
            Error::Request(msg) => assert!(msg.contains("500")),
            other => panic!("Expected Request error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn cancelled_client_issues_no_request() {
        let server = MockServer::start().await;
        // No mocks mounted: any request would 404 and show up in the log

        let token = CancellationToken::new();
        token.cancel();
        let client = ApiClient::new(server.uri()).with_cancellation(token);

        let err = client.get_assessment(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, Error::Cancelled));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn upload_sends_multipart_file_field() {
        let server = MockServer::start().await;
        let doc_id = Uuid::new_v4();
        Mock::given(method("POST"))
            .and(path("/api/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": "File uploaded successfully",
                "document_id": doc_id,
                "filename": "notes.txt",
                "size_bytes": 5,
                "content_type": "text/plain"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let receipt = client
            .upload_document("notes.txt", "text/plain", b"notes".to_vec())
            .await
            .unwrap();
        assert_eq!(receipt.document_id, doc_id);
        assert_eq!(receipt.filename, "notes.txt");

        let requests = server.received_requests().await.unwrap();
        let content_type = requests[0]
            .headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert!(content_type.starts_with("multipart/form-data"));
    }

    #[tokio::test]
    async fn search_serializes_query_contract() {
        let server = MockServer::start().await;
        let expected_body = serde_json::json!({
            "invention_description": "an invention",
            "technical_field": "software",
            "keywords": ["a", "b"],
            "max_results": 10
        });
        Mock::given(method("POST"))
            .and(path("/api/prior-art/search"))
            .and(body_json_string(expected_body.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "query": "q",
                "total_results": 0,
                "patents": [],
                "search_duration_ms": 5,
                "confidence_score": 0.0,
                "search_strategy": "multi_query_deduplication"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let query = PriorArtQuery {
            invention_description: "an invention".to_string(),
            technical_field: TechnicalField::Software,
            keywords: Some(vec!["a".to_string(), "b".to_string()]),
            max_results: 10,
        };
        let result = client.search_prior_art(&query).await.unwrap();
        assert!(result.is_empty());
    }
}
