//! OpenAI-compatible chat analysis backend.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use claimscope_core::models::{AnalysisRequest, CriterionAssessment, TechnicalField};
use claimscope_core::{defaults, AnalysisBackend, Error, Result};

use crate::parse::parse_assessment;
use crate::prompt;

/// Default chat-completions endpoint.
pub const DEFAULT_BASE_URL: &str = defaults::ANALYSIS_BASE_URL;

/// Default analysis model.
pub const DEFAULT_MODEL: &str = defaults::ANALYSIS_MODEL;

/// Analysis backend against any OpenAI-compatible chat-completions API.
pub struct ChatAnalysisBackend {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    timeout_secs: u64,
}

impl ChatAnalysisBackend {
    /// Create a backend with explicit configuration.
    pub fn with_config(base_url: String, api_key: Option<String>, model: String) -> Self {
        let timeout_secs = std::env::var("CLAIMSCOPE_ANALYSIS_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::ANALYSIS_TIMEOUT_SECS);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        info!(
            "Initializing analysis backend: url={}, model={}",
            base_url, model
        );

        Self {
            client,
            base_url,
            api_key,
            model,
            temperature: defaults::ANALYSIS_TEMPERATURE,
            timeout_secs,
        }
    }

    /// Create from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `CLAIMSCOPE_ANALYSIS_BASE_URL` | `https://api.openai.com/v1` |
    /// | `CLAIMSCOPE_ANALYSIS_API_KEY` | (none) |
    /// | `CLAIMSCOPE_ANALYSIS_MODEL` | `gpt-4o-mini` |
    /// | `CLAIMSCOPE_ANALYSIS_TIMEOUT_SECS` | `120` |
    pub fn from_env() -> Self {
        let base_url = std::env::var("CLAIMSCOPE_ANALYSIS_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let api_key = std::env::var("CLAIMSCOPE_ANALYSIS_API_KEY").ok();
        let model = std::env::var("CLAIMSCOPE_ANALYSIS_MODEL")
            .unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Self::with_config(base_url, api_key, model)
    }

    /// Override the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Send one chat completion and return the assistant message content.
    async fn generate(&self, system: &str, user: &str) -> Result<String> {
        let start = Instant::now();

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: Some(self.temperature),
            stream: false,
        };

        let mut req = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .timeout(Duration::from_secs(self.timeout_secs));
        if let Some(ref api_key) = self.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Analysis(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Analysis(format!(
                "Analysis service returned {}: {}",
                status, body
            )));
        }

        let result: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Analysis(format!("Failed to parse response: {}", e)))?;

        let content = result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::Analysis("Empty completion response".to_string()))?;

        let elapsed = start.elapsed().as_millis() as u64;
        debug!(
            response_len = content.len(),
            duration_ms = elapsed,
            "Generation complete"
        );
        if elapsed > 30000 {
            warn!(
                duration_ms = elapsed,
                prompt_len = user.len(),
                slow = true,
                "Slow analysis generation"
            );
        }

        Ok(content)
    }
}

/// Truncate analysis input at a char boundary to stay within token budget.
fn truncate_text(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

#[async_trait]
impl AnalysisBackend for ChatAnalysisBackend {
    #[instrument(skip(self, req), fields(subsystem = "analysis", component = "chat_backend", op = "analyze", model = %self.model))]
    async fn analyze(&self, req: &AnalysisRequest) -> Result<CriterionAssessment> {
        let start = Instant::now();

        let text = truncate_text(&req.text, defaults::ANALYSIS_TEXT_LIMIT);
        let user = prompt::analysis_prompt(&req.project_title, &text, req.technical_field);

        let raw = self.generate(prompt::system_prompt(), &user).await?;
        let assessment = parse_assessment(&raw)?;

        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            "Analyzed patent potential for: {}", req.project_title
        );
        Ok(assessment)
    }

    #[instrument(skip(self, text), fields(subsystem = "analysis", component = "chat_backend", op = "classify_field", model = %self.model))]
    async fn classify_field(&self, text: &str) -> Result<TechnicalField> {
        let preview = truncate_text(text, 2000);
        let raw = self
            .generate(
                "You are a patent classification expert.",
                &prompt::classification_prompt(&preview),
            )
            .await?;

        // Unrecognized answers fall back to Other rather than failing the run.
        Ok(TechnicalField::from_str_loose(raw.trim()).unwrap_or(TechnicalField::Other))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Request body for the chat completions endpoint.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(default)]
    stream: bool,
}

/// A single chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Response from the chat completions endpoint.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

/// Single chat completion choice.
#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}
