//! Gemini generative-text client.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::GenerativeConfig;
use crate::http::{ApiCall, Envelope, HttpCaller};

/// Errors from a generate call.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("generative API key not configured (set GEMINI_API_KEY)")]
    NotConfigured,

    #[error("invalid generative endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("generative request failed: {0}")]
    Upstream(String),

    /// Reply is missing `candidates[0].content.parts[0].text`
    #[error("unexpected generative response shape")]
    MalformedResponse,
}

#[derive(Clone)]
pub struct GenerativeClient {
    caller: HttpCaller,
    config: GenerativeConfig,
}

impl GenerativeClient {
    pub fn new(caller: HttpCaller, config: GenerativeConfig) -> Self {
        Self { caller, config }
    }

    /// Send `prompt` and return the first candidate's text.
    pub async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(GenerateError::NotConfigured)?;

        let url = self.endpoint(api_key)?;
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };
        let body = serde_json::to_value(&request)
            .map_err(|e| GenerateError::Upstream(format!("failed to encode request: {e}")))?;

        debug!(model = %self.config.model, prompt_len = prompt.len(), "generate request");

        let envelope = self
            .caller
            .call(
                ApiCall::post(url)
                    .header("Content-Type", "application/json")
                    .json(body)
                    .timeout(Duration::from_secs(self.config.timeout_seconds)),
            )
            .await;

        match envelope {
            Envelope::Success(data) => reply_text(&data),
            Envelope::Failure(error) => Err(GenerateError::Upstream(error)),
        }
    }

    fn endpoint(&self, api_key: &str) -> Result<String, GenerateError> {
        let base = format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );
        let url = Url::parse_with_params(&base, &[("key", api_key)])?;
        Ok(url.into())
    }
}

fn reply_text(data: &Value) -> Result<String, GenerateError> {
    data.pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(GenerateError::MalformedResponse)
}

// --- Request types ---

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}
