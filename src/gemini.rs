//! Gemini `generateContent` client.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, trace, warn};

use crate::error::{ApiFailure, GenerationError};
use crate::generator::{Generation, Generator, GeneratorFactory};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// [`Generator`] backed by the Gemini REST API.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(http: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    details: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    reason: Option<String>,
}

impl GenerateContentResponse {
    fn into_generation(self) -> Generation {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            debug!(%reason, "prompt blocked");
            return Generation::blocked();
        }
        let Some(first) = self.candidates.into_iter().next() else {
            return Generation::default();
        };
        if first.finish_reason.as_deref() == Some("SAFETY") {
            return Generation::blocked();
        }
        let text = first
            .content
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default();
        Generation::text(text)
    }
}

/// Decode an error response, falling back to the raw body.
fn parse_failure(code: u16, body: &str) -> ApiFailure {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(env) => ApiFailure {
            code: if env.error.code == 0 { code } else { env.error.code },
            status: env.error.status,
            message: env.error.message,
            reasons: env
                .error
                .details
                .into_iter()
                .filter_map(|d| d.reason)
                .collect(),
        },
        Err(_) => ApiFailure {
            code,
            message: body.trim().to_string(),
            ..ApiFailure::default()
        },
    }
}

#[async_trait]
impl Generator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<Generation, GenerationError> {
        let body = json!({
            "contents": [{"role": "user", "parts": [{"text": prompt}]}]
        });
        trace!(target: "llm", model = %self.model, %prompt, "gemini prompt");
        let resp = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::UnexpectedError(e.to_string()))?;
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| GenerationError::UnexpectedError(e.to_string()))?;
        if !status.is_success() {
            let failure = parse_failure(status.as_u16(), &text);
            warn!(target: "llm", code = failure.code, status = %failure.status, message = %failure.message, "gemini api error");
            return Err(failure.classify());
        }
        let parsed: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| GenerationError::UnexpectedError(format!("invalid response: {e}")))?;
        let generation = parsed.into_generation();
        debug!(target: "llm", response = %generation.text, blocked = generation.blocked, "gemini full response");
        Ok(generation)
    }
}

/// Builds [`GeminiClient`]s sharing one HTTP connection pool.
#[derive(Clone)]
pub struct GeminiFactory {
    http: reqwest::Client,
    model: String,
    base_url: String,
}

impl GeminiFactory {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http,
            model: model.into(),
            base_url: base_url.into(),
        }
    }
}

impl GeneratorFactory for GeminiFactory {
    fn build(&self, api_key: &str) -> Arc<dyn Generator> {
        Arc::new(
            GeminiClient::new(self.http.clone(), api_key)
                .with_model(self.model.clone())
                .with_base_url(self.base_url.clone()),
        )
    }
}
