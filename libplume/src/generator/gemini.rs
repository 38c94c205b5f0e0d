//! Gemini text generation client

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::error::{GenerationError, Result};

use super::{drafting_prompt, tidy_draft, TextGenerator, DRAFT_CHAR_LIMIT};

/// Gemini API endpoint
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
    #[serde(default)]
    status: String,
}

/// Text generator backed by the Gemini `generateContent` API
pub struct GeminiGenerator {
    client: Client,
    api_key: SecretString,
    model: String,
    persona: String,
    base_url: String,
}

impl GeminiGenerator {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            persona: config.persona.clone(),
            base_url: GEMINI_API_BASE.to_string(),
        }
    }

    /// Point the client at a different endpoint (used by tests)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, topic: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![Part {
                    text: drafting_prompt(&self.persona, topic),
                }],
            }],
        };

        debug!(model = %self.model, "requesting draft from Gemini");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        if !status.is_success() {
            if let Ok(error_response) = serde_json::from_str::<ApiErrorResponse>(&body) {
                return Err(GenerationError::Api {
                    status: status.as_u16(),
                    message: format!(
                        "{} {}",
                        error_response.error.status, error_response.error.message
                    )
                    .trim()
                    .to_string(),
                }
                .into());
            }
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message: body,
            }
            .into());
        }

        let api_response: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| GenerationError::Network(format!("failed to parse response: {}", e)))?;

        let text = api_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        let draft = tidy_draft(&text, DRAFT_CHAR_LIMIT);
        if draft.is_empty() {
            return Err(GenerationError::Empty.into());
        }

        Ok(draft)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
