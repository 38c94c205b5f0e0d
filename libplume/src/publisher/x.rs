//! X API v2 publishing client

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::XCredentials;
use crate::error::{PublishError, Result};

use super::{oauth, Publisher};

/// X API endpoint
const X_API_BASE: &str = "https://api.x.com";

/// Hard limit for standard accounts
const CHARACTER_LIMIT: usize = 280;

#[derive(Debug, Serialize)]
struct CreatePostRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreatePostResponse {
    data: CreatePostData,
}

#[derive(Debug, Deserialize)]
struct CreatePostData {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

/// Publisher backed by `POST /2/tweets` with OAuth 1.0a user context
pub struct XPublisher {
    client: Client,
    credentials: XCredentials,
    base_url: String,
}

impl XPublisher {
    pub fn new(credentials: XCredentials) -> Self {
        Self {
            client: Client::new(),
            credentials,
            base_url: X_API_BASE.to_string(),
        }
    }

    /// Point the client at a different endpoint (used by tests)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/2/tweets", self.base_url)
    }
}

/// Web URL for a published post
pub fn status_url(post_id: &str) -> String {
    format!("https://x.com/i/web/status/{}", post_id)
}

#[async_trait]
impl Publisher for XPublisher {
    async fn publish(&self, text: &str) -> Result<String> {
        self.validate(text)?;

        let url = self.endpoint();
        let header = oauth::authorization_header(
            &self.credentials,
            "POST",
            &url,
            Utc::now().timestamp(),
            &oauth::nonce(),
        )?;

        debug!(chars = text.chars().count(), "publishing post");

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, header)
            .json(&CreatePostRequest { text })
            .send()
            .await
            .map_err(|e| PublishError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PublishError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(map_api_error(status.as_u16(), &body).into());
        }

        let parsed: CreatePostResponse =
            serde_json::from_str(&body).map_err(|_| PublishError::MissingId)?;
        if parsed.data.id.is_empty() {
            return Err(PublishError::MissingId.into());
        }

        Ok(parsed.data.id)
    }

    fn validate(&self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(PublishError::Validation("Content cannot be empty".to_string()).into());
        }

        let length = text.chars().count();
        if length > CHARACTER_LIMIT {
            return Err(PublishError::Validation(format!(
                "Content exceeds {} character limit (got {} characters)",
                CHARACTER_LIMIT, length
            ))
            .into());
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "x"
    }

    fn character_limit(&self) -> Option<usize> {
        Some(CHARACTER_LIMIT)
    }

    fn post_url(&self, post_id: &str) -> Option<String> {
        Some(status_url(post_id))
    }
}

fn map_api_error(status: u16, body: &str) -> PublishError {
    // New developer accounts must prepay for write access; surface that
    // case with a pointer instead of a bare status code.
    if status == 402 {
        return PublishError::Api {
            status,
            message: "posting requires prepaid API credits for this developer account; \
                      add credits in the developer portal or copy the draft and post it manually"
                .to_string(),
        };
    }

    let message = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|e| match (e.title, e.detail) {
            (Some(title), Some(detail)) => Some(format!("{}: {}", title, detail)),
            (Some(title), None) => Some(title),
            (None, Some(detail)) => Some(detail),
            (None, None) => None,
        })
        .unwrap_or_else(|| body.to_string());

    PublishError::Api { status, message }
}
