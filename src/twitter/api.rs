//! Core Twitter API utilities.
//!
//! This module contains the HTTP client used to reach the Twitter API v2 through the
//! GAME Twitter proxy, plus the low-level request helper that turns non-success
//! responses into [`TwitterError`] values.

use log::{debug, error, info};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Header carrying the GAME Twitter access token.
const API_KEY_HEADER: &str = "x-api-key";
/// Header Twitter uses to report when the current rate limit window resets.
const RATE_LIMIT_RESET_HEADER: &str = "x-rate-limit-reset";

/// Errors raised by the Twitter API client.
#[derive(Debug, Error)]
pub enum TwitterError {
    /// The API answered with a non-success status.
    #[error("Twitter API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        rate_limit_reset: Option<String>,
    },
    #[error("request to Twitter API failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected Twitter API response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl TwitterError {
    /// HTTP status reported by the API, if the error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            TwitterError::Api { status, .. } => Some(*status),
            TwitterError::Http(e) => e.status().map(|s| s.as_u16()),
            TwitterError::Decode(_) => None,
        }
    }

    /// Message without the status prefix, used when rewrapping errors for callers.
    pub fn message(&self) -> String {
        match self {
            TwitterError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Sanitizes text for safe logging by truncating and escaping control characters.
///
/// Newlines and tabs become spaces, other control characters become `?`, and text
/// longer than `max_len` characters is truncated with a note of its full size.
pub(crate) fn sanitize_for_logging(text: &str, max_len: usize) -> String {
    let sanitized: String = text
        .chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            c if c.is_control() => '?',
            c => c,
        })
        .collect();

    if sanitized.chars().count() > max_len {
        let truncated: String = sanitized.chars().take(max_len).collect();
        format!("{}... [truncated, {} total bytes]", truncated, text.len())
    } else {
        sanitized
    }
}

/// Extracts a human-readable message from a Twitter API v2 error body.
///
/// v2 problems carry `detail`/`title`; v1-style errors carry `errors[0].message`.
pub(crate) fn extract_error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        let candidates = [
            json.get("detail"),
            json.get("title"),
            json.pointer("/errors/0/message"),
            json.pointer("/errors/0/detail"),
            json.get("error"),
            json.get("message"),
        ];
        if let Some(message) = candidates.into_iter().flatten().find_map(|v| v.as_str()) {
            return message.to_string();
        }
    }
    if body.trim().is_empty() {
        "empty response body".to_string()
    } else {
        sanitize_for_logging(body, 200)
    }
}

/// Client for the Twitter API v2, authenticated with a GAME Twitter access token.
///
/// The client is cheap to clone and is meant to be created once and shared across
/// requests.
#[derive(Clone)]
pub struct TwitterClient {
    http: Client,
    base_url: String,
    access_token: String,
}

impl TwitterClient {
    /// Creates a client for `base_url` (for example `https://twitter.game.virtuals.io/tweets`).
    pub fn new(base_url: &str, access_token: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.http
            .get(self.url(path))
            .header(API_KEY_HEADER, &self.access_token)
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.http
            .post(self.url(path))
            .header(API_KEY_HEADER, &self.access_token)
            .header("Content-Type", "application/json")
    }

    /// Sends a request and decodes the JSON body on success.
    ///
    /// Non-success statuses are turned into [`TwitterError::Api`], carrying the
    /// `x-rate-limit-reset` header when the API provides it.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        request_builder: RequestBuilder,
        operation_name: &str,
    ) -> Result<T, TwitterError> {
        info!("Sending Twitter API request for operation: {}", operation_name);

        let response = request_builder.send().await?;
        let status = response.status();
        info!(
            "Received response with status: {} for operation: {}",
            status, operation_name
        );

        if status.is_success() {
            let response_text = response.text().await?;
            debug!(
                "Response summary for '{}': {} bytes received",
                operation_name,
                response_text.len()
            );
            return Ok(serde_json::from_str(&response_text)?);
        }

        let rate_limit_reset = response
            .headers()
            .get(RATE_LIMIT_RESET_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let error_text = response.text().await?;
        error!("Operation '{}' failed - Status: {}", operation_name, status);
        debug!(
            "Error response for '{}': {}",
            operation_name,
            sanitize_for_logging(&error_text, 200)
        );

        Err(TwitterError::Api {
            status: status.as_u16(),
            message: extract_error_message(&error_text),
            rate_limit_reset,
        })
    }
}
