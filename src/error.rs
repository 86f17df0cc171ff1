//! Errors surfaced to HTTP callers.
//!
//! Upstream failures are translated once, here: a Twitter 429 becomes a rate-limit
//! error carrying the reset time, a Twitter 400 becomes an authentication error, and
//! everything else is wrapped with the name of the operation that failed.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use log::error;
use serde_json::json;
use thiserror::Error;

use crate::game::GameError;
use crate::twitter::TwitterError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Rate limit exceeded. Please try again after {reset}")]
    RateLimited { reset: String },
    #[error("Authentication error. Please check your Twitter credentials.")]
    Authentication,
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Failed to {operation}: {message}")]
    Upstream {
        operation: &'static str,
        message: String,
    },
}

/// Renders an `x-rate-limit-reset` value (unix seconds) as an RFC 3339 timestamp.
fn format_reset(reset: Option<&str>) -> String {
    match reset {
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_else(|| raw.to_string()),
        None => "the rate limit window resets".to_string(),
    }
}

impl ServiceError {
    /// Translates a Twitter client error raised while performing `operation`.
    pub fn from_twitter(operation: &'static str, err: TwitterError) -> Self {
        error!("Error in {}: {}", operation, err);
        match &err {
            TwitterError::Api {
                status: 429,
                rate_limit_reset,
                ..
            } => ServiceError::RateLimited {
                reset: format_reset(rate_limit_reset.as_deref()),
            },
            _ if err.status() == Some(429) => ServiceError::RateLimited {
                reset: format_reset(None),
            },
            _ if err.status() == Some(400) => ServiceError::Authentication,
            _ => ServiceError::Upstream {
                operation,
                message: err.message(),
            },
        }
    }

    pub fn from_agent(operation: &'static str, err: GameError) -> Self {
        error!("Agent error in {}: {}", operation, err);
        ServiceError::Upstream {
            operation,
            message: err.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ServiceError::Authentication => StatusCode::UNAUTHORIZED,
            ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ServiceError::RateLimited { .. } => "rate_limited",
            ServiceError::Authentication => "authentication",
            ServiceError::InvalidInput(_) => "invalid_input",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::Upstream { .. } => "upstream",
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = json!({
            "status": "error",
            "message": self.to_string(),
            "error": self.kind(),
        });
        (status, Json(body)).into_response()
    }
}
