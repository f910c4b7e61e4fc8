//! Error types
//! Configuration failures stop startup; upstream failures become a 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No upstream API key configured (set TMDB_API_KEY or upstream.api_key)")]
    MissingApiKey,

    #[error("Invalid upstream base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("upstream.request_timeout must be at least 1 second")]
    ZeroTimeout,
}

/// Any failure while calling the upstream API.
///
/// Every variant is reported to the client the same way.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("{0}")]
    Transport(reqwest::Error),

    #[error("Request failed with status code {status}")]
    Status { status: u16, body: String },

    #[error("Missing path parameter: {0}")]
    MissingPathParam(String),

    #[error("Invalid JSON response: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        // The URL carries the api key in its query string.
        Self::Transport(e.without_url())
    }
}

impl UpstreamError {
    pub fn status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for UpstreamError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
