//! Relay error taxonomy.

use axum::http::StatusCode;
use thiserror::Error;

/// Message returned when a GET (or any upstream status) fails.
pub const FETCH_FAILED: &str = "Failed to fetch from target URL";

/// Prefix for POST transport failures; the transport's message follows.
pub const SUBMIT_FAILED: &str = "Failed to submit to target URL";

/// Errors that end a relayed request.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The caller's request is missing something required.
    #[error("{0}")]
    InvalidRequest(String),

    /// The upstream answered with a non-success status.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// The outbound call itself failed.
    #[error("{0}")]
    Internal(String),
}

impl RelayError {
    /// A missing or empty `url` query parameter.
    pub fn missing_url() -> Self {
        Self::InvalidRequest("Missing URL parameter".to_string())
    }

    pub fn upstream(status: u16) -> Self {
        Self::Upstream {
            status,
            message: FETCH_FAILED.to_string(),
        }
    }

    /// HTTP status this error is surfaced as.
    ///
    /// Upstream codes pass through untouched; a code that isn't a valid
    /// HTTP status becomes 502.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            RelayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
