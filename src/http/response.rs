//! Response construction.
//!
//! # Responsibilities
//! - Wrap relayed bodies as `text/html` with the right cache directive
//! - Map relay errors to HTTP status codes at the axum boundary
//!
//! # Design Decisions
//! - Upstream bodies are passed through byte for byte
//! - Error bodies are plain text carrying the error message

use axum::http::header;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;

use crate::relay::RelayError;

/// Cache directive attached to a successful relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    MaxAge(u32),
    NoCache,
}

impl CachePolicy {
    pub fn header_value(&self) -> String {
        match self {
            CachePolicy::MaxAge(secs) => format!("max-age={secs}"),
            CachePolicy::NoCache => "no-cache".to_string(),
        }
    }
}

/// 200 response carrying an upstream page.
pub fn html_response(body: Bytes, cache: CachePolicy) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/html".to_string()),
            (header::CACHE_CONTROL, cache.header_value()),
        ],
        body,
    )
        .into_response()
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Relay failed");
        } else {
            tracing::warn!(status = %status, error = %self, "Relay rejected");
        }
        (status, self.to_string()).into_response()
    }
}
