//! Request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for every inbound request
//! - Attach the request ID to the tracing span
//! - Extract the relay's query parameters and caller headers
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - A caller-supplied `x-request-id` is kept rather than replaced
//! - Repeated query parameters: the first occurrence wins

use axum::body::Body;
use axum::extract::rejection::QueryRejection;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

use crate::relay::RelayError;

/// Header carrying the request ID in both directions.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Span for one inbound request, tagged with its request ID.
pub fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id
    )
}

/// Query parameters accepted by `/api/proxy`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyParams {
    pub url: Option<String>,
    pub referer: Option<String>,
}

impl<S: Send + Sync> FromRequestParts<S> for ProxyParams {
    type Rejection = QueryRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state).await?;
        Ok(Self::from_pairs(pairs))
    }
}

impl ProxyParams {
    /// Collect decoded query pairs, keeping the first value of each key.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "url" if params.url.is_none() => params.url = Some(value),
                "referer" if params.referer.is_none() => params.referer = Some(value),
                _ => {}
            }
        }
        params
    }

    /// The target URL; missing and empty are both rejected.
    pub fn target_url(&self) -> Result<&str, RelayError> {
        self.url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or_else(RelayError::missing_url)
    }

    pub fn referer_override(&self) -> Option<&str> {
        self.referer.as_deref().filter(|r| !r.is_empty())
    }
}

/// The caller's own `User-Agent`, if it sent a usable one.
pub fn caller_user_agent(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .filter(|ua| !ua.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_and_empty_url() {
        let params = ProxyParams::default();
        assert!(matches!(params.target_url(), Err(RelayError::InvalidRequest(_))));

        let params = ProxyParams {
            url: Some(String::new()),
            referer: None,
        };
        assert!(params.target_url().is_err());
    }

    #[test]
    fn test_present_url() {
        let params = ProxyParams {
            url: Some("https://site/page".into()),
            referer: Some(String::new()),
        };
        assert_eq!(params.target_url().unwrap(), "https://site/page");
        assert_eq!(params.referer_override(), None);
    }

    #[test]
    fn test_repeated_parameters_keep_first() {
        let params = ProxyParams::from_pairs(vec![
            ("url".to_string(), "https://first/".to_string()),
            ("other".to_string(), "x".to_string()),
            ("url".to_string(), "https://second/".to_string()),
            ("referer".to_string(), "https://ref/".to_string()),
            ("referer".to_string(), "https://ignored/".to_string()),
        ]);
        assert_eq!(
            params,
            ProxyParams {
                url: Some("https://first/".into()),
                referer: Some("https://ref/".into()),
            }
        );
    }

    #[test]
    fn test_caller_user_agent() {
        let mut headers = HeaderMap::new();
        assert_eq!(caller_user_agent(&headers), None);

        headers.insert(header::USER_AGENT, HeaderValue::from_static("Browser/9"));
        assert_eq!(caller_user_agent(&headers), Some("Browser/9"));
    }

    #[test]
    fn test_request_ids_are_unique() {
        let mut make = MakeRequestUuidV4;
        let req = Request::new(Body::empty());
        let a = make.make_request_id(&req).unwrap();
        let b = make.make_request_id(&req).unwrap();
        assert_ne!(a.header_value(), b.header_value());
    }
}
