//! Outbound forwarding.
//!
//! # Responsibilities
//! - Build the outbound header set for each call
//! - Issue exactly one upstream request per relayed call
//! - Buffer the upstream body and hand it back untouched
//! - Map upstream statuses and transport failures to [`RelayError`]
//!
//! # Design Decisions
//! - No retries: every failure is terminal for the request
//! - Timeouts are whatever the HTTP client defaults to
//! - Bodies are buffered in memory both ways

use bytes::Bytes;

use crate::config::UpstreamConfig;
use crate::relay::error::{RelayError, FETCH_FAILED, SUBMIT_FAILED};
use crate::relay::headers::HeaderSet;
use crate::relay::inspect::SubmissionReport;
use crate::relay::referer::resolve_referer;

/// Issues forwarded requests to the upstream site.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    upstream: UpstreamConfig,
}

impl Forwarder {
    pub fn new(client: reqwest::Client, upstream: UpstreamConfig) -> Self {
        Self { client, upstream }
    }

    pub fn upstream(&self) -> &UpstreamConfig {
        &self.upstream
    }

    /// Headers a forwarded GET will carry.
    pub fn get_headers(&self, caller_user_agent: Option<&str>) -> HeaderSet {
        HeaderSet::from_profile(&self.upstream.get, caller_user_agent)
    }

    /// Headers a forwarded POST will carry, including the resolved Referer.
    pub fn post_headers(
        &self,
        target_url: &str,
        referer_override: Option<&str>,
        caller_user_agent: Option<&str>,
    ) -> HeaderSet {
        let referer = resolve_referer(referer_override, target_url, &self.upstream.post_referer);
        let mut headers = HeaderSet::from_profile(&self.upstream.post, caller_user_agent);
        headers.set("Referer", &referer);
        headers
    }

    /// Fetch `target_url` and return its body.
    pub async fn forward_get(
        &self,
        target_url: &str,
        caller_user_agent: Option<&str>,
    ) -> Result<Bytes, RelayError> {
        tracing::info!(url = %target_url, "Forwarding GET request");

        let headers = self
            .get_headers(caller_user_agent)
            .into_header_map()
            .map_err(|e| {
                tracing::error!(url = %target_url, error = %e, "GET headers rejected");
                RelayError::Internal(FETCH_FAILED.to_string())
            })?;
        let response = self
            .client
            .get(target_url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(url = %target_url, error = %e, "GET transport error");
                RelayError::Internal(FETCH_FAILED.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(url = %target_url, status = %status, "GET failed upstream");
            return Err(RelayError::upstream(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| {
            tracing::error!(url = %target_url, error = %e, "Failed reading GET response body");
            RelayError::Internal(FETCH_FAILED.to_string())
        })?;

        tracing::info!(url = %target_url, bytes = body.len(), "Received GET response");
        Ok(body)
    }

    /// Submit `body` to `target_url` as a browser form post and return the
    /// response body.
    pub async fn forward_post(
        &self,
        target_url: &str,
        referer_override: Option<&str>,
        body: Bytes,
        caller_user_agent: Option<&str>,
    ) -> Result<Bytes, RelayError> {
        let headers = self.post_headers(target_url, referer_override, caller_user_agent);

        tracing::info!(url = %target_url, "Forwarding POST request");
        tracing::info!(
            referer_override = referer_override.unwrap_or("Not specified"),
            referer = headers.get("Referer").unwrap_or_default(),
            "Resolved referer"
        );
        tracing::debug!(body = %String::from_utf8_lossy(&body), "POST request body");

        let headers = headers
            .into_header_map()
            .map_err(|e| submit_failed(target_url, e))?;
        let response = self
            .client
            .post(target_url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|e| submit_failed(target_url, e))?;

        let status = response.status();
        tracing::info!(url = %target_url, status = %status, "POST response received");
        if !status.is_success() {
            tracing::error!(url = %target_url, status = %status, "POST failed upstream");
            return Err(RelayError::upstream(status.as_u16()));
        }

        let content = response
            .bytes()
            .await
            .map_err(|e| submit_failed(target_url, e))?;
        tracing::info!(url = %target_url, bytes = content.len(), "Received POST response");

        SubmissionReport::scan(&content).log(target_url);
        Ok(content)
    }
}

fn submit_failed(target_url: &str, error: impl std::fmt::Display) -> RelayError {
    tracing::error!(url = %target_url, error = %error, "POST transport error");
    RelayError::Internal(format!("{SUBMIT_FAILED}: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forwarder() -> Forwarder {
        Forwarder::new(reqwest::Client::new(), UpstreamConfig::default())
    }

    #[test]
    fn test_get_headers_default() {
        let headers = forwarder().get_headers(None);
        assert_eq!(headers.get("User-Agent"), Some("Mozilla/5.0"));
        assert_eq!(
            headers.get("Accept"),
            Some("text/html,application/xhtml+xml,application/xml")
        );
        assert_eq!(headers.get("Accept-Language"), Some("en-US,en;q=0.9"));
        assert_eq!(headers.len(), 3);
    }

    #[test]
    fn test_post_headers_fingerprint() {
        let headers = forwarder().post_headers("https://site/x/results.php", None, Some("Caller/1.0"));

        assert_eq!(headers.get("User-Agent"), Some("Caller/1.0"));
        assert_eq!(headers.get("Referer"), Some("https://site/x/ap/calculus-bc/test1.html"));
        assert_eq!(headers.get("Origin"), Some("https://www.crackap.com"));
        assert_eq!(headers.get("Content-Type"), Some("application/x-www-form-urlencoded"));
        assert_eq!(headers.get("Sec-Ch-Ua-Platform"), Some("\"Android\""));
        assert_eq!(headers.get("Priority"), Some("u=0, i"));
        assert_eq!(headers.len(), 16);
    }

    #[test]
    fn test_post_header_order() {
        let headers = forwarder().post_headers("https://site/x/results.php", None, None);
        let names: Vec<&str> = headers.iter().map(|(n, _)| n).collect();
        assert_eq!(
            names,
            vec![
                "Content-Type",
                "User-Agent",
                "Accept",
                "Accept-Language",
                "Cache-Control",
                "Origin",
                "Referer",
                "Sec-Ch-Ua",
                "Sec-Ch-Ua-Mobile",
                "Sec-Ch-Ua-Platform",
                "Sec-Fetch-Dest",
                "Sec-Fetch-Mode",
                "Sec-Fetch-Site",
                "Sec-Fetch-User",
                "Upgrade-Insecure-Requests",
                "Priority",
            ]
        );
    }

    #[test]
    fn test_get_header_order() {
        let headers = forwarder().get_headers(Some("Caller/1.0"));
        let names: Vec<&str> = headers.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["User-Agent", "Accept", "Accept-Language"]);
    }

    #[test]
    fn test_post_headers_override_referer() {
        let headers = forwarder().post_headers(
            "https://site/x/results.php",
            Some("https://example.com/ref"),
            None,
        );
        assert_eq!(headers.get("Referer"), Some("https://example.com/ref"));
    }
}
