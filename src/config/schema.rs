//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.
//! The upstream header profiles default to the exact values the target
//! site expects; overriding them in a config file is possible but rarely
//! what you want.

use serde::{Deserialize, Serialize};

/// Root configuration for the page relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Outbound header profiles and referer rule.
    pub upstream: UpstreamConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address, `ip:port` or `host:port` (e.g., "0.0.0.0:8080",
    /// "localhost:8080"). The metrics address must be `ip:port`.
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Inbound request timeout (total time to answer the caller) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics listener.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// A single header, kept as a name/value pair so ordering survives a round
/// trip through TOML.
///
/// An empty value marks a slot: the header is filled per request
/// (`User-Agent`, `Referer`) at this position, and left out if nothing
/// fills it.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct HeaderEntry {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl HeaderEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// A position reserved for a per-request value.
    pub fn slot(name: impl Into<String>) -> Self {
        Self::new(name, "")
    }

    pub fn is_slot(&self) -> bool {
        self.value.is_empty()
    }
}

/// Headers sent with one kind of outbound request.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ForwardProfile {
    /// User-Agent used when the caller did not send one.
    pub fallback_user_agent: String,

    /// Headers in wire order, including the `User-Agent` and `Referer`
    /// slots. A `User-Agent` missing from the list is appended last.
    #[serde(default)]
    pub headers: Vec<HeaderEntry>,
}

/// Textual rewrite deriving a Referer from the target URL.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RefererRule {
    /// Substring to look for in the target URL.
    pub find: String,

    /// Replacement for the first occurrence of `find`.
    pub replace: String,
}

impl Default for RefererRule {
    fn default() -> Self {
        Self {
            find: "/results.php".to_string(),
            replace: "/ap/calculus-bc/test1.html".to_string(),
        }
    }
}

/// Outbound request configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Profile for forwarded GET requests.
    pub get: ForwardProfile,

    /// Profile for forwarded POST requests.
    pub post: ForwardProfile,

    /// Rule used when a POST arrives without a referer override.
    pub post_referer: RefererRule,

    /// `max-age` advertised on successful GET responses, in seconds
    /// (600 unless configured).
    pub get_cache_max_age_secs: u32,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            get: default_get_profile(),
            post: default_post_profile(),
            post_referer: RefererRule::default(),
            get_cache_max_age_secs: 600,
        }
    }
}

fn default_get_profile() -> ForwardProfile {
    ForwardProfile {
        fallback_user_agent: "Mozilla/5.0".to_string(),
        headers: vec![
            HeaderEntry::slot("User-Agent"),
            HeaderEntry::new("Accept", "text/html,application/xhtml+xml,application/xml"),
            HeaderEntry::new("Accept-Language", "en-US,en;q=0.9"),
        ],
    }
}

// The target site rejects submissions that don't look like a mobile Edge
// browser navigating from its own origin.
fn default_post_profile() -> ForwardProfile {
    ForwardProfile {
        fallback_user_agent: "Mozilla/5.0 (Linux; Android 6.0; Nexus 5 Build/MRA58N) \
            AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Mobile Safari/537.36 \
            Edg/135.0.0.0"
            .to_string(),
        headers: vec![
            HeaderEntry::new("Content-Type", "application/x-www-form-urlencoded"),
            HeaderEntry::slot("User-Agent"),
            HeaderEntry::new(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,\
                 image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7",
            ),
            HeaderEntry::new("Accept-Language", "en-US,en;q=0.9,de;q=0.8"),
            HeaderEntry::new("Cache-Control", "max-age=0"),
            HeaderEntry::new("Origin", "https://www.crackap.com"),
            HeaderEntry::slot("Referer"),
            HeaderEntry::new(
                "Sec-Ch-Ua",
                r#""Microsoft Edge";v="135", "Not-A.Brand";v="8", "Chromium";v="135""#,
            ),
            HeaderEntry::new("Sec-Ch-Ua-Mobile", "?1"),
            HeaderEntry::new("Sec-Ch-Ua-Platform", r#""Android""#),
            HeaderEntry::new("Sec-Fetch-Dest", "document"),
            HeaderEntry::new("Sec-Fetch-Mode", "navigate"),
            HeaderEntry::new("Sec-Fetch-Site", "same-origin"),
            HeaderEntry::new("Sec-Fetch-User", "?1"),
            HeaderEntry::new("Upgrade-Insecure-Requests", "1"),
            HeaderEntry::new("Priority", "u=0, i"),
        ],
    }
}
