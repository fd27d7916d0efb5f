//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Reject header profiles that could never be sent on the wire
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::{HeaderName, HeaderValue};
use thiserror::Error;

use crate::config::schema::{ForwardProfile, RelayConfig};

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid {field} '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{profile} profile has an invalid header '{name}'")]
    InvalidHeader { profile: &'static str, name: String },

    #[error("{profile} profile has an invalid fallback user agent")]
    InvalidUserAgent { profile: &'static str },

    #[error("upstream.post_referer.find must not be empty")]
    EmptyRefererPattern,
}

/// `ip:port`, or `host:port` for a name the listener resolves when binding.
fn is_listen_address(address: &str) -> bool {
    address.parse::<SocketAddr>().is_ok()
        || address
            .rsplit_once(':')
            .is_some_and(|(host, port)| {
                !host.is_empty() && !host.contains(':') && port.parse::<u16>().is_ok()
            })
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !is_listen_address(&config.listener.bind_address) {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero { field: "timeouts.request_secs" });
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::Zero { field: "security.max_body_size" });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    check_profile("get", &config.upstream.get, &mut errors);
    check_profile("post", &config.upstream.post, &mut errors);

    if config.upstream.post_referer.find.is_empty() {
        errors.push(ValidationError::EmptyRefererPattern);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_profile(profile: &'static str, forward: &ForwardProfile, errors: &mut Vec<ValidationError>) {
    if HeaderValue::from_str(&forward.fallback_user_agent).is_err() {
        errors.push(ValidationError::InvalidUserAgent { profile });
    }

    for entry in &forward.headers {
        let valid = HeaderName::from_bytes(entry.name.as_bytes()).is_ok()
            && HeaderValue::from_str(&entry.value).is_ok();
        if !valid {
            errors.push(ValidationError::InvalidHeader {
                profile,
                name: entry.name.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::HeaderEntry;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&RelayConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = RelayConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.timeouts.request_secs = 0;
        config.upstream.post_referer.find.clear();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::EmptyRefererPattern));
        assert!(errors.contains(&ValidationError::Zero { field: "timeouts.request_secs" }));
    }

    #[test]
    fn test_rejects_bad_header_name() {
        let mut config = RelayConfig::default();
        config.upstream.get.headers.push(HeaderEntry::new("Bad Header", "x"));

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::InvalidHeader {
                profile: "get",
                name: "Bad Header".into(),
            }]
        );
    }

    #[test]
    fn test_metrics_address_only_checked_when_enabled() {
        let mut config = RelayConfig::default();
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_bind_address_accepts_host_and_port() {
        let mut config = RelayConfig::default();
        for address in ["localhost:8080", "[::1]:8080", "127.0.0.1:0"] {
            config.listener.bind_address = address.into();
            assert!(validate_config(&config).is_ok(), "{address} rejected");
        }

        for address in ["localhost", ":8080", "localhost:http", "localhost:70000"] {
            config.listener.bind_address = address.into();
            assert_eq!(
                validate_config(&config).unwrap_err(),
                vec![ValidationError::InvalidAddress {
                    field: "listener.bind_address",
                    value: address.into(),
                }]
            );
        }
    }
}
