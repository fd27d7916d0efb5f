//! Outbound header construction.
//!
//! Each forwarded request gets a fresh [`HeaderSet`] built from its
//! [`ForwardProfile`]. Per-request values (`User-Agent`, `Referer`) fill the
//! profile's slots in place, so the wire order is the configured order.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use thiserror::Error;

use crate::config::ForwardProfile;

/// A header that cannot be put on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidHeader {
    #[error("invalid header name: {0}")]
    Name(String),

    #[error("invalid value for header {0}")]
    Value(String),
}

/// Ordered list of header name/value pairs.
///
/// Names compare case-insensitively; setting an existing name replaces its
/// value in place. Entries with an empty value are unfilled slots: they
/// keep their position but are never sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    entries: Vec<(String, String)>,
}

impl HeaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a profile's headers and fill its `User-Agent` slot.
    ///
    /// `caller_user_agent` wins when present and non-empty.
    pub fn from_profile(profile: &ForwardProfile, caller_user_agent: Option<&str>) -> Self {
        let mut set = Self::new();
        for entry in &profile.headers {
            set.entries.push((entry.name.clone(), entry.value.clone()));
        }
        let user_agent = caller_user_agent
            .filter(|ua| !ua.is_empty())
            .unwrap_or(profile.fallback_user_agent.as_str());
        set.set("User-Agent", user_agent);
        set
    }

    /// Insert or replace a header.
    pub fn set(&mut self, name: &str, value: &str) {
        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.entries.push((name.to_string(), value.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
            .filter(|value| !value.is_empty())
    }

    /// Number of headers that will be sent.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Filled headers in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Convert into a map the HTTP client can send, preserving order.
    ///
    /// Fails when a name or value is not legal on the wire. The config
    /// validator rules this out for profile values; a referer override
    /// from the query string can still trip it.
    pub fn into_header_map(self) -> Result<HeaderMap, InvalidHeader> {
        let mut map = HeaderMap::with_capacity(self.entries.len());
        for (name, value) in self.iter() {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| InvalidHeader::Name(name.to_string()))?;
            let header_value =
                HeaderValue::from_str(value).map_err(|_| InvalidHeader::Value(name.to_string()))?;
            map.insert(header_name, header_value);
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HeaderEntry;

    fn profile() -> ForwardProfile {
        ForwardProfile {
            fallback_user_agent: "Fallback/1.0".into(),
            headers: vec![
                HeaderEntry::new("Accept", "text/html"),
                HeaderEntry::slot("User-Agent"),
                HeaderEntry::slot("Referer"),
                HeaderEntry::new("Accept-Language", "en-US"),
            ],
        }
    }

    #[test]
    fn test_fallback_user_agent() {
        let set = HeaderSet::from_profile(&profile(), None);
        assert_eq!(set.get("user-agent"), Some("Fallback/1.0"));

        let set = HeaderSet::from_profile(&profile(), Some(""));
        assert_eq!(set.get("User-Agent"), Some("Fallback/1.0"));
    }

    #[test]
    fn test_caller_user_agent_wins() {
        let set = HeaderSet::from_profile(&profile(), Some("Caller/2.0"));
        assert_eq!(set.get("User-Agent"), Some("Caller/2.0"));
    }

    #[test]
    fn test_slots_filled_in_place() {
        let mut set = HeaderSet::from_profile(&profile(), None);
        set.set("Referer", "https://example.com/");

        let names: Vec<&str> = set.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Accept", "User-Agent", "Referer", "Accept-Language"]);
    }

    #[test]
    fn test_unfilled_slot_is_not_sent() {
        let set = HeaderSet::from_profile(&profile(), None);
        assert_eq!(set.get("Referer"), None);
        assert_eq!(set.len(), 3);

        let map = set.into_header_map().unwrap();
        assert!(map.get("referer").is_none());
        let names: Vec<&str> = map.keys().map(|k| k.as_str()).collect();
        assert_eq!(names, vec!["accept", "user-agent", "accept-language"]);
    }

    #[test]
    fn test_missing_user_agent_slot_is_appended() {
        let profile = ForwardProfile {
            fallback_user_agent: "Fallback/1.0".into(),
            headers: vec![HeaderEntry::new("Accept", "text/html")],
        };
        let set = HeaderSet::from_profile(&profile, None);
        let names: Vec<&str> = set.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Accept", "User-Agent"]);
    }

    #[test]
    fn test_set_replaces_case_insensitively() {
        let mut set = HeaderSet::from_profile(&profile(), None);
        set.set("accept", "application/json");

        assert_eq!(set.len(), 3);
        assert_eq!(set.get("Accept"), Some("application/json"));
    }

    #[test]
    fn test_invalid_value_is_rejected() {
        let mut set = HeaderSet::new();
        set.set("Referer", "line\nbreak");
        assert_eq!(
            set.into_header_map().unwrap_err(),
            InvalidHeader::Value("Referer".into())
        );
    }
}
