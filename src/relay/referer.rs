//! Referer resolution for forwarded submissions.

use crate::config::RefererRule;

impl RefererRule {
    /// Rewrite the first occurrence of `find` in `target`.
    ///
    /// A target without the pattern comes back unchanged.
    pub fn apply(&self, target: &str) -> String {
        target.replacen(&self.find, &self.replace, 1)
    }
}

/// Pick the Referer for an outbound POST.
///
/// An explicit, non-empty override always wins over the derived value.
pub fn resolve_referer(override_referer: Option<&str>, target: &str, rule: &RefererRule) -> String {
    match override_referer {
        Some(referer) if !referer.is_empty() => referer.to_string(),
        _ => rule.apply(target),
    }
}
