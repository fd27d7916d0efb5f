//! Diagnostic scan of submission responses.
//!
//! Purely informational: the result is logged and the body is passed on
//! untouched either way.

/// Markers the target site prints when its PHP backend misbehaves.
const PHP_ERROR_MARKERS: &[&str] = &["Warning", "mysql_num_rows()"];

/// Marker of a rendered results page.
const RESULTS_TABLE_MARKER: &str = r#"table class="results""#;

/// What a scan of an upstream submission response found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubmissionReport {
    pub php_error: bool,
    pub results_table: bool,
}

impl SubmissionReport {
    pub fn scan(body: &[u8]) -> Self {
        let text = String::from_utf8_lossy(body);
        Self {
            php_error: PHP_ERROR_MARKERS.iter().any(|m| text.contains(m)),
            results_table: text.contains(RESULTS_TABLE_MARKER),
        }
    }

    pub fn log(&self, url: &str) {
        if self.php_error {
            tracing::warn!(
                url = %url,
                "Response contains PHP error messages, passing it to the client anyway"
            );
        }
        tracing::info!(
            url = %url,
            results_table = self.results_table,
            "Submission response scanned"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_results_page() {
        let report = SubmissionReport::scan(br#"<table class="results"><tr></tr></table>"#);
        assert_eq!(
            report,
            SubmissionReport {
                php_error: false,
                results_table: true
            }
        );
    }

    #[test]
    fn test_php_warning() {
        let report = SubmissionReport::scan(b"<b>Warning</b>: mysql_num_rows() expects parameter 1");
        assert!(report.php_error);
        assert!(!report.results_table);
    }

    #[test]
    fn test_non_utf8_body() {
        let report = SubmissionReport::scan(&[0xff, 0xfe, b'o', b'k']);
        assert_eq!(report, SubmissionReport::default());
    }
}
