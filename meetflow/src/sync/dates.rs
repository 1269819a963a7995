//! Strict calendar date checks.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid"));

/// Returns true if `value` is a real calendar date written as `YYYY-MM-DD`.
#[must_use]
pub fn is_iso_date(value: &str) -> bool {
    ISO_DATE.is_match(value) && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_iso_dates() {
        assert!(is_iso_date("2026-01-30"));
        assert!(is_iso_date("2024-02-29"));
    }

    #[test]
    fn test_rejects_everything_else() {
        for value in [
            "",
            "next week",
            "다음주",
            "2026-1-30",
            "2026/01/30",
            "2026-01-30T10:00:00",
            " 2026-01-30",
            "2026-02-30",
            "2026-13-01",
        ] {
            assert!(!is_iso_date(value), "{value:?} accepted");
        }
    }
}
