// src/utils/mod.rs

//! Utility functions and helpers.

pub mod dom;
pub mod url;

use chrono::NaiveDate;

use crate::error::{AppError, Result};

pub use url::{resolve_url, timeline_url};

/// Date layout used by the timeline markup and its query parameters.
pub const DATE_FORMAT_FR: &str = "%d/%m/%Y";

/// Format a date the way the timeline publishes it (DD/MM/YYYY).
pub fn format_date_fr(date: NaiveDate) -> String {
    date.format(DATE_FORMAT_FR).to_string()
}

/// Parse a DD/MM/YYYY date string.
pub fn parse_date_fr(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT_FR)
        .map_err(|e| AppError::validation(format!("Invalid date '{s}' (expected DD/MM/YYYY): {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_fr() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 7).unwrap();
        assert_eq!(format_date_fr(date), "07/01/2026");
    }

    #[test]
    fn test_parse_date_fr_valid() {
        let date = parse_date_fr("07/01/2026").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 1, 7).unwrap());
    }

    #[test]
    fn test_parse_date_fr_trims_whitespace() {
        assert!(parse_date_fr(" 31/12/2025 ").is_ok());
    }

    #[test]
    fn test_parse_date_fr_rejects_iso() {
        assert!(parse_date_fr("2026-01-07").is_err());
    }

    #[test]
    fn test_parse_date_fr_rejects_impossible_date() {
        assert!(parse_date_fr("32/01/2026").is_err());
    }
}
