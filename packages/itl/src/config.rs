//! Configuration constants and text grammars for ITL parsing.

use regex::Regex;
use std::sync::LazyLock;

/// Seconds between the Unix epoch and the ITL timestamp basis
/// (1900-01-01T00:00:00Z). Negative because the basis precedes 1970.
pub const TIMESTAMP_BASIS_UNIX: i64 = -2_208_988_800;

/// `chrono` format string for `<date>` content.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Default maximum library document size in bytes (256 MB).
///
/// Large libraries (tens of thousands of tracks) export to a few tens of
/// megabytes. Can be overridden via the CLI `--max-size` flag.
pub const DEFAULT_MAX_DOCUMENT_SIZE: u64 = 256 * 1024 * 1024;

/// Key of the top-level library entry holding the track records.
pub const TRACKS_KEY: &str = "Tracks";

/// Integer grammar: optional sign followed by ASCII digits.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
pub static INTEGER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?[0-9]+$").expect("valid regex"));

/// Date grammar: YYYY-MM-DDTHH:MM:SSZ, ASCII digits only.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
pub static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}Z$").expect("valid regex")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_pattern() {
        assert!(INTEGER_PATTERN.is_match("0"));
        assert!(INTEGER_PATTERN.is_match("+12"));
        assert!(INTEGER_PATTERN.is_match("-3471390245"));

        assert!(!INTEGER_PATTERN.is_match(""));
        assert!(!INTEGER_PATTERN.is_match("+"));
        assert!(!INTEGER_PATTERN.is_match("--1"));
        assert!(!INTEGER_PATTERN.is_match("1.0"));
        assert!(!INTEGER_PATTERN.is_match("0x1F"));
        assert!(!INTEGER_PATTERN.is_match("١٢")); // Arabic-Indic digits
    }

    #[test]
    fn test_date_pattern() {
        assert!(DATE_PATTERN.is_match("2010-01-02T03:04:05Z"));

        assert!(!DATE_PATTERN.is_match("2010-01-02T03:04:05"));
        assert!(!DATE_PATTERN.is_match("2010-01-02"));
        assert!(!DATE_PATTERN.is_match("2010-01-02T03:04:05+00:00"));
        assert!(!DATE_PATTERN.is_match("2010-1-2T03:04:05Z"));
    }

    #[test]
    fn test_timestamp_basis() {
        let basis = chrono::DateTime::from_timestamp(TIMESTAMP_BASIS_UNIX, 0).unwrap();
        assert_eq!(basis.to_rfc3339(), "1900-01-01T00:00:00+00:00");
    }
}
