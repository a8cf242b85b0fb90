//! Header lines: the file type declaration and the reference time.

use acmiview_core::ImportError;
use acmiview_track::Timestamp;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

pub const BOM: char = '\u{feff}';
const FILE_TYPE_KEY: &str = "FileType=";
const REFERENCE_TIME_KEY: &str = "ReferenceTime=";
const FORMAT_FAMILY: &str = "acmi";

/// Zone-less timestamp layouts tried after RFC 3339, all taken as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y%m%dT%H%M%SZ",
    "%Y%m%dT%H%M%S",
];

/// Checks the first non-empty line and returns the declared file type.
///
/// A byte order mark and anything before `FileType=` are ignored.
pub fn parse_file_type(line: &str) -> Result<&str, ImportError> {
    let line = line.trim().trim_start_matches(BOM).trim();
    let start = line
        .find(FILE_TYPE_KEY)
        .ok_or_else(|| ImportError::missing_file_type(line))?;

    let value = line[start + FILE_TYPE_KEY.len()..].trim();
    if !value.to_ascii_lowercase().contains(FORMAT_FAMILY) {
        return Err(ImportError::unsupported_file_type(value));
    }
    Ok(value)
}

/// Returns the raw value of a `ReferenceTime=` declaration, if the line has one.
///
/// The value ends at the next comma so a global object line like
/// `0,ReferenceTime=...,Title=...` still yields just the timestamp.
pub fn reference_time_value(line: &str) -> Option<&str> {
    let start = line.find(REFERENCE_TIME_KEY)? + REFERENCE_TIME_KEY.len();
    let rest = &line[start..];
    let end = rest.find(',').unwrap_or(rest.len());
    Some(rest[..end].trim())
}

/// Parses a reference time.
///
/// Accepts RFC 3339, zone-less extended and basic ISO 8601 forms down to minute
/// precision, and a bare `YYYY-MM-DD` date at midnight. Zone-less values are UTC.
pub fn parse_reference_time(value: &str) -> Result<Timestamp, ImportError> {
    let value = value.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(value) {
        return Ok(t.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(t.and_utc());
        }
    }
    if let Some(t) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(t.and_utc());
    }
    Err(ImportError::invalid_reference_time(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_file_type() {
        assert_eq!(parse_file_type("FileType=text/acmi/tacview"), Ok("text/acmi/tacview"));
        assert_eq!(parse_file_type("\u{feff}FileType=acmi_ver_2"), Ok("acmi_ver_2"));
        assert_eq!(parse_file_type("  FileType=ACMI  "), Ok("ACMI"));
        assert_eq!(parse_file_type("xx FileType=acmi"), Ok("acmi"));
    }

    #[test]
    fn test_file_type_errors() {
        assert!(matches!(
            parse_file_type("FileVersion=2.1"),
            Err(ImportError::MissingFileType { .. })
        ));
        assert_eq!(
            parse_file_type("FileType=text/csv"),
            Err(ImportError::unsupported_file_type("text/csv"))
        );
    }

    #[test]
    fn test_reference_time_value() {
        assert_eq!(
            reference_time_value("ReferenceTime=2020-01-01T00:00:00Z"),
            Some("2020-01-01T00:00:00Z")
        );
        assert_eq!(
            reference_time_value("0,ReferenceTime=2020-01-01T00:00:00Z,Title=Demo"),
            Some("2020-01-01T00:00:00Z")
        );
        assert_eq!(reference_time_value("FileVersion=2.1"), None);
    }

    #[test]
    fn test_reference_time_formats() {
        let expected = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_reference_time("2020-01-01T00:00:00Z"), Ok(expected));
        assert_eq!(parse_reference_time("2020-01-01T02:00:00+02:00"), Ok(expected));
        assert_eq!(parse_reference_time("2020-01-01T00:00:00"), Ok(expected));
        assert_eq!(parse_reference_time("2020-01-01T00:00"), Ok(expected));
        assert_eq!(parse_reference_time("20200101T000000Z"), Ok(expected));
        assert_eq!(parse_reference_time("20200101T000000"), Ok(expected));
        assert_eq!(parse_reference_time("2020-01-01"), Ok(expected));

        let t = parse_reference_time("2020-01-01T00:00:00.250").unwrap();
        assert_eq!(t.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_reference_time_rejects_garbage() {
        assert_eq!(
            parse_reference_time("yesterday"),
            Err(ImportError::invalid_reference_time("yesterday"))
        );
        assert!(parse_reference_time("").is_err());
        assert!(parse_reference_time("2020-13-01").is_err());
    }
}
