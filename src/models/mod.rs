pub mod appointment;
pub mod doctor;
pub mod enums;

pub use appointment::*;
pub use doctor::*;
pub use enums::*;

use std::ops::RangeInclusive;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Offset-less layouts accepted from clients, read as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Years that fit the four-digit wire format.
const SUPPORTED_YEARS: RangeInclusive<i32> = 0..=9999;

/// Parse an ISO-8601 instant.
///
/// RFC 3339 values with any offset are normalized to UTC. Values without an
/// offset (`2024-05-01T09:00`, `2024-05-01T09:00:00.000`) are taken as UTC.
/// Instants whose UTC year falls outside 0000-9999 are rejected.
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    let parsed = match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(_) => NAIVE_DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc()),
    };
    parsed.filter(|dt| SUPPORTED_YEARS.contains(&dt.year()))
}

/// Parse a calendar date (`YYYY-MM-DD`, year 0000-9999).
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .filter(|day| SUPPORTED_YEARS.contains(&day.year()))
}

/// Wire format for instants: `YYYY-MM-DDTHH:MM:SS.mmmZ`.
///
/// Fixed width and always UTC, so string order equals chronological order.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serde adapter for `DateTime<Utc>` fields using [`format_datetime`] /
/// [`parse_datetime`].
pub mod iso8601 {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_datetime(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_datetime(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid ISO-8601 datetime: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_utc_rfc3339() {
        let dt = parse_datetime("2024-05-01T09:00:00.000Z").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap());
    }

    #[test]
    fn normalizes_offsets_to_utc() {
        let dt = parse_datetime("2024-05-01T09:00:00+02:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 5, 1, 7, 0, 0).unwrap());
    }

    #[test]
    fn offsetless_values_are_utc() {
        let minutes = parse_datetime("2024-05-01T09:30").unwrap();
        assert_eq!(minutes, Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap());
        let seconds = parse_datetime("2024-05-01T09:30:15").unwrap();
        assert_eq!(seconds, Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 15).unwrap());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_datetime("tomorrow at nine").is_none());
        assert!(parse_datetime("2024-13-01T09:00:00Z").is_none());
        assert!(parse_datetime("").is_none());
    }

    #[test]
    fn rejects_years_outside_four_digits() {
        assert!(parse_datetime("+10000-01-01T09:00").is_none());
        assert!(parse_datetime("-0001-05-01T09:00").is_none());
        assert!(parse_datetime("+10000-01-01T09:00:00.000").is_none());
        assert!(parse_day("+10000-01-01").is_none());
        assert!(parse_day("-0001-05-01").is_none());
    }

    #[test]
    fn boundary_years_survive_format_and_parse() {
        for raw in ["0000-01-01T00:00:00.000Z", "9999-12-31T23:59:59.999Z"] {
            let dt = parse_datetime(raw).unwrap();
            assert_eq!(format_datetime(&dt), raw);
        }
        // Offset pushes the UTC instant into year 10000.
        assert!(parse_datetime("9999-12-31T23:30:00-01:00").is_none());
    }

    #[test]
    fn formats_with_millis_and_z() {
        let dt = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        assert_eq!(format_datetime(&dt), "2024-05-01T09:00:00.000Z");
    }

    #[test]
    fn parse_day_accepts_plain_dates_only() {
        assert_eq!(parse_day("2024-05-01"), NaiveDate::from_ymd_opt(2024, 5, 1));
        assert!(parse_day("2024-05-01T09:00").is_none());
        assert!(parse_day("05/01/2024").is_none());
    }
}
