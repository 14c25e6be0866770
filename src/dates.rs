//! Tolerant date parsing for meeting and task timestamps.
//!
//! The backend emits plain dates (`2024-01-10`), RFC 3339 timestamps and
//! MySQL-style `2024-01-10 14:30:00`. Timestamps with an offset are converted
//! into the user's timezone before taking the calendar date.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;

/// Parse a timestamp into a naive local datetime in `tz`.
///
/// Date-only inputs resolve to local midnight. Returns `None` for anything
/// unrecognized.
pub fn parse_local_datetime(raw: &str, tz: &Tz) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(tz).naive_local());
    }

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }

    // Trailing fractional seconds or other suffixes: fall back to the date prefix.
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parse a timestamp into its calendar date in `tz`.
pub fn parse_local_date(raw: &str, tz: &Tz) -> Option<NaiveDate> {
    parse_local_datetime(raw, tz).map(|dt| dt.date())
}

/// Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_sunday() as i64;
    date - Duration::days(offset)
}

/// The seven dates of the Sunday-aligned week starting at `start`.
pub fn week_days(start: NaiveDate) -> [NaiveDate; 7] {
    std::array::from_fn(|i| start + Duration::days(i as i64))
}

/// Today's date in `tz`.
pub fn today_in(tz: &Tz) -> NaiveDate {
    chrono::Utc::now().with_timezone(tz).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_plain_date() {
        assert_eq!(parse_local_date("2024-01-10", &Tz::UTC), Some(d(2024, 1, 10)));
    }

    #[test]
    fn test_parse_mysql_datetime() {
        let dt = parse_local_datetime("2024-01-10 14:30:00", &Tz::UTC).unwrap();
        assert_eq!(dt.date(), d(2024, 1, 10));
        assert_eq!(dt.time(), NaiveTime::from_hms_opt(14, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_rfc3339_shifts_into_timezone() {
        // 02:00 UTC on the 10th is still the 9th in New York.
        let tz: Tz = "America/New_York".parse().unwrap();
        assert_eq!(parse_local_date("2024-01-10T02:00:00Z", &tz), Some(d(2024, 1, 9)));
        assert_eq!(parse_local_date("2024-01-10T02:00:00Z", &Tz::UTC), Some(d(2024, 1, 10)));
    }

    #[test]
    fn test_parse_fractional_seconds_falls_back_to_date() {
        assert_eq!(
            parse_local_date("2024-01-10 14:30:00.123", &Tz::UTC),
            Some(d(2024, 1, 10))
        );
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_local_date("", &Tz::UTC), None);
        assert_eq!(parse_local_date("next tuesday", &Tz::UTC), None);
        assert_eq!(parse_local_date("2024-13-45", &Tz::UTC), None);
    }

    #[test]
    fn test_week_start_is_sunday() {
        // 2024-01-10 is a Wednesday.
        assert_eq!(week_start(d(2024, 1, 10)), d(2024, 1, 7));
        assert_eq!(week_start(d(2024, 1, 7)), d(2024, 1, 7));
        assert_eq!(week_start(d(2024, 1, 13)), d(2024, 1, 7));
        // Crosses a year boundary.
        assert_eq!(week_start(d(2024, 1, 2)), d(2023, 12, 31));
    }

    #[test]
    fn test_week_days() {
        let days = week_days(d(2024, 1, 7));
        assert_eq!(days[0], d(2024, 1, 7));
        assert_eq!(days[6], d(2024, 1, 13));
    }
}
