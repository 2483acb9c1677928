use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};

use crate::api_error::{ApiError, ApiResult};

/// Strip time-of-day, keeping the calendar date in the UTC reference
/// timezone. Every date stored or compared by this service goes through
/// this first.
pub fn truncate_to_day(timestamp: DateTime<Utc>) -> NaiveDate {
    timestamp.date_naive()
}

/// Weekday index in [0, 6] with 0 = Sunday, matching SQLite's
/// `strftime('%w', ...)`.
pub fn weekday_index(day: NaiveDate) -> u32 {
    day.weekday().num_days_from_sunday()
}

pub fn today() -> NaiveDate {
    truncate_to_day(Utc::now())
}

/// Parse a caller-supplied timestamp down to its day. Accepts RFC 3339
/// (converted to UTC before truncation), a naive datetime, or a plain date.
pub fn parse_day(raw: &str) -> ApiResult<NaiveDate> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(truncate_to_day(timestamp.with_timezone(&Utc)));
    }

    if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(timestamp.date());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::InvalidInput(format!("unparseable date: {}", raw)))
}
