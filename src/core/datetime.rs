//! Date and time parsing for command-line input.
//!
//! Times are read in the local timezone unless they carry an explicit offset.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Parse a point in time.
///
/// Supports:
/// - `now`
/// - `14:30`, `14:30:15` (today)
/// - `today 9:00`, `yesterday 17:45`
/// - `2024-05-06 09:30`, `2024-05-06T09:30:00`
/// - RFC 3339, e.g. `2024-05-06T09:30:00+02:00`
///
/// Returns `None` if the input cannot be parsed.
#[must_use]
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    parse_timestamp_in(input, &Local::now())
}

/// Parse a calendar date: `today`, `yesterday`, or `YYYY-MM-DD`.
#[must_use]
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    parse_date_relative(input, Local::now().date_naive())
}

/// First and last second of a local calendar day, in UTC.
#[must_use]
pub fn local_day_bounds(date: NaiveDate) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    day_bounds_in(date, &Local)
}

fn parse_timestamp_in<Tz: TimeZone>(input: &str, now: &DateTime<Tz>) -> Option<DateTime<Utc>> {
    let input = input.trim().to_lowercase();

    if input == "now" {
        return Some(now.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(&input.to_uppercase()) {
        return Some(dt.with_timezone(&Utc));
    }

    let tz = now.timezone();
    let today = now.date_naive();

    let naive = parse_naive_datetime(&input)
        .or_else(|| parse_time(&input).map(|t| today.and_time(t)))
        .or_else(|| {
            let (day, time) = input.split_once(' ')?;
            let date = parse_date_relative(day, today)?;
            Some(date.and_time(parse_time(time.trim())?))
        })?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_naive_datetime(input: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ];
    let upper = input.to_uppercase();
    FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(&upper, f).ok())
}

fn parse_time(input: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(input, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M"))
        .ok()
}

fn parse_date_relative(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    match input.trim().to_lowercase().as_str() {
        "today" => Some(today),
        "yesterday" => Some(today - Duration::days(1)),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d").ok(),
    }
}

fn day_bounds_in<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = tz
        .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
        .earliest()?;
    let end = tz
        .from_local_datetime(&date.and_hms_opt(23, 59, 59)?)
        .latest()?;
    Some((start.with_timezone(&Utc), end.with_timezone(&Utc)))
}
