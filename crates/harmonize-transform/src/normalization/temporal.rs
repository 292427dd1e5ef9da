//! Date, time, elapsed-day, and age normalization.
//!
//! Source spreadsheets mix US dates, ISO dates, spelled-out months, and
//! Excel-style timestamps. Everything is parsed to a [`NaiveDateTime`] first
//! and then rendered in the template's formats:
//!
//! - dates as `%Y-%B-%d` (e.g. `2024-January-15`)
//! - times as `%I:%M:%S %p` (e.g. `02:30:00 PM`)
//!
//! Ambiguous slash dates are read month-first; `15/01/2024` still parses
//! because no month 15 exists.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use harmonize_common::parse_f64;
use harmonize_model::{Resolution, Unresolved};

/// Output format for normalized dates.
pub const DATE_OUTPUT_FORMAT: &str = "%Y-%B-%d";

/// Output format for normalized times.
pub const TIME_OUTPUT_FORMAT: &str = "%I:%M:%S %p";

/// Largest numeric value read as an age in years.
const MAX_AGE_YEARS: f64 = 120.0;

/// Numeric values in this range are read as a birth year.
const BIRTH_YEAR_RANGE: std::ops::RangeInclusive<f64> = 1000.0..=2100.0;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%d-%b-%Y %H:%M:%S",
    "%d-%b-%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d-%b-%Y",  // 15-Jan-2024
    "%d-%B-%Y",  // 15-January-2024
    "%Y-%b-%d",  // 2024-Jan-15
    "%Y-%B-%d",  // 2024-January-15
    "%b %d, %Y", // Jan 15, 2024
    "%B %d, %Y", // January 15, 2024
    "%b %d %Y",
    "%d %b %Y",
    "%d %B %Y",
    "%Y%m%d",
];

const TIME_FORMATS: &[&str] = &[
    "%H:%M:%S%.f",
    "%H:%M:%S",
    "%H:%M",
    "%I:%M:%S %p",
    "%I:%M %p",
    "%I:%M:%S%p",
    "%I:%M%p",
];

/// Parses a date or datetime in any supported layout.
///
/// Date-only values land at midnight. Year-month values land on the first of
/// the month and bare years on January 1.
pub fn parse_instant(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }

    // Before full dates: chrono lets a format space match nothing, so
    // "%b %d %Y" would read "Jun 2024" as June 20, year 24.
    if let Some(d) = parse_partial_date(trimmed) {
        return Some(d.and_time(NaiveTime::MIN));
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Year-only and year-month inputs.
fn parse_partial_date(value: &str) -> Option<NaiveDate> {
    if value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit()) {
        let year = value.parse::<i32>().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }

    // YYYY-MM
    if let Some((year, month)) = value.split_once('-')
        && year.len() == 4
        && month.len() == 2
        && let (Ok(year), Ok(month)) = (year.parse::<i32>(), month.parse::<u32>())
    {
        return NaiveDate::from_ymd_opt(year, month, 1);
    }

    for fmt in ["%b %Y", "%B %Y", "%m/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(&format!("01 {value}"), &format!("%d {fmt}")) {
            return Some(d);
        }
    }

    None
}

fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| parse_instant(trimmed).map(|dt| dt.time()))
}

/// Renders a parseable date as `%Y-%B-%d`.
///
/// # Examples
///
/// ```
/// use harmonize_transform::normalize_date;
///
/// assert_eq!(normalize_date("2024-01-15").as_deref(), Ok("2024-January-15"));
/// assert!(normalize_date("last tuesday").is_err());
/// ```
pub fn normalize_date(value: &str) -> Resolution<String> {
    parse_instant(value)
        .map(|dt| dt.format(DATE_OUTPUT_FORMAT).to_string())
        .ok_or(Unresolved)
}

/// Renders a parseable time (or the time part of a datetime) as `%I:%M:%S %p`.
///
/// # Examples
///
/// ```
/// use harmonize_transform::normalize_time;
///
/// assert_eq!(normalize_time("14:30").as_deref(), Ok("02:30:00 PM"));
/// ```
pub fn normalize_time(value: &str) -> Resolution<String> {
    parse_time_of_day(value)
        .map(|t| t.format(TIME_OUTPUT_FORMAT).to_string())
        .ok_or(Unresolved)
}

/// Whole days from `start` to `end`.
///
/// Unresolved when either side fails to parse or `end` precedes `start`.
pub fn elapsed_days(start: &str, end: &str) -> Resolution<u32> {
    let start = parse_instant(start).ok_or(Unresolved)?;
    let end = parse_instant(end).ok_or(Unresolved)?;
    if end < start {
        return Err(Unresolved);
    }
    u32::try_from((end - start).num_days()).map_err(|_| Unresolved)
}

/// Infers age in whole years at the reference date.
///
/// The raw value is read, in order, as:
///
/// 1. an age: a number in `[0, 120]`, truncated to an integer
/// 2. a birth year: a number in `[1000, 2100]`, subtracted from the
///    reference year
/// 3. a birth date: whole days to the reference date divided by 365
///
/// Cases 2 and 3 need a parseable reference date. A birth after the
/// reference is unresolved.
pub fn infer_age(raw: &str, reference: &str) -> Resolution<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Unresolved);
    }

    if let Some(number) = parse_f64(trimmed).filter(|n| n.is_finite()) {
        if (0.0..=MAX_AGE_YEARS).contains(&number) {
            return Ok(number as u32);
        }
        if BIRTH_YEAR_RANGE.contains(&number) {
            let reference = parse_instant(reference).ok_or(Unresolved)?;
            let years = i64::from(reference.year()) - number as i64;
            return u32::try_from(years).map_err(|_| Unresolved);
        }
    }

    let birth = parse_instant(trimmed).ok_or(Unresolved)?;
    let reference = parse_instant(reference).ok_or(Unresolved)?;
    let days = (reference - birth).num_days();
    if days < 0 {
        return Err(Unresolved);
    }
    u32::try_from(days / 365).map_err(|_| Unresolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_date_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_time(NaiveTime::MIN);
        for value in [
            "2024-01-15",
            "01/15/2024",
            "15/01/2024",
            "15-Jan-2024",
            "January 15, 2024",
            "20240115",
            "2024-January-15",
        ] {
            assert_eq!(parse_instant(value), Some(expected), "{value}");
        }
    }

    #[test]
    fn slash_dates_are_month_first() {
        assert_eq!(normalize_date("03/04/2024").as_deref(), Ok("2024-March-04"));
    }

    #[test]
    fn partial_dates_anchor_at_start() {
        assert_eq!(normalize_date("2024").as_deref(), Ok("2024-January-01"));
        assert_eq!(normalize_date("2024-06").as_deref(), Ok("2024-June-01"));
        assert_eq!(normalize_date("Jun 2024").as_deref(), Ok("2024-June-01"));
        assert_eq!(normalize_date("June 2024").as_deref(), Ok("2024-June-01"));
        assert_eq!(normalize_date("06/2024").as_deref(), Ok("2024-June-01"));
    }

    #[test]
    fn month_day_year_with_spaces_still_parses() {
        assert_eq!(normalize_date("Jun 15 2024").as_deref(), Ok("2024-June-15"));
        assert_eq!(normalize_date("15 Jun 2024").as_deref(), Ok("2024-June-15"));
    }

    #[test]
    fn partial_dates_agree_across_helpers() {
        assert_eq!(elapsed_days("Jun 2024", "2024-06-11"), Ok(10));
        assert_eq!(elapsed_days("2024-06", "June 2024"), Ok(0));
        assert_eq!(elapsed_days("2024", "2024-01-31"), Ok(30));
        assert_eq!(infer_age("1980-06-15", "Jun 2020"), Ok(39));
    }

    #[test]
    fn datetimes_keep_the_date() {
        assert_eq!(
            normalize_date("2024-01-15 13:45:00").as_deref(),
            Ok("2024-January-15")
        );
        assert_eq!(
            normalize_date("2024-01-15T13:45:00Z").as_deref(),
            Ok("2024-January-15")
        );
    }

    #[test]
    fn unparseable_dates_are_unresolved() {
        assert_eq!(normalize_date(""), Err(Unresolved));
        assert_eq!(normalize_date("not a date"), Err(Unresolved));
        assert_eq!(normalize_date("2024-13-45"), Err(Unresolved));
    }

    #[test]
    fn times_render_on_twelve_hour_clock() {
        assert_eq!(normalize_time("14:30").as_deref(), Ok("02:30:00 PM"));
        assert_eq!(normalize_time("09:05:10").as_deref(), Ok("09:05:10 AM"));
        assert_eq!(normalize_time("2:30 PM").as_deref(), Ok("02:30:00 PM"));
        assert_eq!(normalize_time("00:15").as_deref(), Ok("12:15:00 AM"));
        assert_eq!(
            normalize_time("2024-01-15 18:00:00").as_deref(),
            Ok("06:00:00 PM")
        );
        assert_eq!(normalize_time("noonish"), Err(Unresolved));
    }

    #[test]
    fn elapsed_days_between_dates() {
        assert_eq!(elapsed_days("2024-01-01", "2024-01-31"), Ok(30));
        assert_eq!(elapsed_days("2024-01-01", "2024-01-01"), Ok(0));
        assert_eq!(elapsed_days("02/28/2024", "03/01/2024"), Ok(2));
    }

    #[test]
    fn elapsed_days_counts_whole_days_only() {
        assert_eq!(elapsed_days("2024-01-01 18:00", "2024-01-02 06:00"), Ok(0));
    }

    #[test]
    fn elapsed_days_rejects_reversed_or_missing_dates() {
        assert_eq!(elapsed_days("2024-02-01", "2024-01-01"), Err(Unresolved));
        assert_eq!(elapsed_days("", "2024-01-01"), Err(Unresolved));
        assert_eq!(elapsed_days("2024-01-01", "soon"), Err(Unresolved));
    }

    #[test]
    fn age_passthrough() {
        assert_eq!(infer_age("45", "2020-01-01"), Ok(45));
        assert_eq!(infer_age("45.7", ""), Ok(45));
        assert_eq!(infer_age("0", "garbage"), Ok(0));
        assert_eq!(infer_age("120", ""), Ok(120));
    }

    #[test]
    fn age_from_birth_year() {
        assert_eq!(infer_age("1970", "2020-01-01"), Ok(50));
        assert_eq!(infer_age("1970", "06/30/2020"), Ok(50));
        assert_eq!(infer_age("1970", "unknown"), Err(Unresolved));
        assert_eq!(infer_age("2050", "2020-01-01"), Err(Unresolved));
    }

    #[test]
    fn age_from_birth_date() {
        assert_eq!(infer_age("1980-06-15", "2020-06-14"), Ok(40));
        assert_eq!(infer_age("1980-06-15", "2020-06-20"), Ok(40));
        assert_eq!(infer_age("2021-01-01", "2020-01-01"), Err(Unresolved));
    }

    #[test]
    fn age_rejects_implausible_numbers() {
        assert_eq!(infer_age("-3", "2020-01-01"), Err(Unresolved));
        assert_eq!(infer_age("500", "2020-01-01"), Err(Unresolved));
        assert_eq!(infer_age("", "2020-01-01"), Err(Unresolved));
        assert_eq!(infer_age("unknown", "2020-01-01"), Err(Unresolved));
    }
}
