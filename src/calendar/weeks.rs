//! Monday-start week arithmetic.
//!
//! Week 1 of a year is the week containing January 1st. A week that crosses
//! the year boundary is owned by the year its last day falls in, so the last
//! days of December can already count as week 1 of the following year. The
//! same ownership rule drives `weeks_in_year`, which keeps week numbering and
//! week counting consistent when bucketing sessions by (year, week).

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// First day of the week containing `date`.
pub fn week_start(date: NaiveDate, week_starts_on: Weekday) -> NaiveDate {
    let offset = (7 + date.weekday().num_days_from_monday() as i64
        - week_starts_on.num_days_from_monday() as i64)
        % 7;
    date - Duration::days(offset)
}

/// Week number of `date` with Monday-start weeks.
pub fn week_number(date: NaiveDate) -> u32 {
    week_number_starting(date, Weekday::Mon)
}

/// Week number of `date` with a configurable first day of the week.
pub fn week_number_starting(date: NaiveDate, week_starts_on: Weekday) -> u32 {
    year_week_starting(date, week_starts_on).1
}

/// Owning (year, week) bucket for `date` with Monday-start weeks.
///
/// The year component can differ from `date.year()` for the trailing days of
/// December, which belong to week 1 of the next year.
pub fn year_week(date: NaiveDate) -> (i32, u32) {
    year_week_starting(date, Weekday::Mon)
}

fn year_week_starting(date: NaiveDate, week_starts_on: Weekday) -> (i32, u32) {
    let start = week_start(date, week_starts_on);
    let end = start + Duration::days(6);
    let owning_year = if end.year() > date.year() {
        end.year()
    } else {
        date.year()
    };
    let anchor = week_start(jan1(owning_year), week_starts_on);
    let week = ((start - anchor).num_days() / 7 + 1) as u32;
    (owning_year, week)
}

/// Number of Monday-start weeks owned by `year`.
///
/// The week containing December 31st is excluded when its Sunday falls in the
/// next year; the preceding week is then the last week of the year.
pub fn weeks_in_year(year: i32) -> u32 {
    let mut last_start = week_start(dec31(year), Weekday::Mon);
    if (last_start + Duration::days(6)).year() > year {
        last_start -= Duration::days(7);
    }
    let anchor = week_start(jan1(year), Weekday::Mon);
    ((last_start - anchor).num_days() / 7 + 1) as u32
}

/// Monday-Sunday span of the Nth week of `year`, 1-based.
///
/// Counted from the week containing January 1st and clamped to
/// January 1st / December 31st for display at the year boundaries.
pub fn week_date_range(year: i32, week: u32) -> (NaiveDate, NaiveDate) {
    let anchor = week_start(jan1(year), Weekday::Mon);
    let start = anchor + Duration::days(7 * (i64::from(week) - 1));
    let end = start + Duration::days(6);
    (start.max(jan1(year)), end.min(dec31(year)))
}

fn jan1(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 1, 1).expect("January 1st is always valid")
}

fn dec31(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 12, 31).expect("December 31st is always valid")
}
