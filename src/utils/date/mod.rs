// Date utility functions
// Monday-first week math and month stepping used by the grid generator

use chrono::{Datelike, Days, Duration, Months, NaiveDate};

/// Weekday labels in grid order (Monday first).
pub const WEEKDAY_LABELS: [&str; 7] = ["MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN"];

pub fn is_same_day(date1: NaiveDate, date2: NaiveDate) -> bool {
    date1.year() == date2.year() && date1.month() == date2.month() && date1.day() == date2.day()
}

/// Position of `date` in a Monday-first week (Monday = 0, Sunday = 6).
pub fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_monday()
}

/// Distance kept from chrono's date limits so a whole month grid fits.
const EDGE_MARGIN: Days = Days::new(62);

/// The Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    shift_days(date, -(weekday_index(date) as i64))
}

/// `date` moved by `days`, saturating at `NaiveDate::MIN`/`MAX`.
pub fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days))
        .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

/// Pull dates within two months of the representable range inward, so grid
/// generation and navigation around them never overflow.
pub fn clamp_to_supported(date: NaiveDate) -> NaiveDate {
    let min = NaiveDate::MIN.checked_add_days(EDGE_MARGIN).unwrap_or(NaiveDate::MIN);
    let max = NaiveDate::MAX.checked_sub_days(EDGE_MARGIN).unwrap_or(NaiveDate::MAX);
    date.clamp(min, max)
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}

/// Step `date` by whole months, keeping the day of month where it exists
/// and clamping to the last day otherwise (Jan 31 + 1 month = Feb 28/29).
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let stepped = if months >= 0 {
        date.checked_add_months(Months::new(months as u32))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    stepped.unwrap_or(date)
}
