//! Shared helpers for text normalization, number formatting and dates.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

// =============================================================================
// Text Utilities
// =============================================================================

/// Title-case a string: the first letter of every alphabetic run is upper
/// case, all other letters lower case.
///
/// A "run" restarts after any non-alphabetic character, so `o'neil` becomes
/// `O'Neil` and `north-east` becomes `North-East`.
pub fn title_case(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut prev_is_alpha = false;

    for c in value.chars() {
        if c.is_alphabetic() {
            if prev_is_alpha {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            prev_is_alpha = true;
        } else {
            result.push(c);
            prev_is_alpha = false;
        }
    }

    result
}

/// Trim surrounding whitespace, then title-case.
pub fn normalize_label(value: &str) -> String {
    title_case(value.trim())
}

// =============================================================================
// Number Utilities
// =============================================================================

/// Round to two decimal places.
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format a value as dollars with thousands separators, e.g. `$1,234.56`.
pub fn format_currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{}${}.{:02}", sign, grouped, frac)
}

// =============================================================================
// Date Utilities
// =============================================================================

/// Date-only formats accepted by [`parse_date`].
pub const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Date-time formats accepted by [`parse_date`]; the time part is dropped.
pub const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Days between 0001-01-01 (CE day 1) and the Unix epoch.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Parse a date in one of the recognized formats.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Days since 1970-01-01, the physical representation of a Polars `Date`.
pub fn date_to_epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

/// Inverse of [`date_to_epoch_days`].
pub fn epoch_days_to_date(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
}

/// English month name for a 1-based month number.
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("Unknown")
}

/// Calendar quarter (1-4) of a 1-based month number.
#[inline]
pub fn quarter_of(month: u32) -> u32 {
    (month.saturating_sub(1)) / 3 + 1
}

// =============================================================================
// Tests
// =============================================================================
