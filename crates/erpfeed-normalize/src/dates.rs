//! Release-month and cutoff-date parsing, plus the business-day shift that
//! produces the internal cutoff date.
//!
//! Parsing never panics and the string-level helpers never fail: an
//! unrecognized value comes back unchanged and a warning is logged.

use std::sync::LazyLock;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use regex::Regex;

use crate::error::NormalizeError;

/// Output format for every date column.
pub const DATE_FORMAT: &str = "%Y/%m/%d";

// `[0-9]` rather than `\d`: the regex crate's `\d` also matches full-width digits.
static YMD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([0-9]{4})\s*[-/.年]\s*([0-9]{1,2})\s*[-/.月]\s*([0-9]{1,2})\s*日?(?:(?:\s+|T).*)?$",
    )
    .expect("valid ymd regex")
});
static YMD_COMPACT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4})([0-9]{2})([0-9]{2})$").expect("valid compact ymd regex")
});
static MDY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,2})/([0-9]{1,2})/([0-9]{4})(?:\s+.*)?$").expect("valid mdy regex")
});
static EXCEL_SERIAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{5})(?:\.[0-9]+)?$").expect("valid excel serial regex")
});

static YM_SEPARATED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4})\s*[-/.年]\s*([0-9]{1,2})(?:[^0-9].*)?$").expect("valid ym regex")
});
static YM_COMPACT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4})([0-9]{2})(?:[0-9]{2})?$").expect("valid compact ym regex")
});
static YM_SPACED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4})\s+([0-9]{1,2})$").expect("valid spaced ym regex")
});

/// Serial range accepted as a spreadsheet date (1954 through 2118).
const EXCEL_SERIAL_RANGE: std::ops::RangeInclusive<u64> = 20_000..=80_000;

/// Parse a date in any of the shapes vendor sheets use:
/// `2025/12/15`, `2025-12-15 10:00`, `2025.12.15`, `2025年12月15日`,
/// `20251215`, `12/15/2025`, or a spreadsheet day serial such as `46006`.
///
/// # Errors
///
/// Returns [`NormalizeError::UnrecognizedDate`] if no shape matches or the
/// numbers do not form a calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate, NormalizeError> {
    let trimmed = value.trim();
    let unrecognized = || NormalizeError::UnrecognizedDate(value.to_string());

    let ymd = |y: &str, m: &str, d: &str| -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, d.parse().ok()?)
    };

    let parsed = if let Some(caps) = YMD
        .captures(trimmed)
        .or_else(|| YMD_COMPACT.captures(trimmed))
    {
        ymd(&caps[1], &caps[2], &caps[3])
    } else if let Some(caps) = MDY.captures(trimmed) {
        ymd(&caps[3], &caps[1], &caps[2])
    } else if let Some(caps) = EXCEL_SERIAL.captures(trimmed) {
        from_excel_serial(&caps[1])
    } else {
        None
    };

    parsed.ok_or_else(unrecognized)
}

fn from_excel_serial(digits: &str) -> Option<NaiveDate> {
    let serial: u64 = digits.parse().ok()?;
    if !EXCEL_SERIAL_RANGE.contains(&serial) {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial))
}

/// Parse a release month into `(year, month)`.
///
/// Accepts `2025-03`, `2025/03/15 00:00`, `2025年3月上旬`, `2025.3`,
/// `202503`, `20250315` and `2025 3`.
///
/// # Errors
///
/// Returns [`NormalizeError::UnrecognizedMonth`] if no shape matches or the
/// month is outside 1..=12.
pub fn parse_release_month(value: &str) -> Result<(i32, u32), NormalizeError> {
    let trimmed = value.trim();

    let caps = YM_SEPARATED
        .captures(trimmed)
        .or_else(|| YM_COMPACT.captures(trimmed))
        .or_else(|| YM_SPACED.captures(trimmed))
        .ok_or_else(|| NormalizeError::UnrecognizedMonth(value.to_string()))?;

    let year = caps[1].parse::<i32>().ok();
    let month = caps[2].parse::<u32>().ok().filter(|m| (1..=12).contains(m));

    match (year, month) {
        (Some(year), Some(month)) => Ok((year, month)),
        _ => Err(NormalizeError::UnrecognizedMonth(value.to_string())),
    }
}

/// Normalize a release month to `YYYYMM`, returning the input unchanged if it
/// cannot be parsed.
#[must_use]
pub fn normalize_release_month(value: &str) -> String {
    match parse_release_month(value) {
        Ok((year, month)) => format!("{year:04}{month:02}"),
        Err(e) => {
            tracing::warn!(error = %e, "keeping release month as-is");
            value.to_string()
        }
    }
}

/// Normalize a date to `YYYY/MM/DD`, returning the input unchanged if it
/// cannot be parsed.
#[must_use]
pub fn normalize_date(value: &str) -> String {
    match parse_date(value) {
        Ok(date) => date.format(DATE_FORMAT).to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "keeping date as-is");
            value.to_string()
        }
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Step backwards one day at a time until the date is Monday to Friday.
#[must_use]
pub fn roll_back_to_weekday(mut date: NaiveDate) -> Option<NaiveDate> {
    while is_weekend(date) {
        date = date.pred_opt()?;
    }
    Some(date)
}

/// Internal cutoff for a nominal cutoff `date`: the last weekday strictly
/// before the last weekday on or before `date`.
///
/// Returns `None` only at the lower bound of the calendar.
#[must_use]
pub fn cutoff_before(date: NaiveDate) -> Option<NaiveDate> {
    let anchor = roll_back_to_weekday(date)?;
    roll_back_to_weekday(anchor.pred_opt()?)
}

/// Parse `value` and shift it to the internal cutoff, formatted `YYYY/MM/DD`.
///
/// Returns `None` if the value cannot be parsed; callers fall back to the
/// normalized, unshifted value.
#[must_use]
pub fn shift_cutoff_backward(value: &str) -> Option<String> {
    let date = match parse_date(value) {
        Ok(date) => date,
        Err(e) => {
            tracing::warn!(error = %e, "cannot shift cutoff date");
            return None;
        }
    };
    cutoff_before(date).map(|d| d.format(DATE_FORMAT).to_string())
}

#[cfg(test)]
#[path = "dates_test.rs"]
mod tests;
