use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::JournalError;

// "2024-01-15" or "2024-01-15T10:30:00.000Z"
const ISO_DATE: &str =
    r"^(\d{4})-(\d{2})-(\d{2})(?:[T ]\d{2}:\d{2}(?::\d{2}(?:\.\d+)?)?(?:Z|[+-]\d{2}:?\d{2})?)?$";
// "15-01-2024" or "15/01/2024"
const DAY_FIRST_DATE: &str = r"^(\d{2})[-/](\d{2})[-/](\d{4})$";

lazy_static! {
    static ref ISO_DATE_RE: Result<Regex, regex::Error> = Regex::new(ISO_DATE);
    static ref DAY_FIRST_DATE_RE: Result<Regex, regex::Error> = Regex::new(DAY_FIRST_DATE);
}

fn pattern(compiled: &'static Result<Regex, regex::Error>) -> Result<&'static Regex, JournalError> {
    compiled
        .as_ref()
        .map_err(|e| JournalError::InvalidDate(e.to_string()))
}

/// Parse a date as it arrives from the backend or a CSV file.
///
/// Accepts `YYYY-MM-DD`, ISO datetimes (the time part is dropped),
/// `DD-MM-YYYY` and `DD/MM/YYYY`.
pub fn parse_date(value: &str) -> Result<NaiveDate, JournalError> {
    let value = value.trim().trim_start_matches('\u{feff}');
    if value.is_empty() {
        return Err(JournalError::InvalidDate("empty date".to_string()));
    }

    if let Some(caps) = pattern(&ISO_DATE_RE)?.captures(value) {
        return ymd(&caps[1], &caps[2], &caps[3])
            .ok_or_else(|| JournalError::InvalidDate(value.to_string()));
    }

    if let Some(caps) = pattern(&DAY_FIRST_DATE_RE)?.captures(value) {
        return ymd(&caps[3], &caps[2], &caps[1])
            .ok_or_else(|| JournalError::InvalidDate(value.to_string()));
    }

    Err(JournalError::InvalidDate(value.to_string()))
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}
