//! Date validation and conversion between display and remote formats.
//!
//! Callers pass dates as `YYYY-MM-DD`; the remote API wants `YYYYMMDD`
//! path segments. The school year runs from September 1st to June 30th.

use chrono::{Datelike, NaiveDate};

use crate::api::{ApiError, Result};

const DISPLAY_FORMAT: &str = "%Y-%m-%d";
const REMOTE_FORMAT: &str = "%Y%m%d";

/// Month in which the school year starts
const SCHOOL_YEAR_START_MONTH: u32 = 9;

/// Validate a `YYYY-MM-DD` string, rejecting dates that do not exist.
pub fn validate_date(date: &str) -> Result<NaiveDate> {
    let bytes = date.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(ApiError::InvalidDateFormat(format!(
            "{} (expected YYYY-MM-DD)",
            date
        )));
    }

    NaiveDate::parse_from_str(date, DISPLAY_FORMAT)
        .map_err(|_| ApiError::InvalidDateFormat(format!("{} is not a valid date", date)))
}

/// Convert `YYYY-MM-DD` to the remote `YYYYMMDD` form.
pub fn to_remote_date(date: &str) -> String {
    date.replace('-', "")
}

/// Convert a remote `YYYYMMDD` date back to `YYYY-MM-DD`.
pub fn from_remote_date(date: &str) -> Result<String> {
    if date.len() != 8 || !date.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::InvalidDateFormat(format!(
            "{} (remote dates are YYYYMMDD)",
            date
        )));
    }
    Ok(format!("{}-{}-{}", &date[0..4], &date[4..6], &date[6..8]))
}

pub(crate) fn remote_segment(date: NaiveDate) -> String {
    date.format(REMOTE_FORMAT).to_string()
}

/// Calendar year in which the current school year started.
pub fn school_year_start_year(today: NaiveDate) -> i32 {
    if today.month() < SCHOOL_YEAR_START_MONTH {
        today.year() - 1
    } else {
        today.year()
    }
}

/// September 1st of the current school year.
pub fn school_year_start(today: NaiveDate) -> Result<NaiveDate> {
    let year = school_year_start_year(today);
    NaiveDate::from_ymd_opt(year, SCHOOL_YEAR_START_MONTH, 1)
        .ok_or_else(|| ApiError::DateOutOfRange(format!("school year {} start", year)))
}

/// June 30th closing the current school year.
pub fn school_year_end(today: NaiveDate) -> Result<NaiveDate> {
    let year = school_year_start_year(today) + 1;
    NaiveDate::from_ymd_opt(year, 6, 30)
        .ok_or_else(|| ApiError::DateOutOfRange(format!("school year {} end", year)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_validate_date_rejects_bad_shape() {
        for bad in ["2024-1-05", "20240105", "2024/01/05", "abcd-ef-gh", "", "2024-01-055"] {
            assert!(
                matches!(validate_date(bad), Err(ApiError::InvalidDateFormat(_))),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_validate_date_checks_calendar() {
        assert!(matches!(validate_date("2024-13-45"), Err(ApiError::InvalidDateFormat(_))));
        assert!(matches!(validate_date("2024-02-30"), Err(ApiError::InvalidDateFormat(_))));
        assert!(matches!(validate_date("2023-02-29"), Err(ApiError::InvalidDateFormat(_))));
        assert_eq!(validate_date("2024-02-29").unwrap(), day(2024, 2, 29));
    }

    #[test]
    fn test_remote_date_round_trips() {
        for display in ["2024-02-29", "1999-12-31", "2025-09-01"] {
            let remote = to_remote_date(display);
            assert_eq!(remote.len(), 8);
            assert_eq!(from_remote_date(&remote).unwrap(), display);
        }
        for remote in ["20240229", "20250630"] {
            assert_eq!(to_remote_date(&from_remote_date(remote).unwrap()), remote);
        }
    }

    #[test]
    fn test_from_remote_date_rejects_wrong_length() {
        assert!(matches!(from_remote_date("2024022"), Err(ApiError::InvalidDateFormat(_))));
        assert!(matches!(from_remote_date("2024-02-29"), Err(ApiError::InvalidDateFormat(_))));
        assert!(matches!(from_remote_date("2024èè1"), Err(ApiError::InvalidDateFormat(_))));
    }

    #[test]
    fn test_remote_segment() {
        assert_eq!(remote_segment(day(2024, 3, 7)), "20240307");
    }

    #[test]
    fn test_school_year_bounds() {
        // Autumn belongs to the year that just started
        assert_eq!(school_year_start_year(day(2024, 10, 15)), 2024);
        assert_eq!(school_year_start_year(day(2024, 9, 1)), 2024);
        // Spring and summer belong to the previous one
        assert_eq!(school_year_start_year(day(2025, 3, 1)), 2024);
        assert_eq!(school_year_start_year(day(2025, 8, 31)), 2024);

        assert_eq!(school_year_start(day(2025, 3, 1)).unwrap(), day(2024, 9, 1));
        assert_eq!(school_year_end(day(2025, 3, 1)).unwrap(), day(2025, 6, 30));
        assert_eq!(school_year_end(day(2024, 11, 1)).unwrap(), day(2025, 6, 30));
    }
}
