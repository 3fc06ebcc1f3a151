use chrono::{Datelike, Days, NaiveDate};

use crate::error::{LedgerError, Result};

/// A term month is a fixed number of days.
pub const TERM_DAYS: u64 = 30;

/// Get the current local date
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Align a date to the beginning of its month.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| LedgerError::InvalidDate(value.to_string()))
}

/// Advance a date by a number of term months.
/// Term months are 30 days, not calendar months.
pub fn add_terms(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(TERM_DAYS * u64::from(months)))
}

/// Get the number of calendar months between two dates.
/// This only accounts for full months. The days
/// are irrelevant. Negative if `other` is earlier.
pub trait CountMonths {
    fn count_months(&self, other: &Self) -> i64;
}

impl CountMonths for NaiveDate {
    fn count_months(&self, other: &Self) -> i64 {
        let years = i64::from(other.year() - self.year());
        let months = i64::from(other.month()) - i64::from(self.month());
        years * 12 + months
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_of_month() {
        assert_eq!(first_of_month(date(2024, 2, 29)), date(2024, 2, 1));
        assert_eq!(first_of_month(date(2024, 3, 1)), date(2024, 3, 1));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-01-01").unwrap(), date(2024, 1, 1));
        assert_eq!(parse_date(" 2024-12-31 ").unwrap(), date(2024, 12, 31));
        assert!(matches!(
            parse_date("01/02/2024"),
            Err(LedgerError::InvalidDate(s)) if s == "01/02/2024"
        ));
        assert!(parse_date("2024-02-30").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_add_terms() {
        // 90 days after new year 2024 (leap year)
        assert_eq!(add_terms(date(2024, 1, 1), 3), Some(date(2024, 3, 31)));
        assert_eq!(add_terms(date(2024, 1, 31), 2), Some(date(2024, 3, 31)));
        assert_eq!(add_terms(date(2023, 1, 1), 1), Some(date(2023, 1, 31)));
        assert_eq!(add_terms(date(2024, 1, 1), 0), Some(date(2024, 1, 1)));
        assert_eq!(add_terms(date(2024, 1, 1), u32::MAX), None);
    }

    #[test]
    fn test_count_months() {
        let d1 = date(2022, 11, 15);
        let d2 = date(2022, 12, 20);
        let d3 = date(2023, 1, 1);
        let d4 = date(2023, 2, 2);

        assert_eq!(d1.count_months(&d2), 1);
        assert_eq!(d1.count_months(&d3), 2);
        assert_eq!(d1.count_months(&d4), 3);
        assert_eq!(d4.count_months(&d1), -3);
        assert_eq!(date(2024, 3, 1).count_months(&date(2024, 6, 1)), 3);
        assert_eq!(date(2024, 3, 31).count_months(&date(2024, 3, 1)), 0);
    }
}
