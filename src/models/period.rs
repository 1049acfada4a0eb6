//! Calendar month addressing
//!
//! `YearMonth` identifies one month of the ledger and doubles as the
//! effective month of a template change. Ordering is by year, then month.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar month (e.g., "2026-06")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// Create a month, rejecting month numbers outside 1..=12
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodParseError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodParseError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    /// The month containing today's local date
    pub fn current() -> Self {
        let today = chrono::Local::now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    /// Comparison key: `year * 100 + month`
    pub fn key(&self) -> i64 {
        i64::from(self.year) * 100 + i64::from(self.month)
    }

    /// Whether month `month` of `year` lies at or after this month
    pub fn includes(&self, year: i32, month: u32) -> bool {
        i64::from(year) * 100 + i64::from(month) >= self.key()
    }

    /// First day of the month, `None` outside chrono's calendar range
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Number of days in this month per the Gregorian calendar
    pub fn day_count(&self) -> Option<u32> {
        let first = self.first_day()?;
        let next = first.checked_add_months(Months::new(1))?;
        u32::try_from(next.signed_duration_since(first).num_days()).ok()
    }

    /// Every calendar day of the month, in order
    pub fn days(&self) -> Vec<NaiveDate> {
        match self.first_day() {
            Some(first) => first
                .iter_days()
                .take_while(|d| d.month() == self.month)
                .collect(),
            None => Vec::new(),
        }
    }

    /// The following month
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The preceding month
    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Parse a month string
    ///
    /// Formats: "2026-06", "2026-6", "2026/06"
    pub fn parse(s: &str) -> Result<Self, PeriodParseError> {
        let s = s.trim();
        let (year, month) = s
            .split_once(['-', '/'])
            .ok_or_else(|| PeriodParseError::InvalidFormat(s.to_string()))?;

        if year.len() != 4 || month.is_empty() || month.len() > 2 {
            return Err(PeriodParseError::InvalidFormat(s.to_string()));
        }

        let year: i32 = year
            .parse()
            .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;
        let month: u32 = month
            .parse()
            .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;

        Self::new(year, month)
    }
}

impl From<NaiveDate> for YearMonth {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Error type for month parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodParseError {
    InvalidFormat(String),
    InvalidMonth(u32),
}

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodParseError::InvalidFormat(s) => {
                write!(f, "Invalid month format (expected YYYY-MM): {}", s)
            }
            PeriodParseError::InvalidMonth(m) => write!(f, "Invalid month: {}", m),
        }
    }
}

impl std::error::Error for PeriodParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_count_leap_years() {
        assert_eq!(YearMonth::new(2024, 2).unwrap().day_count(), Some(29));
        assert_eq!(YearMonth::new(2026, 2).unwrap().day_count(), Some(28));
        assert_eq!(YearMonth::new(2000, 2).unwrap().day_count(), Some(29));
        assert_eq!(YearMonth::new(1900, 2).unwrap().day_count(), Some(28));
        assert_eq!(YearMonth::new(2026, 4).unwrap().day_count(), Some(30));
        assert_eq!(YearMonth::new(2026, 12).unwrap().day_count(), Some(31));
    }

    #[test]
    fn test_days_cover_month() {
        let days = YearMonth::new(2024, 2).unwrap().days();
        assert_eq!(days.len(), 29);
        assert_eq!(days[0], NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(days[28], NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_ordering_by_year_then_month() {
        let dec = YearMonth::new(2025, 12).unwrap();
        let jan = YearMonth::new(2026, 1).unwrap();
        assert!(dec < jan);
        assert!(dec.key() < jan.key());
        assert!(jan.includes(2026, 1));
        assert!(jan.includes(2027, 1));
        assert!(!jan.includes(2025, 12));
    }

    #[test]
    fn test_navigation() {
        let dec = YearMonth::new(2025, 12).unwrap();
        assert_eq!(dec.next(), YearMonth::new(2026, 1).unwrap());
        assert_eq!(dec.next().prev(), dec);
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            YearMonth::parse("2026-06").unwrap(),
            YearMonth::new(2026, 6).unwrap()
        );
        assert_eq!(
            YearMonth::parse("2026/6").unwrap(),
            YearMonth::new(2026, 6).unwrap()
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(
            YearMonth::parse("2026-13"),
            Err(PeriodParseError::InvalidMonth(13))
        ));
        assert!(YearMonth::parse("June 2026").is_err());
        assert!(YearMonth::parse("26-06").is_err());
        assert!(YearMonth::parse("2026-").is_err());
        assert!(YearMonth::parse("2026-06-01").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(YearMonth::new(2026, 3).unwrap().to_string(), "2026-03");
    }
}
