//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod backup;
pub mod month;
pub mod summary;
pub mod template;
pub mod year;

pub use backup::{handle_backup_command, BackupCommands};
pub use month::{handle_month_command, MonthCommands};
pub use summary::{handle_summary_command, SummaryCommands};
pub use template::{handle_template_command, TemplateCommands};
pub use year::{handle_year_command, YearCommands};

use chrono::NaiveDate;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, YearMonth};

/// Parse an amount argument such as "12.50" or "900"
pub(crate) fn parse_amount(value: &str) -> LedgerResult<Money> {
    Money::parse(value).map_err(|e| LedgerError::Validation(e.to_string()))
}

pub(crate) fn parse_optional_amount(value: Option<&str>) -> LedgerResult<Option<Money>> {
    value.map(parse_amount).transpose()
}

/// Parse a `YYYY-MM` argument
pub(crate) fn parse_period(value: &str) -> LedgerResult<YearMonth> {
    YearMonth::parse(value).map_err(|e| LedgerError::Validation(e.to_string()))
}

/// Effective month of a template change; defaults to the current month
pub(crate) fn parse_effective(value: Option<&str>) -> LedgerResult<YearMonth> {
    value.map_or_else(|| Ok(YearMonth::current()), parse_period)
}

/// Parse a `YYYY-MM-DD` argument
pub(crate) fn parse_date(value: &str) -> LedgerResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| LedgerError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("12,50").unwrap(), Money::from_cents(1250));
        assert!(parse_amount("zwölf").unwrap_err().is_validation());
    }

    #[test]
    fn test_parse_effective_defaults_to_current() {
        assert_eq!(parse_effective(None).unwrap(), YearMonth::current());
        assert_eq!(
            parse_effective(Some("2026-04")).unwrap(),
            YearMonth::new(2026, 4).unwrap()
        );
        assert!(parse_effective(Some("2026-13")).is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2026-02-28").unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()
        );
        assert!(parse_date("2026-02-30").unwrap_err().is_validation());
    }
}
