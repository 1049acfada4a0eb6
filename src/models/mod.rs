//! Core data models for the household ledger
//!
//! This module contains the data structures of the budgeting domain: fixed
//! cost templates and their monthly snapshots, variable budget positions,
//! expense lines, day entries, months and years.

pub mod backup;
pub mod expense;
pub mod ids;
pub mod money;
pub mod month;
pub mod period;
pub mod position;
pub mod template;
pub mod year;

pub use backup::BackupPayload;
pub use expense::{ExpenseEntry, ExpenseKind, VARIABLE_EXPENSE_THRESHOLD};
pub use ids::{ExpenseId, FixedCostId, PositionId, TemplateId};
pub use money::Money;
pub use month::{DayEntry, ExpenseBucket, MonthRecord};
pub use period::YearMonth;
pub use position::VariableBudgetPosition;
pub use template::{lookup_template, FixedCostEntry, FixedCostTemplate};
pub use year::{YearRecord, YearShapeError, YEAR_RANGE};
