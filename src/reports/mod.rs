//! Reports for the household ledger
//!
//! - Month and year cost summaries
//! - Budget-vs-actual overview of a month

pub mod budget_overview;
pub mod summary;

pub use budget_overview::{BudgetLine, BudgetStatus, MonthBudgetOverview};
pub use summary::{
    summarize_month, summarize_year, summarize_year_by_month, MonthSummary, YearReport,
};
