//! Export functionality
//!
//! Year summaries as CSV. Full-state JSON export lives with the backups.

pub mod csv;

pub use self::csv::export_year_summary_csv;
