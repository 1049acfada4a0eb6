//! Service layer for the household ledger
//!
//! Services sit between the CLI and the ledger core: they validate input,
//! apply changes to the [`LedgerState`](crate::ledger::LedgerState), persist
//! what changed through the [`LedgerStore`](crate::storage::LedgerStore) and
//! record audit entries.

pub mod backup;
pub mod month;
pub mod template;
pub mod year;

pub use backup::BackupService;
pub use month::{MonthService, PositionUpdate};
pub use template::TemplateService;
pub use year::YearService;
