//! The ledger core
//!
//! - `factory`: builds calendar-correct years seeded from the templates
//! - `propagation`: forward-only template create/update/delete
//! - `normalize`: upgrades loaded or imported records
//! - `state`: the explicit application state the engines operate on

pub mod factory;
pub mod normalize;
pub mod propagation;
pub mod state;

pub use factory::{create_month, create_month_days, create_year};
pub use normalize::{normalize_month, normalize_years, NormalizationReport};
pub use propagation::{propagate_created, propagate_deleted, propagate_updated, PropagationOutcome};
pub use state::LedgerState;
