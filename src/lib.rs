//! Household Ledger - household budgeting with fixed-cost templates
//!
//! This library provides the core functionality for the household ledger.
//! A year holds twelve months; each month holds daily food and going-out
//! spend, a snapshot of the fixed-cost templates, variable budget positions,
//! expense and income lines. Template changes propagate into stored months
//! from an effective month on, without touching what was already recorded.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (templates, months, years, expenses)
//! - `ledger`: Year/month factory, template propagation, normalization
//! - `storage`: Persistence contract with JSON file and in-memory backends
//! - `services`: Validated operations that persist and audit their changes
//! - `audit`: Audit logging system
//! - `backup`: Backup snapshots, retention and restore
//! - `reports`: Month and year summaries, budget overview
//! - `export`: CSV export of year summaries
//! - `cli`: Command handlers for the `household` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use household_ledger::config::{paths::LedgerPaths, settings::Settings};
//!
//! let paths = LedgerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod ledger;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::LedgerError;
