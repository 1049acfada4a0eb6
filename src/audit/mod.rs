//! Audit logging for the household ledger
//!
//! Every create, update and delete performed through the services is
//! recorded with before/after values in an append-only JSON-lines log.
//!
//! - `AuditEntry`: one log line with timestamp, operation, entity and
//!   optional before/after values.
//! - `AuditLogger`: appends entries to the log file and reads them back.
//! - `generate_diff`: top-level field diff used for update entries.
//!
//! Services never touch the logger directly; they go through
//! [`AuditRecorder::log_create`](crate::storage::AuditRecorder::log_create) and
//! friends, which backends without a log ignore.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
