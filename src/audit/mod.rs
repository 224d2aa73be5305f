//! Audit logging for store edits
//!
//! Every change to a category rule or budget target is appended to an
//! append-only JSON-lines log with before/after values, so edits made from
//! the dashboard can be reviewed later with `spendlens history`.
//!
//! - `AuditEntry`: one operation on one store entity.
//! - `AuditLogger`: appends entries to, and reads them back from, the log file.

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
