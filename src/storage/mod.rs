//! Storage layer for spendlens
//!
//! Provides the two persistent stores (category rules and budgets) as JSON
//! files with atomic whole-file writes, plus the audit log every edit is
//! recorded in.

pub mod budgets;
pub mod categories;
pub mod file_io;

pub use budgets::BudgetRepository;
pub use categories::CategoryRepository;
pub use file_io::{read_json, write_json_atomic};

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::SpendPaths;
use crate::error::SpendError;

/// Wrap a failed save as a store write error naming the store
pub(crate) fn store_write_error(store: &'static str, e: SpendError) -> SpendError {
    let reason = match e {
        SpendError::Storage(msg) => msg,
        other => other.to_string(),
    };
    SpendError::StoreWrite { store, reason }
}

/// Main storage coordinator that provides access to both stores
pub struct Storage {
    paths: SpendPaths,
    pub categories: CategoryRepository,
    pub budgets: BudgetRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance, creating directories as needed
    pub fn new(paths: SpendPaths) -> Result<Self, SpendError> {
        paths.ensure_directories()?;

        Ok(Self {
            categories: CategoryRepository::new(paths.categories_file()),
            budgets: BudgetRepository::new(paths.budgets_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &SpendPaths {
        &self.paths
    }

    /// Load both stores from disk
    pub fn load_all(&self) -> Result<(), SpendError> {
        self.categories.load()?;
        self.budgets.load()?;
        Ok(())
    }

    /// Save both stores to disk
    pub fn save_all(&self) -> Result<(), SpendError> {
        self.categories.save()?;
        self.budgets.save()?;
        Ok(())
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Log a create operation to the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity: &T,
    ) -> Result<(), SpendError> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity))
    }

    /// Log an update operation to the audit log
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> Result<(), SpendError> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            before,
            after,
            diff_summary,
        ))
    }

    /// Log a delete operation to the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity: &T,
    ) -> Result<(), SpendError> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity))
    }
}
