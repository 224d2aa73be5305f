//! JSON Export functionality
//!
//! Exports the dashboard view with schema versioning.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{SpendError, SpendResult};
use crate::reports::{DashboardView, DateFilter};
use crate::services::SkippedRow;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Dashboard export structure
#[derive(Debug, Clone, Serialize)]
pub struct DashboardExport<'a> {
    /// Schema version for compatibility checking
    pub schema_version: &'static str,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: &'static str,

    pub filter: DateFilter,

    /// Rows of the statement that were not loaded
    pub skipped: &'a [SkippedRow],

    #[serde(flatten)]
    pub view: &'a DashboardView,
}

impl<'a> DashboardExport<'a> {
    pub fn new(view: &'a DashboardView, filter: DateFilter, skipped: &'a [SkippedRow]) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION,
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION"),
            filter,
            skipped,
            view,
        }
    }
}

/// Write the export as pretty-printed JSON
pub fn export_dashboard_json<W: Write>(export: &DashboardExport<'_>, writer: W) -> SpendResult<()> {
    serde_json::to_writer_pretty(writer, export)
        .map_err(|e| SpendError::Export(format!("Failed to write JSON: {}", e)))
}
