//! Export module for spendlens
//!
//! - CSV: categorized transactions and summary rows (spreadsheet-compatible)
//! - JSON: the full dashboard view for other tools

pub mod csv;
pub mod json;

pub use csv::{export_summary_csv, export_transactions_csv};
pub use json::{export_dashboard_json, DashboardExport, EXPORT_SCHEMA_VERSION};
