//! Display formatting for terminal output
//!
//! Provides utilities for formatting rules, budgets, transactions and the
//! dashboard for terminal display, as tables and text bar charts.

pub mod budget;
pub mod category;
pub mod report;
pub mod transaction;

pub use budget::format_budget_list;
pub use category::{format_category_details, format_category_list};
pub use report::{format_dashboard, format_skipped_rows};
pub use transaction::format_transaction_table;
