//! Service layer for spendlens
//!
//! Statement loading and categorization, plus the services that validate,
//! persist and audit edits to the category and budget stores. The dashboard
//! service is the single facade over all of it.

pub mod budget;
pub mod categorize;
pub mod category;
pub mod dashboard;
pub mod import;
pub mod table;

pub use budget::BudgetService;
pub use categorize::categorize;
pub use category::CategoryService;
pub use dashboard::{BudgetEdit, BudgetSnapshot, BudgetTarget, CategoryEdit, DashboardService};
pub use import::{load_statement, LoadedStatement, SkippedRow, StatementLoader};
