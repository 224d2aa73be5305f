//! Core data models for spendlens
//!
//! This module contains the data structures of the statement pipeline:
//! transactions, category keyword rules, monthly budgets, and the money and
//! month value types they are built from.

pub mod budget;
pub mod category;
pub mod money;
pub mod month;
pub mod transaction;

pub use budget::{Budget, DefaultBudget};
pub use category::{CategoryRule, UNCATEGORIZED};
pub use money::Money;
pub use month::Month;
pub use transaction::{CategorizedTransaction, Direction, Transaction};
