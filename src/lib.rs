//! spendlens - bank statement categorizer and spending dashboard
//!
//! Loads a bank statement (CSV or spreadsheet), assigns each transaction a
//! category from an ordered list of keyword rules, and summarizes spending
//! per category and month against user-defined monthly budgets.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (transactions, category rules, budgets)
//! - `storage`: JSON file storage for rules and budgets
//! - `services`: Statement loading, categorization and store edits
//! - `reports`: Summary, budget comparison and dashboard views
//! - `audit`: Audit log of store edits
//! - `export`: CSV and JSON export
//! - `display`, `cli`: Terminal presentation
//!
//! # Example
//!
//! ```rust,ignore
//! use spendlens::config::{paths::SpendPaths, settings::Settings};
//! use spendlens::services::DashboardService;
//! use spendlens::reports::DateFilter;
//!
//! let paths = SpendPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = spendlens::storage::Storage::new(paths)?;
//! storage.load_all()?;
//!
//! let dashboard = DashboardService::new(&storage, &settings);
//! let loaded = dashboard.load_statement("statement.csv".as_ref())?;
//! let view = dashboard.render(&loaded.transactions, &DateFilter::all())?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{SpendError, SpendResult};
