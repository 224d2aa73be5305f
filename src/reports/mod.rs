//! Reports module for spendlens
//!
//! The aggregation half of the pipeline: summary rows per category and
//! month, budget comparison, chart feeds, and the dashboard view model that
//! ties them together.

pub mod budget_comparison;
pub mod dashboard;
pub mod summary;

pub use budget_comparison::{compare_to_budget, BudgetComparison};
pub use dashboard::{render_state, summary_months, DashboardView, DateFilter};
pub use summary::{aggregate, category_totals, monthly_trend, CategoryTotal, MonthlyTotal, SummaryRow};
