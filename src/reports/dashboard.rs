//! Dashboard view model
//!
//! `render_state` runs the whole pipeline (categorize, aggregate, compare)
//! over a set of transactions and returns everything the charts and tables
//! need. It is pure and is re-run after every edit.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{SpendError, SpendResult};
use crate::models::{Budget, CategorizedTransaction, CategoryRule, Money, Month, Transaction};
use crate::services::categorize::categorize;

use super::budget_comparison::{compare_to_budget, BudgetComparison};
use super::summary::{
    aggregate, category_totals, credit_total, debit_total, monthly_trend, CategoryTotal,
    MonthlyTotal, SummaryRow,
};

/// Inclusive date range applied before rendering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateFilter {
    /// No filtering
    pub fn all() -> Self {
        Self::default()
    }

    /// Dates between `start` and `end`, either side open when `None`
    pub fn between(start: Option<NaiveDate>, end: Option<NaiveDate>) -> SpendResult<Self> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(SpendError::Validation(format!(
                    "Start date {} is after end date {}",
                    s, e
                )));
            }
        }
        Ok(Self { start, end })
    }

    /// A single calendar month
    pub fn month(month: Month) -> Self {
        Self {
            start: Some(month.start_date()),
            end: Some(month.end_date()),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }

    /// Transactions within the range, in their original order
    pub fn apply(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        transactions
            .iter()
            .filter(|t| self.contains(t.date))
            .cloned()
            .collect()
    }
}

/// Everything the presentation layer renders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub transactions: Vec<CategorizedTransaction>,
    pub summary: Vec<SummaryRow>,
    pub budget_comparison: Vec<BudgetComparison>,
    /// Pie chart feed
    pub category_totals: Vec<CategoryTotal>,
    /// Bar chart feed
    pub monthly_trend: Vec<MonthlyTotal>,
    pub total_debit: Money,
    pub total_credit: Money,
}

impl DashboardView {
    /// Months present in the summary, ascending
    pub fn months(&self) -> Vec<Month> {
        summary_months(&self.summary)
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// Run the full pipeline over `transactions`
pub fn render_state(
    transactions: &[Transaction],
    rules: &[CategoryRule],
    budgets: &[Budget],
) -> DashboardView {
    let categorized = categorize(transactions, rules);
    let summary = aggregate(&categorized);
    let budget_comparison = compare_to_budget(&summary, budgets);

    DashboardView {
        category_totals: category_totals(&summary),
        monthly_trend: monthly_trend(&summary),
        total_debit: debit_total(&summary),
        total_credit: credit_total(&summary),
        transactions: categorized,
        summary,
        budget_comparison,
    }
}

/// Distinct months in summary order
pub fn summary_months(summary: &[SummaryRow]) -> Vec<Month> {
    let mut months: Vec<Month> = summary.iter().map(|row| row.month).collect();
    months.dedup();
    months
}
