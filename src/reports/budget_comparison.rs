//! Budget versus actual comparison
//!
//! Left-joins summary rows to budgets on (category, month). A row without a
//! budget reports no target and no delta, which is not the same as a zero
//! target.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{Budget, Money, Month};

use super::summary::SummaryRow;

/// Actual spending against the target for one category and month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetComparison {
    pub category: String,
    pub month: Month,
    /// Total debits
    pub actual: Money,
    pub target: Option<Money>,
    /// `actual - target`; positive means overspent
    pub delta: Option<Money>,
}

impl BudgetComparison {
    pub fn has_budget(&self) -> bool {
        self.target.is_some()
    }

    pub fn is_over_budget(&self) -> bool {
        self.delta.map(|d| d.is_positive()).unwrap_or(false)
    }

    /// Share of the target spent, if a non-zero target exists
    pub fn percent_used(&self) -> Option<f64> {
        self.target
            .filter(|t| !t.is_zero())
            .map(|t| self.actual.cents() as f64 / t.cents() as f64 * 100.0)
    }
}

/// Compare every summary row to its budget, keeping summary order
pub fn compare_to_budget(summary: &[SummaryRow], budgets: &[Budget]) -> Vec<BudgetComparison> {
    let targets: HashMap<(&str, Month), Money> = budgets
        .iter()
        .map(|b| ((b.category_name.as_str(), b.month), b.target_amount))
        .collect();

    summary
        .iter()
        .map(|row| {
            let actual = row.total_debit;
            let target = targets.get(&(row.category.as_str(), row.month)).copied();
            BudgetComparison {
                category: row.category.clone(),
                month: row.month,
                actual,
                target,
                delta: target.map(|t| actual - t),
            }
        })
        .collect()
}
