//! Summary aggregation
//!
//! Groups categorized transactions into per-category, per-month totals and
//! derives the chart feeds (category share and monthly trend) from them.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{CategorizedTransaction, Direction, Money, Month};

/// Debit and credit totals for one category in one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub category: String,
    pub month: Month,
    pub total_debit: Money,
    pub total_credit: Money,
    pub transaction_count: usize,
}

impl SummaryRow {
    fn new(category: &str, month: Month) -> Self {
        Self {
            category: category.to_string(),
            month,
            total_debit: Money::zero(),
            total_credit: Money::zero(),
            transaction_count: 0,
        }
    }

    /// Credits minus debits
    pub fn net(&self) -> Money {
        self.total_credit - self.total_debit
    }
}

/// Spending in one category across the whole range (pie chart feed)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Money,
    pub transaction_count: usize,
    /// Share of all spending, 0-100
    pub percentage: f64,
}

/// Spending in one category in one month (bar chart feed)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTotal {
    pub month: Month,
    pub category: String,
    pub total: Money,
}

/// Group transactions by (category, month)
///
/// Rows are ordered by month, then category name. Debits and credits are
/// accumulated separately and never net against each other.
pub fn aggregate(categorized: &[CategorizedTransaction]) -> Vec<SummaryRow> {
    let mut groups: BTreeMap<(Month, &str), SummaryRow> = BTreeMap::new();

    for txn in categorized {
        let month = txn.month();
        let row = groups
            .entry((month, txn.category.as_str()))
            .or_insert_with(|| SummaryRow::new(&txn.category, month));

        match txn.transaction.direction {
            Direction::Debit => row.total_debit += txn.transaction.amount,
            Direction::Credit => row.total_credit += txn.transaction.amount,
        }
        row.transaction_count += 1;
    }

    groups.into_values().collect()
}

/// Debit totals per category over all months, largest first
pub fn category_totals(summary: &[SummaryRow]) -> Vec<CategoryTotal> {
    let mut by_category: BTreeMap<&str, (Money, usize)> = BTreeMap::new();
    for row in summary.iter().filter(|r| !r.total_debit.is_zero()) {
        let entry = by_category
            .entry(row.category.as_str())
            .or_insert((Money::zero(), 0));
        entry.0 += row.total_debit;
        entry.1 += row.transaction_count;
    }

    let grand_total: Money = by_category.values().map(|(total, _)| *total).sum();

    let mut totals: Vec<CategoryTotal> = by_category
        .into_iter()
        .map(|(category, (total, transaction_count))| CategoryTotal {
            category: category.to_string(),
            total,
            transaction_count,
            percentage: percentage_of(total, grand_total),
        })
        .collect();

    // Stable sort keeps name order for equal totals
    totals.sort_by(|a, b| b.total.cmp(&a.total));
    totals
}

/// Debit totals per month and category, ordered by month then category
pub fn monthly_trend(summary: &[SummaryRow]) -> Vec<MonthlyTotal> {
    summary
        .iter()
        .filter(|row| !row.total_debit.is_zero())
        .map(|row| MonthlyTotal {
            month: row.month,
            category: row.category.clone(),
            total: row.total_debit,
        })
        .collect()
}

/// Sum of all debits in the summary
pub fn debit_total(summary: &[SummaryRow]) -> Money {
    summary.iter().map(|row| row.total_debit).sum()
}

/// Sum of all credits in the summary
pub fn credit_total(summary: &[SummaryRow]) -> Money {
    summary.iter().map(|row| row.total_credit).sum()
}

fn percentage_of(part: Money, whole: Money) -> f64 {
    if whole.is_zero() {
        0.0
    } else {
        (part.cents() as f64 / whole.cents() as f64) * 100.0
    }
}
