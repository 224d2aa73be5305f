//! CSV Export functionality
//!
//! Writes categorized transactions and summary rows as CSV.

use std::io::Write;

use crate::error::{SpendError, SpendResult};
use crate::models::CategorizedTransaction;
use crate::reports::{BudgetComparison, SummaryRow};

fn export_error(e: csv::Error) -> SpendError {
    SpendError::Export(e.to_string())
}

/// Export categorized transactions, one row per transaction
pub fn export_transactions_csv<W: Write>(
    transactions: &[CategorizedTransaction],
    writer: W,
) -> SpendResult<()> {
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record(["Row", "Date", "Description", "Amount", "Direction", "Category"])
        .map_err(export_error)?;

    for txn in transactions {
        let t = &txn.transaction;
        csv.write_record([
            t.row.to_string(),
            t.date.format("%Y-%m-%d").to_string(),
            t.description.clone(),
            t.amount.to_string(),
            t.direction.to_string(),
            txn.category.clone(),
        ])
        .map_err(export_error)?;
    }

    csv.flush()
        .map_err(|e| SpendError::Export(e.to_string()))?;
    Ok(())
}

/// Export summary rows joined with their budget comparison
///
/// `comparison` must be the comparison computed from `summary`; rows are
/// matched by position.
pub fn export_summary_csv<W: Write>(
    summary: &[SummaryRow],
    comparison: &[BudgetComparison],
    writer: W,
) -> SpendResult<()> {
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record([
        "Month",
        "Category",
        "Debit",
        "Credit",
        "Transactions",
        "Budget",
        "Delta",
    ])
    .map_err(export_error)?;

    for (row, cmp) in summary.iter().zip(comparison) {
        csv.write_record([
            row.month.to_string(),
            row.category.clone(),
            row.total_debit.to_string(),
            row.total_credit.to_string(),
            row.transaction_count.to_string(),
            cmp.target.map(|t| t.to_string()).unwrap_or_default(),
            cmp.delta.map(|d| d.to_string()).unwrap_or_default(),
        ])
        .map_err(export_error)?;
    }

    csv.flush()
        .map_err(|e| SpendError::Export(e.to_string()))?;
    Ok(())
}
