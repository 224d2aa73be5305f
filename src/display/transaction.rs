//! Transaction display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::CategorizedTransaction;

use super::report::truncate;

#[derive(Tabled)]
struct TransactionTableRow {
    #[tabled(rename = "Row")]
    row: usize,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Dir")]
    direction: String,
    #[tabled(rename = "Category")]
    category: String,
}

/// Categorized transactions as a register table
pub fn format_transaction_table(transactions: &[CategorizedTransaction], symbol: &str) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let rows = transactions.iter().map(|txn| {
        let t = &txn.transaction;
        TransactionTableRow {
            row: t.row,
            date: t.date.format("%Y-%m-%d").to_string(),
            description: truncate(&t.description, 40),
            amount: t.amount.format_with_symbol(symbol),
            direction: if t.direction.is_debit() { "DR" } else { "CR" }.to_string(),
            category: txn.category.clone(),
        }
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}
