//! Budget display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::services::BudgetSnapshot;

#[derive(Tabled)]
struct BudgetTableRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Target")]
    target: String,
}

/// Defaults first, then month-specific targets, each ordered by category
pub fn format_budget_list(snapshot: &BudgetSnapshot, symbol: &str) -> String {
    if snapshot.monthly.is_empty() && snapshot.defaults.is_empty() {
        return "No budgets set.\n\nSet one with 'spendlens budget set <CATEGORY> <AMOUNT> [--month YYYY-MM]'."
            .to_string();
    }

    let defaults = snapshot.defaults.iter().map(|b| BudgetTableRow {
        category: b.category_name.clone(),
        month: "default".to_string(),
        target: b.target_amount.format_with_symbol(symbol),
    });
    let monthly = snapshot.monthly.iter().map(|b| BudgetTableRow {
        category: b.category_name.clone(),
        month: b.month.to_string(),
        target: b.target_amount.format_with_symbol(symbol),
    });

    let mut table = Table::new(defaults.chain(monthly));
    table.with(Style::rounded());
    table.to_string()
}
