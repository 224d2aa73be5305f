//! Report formatting for terminal output
//!
//! Renders the dashboard view: summary and budget tables, plus text bar
//! charts standing in for the category pie and the monthly bar chart.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Money;
use crate::reports::{BudgetComparison, CategoryTotal, DashboardView, MonthlyTotal, SummaryRow};
use crate::services::SkippedRow;

/// Format a percentage with appropriate precision
pub fn format_percentage(pct: f64) -> String {
    if pct < 0.1 && pct > 0.0 {
        format!("{:.2}%", pct)
    } else if pct < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Create a simple bar chart representation
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return " ".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Truncate a string to a maximum number of characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

#[derive(Tabled)]
struct SummaryTableRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Debit")]
    debit: String,
    #[tabled(rename = "Credit")]
    credit: String,
    #[tabled(rename = "Txns")]
    count: usize,
}

#[derive(Tabled)]
struct ComparisonTableRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Actual")]
    actual: String,
    #[tabled(rename = "Budget")]
    target: String,
    #[tabled(rename = "Delta")]
    delta: String,
    #[tabled(rename = "Used")]
    used: String,
}

/// Summary rows as a table
pub fn format_summary_table(summary: &[SummaryRow], symbol: &str) -> String {
    let rows = summary.iter().map(|row| SummaryTableRow {
        month: row.month.to_string(),
        category: row.category.clone(),
        debit: row.total_debit.format_with_symbol(symbol),
        credit: row.total_credit.format_with_symbol(symbol),
        count: row.transaction_count,
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// Budget comparison as a table; missing budgets show as "-"
pub fn format_comparison_table(comparison: &[BudgetComparison], symbol: &str) -> String {
    let rows = comparison.iter().map(|cmp| ComparisonTableRow {
        month: cmp.month.to_string(),
        category: cmp.category.clone(),
        actual: cmp.actual.format_with_symbol(symbol),
        target: cmp
            .target
            .map(|t| t.format_with_symbol(symbol))
            .unwrap_or_else(|| "-".to_string()),
        delta: cmp
            .delta
            .map(|d| format_delta(d, symbol))
            .unwrap_or_else(|| "-".to_string()),
        used: cmp
            .percent_used()
            .map(format_percentage)
            .unwrap_or_else(|| "-".to_string()),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

fn format_delta(delta: Money, symbol: &str) -> String {
    if delta.is_positive() {
        format!("+{} over", delta.format_with_symbol(symbol))
    } else {
        format!("{} left", delta.abs().format_with_symbol(symbol))
    }
}

/// Category spending as horizontal bars with share of total
pub fn format_category_chart(totals: &[CategoryTotal], symbol: &str, width: usize) -> String {
    let max = totals
        .iter()
        .map(|t| t.total.cents())
        .max()
        .unwrap_or(0) as f64;
    let name_width = totals
        .iter()
        .map(|t| t.category.chars().count())
        .max()
        .unwrap_or(0)
        .min(24);

    let mut output = String::new();
    for total in totals {
        output.push_str(&format!(
            "{:<name_width$}  {}  {:>12}  {:>5}\n",
            truncate(&total.category, 24),
            format_bar(total.total.cents() as f64, max, width),
            total.total.format_with_symbol(symbol),
            format_percentage(total.percentage),
            name_width = name_width
        ));
    }
    output
}

/// Monthly spending as bars, one block per month
pub fn format_monthly_chart(trend: &[MonthlyTotal], symbol: &str, width: usize) -> String {
    let max = trend.iter().map(|t| t.total.cents()).max().unwrap_or(0) as f64;
    let name_width = trend
        .iter()
        .map(|t| t.category.chars().count())
        .max()
        .unwrap_or(0)
        .min(24);

    let mut output = String::new();
    let mut current = None;
    for entry in trend {
        if current != Some(entry.month) {
            let month_total: Money = trend
                .iter()
                .filter(|t| t.month == entry.month)
                .map(|t| t.total)
                .sum();
            output.push_str(&format!(
                "{}  ({})\n",
                entry.month,
                month_total.format_with_symbol(symbol)
            ));
            current = Some(entry.month);
        }
        output.push_str(&format!(
            "  {:<name_width$}  {}  {:>12}\n",
            truncate(&entry.category, 24),
            format_bar(entry.total.cents() as f64, max, width),
            entry.total.format_with_symbol(symbol),
            name_width = name_width
        ));
    }
    output
}

/// Full dashboard for the terminal
pub fn format_dashboard(
    view: &DashboardView,
    skipped: &[SkippedRow],
    symbol: &str,
    chart_width: usize,
) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Transactions: {}   Debits: {}   Credits: {}\n",
        view.transactions.len(),
        view.total_debit.format_with_symbol(symbol),
        view.total_credit.format_with_symbol(symbol)
    ));
    if !skipped.is_empty() {
        output.push_str(&format!("{} rows skipped\n", skipped.len()));
    }

    if view.is_empty() {
        output.push_str("\nNo transactions in the selected range.\n");
        return output;
    }

    output.push_str("\nExpenses by Category\n");
    output.push_str(&separator(40));
    output.push('\n');
    if view.category_totals.is_empty() {
        output.push_str("No expenses.\n");
    } else {
        output.push_str(&format_category_chart(&view.category_totals, symbol, chart_width));
    }

    output.push_str("\nMonthly Expenses\n");
    output.push_str(&separator(40));
    output.push('\n');
    if view.monthly_trend.is_empty() {
        output.push_str("No expenses.\n");
    } else {
        output.push_str(&format_monthly_chart(&view.monthly_trend, symbol, chart_width));
    }

    output.push_str("\nSummary\n");
    output.push_str(&format_summary_table(&view.summary, symbol));
    output.push('\n');

    output.push_str("\nBudget vs Actual\n");
    output.push_str(&format_comparison_table(&view.budget_comparison, symbol));
    output.push('\n');

    output
}

/// One line per skipped statement row
pub fn format_skipped_rows(skipped: &[SkippedRow]) -> String {
    let mut output = String::new();
    for row in skipped {
        output.push_str(&format!("  row {}: {}\n", row.row, row.reason));
    }
    output
}
