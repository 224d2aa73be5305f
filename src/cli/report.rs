//! CLI commands for statement reports
//!
//! Loads a statement, runs it through the current rules and budgets, and
//! prints the dashboard, the transaction register, or a JSON/CSV export.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Args, ValueEnum};

use crate::config::settings::Settings;
use crate::display::{format_dashboard, format_skipped_rows, format_transaction_table};
use crate::error::{SpendError, SpendResult};
use crate::export::{export_dashboard_json, export_transactions_csv, DashboardExport};
use crate::models::{Direction, Month};
use crate::reports::DateFilter;
use crate::services::DashboardService;
use crate::storage::Storage;

/// Arguments for `report`
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Statement file (.csv, .xlsx, .xls, .ods)
    pub file: PathBuf,

    /// Only include one month (YYYY-MM)
    #[arg(short, long, conflicts_with_all = ["start", "end"])]
    pub month: Option<String>,

    /// Start date, inclusive (YYYY-MM-DD)
    #[arg(short, long)]
    pub start: Option<String>,

    /// End date, inclusive (YYYY-MM-DD)
    #[arg(short, long)]
    pub end: Option<String>,

    /// Print the dashboard as JSON
    #[arg(long)]
    pub json: bool,

    /// Also write the categorized transactions to a CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Direction filter for `transactions`
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectionArg {
    Debit,
    Credit,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Debit => Direction::Debit,
            DirectionArg::Credit => Direction::Credit,
        }
    }
}

/// Arguments for `transactions`
#[derive(Args, Debug)]
pub struct TransactionsArgs {
    /// Statement file (.csv, .xlsx, .xls, .ods)
    pub file: PathBuf,

    /// Only debits or only credits
    #[arg(short, long, value_enum)]
    pub direction: Option<DirectionArg>,

    /// Only transactions in this category (case-insensitive)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Show at most N transactions
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Handle `report`
pub fn handle_report_command(storage: &Storage, settings: &Settings, args: ReportArgs) -> SpendResult<()> {
    let service = DashboardService::new(storage, settings);
    let filter = build_filter(args.month.as_deref(), args.start.as_deref(), args.end.as_deref())?;

    let loaded = service.load_statement(&args.file)?;
    let view = service.render(&loaded.transactions, &filter)?;

    if let Some(path) = &args.output {
        let file = create_file(path)?;
        export_transactions_csv(&view.transactions, BufWriter::new(file))?;
        eprintln!("Transactions exported to: {}", path.display());
    }

    if args.json {
        let export = DashboardExport::new(&view, filter, &loaded.skipped);
        export_dashboard_json(&export, std::io::stdout().lock())?;
        println!();
        return Ok(());
    }

    print!(
        "{}",
        format_dashboard(
            &view,
            &loaded.skipped,
            &settings.currency_symbol,
            settings.chart_width
        )
    );
    if !loaded.skipped.is_empty() {
        println!("\nSkipped rows:");
        print!("{}", format_skipped_rows(&loaded.skipped));
    }

    Ok(())
}

/// Handle `transactions`
pub fn handle_transactions_command(
    storage: &Storage,
    settings: &Settings,
    args: TransactionsArgs,
) -> SpendResult<()> {
    let service = DashboardService::new(storage, settings);
    let loaded = service.load_statement(&args.file)?;
    let view = service.render(&loaded.transactions, &DateFilter::all())?;

    let direction = args.direction.map(Direction::from);
    let category = args.category.as_deref().map(str::to_lowercase);

    let selected: Vec<_> = view
        .transactions
        .into_iter()
        .filter(|t| direction.map_or(true, |d| t.transaction.direction == d))
        .filter(|t| {
            category
                .as_deref()
                .map_or(true, |c| t.category.to_lowercase() == c)
        })
        .take(args.limit.unwrap_or(usize::MAX))
        .collect();

    print!("{}", format_transaction_table(&selected, &settings.currency_symbol));
    println!();
    println!("{} transactions shown", selected.len());
    if !loaded.skipped.is_empty() {
        println!("{} rows skipped", loaded.skipped.len());
    }

    Ok(())
}

/// Build a date filter from `--month` or `--start/--end`
pub fn build_filter(month: Option<&str>, start: Option<&str>, end: Option<&str>) -> SpendResult<DateFilter> {
    if let Some(month) = month {
        let month: Month = month
            .parse()
            .map_err(|e| SpendError::Validation(format!("{}. Use YYYY-MM", e)))?;
        return Ok(DateFilter::month(month));
    }

    let start = start.map(|s| parse_cli_date(s, "start")).transpose()?;
    let end = end.map(|s| parse_cli_date(s, "end")).transpose()?;
    DateFilter::between(start, end)
}

fn parse_cli_date(s: &str, which: &str) -> SpendResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
        SpendError::Validation(format!(
            "Invalid {} date format: {}. Use YYYY-MM-DD",
            which, s
        ))
    })
}

fn create_file(path: &Path) -> SpendResult<File> {
    File::create(path).map_err(|e| {
        SpendError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_month() {
        let filter = build_filter(Some("2024-02"), None, None).unwrap();
        assert_eq!(filter.start, NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(filter.end, NaiveDate::from_ymd_opt(2024, 2, 29));
    }

    #[test]
    fn test_build_filter_range() {
        let filter = build_filter(None, Some("2024-01-10"), None).unwrap();
        assert_eq!(filter.start, NaiveDate::from_ymd_opt(2024, 1, 10));
        assert_eq!(filter.end, None);

        assert!(build_filter(None, None, None).unwrap().is_unbounded());
    }

    #[test]
    fn test_build_filter_rejects_bad_input() {
        assert!(build_filter(Some("Feb"), None, None).unwrap_err().is_validation());
        assert!(build_filter(None, Some("10/01/2024"), None)
            .unwrap_err()
            .is_validation());
        assert!(build_filter(None, Some("2024-02-01"), Some("2024-01-01"))
            .unwrap_err()
            .is_validation());
    }
}
