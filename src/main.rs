use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use spendlens::cli::{
    handle_budget_command, handle_category_command, handle_history_command,
    handle_report_command, handle_transactions_command,
};
use spendlens::config::{paths::SpendPaths, settings::Settings};
use spendlens::logging::init_tracing;
use spendlens::storage::Storage;

#[derive(Parser)]
#[command(
    name = "spendlens",
    version,
    about = "Categorize bank statements and track spending against budgets",
    long_about = "spendlens reads a bank statement (CSV or spreadsheet), assigns every \
                  transaction a category from your keyword rules, and shows spending \
                  per category and month next to your monthly budgets."
)]
struct Cli {
    /// Directory for rules, budgets and settings
    #[arg(long, global = true, env = "SPENDLENS_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the spending dashboard for a statement
    Report(spendlens::cli::ReportArgs),

    /// List the categorized transactions of a statement
    #[command(alias = "txn")]
    Transactions(spendlens::cli::TransactionsArgs),

    /// Category rule management commands
    #[command(subcommand)]
    Category(spendlens::cli::CategoryCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(spendlens::cli::BudgetCommands),

    /// Show recent changes to categories and budgets
    History {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Initialize paths and settings
    let paths = match cli.data_dir {
        Some(dir) => SpendPaths::with_base_dir(dir),
        None => SpendPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Report(args)) => {
            handle_report_command(&storage, &settings, args)?;
        }
        Some(Commands::Transactions(args)) => {
            handle_transactions_command(&storage, &settings, args)?;
        }
        Some(Commands::Category(cmd)) => {
            handle_category_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Budget(cmd)) => {
            handle_budget_command(&storage, &settings, cmd)?;
        }
        Some(Commands::History { limit }) => {
            handle_history_command(&storage, limit)?;
        }
        Some(Commands::Config) => {
            println!("spendlens Configuration");
            println!("=======================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Data directory:  {}", paths.data_dir().display());
            println!("Settings file:   {}", paths.settings_file().display());
            println!("Audit log:       {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Day-first dates: {}", settings.day_first);
            println!("  Chart width:     {}", settings.chart_width);
        }
        None => {
            println!("spendlens - statement categorizer and spending dashboard");
            println!();
            println!("Run 'spendlens --help' for usage information.");
            println!("Run 'spendlens report <FILE>' to analyse a statement.");
        }
    }

    Ok(())
}
