//! Budget CLI commands
//!
//! Implements CLI commands for monthly and recurring budget targets.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_budget_list;
use crate::error::{SpendError, SpendResult};
use crate::models::{Money, Month};
use crate::services::{BudgetEdit, BudgetService, BudgetTarget, DashboardService};
use crate::storage::Storage;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// List default and monthly targets
    List,

    /// Set a target; without --month it becomes the default for every month
    Set {
        /// Category name
        category: String,
        /// Target amount (e.g., "200" or "1,250.50")
        amount: String,
        /// Month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Show the target for a category in a month
    Get {
        /// Category name
        category: String,
        /// Month (YYYY-MM)
        month: String,
    },

    /// Remove a target; without --month the default is removed
    Remove {
        /// Category name
        category: String,
        /// Month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BudgetCommands,
) -> SpendResult<()> {
    let dashboard = DashboardService::new(storage, settings);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        BudgetCommands::List => {
            let snapshot = dashboard.get_budgets()?;
            println!("{}", format_budget_list(&snapshot, symbol));
        }

        BudgetCommands::Set {
            category,
            amount,
            month,
        } => {
            let amount = parse_amount(&amount)?;
            let edit = match month {
                Some(month) => BudgetEdit::Set {
                    category,
                    month: parse_month(&month)?,
                    amount,
                },
                None => BudgetEdit::SetDefault { category, amount },
            };

            match dashboard.mutate_budget(edit)? {
                BudgetTarget::Monthly(b) => println!(
                    "Set budget for {} in {}: {}",
                    b.category_name,
                    b.month,
                    b.target_amount.format_with_symbol(symbol)
                ),
                BudgetTarget::Default(b) => println!(
                    "Set default budget for {}: {}",
                    b.category_name,
                    b.target_amount.format_with_symbol(symbol)
                ),
            }
        }

        BudgetCommands::Get { category, month } => {
            let month = parse_month(&month)?;
            let service = BudgetService::new(storage);

            match service.get_budget(&category, month)? {
                Some(target) => println!(
                    "{} {}: {}",
                    category,
                    month,
                    target.format_with_symbol(symbol)
                ),
                None => match service.default_budget(&category)? {
                    Some(target) => println!(
                        "{} {}: {} (default)",
                        category,
                        month,
                        target.format_with_symbol(symbol)
                    ),
                    None => println!("{} {}: no budget set", category, month),
                },
            }
        }

        BudgetCommands::Remove { category, month } => {
            let edit = match month {
                Some(month) => BudgetEdit::Remove {
                    category,
                    month: parse_month(&month)?,
                },
                None => BudgetEdit::RemoveDefault { category },
            };

            match dashboard.mutate_budget(edit)? {
                BudgetTarget::Monthly(b) => {
                    println!("Removed budget for {} in {}", b.category_name, b.month)
                }
                BudgetTarget::Default(b) => {
                    println!("Removed default budget for {}", b.category_name)
                }
            }
        }
    }

    Ok(())
}

fn parse_amount(s: &str) -> SpendResult<Money> {
    Money::parse(s).map_err(|e| SpendError::Validation(format!("Invalid amount: {}", e)))
}

fn parse_month(s: &str) -> SpendResult<Month> {
    s.parse()
        .map_err(|e| SpendError::Validation(format!("{}. Use YYYY-MM", e)))
}
