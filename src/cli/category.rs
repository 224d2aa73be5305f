//! Category CLI commands
//!
//! Implements CLI commands for keyword rule management.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::category::{format_category_details, format_category_list};
use crate::error::{SpendError, SpendResult};
use crate::services::{CategoryEdit, CategoryService, DashboardService};
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List all categories in match order
    List,

    /// Show one category and its keywords
    Show {
        /// Category name
        name: String,
    },

    /// Create a new category at the end of the match order
    Add {
        /// Category name
        name: String,
        /// Keyword to match in descriptions (repeatable)
        #[arg(short = 'k', long = "keyword")]
        keywords: Vec<String>,
    },

    /// Replace all keywords of a category
    #[command(name = "set-keywords")]
    SetKeywords {
        /// Category name
        name: String,
        /// New keyword set (may be empty)
        keywords: Vec<String>,
    },

    /// Add one keyword to a category
    #[command(name = "add-keyword")]
    AddKeyword {
        /// Category name
        name: String,
        /// Keyword to add
        keyword: String,
    },

    /// Remove one keyword from a category
    #[command(name = "remove-keyword")]
    RemoveKeyword {
        /// Category name
        name: String,
        /// Keyword to remove
        keyword: String,
    },

    /// Delete a category (its budgets are kept)
    Remove {
        /// Category name
        name: String,
    },
}

/// Handle a category command
pub fn handle_category_command(
    storage: &Storage,
    settings: &Settings,
    cmd: CategoryCommands,
) -> SpendResult<()> {
    let dashboard = DashboardService::new(storage, settings);

    match cmd {
        CategoryCommands::List => {
            let rules = dashboard.get_categories()?;
            println!("{}", format_category_list(&rules));
        }

        CategoryCommands::Show { name } => {
            let rule = CategoryService::new(storage)
                .get_category(&name)?
                .ok_or_else(|| SpendError::category_not_found(&name))?;
            print!("{}", format_category_details(&rule));
        }

        CategoryCommands::Add { name, keywords } => {
            let rule = dashboard.mutate_category(CategoryEdit::Add { name, keywords })?;
            println!("Created category: {}", rule.name);
            if !rule.keywords.is_empty() {
                println!("  Keywords: {}", rule.keywords.join(", "));
            }
        }

        CategoryCommands::SetKeywords { name, keywords } => {
            let rule = dashboard.mutate_category(CategoryEdit::SetKeywords { name, keywords })?;
            println!("Updated category: {}", rule.name);
            println!("  Keywords: {}", rule.keywords.join(", "));
        }

        CategoryCommands::AddKeyword { name, keyword } => {
            let rule = dashboard.mutate_category(CategoryEdit::AddKeyword { name, keyword })?;
            println!("Updated category: {}", rule.name);
            println!("  Keywords: {}", rule.keywords.join(", "));
        }

        CategoryCommands::RemoveKeyword { name, keyword } => {
            let rule = dashboard.mutate_category(CategoryEdit::RemoveKeyword { name, keyword })?;
            println!("Updated category: {}", rule.name);
            println!("  Keywords: {}", rule.keywords.join(", "));
        }

        CategoryCommands::Remove { name } => {
            let rule = dashboard.mutate_category(CategoryEdit::Remove { name })?;
            println!("Removed category: {}", rule.name);
        }
    }

    Ok(())
}
