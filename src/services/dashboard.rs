//! Dashboard service
//!
//! The facade a presentation layer talks to: load a statement, read and edit
//! the two stores, and compute the summary, comparison and full dashboard
//! view from the current store state.

use std::path::Path;

use serde::Serialize;

use crate::config::Settings;
use crate::error::SpendResult;
use crate::models::{Budget, CategoryRule, DefaultBudget, Money, Month, Transaction};
use crate::reports::{
    aggregate, compare_to_budget, render_state, summary_months, BudgetComparison, DashboardView,
    DateFilter, SummaryRow,
};
use crate::storage::Storage;

use super::budget::BudgetService;
use super::categorize::categorize;
use super::category::CategoryService;
use super::import::{LoadedStatement, StatementLoader};

/// An edit to the category store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryEdit {
    Add { name: String, keywords: Vec<String> },
    SetKeywords { name: String, keywords: Vec<String> },
    AddKeyword { name: String, keyword: String },
    RemoveKeyword { name: String, keyword: String },
    Remove { name: String },
}

/// An edit to the budget store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetEdit {
    Set {
        category: String,
        month: Month,
        amount: Money,
    },
    Remove {
        category: String,
        month: Month,
    },
    SetDefault {
        category: String,
        amount: Money,
    },
    RemoveDefault {
        category: String,
    },
}

/// The target touched by a budget edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BudgetTarget {
    Monthly(Budget),
    Default(DefaultBudget),
}

/// Current contents of the budget store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BudgetSnapshot {
    pub monthly: Vec<Budget>,
    pub defaults: Vec<DefaultBudget>,
}

/// Facade over the stores and the pipeline
pub struct DashboardService<'a> {
    storage: &'a Storage,
    loader: StatementLoader,
}

impl<'a> DashboardService<'a> {
    pub fn new(storage: &'a Storage, settings: &Settings) -> Self {
        Self {
            storage,
            loader: StatementLoader::new(settings.day_first),
        }
    }

    /// Parse a statement file; nothing is stored
    pub fn load_statement(&self, path: &Path) -> SpendResult<LoadedStatement> {
        self.loader.load(path)
    }

    /// Category rules in match order
    pub fn get_categories(&self) -> SpendResult<Vec<CategoryRule>> {
        CategoryService::new(self.storage).list_categories()
    }

    /// Apply and persist a category edit, returning the affected rule
    pub fn mutate_category(&self, edit: CategoryEdit) -> SpendResult<CategoryRule> {
        let service = CategoryService::new(self.storage);
        match edit {
            CategoryEdit::Add { name, keywords } => service.add_category(&name, keywords),
            CategoryEdit::SetKeywords { name, keywords } => service.update_keywords(&name, keywords),
            CategoryEdit::AddKeyword { name, keyword } => service.add_keyword(&name, &keyword),
            CategoryEdit::RemoveKeyword { name, keyword } => service.remove_keyword(&name, &keyword),
            CategoryEdit::Remove { name } => service.remove_category(&name),
        }
    }

    /// Monthly and default targets
    pub fn get_budgets(&self) -> SpendResult<BudgetSnapshot> {
        let service = BudgetService::new(self.storage);
        Ok(BudgetSnapshot {
            monthly: service.list_budgets()?,
            defaults: service.list_default_budgets()?,
        })
    }

    /// Apply and persist a budget edit, returning the affected target
    pub fn mutate_budget(&self, edit: BudgetEdit) -> SpendResult<BudgetTarget> {
        let service = BudgetService::new(self.storage);
        match edit {
            BudgetEdit::Set {
                category,
                month,
                amount,
            } => service
                .set_budget(&category, month, amount)
                .map(BudgetTarget::Monthly),
            BudgetEdit::Remove { category, month } => service
                .remove_budget(&category, month)
                .map(BudgetTarget::Monthly),
            BudgetEdit::SetDefault { category, amount } => service
                .set_default_budget(&category, amount)
                .map(BudgetTarget::Default),
            BudgetEdit::RemoveDefault { category } => service
                .remove_default_budget(&category)
                .map(BudgetTarget::Default),
        }
    }

    /// Categorize with the current rules and aggregate
    pub fn compute_summary(&self, transactions: &[Transaction]) -> SpendResult<Vec<SummaryRow>> {
        let rules = self.get_categories()?;
        Ok(aggregate(&categorize(transactions, &rules)))
    }

    /// Compare summary rows to the targets in effect for their months
    pub fn compute_budget_comparison(
        &self,
        summary: &[SummaryRow],
    ) -> SpendResult<Vec<BudgetComparison>> {
        let budgets = BudgetService::new(self.storage).effective_budgets(&summary_months(summary))?;
        Ok(compare_to_budget(summary, &budgets))
    }

    /// Full dashboard for the transactions inside `filter`
    pub fn render(&self, transactions: &[Transaction], filter: &DateFilter) -> SpendResult<DashboardView> {
        let selected = filter.apply(transactions);

        let mut months: Vec<Month> = selected.iter().map(Transaction::month).collect();
        months.sort();
        months.dedup();

        let rules = self.get_categories()?;
        let budgets = BudgetService::new(self.storage).effective_budgets(&months)?;

        let view = render_state(&selected, &rules, &budgets);
        tracing::debug!(
            transactions = view.transactions.len(),
            summary_rows = view.summary.len(),
            "rendered dashboard"
        );
        Ok(view)
    }
}
