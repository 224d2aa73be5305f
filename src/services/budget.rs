//! Budget service
//!
//! Monthly and recurring spending targets. Category names are not checked
//! against the category store, but a name that matches an existing rule
//! case-insensitively is stored under the rule's spelling so comparisons
//! line up.

use crate::audit::EntityType;
use crate::error::SpendResult;
use crate::models::{Budget, DefaultBudget, Money, Month};
use crate::storage::Storage;

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

impl<'a> BudgetService<'a> {
    /// Create a new budget service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Set the target for a category in a month (last write wins)
    pub fn set_budget(&self, category_name: &str, month: Month, amount: Money) -> SpendResult<Budget> {
        let category_name = self.canonical_name(category_name)?;
        let previous = self
            .storage
            .budgets
            .set_budget(&category_name, month, amount)?;
        self.storage.budgets.save()?;

        let budget = Budget::new(category_name, month, amount);
        let entity_id = budget_key(&budget.category_name, month);
        match previous {
            Some(previous) => {
                let before = Budget::new(budget.category_name.clone(), month, previous);
                self.storage.log_update(
                    EntityType::Budget,
                    entity_id,
                    &before,
                    &budget,
                    Some(format!("target: {} -> {}", previous, amount)),
                )?;
            }
            None => self.storage.log_create(EntityType::Budget, entity_id, &budget)?,
        }
        tracing::info!(category = %budget.category_name, %month, target = %amount, "set budget");

        Ok(budget)
    }

    /// Explicit target for a category in a month
    pub fn get_budget(&self, category_name: &str, month: Month) -> SpendResult<Option<Money>> {
        let category_name = self.canonical_name(category_name)?;
        self.storage.budgets.get_budget(&category_name, month)
    }

    /// Target that applies to a month: explicit first, then the default
    pub fn effective_budget(&self, category_name: &str, month: Month) -> SpendResult<Option<Money>> {
        let category_name = self.canonical_name(category_name)?;
        match self.storage.budgets.get_budget(&category_name, month)? {
            Some(target) => Ok(Some(target)),
            None => self.storage.budgets.default_budget(&category_name),
        }
    }

    /// Remove the explicit target for a category in a month
    pub fn remove_budget(&self, category_name: &str, month: Month) -> SpendResult<Budget> {
        let category_name = self.canonical_name(category_name)?;
        let removed = self.storage.budgets.remove_budget(&category_name, month)?;
        self.storage.budgets.save()?;

        let budget = Budget::new(category_name, month, removed);
        self.storage.log_delete(
            EntityType::Budget,
            budget_key(&budget.category_name, month),
            &budget,
        )?;
        tracing::info!(category = %budget.category_name, %month, "removed budget");

        Ok(budget)
    }

    /// All explicit monthly targets, ordered by category then month
    pub fn list_budgets(&self) -> SpendResult<Vec<Budget>> {
        self.storage.budgets.list_budgets()
    }

    /// Set the recurring target for a category
    pub fn set_default_budget(&self, category_name: &str, amount: Money) -> SpendResult<DefaultBudget> {
        let category_name = self.canonical_name(category_name)?;
        let previous = self
            .storage
            .budgets
            .set_default_budget(&category_name, amount)?;
        self.storage.budgets.save()?;

        let budget = DefaultBudget::new(category_name, amount);
        let entity_id = budget.category_name.clone();
        match previous {
            Some(previous) => {
                let before = DefaultBudget::new(budget.category_name.clone(), previous);
                self.storage.log_update(
                    EntityType::DefaultBudget,
                    entity_id,
                    &before,
                    &budget,
                    Some(format!("target: {} -> {}", previous, amount)),
                )?;
            }
            None => self
                .storage
                .log_create(EntityType::DefaultBudget, entity_id, &budget)?,
        }
        tracing::info!(category = %budget.category_name, target = %amount, "set default budget");

        Ok(budget)
    }

    /// Recurring target for a category
    pub fn default_budget(&self, category_name: &str) -> SpendResult<Option<Money>> {
        let category_name = self.canonical_name(category_name)?;
        self.storage.budgets.default_budget(&category_name)
    }

    /// Remove the recurring target for a category
    pub fn remove_default_budget(&self, category_name: &str) -> SpendResult<DefaultBudget> {
        let category_name = self.canonical_name(category_name)?;
        let removed = self.storage.budgets.remove_default_budget(&category_name)?;
        self.storage.budgets.save()?;

        let budget = DefaultBudget::new(category_name, removed);
        self.storage.log_delete(
            EntityType::DefaultBudget,
            budget.category_name.clone(),
            &budget,
        )?;
        tracing::info!(category = %budget.category_name, "removed default budget");

        Ok(budget)
    }

    /// All recurring targets, ordered by category
    pub fn list_default_budgets(&self) -> SpendResult<Vec<DefaultBudget>> {
        self.storage.budgets.list_default_budgets()
    }

    /// Concrete targets for the given months, defaults filled in
    pub fn effective_budgets(&self, months: &[Month]) -> SpendResult<Vec<Budget>> {
        self.storage.budgets.effective_budgets(months)
    }

    /// Spelling of an existing category rule matching `name`, else `name` trimmed
    fn canonical_name(&self, name: &str) -> SpendResult<String> {
        Ok(match self.storage.categories.get(name)? {
            Some(rule) => rule.name,
            None => name.trim().to_string(),
        })
    }
}

fn budget_key(category_name: &str, month: Month) -> String {
    format!("{} {}", category_name, month)
}
