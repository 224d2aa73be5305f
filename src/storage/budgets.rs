//! Budget repository for JSON storage
//!
//! Manages loading and saving monthly targets to budgets.json:
//!
//! ```json
//! { "Groceries": { "default": 150.0, "2024-01": 200.0 } }
//! ```
//!
//! A bare number per category (`{ "Groceries": 150 }`) is read as a default
//! target, which is how older budget files were written.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SpendError;
use crate::models::budget::validate_target;
use crate::models::{Budget, DefaultBudget, Money, Month};

use super::file_io::{read_json, write_json_atomic};
use super::store_write_error;

/// Key used for the recurring target inside a category's month map
const DEFAULT_KEY: &str = "default";

/// Targets for one category
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryBudgets {
    pub default: Option<Money>,
    pub months: BTreeMap<Month, Money>,
}

impl CategoryBudgets {
    fn is_empty(&self) -> bool {
        self.default.is_none() && self.months.is_empty()
    }
}

impl Serialize for CategoryBudgets {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.months.len() + usize::from(self.default.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        if let Some(default) = self.default {
            map.serialize_entry(DEFAULT_KEY, &default.to_f64())?;
        }
        for (month, target) in &self.months {
            map.serialize_entry(&month.to_string(), &target.to_f64())?;
        }
        map.end()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCategoryBudgets {
    Flat(f64),
    Monthly(BTreeMap<String, f64>),
}

impl<'de> Deserialize<'de> for CategoryBudgets {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let to_money = |value: f64| {
            Money::from_f64(value).ok_or_else(|| D::Error::custom(format!("invalid amount {}", value)))
        };

        match RawCategoryBudgets::deserialize(deserializer)? {
            RawCategoryBudgets::Flat(value) => Ok(Self {
                default: Some(to_money(value)?),
                months: BTreeMap::new(),
            }),
            RawCategoryBudgets::Monthly(entries) => {
                let mut budgets = Self::default();
                for (key, value) in entries {
                    let amount = to_money(value)?;
                    if key == DEFAULT_KEY {
                        budgets.default = Some(amount);
                    } else {
                        let month: Month = key.parse().map_err(D::Error::custom)?;
                        budgets.months.insert(month, amount);
                    }
                }
                Ok(budgets)
            }
        }
    }
}

/// On-disk shape of budgets.json
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BudgetData(pub BTreeMap<String, CategoryBudgets>);

/// Repository for budget persistence
pub struct BudgetRepository {
    path: PathBuf,
    data: RwLock<BudgetData>,
}

impl BudgetRepository {
    /// Create a new budget repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(BudgetData::default()),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load budgets from disk, replacing the in-memory state
    pub fn load(&self) -> Result<(), SpendError> {
        let file_data: BudgetData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| SpendError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        *data = file_data;
        tracing::debug!(categories = data.0.len(), path = %self.path.display(), "loaded budgets");
        Ok(())
    }

    /// Overwrite the file with the current in-memory budgets
    ///
    /// On failure the in-memory budgets are untouched so the caller can retry.
    pub fn save(&self) -> Result<(), SpendError> {
        let data = self
            .data
            .read()
            .map_err(|e| SpendError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        write_json_atomic(&self.path, &*data).map_err(|e| store_write_error("budget", e))
    }

    /// Set the target for a category and month, returning the previous one
    pub fn set_budget(
        &self,
        category_name: &str,
        month: Month,
        amount: Money,
    ) -> Result<Option<Money>, SpendError> {
        let category_name = category_name.trim();
        validate_target(category_name, amount).map_err(|e| SpendError::Validation(e.to_string()))?;

        let mut data = self
            .data
            .write()
            .map_err(|e| SpendError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data
            .0
            .entry(category_name.to_string())
            .or_default()
            .months
            .insert(month, amount))
    }

    /// Get the explicit target for a category and month
    pub fn get_budget(&self, category_name: &str, month: Month) -> Result<Option<Money>, SpendError> {
        let data = self
            .data
            .read()
            .map_err(|e| SpendError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .0
            .get(category_name.trim())
            .and_then(|b| b.months.get(&month))
            .copied())
    }

    /// Remove the explicit target for a category and month
    pub fn remove_budget(&self, category_name: &str, month: Month) -> Result<Money, SpendError> {
        let category_name = category_name.trim();
        let mut data = self
            .data
            .write()
            .map_err(|e| SpendError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let not_found = || SpendError::budget_not_found(format!("{} {}", category_name, month));
        let budgets = data.0.get_mut(category_name).ok_or_else(not_found)?;
        let removed = budgets.months.remove(&month).ok_or_else(not_found)?;
        if budgets.is_empty() {
            data.0.remove(category_name);
        }
        Ok(removed)
    }

    /// All explicit monthly targets, ordered by category then month
    pub fn list_budgets(&self) -> Result<Vec<Budget>, SpendError> {
        let data = self
            .data
            .read()
            .map_err(|e| SpendError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .0
            .iter()
            .flat_map(|(category, budgets)| {
                budgets
                    .months
                    .iter()
                    .map(move |(month, target)| Budget::new(category.clone(), *month, *target))
            })
            .collect())
    }

    /// Set the recurring target for a category, returning the previous one
    pub fn set_default_budget(
        &self,
        category_name: &str,
        amount: Money,
    ) -> Result<Option<Money>, SpendError> {
        let category_name = category_name.trim();
        validate_target(category_name, amount).map_err(|e| SpendError::Validation(e.to_string()))?;

        let mut data = self
            .data
            .write()
            .map_err(|e| SpendError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data
            .0
            .entry(category_name.to_string())
            .or_default()
            .default
            .replace(amount))
    }

    /// Get the recurring target for a category
    pub fn default_budget(&self, category_name: &str) -> Result<Option<Money>, SpendError> {
        let data = self
            .data
            .read()
            .map_err(|e| SpendError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.0.get(category_name.trim()).and_then(|b| b.default))
    }

    /// Remove the recurring target for a category
    pub fn remove_default_budget(&self, category_name: &str) -> Result<Money, SpendError> {
        let category_name = category_name.trim();
        let mut data = self
            .data
            .write()
            .map_err(|e| SpendError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let not_found = || SpendError::budget_not_found(format!("{} (default)", category_name));
        let budgets = data.0.get_mut(category_name).ok_or_else(not_found)?;
        let removed = budgets.default.take().ok_or_else(not_found)?;
        if budgets.is_empty() {
            data.0.remove(category_name);
        }
        Ok(removed)
    }

    /// All recurring targets, ordered by category
    pub fn list_default_budgets(&self) -> Result<Vec<DefaultBudget>, SpendError> {
        let data = self
            .data
            .read()
            .map_err(|e| SpendError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .0
            .iter()
            .filter_map(|(category, budgets)| {
                budgets
                    .default
                    .map(|target| DefaultBudget::new(category.clone(), target))
            })
            .collect())
    }

    /// Concrete targets for the given months
    ///
    /// Every explicit target is returned; defaults fill in only the listed
    /// months that have no explicit target for that category.
    pub fn effective_budgets(&self, months: &[Month]) -> Result<Vec<Budget>, SpendError> {
        let data = self
            .data
            .read()
            .map_err(|e| SpendError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut budgets = Vec::new();
        for (category, targets) in &data.0 {
            let mut resolved = targets.months.clone();
            if let Some(default) = targets.default {
                for month in months {
                    resolved.entry(*month).or_insert(default);
                }
            }
            budgets.extend(
                resolved
                    .into_iter()
                    .map(|(month, target)| Budget::new(category.clone(), month, target)),
            );
        }
        Ok(budgets)
    }

    /// Count explicit monthly targets
    pub fn count(&self) -> Result<usize, SpendError> {
        let data = self
            .data
            .read()
            .map_err(|e| SpendError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.0.values().map(|b| b.months.len()).sum())
    }
}
