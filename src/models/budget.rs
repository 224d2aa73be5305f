//! Monthly budget targets
//!
//! A budget is a spending target for one category in one calendar month.
//! Category names are soft references: nothing ties a budget to a live
//! category rule.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;
use super::month::Month;

/// A spending target for a category in a specific month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub category_name: String,
    pub month: Month,
    pub target_amount: Money,
}

impl Budget {
    pub fn new(category_name: impl Into<String>, month: Month, target_amount: Money) -> Self {
        Self {
            category_name: category_name.into(),
            month,
            target_amount,
        }
    }

    /// Validate the budget
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        validate_target(&self.category_name, self.target_amount)
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {}",
            self.category_name, self.month, self.target_amount
        )
    }
}

/// A recurring target used for any month without an explicit budget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultBudget {
    pub category_name: String,
    pub target_amount: Money,
}

impl DefaultBudget {
    pub fn new(category_name: impl Into<String>, target_amount: Money) -> Self {
        Self {
            category_name: category_name.into(),
            target_amount,
        }
    }

    /// Expand into a concrete budget for a month
    pub fn for_month(&self, month: Month) -> Budget {
        Budget::new(self.category_name.clone(), month, self.target_amount)
    }
}

/// Validate a category/target pair
pub fn validate_target(category_name: &str, target: Money) -> Result<(), BudgetValidationError> {
    if category_name.trim().is_empty() {
        return Err(BudgetValidationError::EmptyCategory);
    }
    if target.is_negative() {
        return Err(BudgetValidationError::NegativeTarget(target));
    }
    Ok(())
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    EmptyCategory,
    NegativeTarget(Money),
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCategory => write!(f, "Budget category cannot be empty"),
            Self::NegativeTarget(amount) => {
                write!(f, "Budget target cannot be negative: {}", amount)
            }
        }
    }
}

impl std::error::Error for BudgetValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn jan() -> Month {
        Month::new(2024, 1).unwrap()
    }

    #[test]
    fn test_validate() {
        assert!(Budget::new("Groceries", jan(), Money::from_cents(20000))
            .validate()
            .is_ok());
        assert!(Budget::new("Groceries", jan(), Money::zero()).validate().is_ok());
        assert_eq!(
            Budget::new("Groceries", jan(), Money::from_cents(-1)).validate(),
            Err(BudgetValidationError::NegativeTarget(Money::from_cents(-1)))
        );
        assert_eq!(
            Budget::new(" ", jan(), Money::zero()).validate(),
            Err(BudgetValidationError::EmptyCategory)
        );
    }

    #[test]
    fn test_default_for_month() {
        let default = DefaultBudget::new("Dining", Money::from_cents(15000));
        let budget = default.for_month(jan());
        assert_eq!(budget.category_name, "Dining");
        assert_eq!(budget.month, jan());
        assert_eq!(budget.target_amount.cents(), 15000);
    }
}
