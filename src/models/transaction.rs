//! Transaction model
//!
//! Represents one row of an uploaded bank statement. Transactions are never
//! persisted; their identity is their position in the source file.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;
use super::month::Month;

/// Whether money left or entered the account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Money out (spending)
    Debit,
    /// Money in (payments, deposits)
    Credit,
}

impl Direction {
    /// Interpret a statement's debit/credit indicator cell
    ///
    /// Returns `None` for anything unrecognised so the caller can fall back
    /// to the amount's sign.
    pub fn from_indicator(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "debit" | "dr" | "d" | "withdrawal" | "debit card" => Some(Self::Debit),
            "credit" | "cr" | "c" | "deposit" => Some(Self::Credit),
            _ => None,
        }
    }

    pub fn is_debit(&self) -> bool {
        matches!(self, Self::Debit)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debit => write!(f, "Debit"),
            Self::Credit => write!(f, "Credit"),
        }
    }
}

/// A single statement transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// 1-based data row in the source statement (header excluded)
    pub row: usize,

    /// Transaction date
    pub date: NaiveDate,

    /// Free-text description/narration as printed by the bank
    pub description: String,

    /// Absolute amount; the sign lives in `direction`
    pub amount: Money,

    pub direction: Direction,
}

impl Transaction {
    /// Create a transaction, normalising the amount to its absolute value
    pub fn new(
        row: usize,
        date: NaiveDate,
        description: impl Into<String>,
        amount: Money,
        direction: Direction,
    ) -> Self {
        Self {
            row,
            date,
            description: description.into(),
            amount: amount.abs(),
            direction,
        }
    }

    /// Build a transaction from a signed amount: negative is a debit
    pub fn from_signed(
        row: usize,
        date: NaiveDate,
        description: impl Into<String>,
        amount: Money,
    ) -> Self {
        let direction = if amount.is_negative() {
            Direction::Debit
        } else {
            Direction::Credit
        };
        Self::new(row, date, description, amount, direction)
    }

    /// The calendar month this transaction falls in
    pub fn month(&self) -> Month {
        Month::from_date(self.date)
    }

    /// Amount with sign restored (debits negative)
    pub fn signed_amount(&self) -> Money {
        match self.direction {
            Direction::Debit => -self.amount,
            Direction::Credit => self.amount,
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ({})",
            self.date.format("%Y-%m-%d"),
            self.description,
            self.amount,
            self.direction
        )
    }
}

/// A transaction with the category assigned by the keyword rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,

    pub category: String,
}

impl CategorizedTransaction {
    pub fn new(transaction: Transaction, category: impl Into<String>) -> Self {
        Self {
            transaction,
            category: category.into(),
        }
    }

    pub fn month(&self) -> Month {
        self.transaction.month()
    }
}
