//! Change records for the category and budget stores
//!
//! One record per accepted edit. `before`/`after` hold JSON snapshots of the
//! rule or target so `history` can show what a removed keyword list or an
//! old target looked like.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Snapshots longer than this are cut in `history` output
const SNAPSHOT_DISPLAY_LEN: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "CREATE",
            Operation::Update => "UPDATE",
            Operation::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which store entry an edit touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// Keyword rule, keyed by category name
    Category,
    /// Monthly target, keyed by "category month"
    Budget,
    /// Recurring target, keyed by category name
    DefaultBudget,
}

impl EntityType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            EntityType::Category => "Category",
            EntityType::Budget => "Budget",
            EntityType::DefaultBudget => "DefaultBudget",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the change log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub operation: Operation,
    pub entity_type: EntityType,
    pub entity_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,

    /// Short description of an update, e.g. "keywords: +zomato"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn record(
        operation: Operation,
        entity_type: EntityType,
        entity_id: String,
        before: Option<Value>,
        after: Option<Value>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id,
            before,
            after,
            diff_summary: None,
        }
    }

    pub fn create<T: Serialize>(entity_type: EntityType, entity_id: impl Into<String>, entity: &T) -> Self {
        Self::record(
            Operation::Create,
            entity_type,
            entity_id.into(),
            None,
            snapshot(entity),
        )
    }

    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> Self {
        Self {
            diff_summary,
            ..Self::record(
                Operation::Update,
                entity_type,
                entity_id.into(),
                snapshot(before),
                snapshot(after),
            )
        }
    }

    pub fn delete<T: Serialize>(entity_type: EntityType, entity_id: impl Into<String>, entity: &T) -> Self {
        Self::record(
            Operation::Delete,
            entity_type,
            entity_id.into(),
            snapshot(entity),
            None,
        )
    }

    /// Two-line rendering used by `spendlens history`
    ///
    /// Updates show their diff summary; creates and deletes show the value
    /// that was added or removed.
    pub fn format_human_readable(&self) -> String {
        let header = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        let detail = match self.operation {
            Operation::Update => self.diff_summary.as_ref().map(|d| format!("Changes: {}", d)),
            Operation::Create => self.after.as_ref().map(|v| format!("Value: {}", compact(v))),
            Operation::Delete => self.before.as_ref().map(|v| format!("Was: {}", compact(v))),
        };

        match detail {
            Some(detail) => format!("{}\n  {}", header, detail),
            None => header,
        }
    }
}

fn snapshot<T: Serialize>(value: &T) -> Option<Value> {
    serde_json::to_value(value).ok()
}

fn compact(value: &Value) -> String {
    let text = value.to_string();
    if text.chars().count() <= SNAPSHOT_DISPLAY_LEN {
        return text;
    }
    let head: String = text.chars().take(SNAPSHOT_DISPLAY_LEN - 3).collect();
    format!("{}...", head)
}
