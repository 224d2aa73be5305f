//! History CLI command
//!
//! Shows recent edits to the category and budget stores from the audit log.

use crate::error::SpendResult;
use crate::storage::Storage;

/// Handle `history`
pub fn handle_history_command(storage: &Storage, limit: usize) -> SpendResult<()> {
    let entries = storage.audit().read_recent(limit)?;

    if entries.is_empty() {
        println!("No changes recorded yet.");
        return Ok(());
    }

    for entry in entries.iter().rev() {
        println!("{}", entry.format_human_readable());
    }

    Ok(())
}
