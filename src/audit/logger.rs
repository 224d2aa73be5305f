//! Change log file
//!
//! `audit.log` holds one JSON object per line, oldest first. A line that
//! cannot be parsed (for example one cut short by a crash mid-write) is
//! skipped with a warning so the rest of the history stays readable.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

use crate::error::{SpendError, SpendResult};

use super::entry::AuditEntry;

pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append one entry as a single line
    ///
    /// If the file ends in a partial line, the entry starts on a new one.
    pub fn log(&self, entry: &AuditEntry) -> SpendResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| SpendError::Io(format!("Failed to open audit log: {}", e)))?;
        let partial_line = ends_mid_line(&mut file)
            .map_err(|e| SpendError::Io(format!("Failed to read audit log: {}", e)))?;

        let mut writer = BufWriter::new(file);
        if partial_line {
            writer
                .write_all(b"\n")
                .map_err(|e| SpendError::Io(format!("Failed to write audit log: {}", e)))?;
        }
        serde_json::to_writer(&mut writer, entry)
            .map_err(|e| SpendError::Json(format!("Failed to serialize audit entry: {}", e)))?;
        writer
            .write_all(b"\n")
            .and_then(|_| writer.flush())
            .map_err(|e| SpendError::Io(format!("Failed to write audit log: {}", e)))
    }

    /// Every readable entry, oldest first
    pub fn read_all(&self) -> SpendResult<Vec<AuditEntry>> {
        let file = match File::open(&self.log_path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SpendError::Io(format!("Failed to open audit log: {}", e))),
        };

        let mut entries = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                SpendError::Io(format!("Failed to read audit log line {}: {}", idx + 1, e))
            })?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<AuditEntry>(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::warn!(
                    line = idx + 1,
                    error = %e,
                    path = %self.log_path.display(),
                    "skipping unreadable audit log line"
                ),
            }
        }

        Ok(entries)
    }

    /// The last `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> SpendResult<Vec<AuditEntry>> {
        let mut entries = self.read_all()?;
        let keep_from = entries.len().saturating_sub(count);
        Ok(entries.split_off(keep_from))
    }

    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }
}

fn ends_mid_line(file: &mut File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}
