//! Raw table reading for statement files
//!
//! Turns a CSV file or the first worksheet of a spreadsheet into a header
//! row plus data rows of loosely typed cells. Column meaning is decided by
//! the statement loader, not here.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Duration, NaiveDate};
use csv::{ReaderBuilder, Trim};

use crate::error::{SpendError, SpendResult};

/// A single cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl Cell {
    /// Build a cell from text, treating whitespace-only text as empty
    pub fn text(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Cell rendered as text for messages and descriptions
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
            Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

/// One data row with its 1-based position below the header
#[derive(Debug, Clone)]
pub struct RawRow {
    pub number: usize,
    pub cells: Vec<Cell>,
}

impl RawRow {
    /// Cell at `index`, or `Empty` for short rows
    pub fn cell(&self, index: usize) -> &Cell {
        self.cells.get(index).unwrap_or(&Cell::Empty)
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Cell::is_empty)
    }
}

/// A header row and the data rows beneath it
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// Kind of statement file, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Spreadsheet,
}

impl TableFormat {
    /// Detect the format from a path's extension
    pub fn from_path(path: &Path) -> SpendResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" | "txt" => Ok(TableFormat::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(TableFormat::Spreadsheet),
            "" => Err(SpendError::Format(format!(
                "{} has no file extension; expected .csv or .xlsx",
                path.display()
            ))),
            other => Err(SpendError::Format(format!(
                "Unsupported statement type '.{}'; expected .csv or .xlsx",
                other
            ))),
        }
    }
}

/// Read a statement file into a raw table
pub fn read_table(path: &Path) -> SpendResult<RawTable> {
    match TableFormat::from_path(path)? {
        TableFormat::Csv => read_csv(path),
        TableFormat::Spreadsheet => read_spreadsheet(path),
    }
}

fn read_csv(path: &Path) -> SpendResult<RawTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(|e| SpendError::Format(format!("Could not read {}: {}", path.display(), e)))?;

    let mut records = reader.byte_records();

    let headers = match records.next() {
        Some(record) => {
            let record = record
                .map_err(|e| SpendError::Format(format!("Could not read header row: {}", e)))?;
            record
                .iter()
                .map(|field| {
                    String::from_utf8_lossy(field)
                        .trim_start_matches('\u{feff}')
                        .trim()
                        .to_string()
                })
                .collect()
        }
        None => return Err(empty_table(path)),
    };

    let mut rows = Vec::new();
    for (idx, record) in records.enumerate() {
        let record = record.map_err(|e| {
            SpendError::Format(format!("Could not read row {}: {}", idx + 1, e))
        })?;
        let cells = record
            .iter()
            .map(|field| Cell::text(&String::from_utf8_lossy(field)))
            .collect();
        rows.push(RawRow {
            number: idx + 1,
            cells,
        });
    }

    Ok(RawTable { headers, rows })
}

fn read_spreadsheet(path: &Path) -> SpendResult<RawTable> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| SpendError::Format(format!("Could not open {}: {}", path.display(), e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| empty_table(path))?
        .map_err(|e| SpendError::Format(format!("Could not read first worksheet: {}", e)))?;

    let mut sheet_rows = range.rows();

    let headers = match sheet_rows.next() {
        Some(row) => row.iter().map(|cell| sheet_cell(cell).as_text()).collect(),
        None => return Err(empty_table(path)),
    };

    let rows = sheet_rows
        .enumerate()
        .map(|(idx, row)| RawRow {
            number: idx + 1,
            cells: row.iter().map(sheet_cell).collect(),
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn sheet_cell(cell: &Data) -> Cell {
    match cell {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::text(s),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64())
            .map(Cell::Date)
            .unwrap_or(Cell::Empty),
        Data::DateTimeIso(s) => Cell::text(s),
        other => Cell::text(&other.to_string()),
    }
}

/// Serial number of 9999-12-31, the last date a spreadsheet can hold
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// Convert an Excel serial day number (1900 date system) to a date
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.floor() as i64))
}

fn empty_table(path: &Path) -> SpendError {
    SpendError::Format(format!("{} contains no header row", path.display()))
}
