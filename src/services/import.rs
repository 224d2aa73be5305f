//! Statement import
//!
//! Loads a bank statement export into transactions: detects which columns
//! hold the date, description and amounts from the header row, resolves the
//! direction of every row, and reports rows it could not use instead of
//! failing the whole file.

use std::path::Path;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::error::{SpendError, SpendResult};
use crate::models::{Direction, Money, Transaction};

use super::table::{excel_serial_to_date, read_table, Cell, RawRow, RawTable};

const DATE_HEADERS: &[&str] = &[
    "date",
    "transaction date",
    "txn date",
    "value date",
    "posting date",
    "posted date",
];
const DESCRIPTION_HEADERS: &[&str] = &[
    "description",
    "narration",
    "details",
    "particulars",
    "payee",
    "transaction details",
];
const AMOUNT_HEADERS: &[&str] = &["amount", "transaction amount", "amount (inr)"];
const DEBIT_HEADERS: &[&str] = &[
    "debit",
    "debit amount",
    "withdrawal",
    "withdrawal amount",
    "withdrawal amt",
];
const CREDIT_HEADERS: &[&str] = &[
    "credit",
    "credit amount",
    "deposit",
    "deposit amount",
    "deposit amt",
];
const INDICATOR_HEADERS: &[&str] = &["debit/credit", "dr/cr", "type", "transaction type"];

/// Day-first numeric layouts; two-digit years are tried before four-digit
/// ones because `%Y` also accepts "24"
const DAY_FIRST_FORMATS: &[&str] = &[
    "%d/%m/%y", "%d-%m-%y", "%d.%m.%y", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y",
];
const MONTH_FIRST_FORMATS: &[&str] = &["%m/%d/%y", "%m-%d-%y", "%m/%d/%Y", "%m-%d-%Y"];
const UNAMBIGUOUS_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%d-%b-%y", "%d-%b-%Y", "%d %b %y", "%d %b %Y",
    "%d %B %Y", "%b %d, %Y", "%B %d, %Y",
];

/// How the amount of each row is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountColumns {
    /// One signed amount column, optionally with a debit/credit indicator
    Signed {
        amount: usize,
        indicator: Option<usize>,
    },
    /// Separate debit and credit columns
    Split { debit: usize, credit: usize },
}

/// Column positions detected from a statement's header row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub date_column: usize,
    pub description_column: usize,
    pub amounts: AmountColumns,
}

impl ColumnMapping {
    /// Detect the mapping from header names
    ///
    /// Fails with a format error naming every required column that is missing.
    pub fn detect<S: AsRef<str>>(headers: &[S]) -> SpendResult<Self> {
        let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h.as_ref())).collect();
        let find = |synonyms: &[&str]| {
            normalized
                .iter()
                .position(|h| synonyms.contains(&h.as_str()))
        };

        let date = find(DATE_HEADERS);
        let description = find(DESCRIPTION_HEADERS);
        let amount = find(AMOUNT_HEADERS);
        let debit = find(DEBIT_HEADERS);
        let credit = find(CREDIT_HEADERS);

        let amounts = match (amount, debit, credit) {
            (Some(amount), _, _) => Some(AmountColumns::Signed {
                amount,
                indicator: find(INDICATOR_HEADERS),
            }),
            (None, Some(debit), Some(credit)) => Some(AmountColumns::Split { debit, credit }),
            _ => None,
        };

        match (date, description, amounts) {
            (Some(date_column), Some(description_column), Some(amounts)) => Ok(Self {
                date_column,
                description_column,
                amounts,
            }),
            _ => {
                let mut missing = Vec::new();
                if date.is_none() {
                    missing.push("date");
                }
                if description.is_none() {
                    missing.push("description");
                }
                if amounts.is_none() {
                    missing.push("amount (or debit and credit)");
                }
                Err(SpendError::Format(format!(
                    "Missing required columns: {}",
                    missing.join(", ")
                )))
            }
        }
    }
}

/// A data row that was not turned into a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// 1-based data row in the source file
    pub row: usize,
    pub reason: String,
}

/// Result of loading one statement
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadedStatement {
    pub transactions: Vec<Transaction>,
    pub skipped: Vec<SkippedRow>,
}

impl LoadedStatement {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Reads statement files into transactions
#[derive(Debug, Clone, Copy)]
pub struct StatementLoader {
    day_first: bool,
}

impl Default for StatementLoader {
    fn default() -> Self {
        Self { day_first: true }
    }
}

impl StatementLoader {
    /// Create a loader; `day_first` prefers dd/mm over mm/dd for ambiguous dates
    pub fn new(day_first: bool) -> Self {
        Self { day_first }
    }

    /// Load a CSV or spreadsheet statement
    ///
    /// Unreadable files and missing columns are format errors; malformed rows
    /// are reported in `skipped`.
    pub fn load(&self, path: &Path) -> SpendResult<LoadedStatement> {
        let table = read_table(path)?;
        let loaded = self.load_table(&table)?;

        tracing::info!(
            path = %path.display(),
            transactions = loaded.transactions.len(),
            skipped = loaded.skipped_count(),
            "loaded statement"
        );
        Ok(loaded)
    }

    /// Convert an already-read table into transactions
    pub fn load_table(&self, table: &RawTable) -> SpendResult<LoadedStatement> {
        let mapping = ColumnMapping::detect(&table.headers)?;
        tracing::debug!(?mapping, "detected statement columns");

        let mut loaded = LoadedStatement::default();
        for row in &table.rows {
            if row.is_blank() {
                continue;
            }
            match self.parse_row(row, &mapping) {
                Ok(transaction) => loaded.transactions.push(transaction),
                Err(reason) => {
                    tracing::warn!(row = row.number, %reason, "skipping statement row");
                    loaded.skipped.push(SkippedRow {
                        row: row.number,
                        reason,
                    });
                }
            }
        }
        Ok(loaded)
    }

    fn parse_row(&self, row: &RawRow, mapping: &ColumnMapping) -> Result<Transaction, String> {
        let date_cell = row.cell(mapping.date_column);
        let date = cell_date(date_cell, self.day_first)
            .ok_or_else(|| format!("Could not parse date '{}'", date_cell.as_text()))?;

        let description = row.cell(mapping.description_column).as_text();

        match mapping.amounts {
            AmountColumns::Signed { amount, indicator } => {
                let amount = cell_amount(row.cell(amount))?
                    .ok_or_else(|| "Missing amount".to_string())?;
                let direction = indicator
                    .and_then(|col| Direction::from_indicator(&row.cell(col).as_text()));

                Ok(match direction {
                    Some(direction) => {
                        Transaction::new(row.number, date, description, amount, direction)
                    }
                    None => Transaction::from_signed(row.number, date, description, amount),
                })
            }
            AmountColumns::Split { debit, credit } => {
                let debit = cell_amount(row.cell(debit))?.filter(|m| !m.is_zero());
                let credit = cell_amount(row.cell(credit))?.filter(|m| !m.is_zero());

                match (debit, credit) {
                    (Some(amount), None) => Ok(Transaction::new(
                        row.number,
                        date,
                        description,
                        amount,
                        Direction::Debit,
                    )),
                    (None, Some(amount)) => Ok(Transaction::new(
                        row.number,
                        date,
                        description,
                        amount,
                        Direction::Credit,
                    )),
                    (None, None) => Err("Neither debit nor credit amount present".to_string()),
                    (Some(_), Some(_)) => {
                        Err("Both debit and credit amounts present".to_string())
                    }
                }
            }
        }
    }
}

/// Load a statement with the given date preference
pub fn load_statement(path: &Path, day_first: bool) -> SpendResult<LoadedStatement> {
    StatementLoader::new(day_first).load(path)
}

/// Lowercase, trim, and collapse underscores and runs of whitespace
fn normalize_header(header: &str) -> String {
    header
        .trim_start_matches('\u{feff}')
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Parse a date cell; spreadsheet numbers are Excel serial days
fn cell_date(cell: &Cell, day_first: bool) -> Option<NaiveDate> {
    match cell {
        Cell::Date(date) => Some(*date),
        Cell::Number(serial) => excel_serial_to_date(*serial),
        Cell::Text(text) => parse_date(text, day_first),
        Cell::Empty => None,
    }
}

/// Parse an amount cell; `Ok(None)` means the cell is empty
fn cell_amount(cell: &Cell) -> Result<Option<Money>, String> {
    match cell {
        Cell::Empty => Ok(None),
        Cell::Number(n) => Money::from_f64(*n)
            .map(Some)
            .ok_or_else(|| format!("Amount out of range: '{}'", n)),
        Cell::Text(text) => Money::parse(text)
            .map(Some)
            .map_err(|e| e.to_string()),
        Cell::Date(date) => Err(format!("Could not parse amount '{}'", date)),
    }
}

/// Parse a statement date in any of the common bank layouts
///
/// A trailing time component is ignored. With `day_first`, "05/01/2024" is
/// 5 January; otherwise it is 1 May.
pub fn parse_date(s: &str, day_first: bool) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let (first, second) = if day_first {
        (DAY_FIRST_FORMATS, MONTH_FIRST_FORMATS)
    } else {
        (MONTH_FIRST_FORMATS, DAY_FIRST_FORMATS)
    };

    let try_formats = |text: &str| {
        UNAMBIGUOUS_FORMATS
            .iter()
            .chain(first)
            .chain(second)
            .find_map(|fmt| {
                NaiveDate::parse_from_str(text, fmt)
                    .ok()
                    .filter(|date| date.year() >= 1000)
            })
    };

    if let Some(date) = try_formats(s) {
        return Some(date);
    }

    // "2024-01-05 00:00:00" or "2024-01-05T10:30:00"
    let date_part = s.split_whitespace().next().unwrap_or(s);
    let date_part = date_part.split('T').next().unwrap_or(date_part);
    if date_part != s {
        return try_formats(date_part);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .enumerate()
                .map(|(idx, cells)| RawRow {
                    number: idx + 1,
                    cells: cells.iter().map(|c| Cell::text(c)).collect(),
                })
                .collect(),
        }
    }

    fn write_statement(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_detect_signed_mapping() {
        let mapping =
            ColumnMapping::detect(&["Txn_Date", "Narration", "Amount (INR)", "Debit/Credit"])
                .unwrap();
        assert_eq!(mapping.date_column, 0);
        assert_eq!(mapping.description_column, 1);
        assert_eq!(
            mapping.amounts,
            AmountColumns::Signed {
                amount: 2,
                indicator: Some(3)
            }
        );
    }

    #[test]
    fn test_detect_split_mapping() {
        let mapping = ColumnMapping::detect(&[
            "Value Date",
            "Particulars",
            "Withdrawal Amt",
            "Deposit Amt",
            "Balance",
        ])
        .unwrap();
        assert_eq!(mapping.amounts, AmountColumns::Split { debit: 2, credit: 3 });
    }

    #[test]
    fn test_missing_columns_named() {
        let err = ColumnMapping::detect(&["Date", "Memo", "Debit"]).unwrap_err();
        assert!(err.is_format());
        let message = err.to_string();
        assert!(message.contains("description"));
        assert!(message.contains("amount (or debit and credit)"));
        assert!(!message.contains("date,"));
    }

    #[test]
    fn test_negative_amount_is_debit() {
        let loaded = StatementLoader::default()
            .load_table(&table(
                &["Date", "Description", "Amount"],
                &[&["2024-01-05", "WALMART #123", "-52.30"], &["2024-01-06", "PAYCHECK", "2000.00"]],
            ))
            .unwrap();

        assert_eq!(loaded.transactions.len(), 2);
        let first = &loaded.transactions[0];
        assert_eq!(first.direction, Direction::Debit);
        assert_eq!(first.amount, Money::from_cents(5230));
        assert_eq!(first.row, 1);
        assert_eq!(loaded.transactions[1].direction, Direction::Credit);
    }

    #[test]
    fn test_indicator_column_wins_over_sign() {
        let loaded = StatementLoader::default()
            .load_table(&table(
                &["Date", "Description", "Amount", "Debit/Credit"],
                &[
                    &["05/01/2024", "Swiggy", "1,250.00", "Debit"],
                    &["06/01/2024", "Refund", "-40", "CR"],
                    &["07/01/2024", "Salary", "5000", "?"],
                ],
            ))
            .unwrap();

        let directions: Vec<_> = loaded.transactions.iter().map(|t| t.direction).collect();
        assert_eq!(
            directions,
            vec![Direction::Debit, Direction::Credit, Direction::Credit]
        );
        assert_eq!(loaded.transactions[0].amount, Money::from_cents(125000));
        assert_eq!(loaded.transactions[1].amount, Money::from_cents(4000));
    }

    #[test]
    fn test_split_columns() {
        let loaded = StatementLoader::default()
            .load_table(&table(
                &["Date", "Details", "Debit", "Credit"],
                &[
                    &["2024-02-01", "Rent", "900.00", ""],
                    &["2024-02-02", "Interest", "0", "3.10"],
                    &["2024-02-03", "Nothing", "", ""],
                    &["2024-02-04", "Both", "10", "10"],
                ],
            ))
            .unwrap();

        assert_eq!(loaded.transactions.len(), 2);
        assert_eq!(loaded.transactions[0].direction, Direction::Debit);
        assert_eq!(loaded.transactions[1].direction, Direction::Credit);
        assert_eq!(loaded.transactions[1].amount, Money::from_cents(310));

        let skipped_rows: Vec<_> = loaded.skipped.iter().map(|s| s.row).collect();
        assert_eq!(skipped_rows, vec![3, 4]);
    }

    #[test]
    fn test_malformed_rows_skipped_and_counted() {
        let mut rows: Vec<Vec<String>> = (1..=10)
            .map(|d| {
                vec![
                    format!("2024-03-{:02}", d),
                    format!("Shop {}", d),
                    "-1.00".to_string(),
                ]
            })
            .collect();
        rows.insert(3, vec!["not a date".into(), "Bad".into(), "-1".into()]);
        rows.push(vec!["2024-13-45".into(), "Bad".into(), "-1".into()]);

        let row_refs: Vec<Vec<&str>> = rows
            .iter()
            .map(|r| r.iter().map(String::as_str).collect())
            .collect();
        let row_slices: Vec<&[&str]> = row_refs.iter().map(Vec::as_slice).collect();

        let loaded = StatementLoader::default()
            .load_table(&table(&["Date", "Description", "Amount"], &row_slices))
            .unwrap();

        assert_eq!(loaded.transactions.len(), 10);
        assert_eq!(loaded.skipped_count(), 2);
        assert_eq!(loaded.skipped[0].row, 4);
        assert!(loaded.skipped[0].reason.contains("not a date"));
    }

    #[test]
    fn test_bad_amount_skipped() {
        let loaded = StatementLoader::default()
            .load_table(&table(
                &["Date", "Description", "Amount"],
                &[
                    &["2024-01-05", "Shop", "twelve"],
                    &["2024-01-05", "Shop", ""],
                    &["2024-01-05", "Shop", "-92233720368547758"],
                ],
            ))
            .unwrap();

        assert!(loaded.transactions.is_empty());
        assert_eq!(loaded.skipped_count(), 3);
        assert!(loaded.skipped[2].reason.contains("out of range"));
    }

    #[test]
    fn test_out_of_range_serial_date_skipped() {
        let raw = RawTable {
            headers: vec!["Date".into(), "Description".into(), "Amount".into()],
            rows: vec![
                RawRow {
                    number: 1,
                    cells: vec![Cell::Number(1e20), Cell::text("X"), Cell::Number(-5.0)],
                },
                RawRow {
                    number: 2,
                    cells: vec![Cell::Number(45296.0), Cell::text("Shop"), Cell::Number(-5.0)],
                },
            ],
        };

        let loaded = StatementLoader::default().load_table(&raw).unwrap();

        assert_eq!(loaded.transactions.len(), 1);
        assert_eq!(loaded.transactions[0].date, date(2024, 1, 5));
        assert_eq!(loaded.skipped_count(), 1);
        assert_eq!(loaded.skipped[0].row, 1);
    }

    #[test]
    fn test_blank_rows_ignored() {
        let loaded = StatementLoader::default()
            .load_table(&table(
                &["Date", "Description", "Amount"],
                &[&["", "", ""], &["2024-01-05", "Shop", "-3"]],
            ))
            .unwrap();

        assert_eq!(loaded.transactions.len(), 1);
        assert_eq!(loaded.transactions[0].row, 2);
        assert_eq!(loaded.skipped_count(), 0);
    }

    #[test]
    fn test_parse_date_layouts() {
        assert_eq!(parse_date("2024-01-05", true), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("05/01/2024", true), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("05/01/2024", false), Some(date(2024, 5, 1)));
        assert_eq!(parse_date("13/01/2024", false), Some(date(2024, 1, 13)));
        assert_eq!(parse_date("05/01/24", true), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("05-Jan-2024", true), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("Jan 5, 2024", true), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05 00:00:00", true), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05T10:30:00", true), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("yesterday", true), None);
        assert_eq!(parse_date("", true), None);
    }

    #[test]
    fn test_load_csv_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_statement(
            &temp_dir,
            "statement.csv",
            "Date,Description,Amount\n2024-01-05,WALMART #123,-52.30\n2024-01-06,PAYCHECK,2000.00\n",
        );

        let loaded = load_statement(&path, true).unwrap();
        assert_eq!(loaded.transactions.len(), 2);
        assert_eq!(loaded.transactions[0].description, "WALMART #123");
    }

    #[test]
    fn test_load_xlsx_file() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures/statement.xlsx");

        let loaded = load_statement(&path, true).unwrap();
        assert_eq!(loaded.transactions.len(), 2);
        assert_eq!(loaded.skipped_count(), 0);

        let walmart = &loaded.transactions[0];
        assert_eq!(walmart.date, date(2024, 1, 5));
        assert_eq!(walmart.amount, Money::from_cents(5230));
        assert_eq!(walmart.direction, Direction::Debit);

        let paycheck = &loaded.transactions[1];
        assert_eq!(paycheck.row, 3);
        assert_eq!(paycheck.date, date(2024, 1, 6));
        assert_eq!(paycheck.amount, Money::from_cents(200000));
        assert_eq!(paycheck.direction, Direction::Credit);
    }

    #[test]
    fn test_load_rejects_missing_columns() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_statement(&temp_dir, "bad.csv", "When,What\n2024-01-05,x\n");

        assert!(load_statement(&path, true).unwrap_err().is_format());
    }

    #[test]
    fn test_header_only_file_is_empty_statement() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_statement(&temp_dir, "empty.csv", "Date,Description,Amount\n");

        let loaded = load_statement(&path, true).unwrap();
        assert!(loaded.transactions.is_empty());
        assert_eq!(loaded.skipped_count(), 0);
    }
}
