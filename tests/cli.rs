use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use tempfile::TempDir;

const BIN_NAME: &str = "spendlens";

const STATEMENT: &str = "\
Date,Description,Amount
2024-01-05,WALMART #123,-52.30
2024-01-06,PAYCHECK,2000.00
";

fn spendlens(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin(BIN_NAME).expect("binary exists");
    cmd.env("SPENDLENS_DATA_DIR", data_dir.path());
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write_statement(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn add_groceries(data_dir: &TempDir) {
    spendlens(data_dir)
        .args(["category", "add", "Groceries", "-k", "walmart"])
        .assert()
        .success();
}

#[test]
fn category_add_then_list() {
    let data = TempDir::new().unwrap();

    spendlens(&data)
        .args(["category", "add", "Groceries", "-k", "walmart", "-k", "kroger"])
        .assert()
        .success()
        .stdout(contains("Created category: Groceries"));

    spendlens(&data)
        .args(["category", "list"])
        .assert()
        .success()
        .stdout(contains("Groceries").and(contains("walmart, kroger")));

    assert!(data.path().join("data").join("categories.json").exists());
}

#[test]
fn duplicate_category_fails() {
    let data = TempDir::new().unwrap();
    add_groceries(&data);

    spendlens(&data)
        .args(["category", "add", "groceries"])
        .assert()
        .failure()
        .stderr(contains("already exists"));
}

#[test]
fn budget_set_then_list() {
    let data = TempDir::new().unwrap();
    add_groceries(&data);

    spendlens(&data)
        .args(["budget", "set", "Groceries", "200", "--month", "2024-01"])
        .assert()
        .success()
        .stdout(contains("Set budget for Groceries in 2024-01"));

    spendlens(&data)
        .args(["budget", "list"])
        .assert()
        .success()
        .stdout(contains("Groceries").and(contains("2024-01")).and(contains("200.00")));
}

#[test]
fn budget_rejects_bad_month() {
    let data = TempDir::new().unwrap();
    add_groceries(&data);

    spendlens(&data)
        .args(["budget", "set", "Groceries", "200", "--month", "January"])
        .assert()
        .failure()
        .stderr(contains("YYYY-MM"));
}

#[test]
fn report_shows_categories_and_budget_delta() {
    let data = TempDir::new().unwrap();
    let statement = write_statement(&data, "statement.csv", STATEMENT);
    add_groceries(&data);
    spendlens(&data)
        .args(["budget", "set", "Groceries", "200", "--month", "2024-01"])
        .assert()
        .success();

    spendlens(&data)
        .arg("report")
        .arg(&statement)
        .assert()
        .success()
        .stdout(
            contains("Expenses by Category")
                .and(contains("Groceries"))
                .and(contains("Uncategorized"))
                .and(contains("₹52.30"))
                .and(contains("₹147.70 left"))
                .and(contains(" - ")),
        );
}

#[test]
fn report_json_output() {
    let data = TempDir::new().unwrap();
    let statement = write_statement(&data, "statement.csv", STATEMENT);
    add_groceries(&data);

    let output = spendlens(&data)
        .arg("report")
        .arg(&statement)
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert!(json.get("schema_version").is_some());
    assert!(json["summary"].as_array().unwrap().len() >= 2);
    assert!(String::from_utf8(output).unwrap().contains("Groceries"));
}

#[test]
fn report_writes_transactions_csv() {
    let data = TempDir::new().unwrap();
    let statement = write_statement(&data, "statement.csv", STATEMENT);
    let out = data.path().join("categorized.csv");
    add_groceries(&data);

    spendlens(&data)
        .arg("report")
        .arg(&statement)
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let written = fs::read_to_string(&out).unwrap();
    assert!(written.starts_with("Row,Date,Description,Amount,Direction,Category"));
    assert!(written.contains("Groceries"));
}

#[test]
fn report_counts_skipped_rows() {
    let data = TempDir::new().unwrap();
    let statement = write_statement(
        &data,
        "statement.csv",
        "Date,Description,Amount\n\
         2024-01-05,WALMART #123,-52.30\n\
         not a date,MYSTERY,-1.00\n",
    );

    spendlens(&data)
        .arg("report")
        .arg(&statement)
        .assert()
        .success()
        .stdout(contains("1 rows skipped").and(contains("row 2")));
}

#[test]
fn report_reads_xlsx_statement() {
    let data = TempDir::new().unwrap();
    let statement = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/statement.xlsx");
    add_groceries(&data);

    spendlens(&data)
        .arg("report")
        .arg(&statement)
        .assert()
        .success()
        .stdout(
            contains("Groceries")
                .and(contains("₹52.30"))
                .and(contains("₹2000.00"))
                .and(contains("rows skipped").not()),
        );
}

#[test]
fn report_missing_columns_fails() {
    let data = TempDir::new().unwrap();
    let statement = write_statement(&data, "statement.csv", "Foo,Bar\n1,2\n");

    spendlens(&data)
        .arg("report")
        .arg(&statement)
        .assert()
        .failure()
        .stderr(contains("Missing required columns"));
}

#[test]
fn transactions_filtered_by_direction() {
    let data = TempDir::new().unwrap();
    let statement = write_statement(&data, "statement.csv", STATEMENT);
    add_groceries(&data);

    spendlens(&data)
        .arg("transactions")
        .arg(&statement)
        .args(["--direction", "credit"])
        .assert()
        .success()
        .stdout(
            contains("PAYCHECK")
                .and(contains("WALMART").not())
                .and(contains("1 transactions shown")),
        );
}

#[test]
fn history_lists_edits() {
    let data = TempDir::new().unwrap();
    add_groceries(&data);
    spendlens(&data)
        .args(["category", "add-keyword", "Groceries", "kroger"])
        .assert()
        .success();

    spendlens(&data)
        .arg("history")
        .assert()
        .success()
        .stdout(
            contains("CREATE Category Groceries")
                .and(contains("UPDATE Category Groceries"))
                .and(contains("+kroger")),
        );
}

#[test]
fn config_shows_data_dir() {
    let data = TempDir::new().unwrap();

    spendlens(&data)
        .arg("config")
        .assert()
        .success()
        .stdout(contains("Currency symbol: ₹"));
}
