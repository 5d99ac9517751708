//! CLI Integration Tests
//!
//! Runs the xlreport binary against workbooks written into temporary
//! directories.

#![allow(deprecated)] // Command::cargo_bin deprecation - no stable replacement yet

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use xlreport::excel::ExcelImporter;

fn xlreport() -> Command {
    let mut cmd = Command::cargo_bin("xlreport").unwrap();
    cmd.env_remove("XLREPORT_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn write_sales_log(path: &Path) {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Date").unwrap();
    sheet.write_string(0, 1, "Purchase").unwrap();
    sheet.write_string(1, 0, "2024-05-01").unwrap();
    sheet.write_string(1, 1, "5 ABC10 3 XYZ-2").unwrap();
    sheet.write_string(2, 0, "2024-04-11").unwrap();
    sheet.write_string(2, 1, "2 ABC10").unwrap();
    workbook.save(path).unwrap();
}

fn write_key(path: &Path) {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    workbook
        .add_worksheet()
        .write_string(0, 0, "XYZ-2")
        .unwrap();
    workbook.save(path).unwrap();
}

fn write_batch(path: &Path, product: &str, lot: &str) {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, product).unwrap();
    sheet.write_string(1, 0, "lot number").unwrap();
    sheet.write_string(1, 1, lot).unwrap();
    sheet.write_string(2, 0, "manufacture date").unwrap();
    sheet.write_number(2, 1, 45413.0).unwrap();
    sheet.write_string(3, 0, "current lot size").unwrap();
    sheet.write_number(3, 1, 12.0).unwrap();
    workbook.save(path).unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════
// HELP AND VERSION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_cli_help() {
    xlreport()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("xlreport"))
        .stdout(predicate::str::contains("COMMANDS"));
}

#[test]
fn test_cli_version() {
    xlreport()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("xlreport"));
}

#[test]
fn test_cli_requires_subcommand() {
    xlreport().assert().failure();
}

#[test]
fn test_manufactured_requires_inputs() {
    xlreport().arg("manufactured").assert().failure();
}

// ═══════════════════════════════════════════════════════════════════════════
// SALES COMMAND
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_sales_writes_default_output() {
    let dir = TempDir::new().unwrap();
    write_sales_log(&dir.path().join("may.xlsx"));

    xlreport()
        .current_dir(dir.path())
        .args(["sales", "may.xlsx"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Report Complete"))
        .stdout(predicate::str::contains("mayReport.xlsx"));

    let written = ExcelImporter::open(&dir.path().join("mayReport.xlsx")).unwrap();
    assert_eq!(written.sheet_names(), vec!["Sales Report"]);
}

#[test]
fn test_sales_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    write_sales_log(&dir.path().join("may.xlsx"));

    xlreport()
        .current_dir(dir.path())
        .args(["sales", "may.xlsx", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DRY RUN"))
        .stdout(predicate::str::contains("April 2024"))
        .stdout(predicate::str::contains("ABC10"));

    assert!(!dir.path().join("mayReport.xlsx").exists());
}

#[test]
fn test_sales_json_with_key_and_short_months() {
    let dir = TempDir::new().unwrap();
    write_sales_log(&dir.path().join("may.xlsx"));
    write_key(&dir.path().join("key.xlsx"));

    let output = xlreport()
        .current_dir(dir.path())
        .args([
            "sales",
            "may.xlsx",
            "--key",
            "key.xlsx",
            "--month-format",
            "short",
            "--json",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        json["header"],
        serde_json::json!(["Product", "Apr", "May", "Total"])
    );
    assert_eq!(json["rows"], serde_json::json!([["XYZ-2", 0, 3, 3]]));
}

#[test]
fn test_sales_explicit_output_path() {
    let dir = TempDir::new().unwrap();
    write_sales_log(&dir.path().join("may.xlsx"));
    let out = dir.path().join("reports").join("custom.xlsx");
    fs::create_dir(dir.path().join("reports")).unwrap();

    xlreport()
        .current_dir(dir.path())
        .args(["sales", "may.xlsx", "-o"])
        .arg(&out)
        .assert()
        .success();

    assert!(out.exists());
}

#[test]
fn test_sales_missing_file_fails() {
    let dir = TempDir::new().unwrap();

    xlreport()
        .current_dir(dir.path())
        .args(["sales", "absent.xlsx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_sales_without_purchases_reports_no_data() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.xlsx");
    let mut workbook = rust_xlsxwriter::Workbook::new();
    workbook
        .add_worksheet()
        .write_string(0, 0, "Date")
        .unwrap();
    workbook.save(&path).unwrap();

    xlreport()
        .current_dir(dir.path())
        .args(["sales", "empty.xlsx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No data"));
}

// ═══════════════════════════════════════════════════════════════════════════
// MANUFACTURED COMMAND
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_manufactured_directory_input() {
    let dir = TempDir::new().unwrap();
    let batches = dir.path().join("batches");
    fs::create_dir(&batches).unwrap();
    write_batch(&batches.join("01.xlsx"), "Widget Kit", "L-1");
    write_batch(&batches.join("02.xlsx"), "Gadget Kit", "L-2");

    xlreport()
        .current_dir(dir.path())
        .args(["manufactured", "batches"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 file(s)"))
        .stdout(predicate::str::contains("ManufacturedReport.xlsx"));

    let written = ExcelImporter::open(&dir.path().join("ManufacturedReport.xlsx")).unwrap();
    let sheet = written.require_sheet("Combined Report").unwrap();
    assert_eq!(sheet.rows().len(), 3);
}

#[test]
fn test_manufactured_lists_skipped_inputs() {
    let dir = TempDir::new().unwrap();
    write_batch(&dir.path().join("good.xlsx"), "Widget Kit", "L-1");
    fs::write(dir.path().join("bad.xlsx"), b"not a workbook").unwrap();

    xlreport()
        .current_dir(dir.path())
        .args(["manufactured", "good.xlsx", "bad.xlsx", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Widget Kit"))
        .stderr(predicate::str::contains("Skipped 1 input"))
        .stderr(predicate::str::contains("bad.xlsx"));
}

#[test]
fn test_manufactured_abort_on_error() {
    let dir = TempDir::new().unwrap();
    write_batch(&dir.path().join("good.xlsx"), "Widget Kit", "L-1");
    fs::write(dir.path().join("bad.xlsx"), b"not a workbook").unwrap();

    xlreport()
        .current_dir(dir.path())
        .args(["manufactured", "good.xlsx", "bad.xlsx", "--abort-on-error"])
        .assert()
        .failure();

    assert!(!dir.path().join("ManufacturedReport.xlsx").exists());
}

#[test]
fn test_manufactured_empty_directory() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("nothing")).unwrap();

    xlreport()
        .current_dir(dir.path())
        .args(["manufactured", "nothing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No input"));
}

#[test]
fn test_manufactured_config_file_selects_fixed_cells() {
    let dir = TempDir::new().unwrap();
    write_batch(&dir.path().join("label.xlsx"), "Widget Kit", "L-1");
    fs::write(
        dir.path().join("xlreport.yaml"),
        "manufactured:\n  layout: fixed_cells\n",
    )
    .unwrap();

    // Label-scan workbooks have no "Batch Record" sheet under the fixed layout
    xlreport()
        .current_dir(dir.path())
        .args(["manufactured", "label.xlsx", "--config", "xlreport.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No data"));
}

#[test]
fn test_invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    write_sales_log(&dir.path().join("may.xlsx"));
    fs::write(dir.path().join("bad.yaml"), "sales:\n  month_format: weekly\n").unwrap();

    xlreport()
        .current_dir(dir.path())
        .env("XLREPORT_CONFIG", "bad.yaml")
        .args(["sales", "may.xlsx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}
