use crate::config::ReportConfig;
use crate::core::{generate, output_file_name, GeneratedReport, SkippedInput};
use crate::error::{ReportError, ReportResult};
use crate::types::{Category, ReportTable};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const SPREADSHEET_EXTENSIONS: &[&str] = &["xls", "xlsx", "xlsm"];

/// Where and how a generated report is delivered
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    /// Output path; defaults to the conventional report name in the working directory
    pub output: Option<PathBuf>,
    /// Print the table instead of writing a file
    pub dry_run: bool,
    /// Print the table as JSON
    pub json: bool,
}

/// Execute the sales command
pub fn sales(
    file: PathBuf,
    key: Option<PathBuf>,
    config: &ReportConfig,
    out: &OutputOptions,
) -> ReportResult<()> {
    if !out.json {
        println!("{}", "📊 xlreport - Sales Report".bold().green());
        println!("   File: {}", file.display());
        if let Some(ref k) = key {
            println!("   Key:  {}", k.display());
        }
        println!();
    }

    let kind = config.kind_for(Category::Sales);
    let report = generate(&kind, std::slice::from_ref(&file), key.as_ref())?;

    let default_name = output_file_name(Category::Sales, Some(&file));
    deliver(&report, &default_name, out)
}

/// Execute the manufactured command
pub fn manufactured(
    inputs: Vec<PathBuf>,
    config: &ReportConfig,
    out: &OutputOptions,
) -> ReportResult<()> {
    let files = collect_inputs(&inputs)?;

    if !out.json {
        println!("{}", "🏭 xlreport - Manufactured Report".bold().green());
        println!("   Inputs: {} file(s)", files.len());
        println!();
    }

    let kind = config.kind_for(Category::Manufactured);
    let report = generate(&kind, &files, None)?;

    let default_name = output_file_name(Category::Manufactured, None);
    deliver(&report, &default_name, out)
}

/// Expand directories into the spreadsheets they contain.
///
/// Directories are walked recursively and filtered by extension; explicitly
/// named files are taken as given. Order is input order, with each
/// directory's files sorted by path.
pub fn collect_inputs(paths: &[PathBuf]) -> ReportResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut found = Vec::new();
            walk_spreadsheets(path, &mut found)?;
            found.sort();
            debug!(dir = %path.display(), files = found.len(), "collected spreadsheets");
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }

    if files.is_empty() {
        return Err(ReportError::NoInputSelected);
    }
    Ok(files)
}

fn walk_spreadsheets(dir: &Path, found: &mut Vec<PathBuf>) -> ReportResult<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk_spreadsheets(&path, found)?;
        } else if is_spreadsheet(&path) {
            found.push(path);
        }
    }
    Ok(())
}

fn is_spreadsheet(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("~$") || n.starts_with('.'));
    let matches_ext = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| {
            SPREADSHEET_EXTENSIONS
                .iter()
                .any(|known| e.eq_ignore_ascii_case(known))
        });
    matches_ext && !hidden
}

/// Print or write a finished report
fn deliver(report: &GeneratedReport, default_name: &str, out: &OutputOptions) -> ReportResult<()> {
    if out.json {
        let json = serde_json::to_string_pretty(&report.table)
            .map_err(|e| ReportError::Export(format!("Failed to encode JSON: {}", e)))?;
        println!("{}", json);
        print_skipped(&report.skipped);
        return Ok(());
    }

    print_skipped(&report.skipped);

    if out.dry_run {
        println!("{}", "📋 DRY RUN - no file written\n".yellow());
        print_table(&report.table);
        return Ok(());
    }

    let output = out
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(default_name));
    report.write(&output)?;

    println!("{}", "✅ Report Complete!".bold().green());
    println!("   Sheet: {}", report.sheet_name);
    println!("   Rows:  {}", report.table.row_count());
    println!("   Excel file: {}\n", output.display());

    Ok(())
}

/// Skipped inputs go to stderr so JSON output stays parseable
fn print_skipped(skipped: &[SkippedInput]) {
    if skipped.is_empty() {
        return;
    }
    eprintln!(
        "{}",
        format!("⚠️  Skipped {} input(s):", skipped.len()).yellow()
    );
    for s in skipped {
        eprintln!("   {} {}: {}", "❌".red(), s.name, s.error);
    }
    eprintln!();
}

/// Render a table with padded columns
fn print_table(table: &ReportTable) {
    let rows: Vec<Vec<String>> = table
        .to_rows()
        .iter()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect();

    let mut widths = vec![0; table.width()];
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    for (row_idx, row) in rows.iter().enumerate() {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<width$}", cell, width = w))
            .collect::<Vec<_>>()
            .join("  ");
        if row_idx == 0 {
            println!("   {}", line.bold().cyan());
            println!("   {}", "─".repeat(line.chars().count()));
        } else {
            println!("   {}", line);
        }
    }
    println!();
}
