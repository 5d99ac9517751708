use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use xlreport::cli::{self, OutputOptions};
use xlreport::config::{BatchLayout, FailurePolicy, ReportConfig};
use xlreport::core::dates::MonthFormat;

#[derive(Parser)]
#[command(name = "xlreport")]
#[command(about = "Turn operational spreadsheets into summary Excel reports.")]
#[command(long_about = "xlreport - Spreadsheet report generator

Reads Excel workbooks (.xls, .xlsx, .xlsm) and writes a single-sheet
.xlsx summary report.

COMMANDS:
  sales         - Monthly product quantities from a sales log
  manufactured  - One row per production batch sheet

CONFIGURATION:
  Settings are read from a YAML file given with --config (or the
  XLREPORT_CONFIG environment variable). Command-line flags win.

LOGGING:
  Diagnostics go to stderr. Use -v for debug output or set RUST_LOG.

EXAMPLES:
  xlreport sales may.xlsx                       # Writes mayReport.xlsx
  xlreport sales may.xlsx --key products.xlsx   # Only products in the key
  xlreport manufactured batches/                # Writes ManufacturedReport.xlsx
  xlreport manufactured a.xlsx b.xlsx --dry-run # Preview the combined table")]
#[command(version)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true, env = "XLREPORT_CONFIG")]
    config: Option<PathBuf>,

    /// Show debug diagnostics on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Build a monthly sales report.

The first sheet holds one transaction per row: a date in column A and a
purchase description in column B, e.g. \"5 ABC10 3 XYZ-2\". Quantities
are summed per product and calendar month.

Without --key, every product mentioned anywhere in the log is reported.
With --key, only product codes listed in the key workbook's first column
are counted.

Output: <input stem>Report.xlsx with a single \"Sales Report\" sheet.")]
    /// Build a monthly sales report from a transaction log
    Sales {
        /// Transaction workbook
        file: PathBuf,

        /// Workbook whose first column lists the product codes to count
        #[arg(short, long)]
        key: Option<PathBuf>,

        /// The key sheet's first row is a header
        #[arg(long)]
        key_header: bool,

        /// Month column labels: long ("May 2024") or short ("May")
        #[arg(long, value_enum)]
        month_format: Option<MonthFormat>,

        /// Also accept numeric serial dates in the date column
        #[arg(long)]
        serial_dates: bool,

        /// Output file (default: <input stem>Report.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the report table instead of writing a file
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Print the report table as JSON
        #[arg(long)]
        json: bool,
    },

    #[command(long_about = "Combine production batch sheets into one report.

Each input workbook contributes one row: product name (cell A1), the
manufacture date, lot number and lot size. Fields are found by their
labels (\"lot #\", \"date\", \"kit lot size\", ...) and read from the
cell to the right.

With --fixed-cells, fields are read from fixed addresses on the
\"Batch Record\" sheet (B2, B3, B4 unless configured otherwise).

Directories are searched recursively for spreadsheets. Inputs that
cannot be read are listed and skipped unless --abort-on-error is set.

Output: ManufacturedReport.xlsx with a single \"Combined Report\" sheet.")]
    /// Combine production batch workbooks into one report
    Manufactured {
        /// Workbooks or directories of workbooks
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Read fields from fixed cell addresses instead of scanning labels
        #[arg(long)]
        fixed_cells: bool,

        /// Stop at the first input that cannot be used
        #[arg(long)]
        abort_on_error: bool,

        /// Output file (default: ManufacturedReport.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the report table instead of writing a file
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Print the report table as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "xlreport=debug"
    } else {
        "xlreport=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match cli.config {
        Some(ref path) => ReportConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ReportConfig::default(),
    };

    match cli.command {
        Commands::Sales {
            file,
            key,
            key_header,
            month_format,
            serial_dates,
            output,
            dry_run,
            json,
        } => {
            if let Some(format) = month_format {
                config.sales.month_format = format;
            }
            config.sales.serial_dates |= serial_dates;
            config.sales.key_has_header |= key_header;

            let out = OutputOptions {
                output,
                dry_run,
                json,
            };
            cli::sales(file, key, &config, &out)?;
        }

        Commands::Manufactured {
            inputs,
            fixed_cells,
            abort_on_error,
            output,
            dry_run,
            json,
        } => {
            if fixed_cells {
                config.manufactured.layout = BatchLayout::FixedCells;
            }
            if abort_on_error {
                config.manufactured.on_failure = FailurePolicy::Abort;
            }

            let out = OutputOptions {
                output,
                dry_run,
                json,
            };
            cli::manufactured(inputs, &config, &out)?;
        }
    }

    Ok(())
}
