use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use xlsx_preview::cli::{self, JobOptions};
use xlsx_preview::core::Marketplace;

#[derive(Parser)]
#[command(name = "xlsx-preview")]
#[command(about = "Turn image URL columns in Excel workbooks into inline IMAGE() previews.")]
#[command(long_about = "xlsx-preview - Inline image previews for Excel masterfiles

Rewrites cells holding image URLs into Excel's IMAGE() formula so the
pictures render inside the cells when the workbook is opened in Excel.

COMMANDS:
  convert   - Rewrite URL columns and save a new workbook
  scan      - Count URL cells per sheet without writing anything
  detect    - Suggest which columns hold image URLs

EXAMPLES:
  xlsx-preview convert masterfile.xlsx                  # auto-detect, all sheets
  xlsx-preview convert items.xlsx -c \"Main Image\" --adjacent
  xlsx-preview convert items.xlsx --width 100 --height 100 --marketplace amazon
  xlsx-preview scan items.xlsx --json

Set RUST_LOG=xlsx_preview=debug for detailed logs.")]
#[command(version)]
struct Cli {
    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Sheet, column and sizing options shared by convert and scan
#[derive(Args, Debug, Clone)]
struct SelectionArgs {
    /// YAML job file; flags given on the command line take precedence
    #[arg(long, env = "XLSX_PREVIEW_CONFIG")]
    config: Option<PathBuf>,

    /// Sheet to process (repeatable, default: all sheets)
    #[arg(short, long = "sheet")]
    sheets: Vec<String>,

    /// URL column by header text (repeatable, default: auto-detect)
    #[arg(short, long = "column")]
    columns: Vec<String>,

    /// URL column by letter, e.g. F (repeatable)
    #[arg(long = "column-letter")]
    column_letters: Vec<String>,

    /// Image width in pixels (default: 140)
    #[arg(long)]
    width: Option<u32>,

    /// Image height in pixels (default: 140)
    #[arg(long)]
    height: Option<u32>,

    /// Keep URL columns and write previews into new *_preview columns
    #[arg(short, long)]
    adjacent: bool,

    /// Do not attach the original URL as a cell note
    #[arg(long)]
    no_notes: bool,

    /// Also accept scheme-less URLs like cdn.example.com/a.jpg
    #[arg(long)]
    lenient: bool,

    /// Row holding the column headers, 1-based (default: 1)
    #[arg(long)]
    header_row: Option<u32>,

    /// Template preset deciding how many top rows keep their height:
    /// walmart (6), target-mirakl (2), ebay (1), amazon (4), none (0)
    #[arg(short, long)]
    marketplace: Option<Marketplace>,

    /// Resize all rows, including the marketplace header rows
    #[arg(long)]
    no_preserve_headers: bool,

    /// Leave column widths and row heights unchanged
    #[arg(long)]
    no_resize: bool,
}

impl From<SelectionArgs> for JobOptions {
    fn from(args: SelectionArgs) -> Self {
        JobOptions {
            config: args.config,
            sheets: args.sheets,
            columns: args.columns,
            column_letters: args.column_letters,
            width: args.width,
            height: args.height,
            adjacent: args.adjacent,
            no_notes: args.no_notes,
            lenient: args.lenient,
            header_row: args.header_row,
            marketplace: args.marketplace,
            no_preserve_headers: args.no_preserve_headers,
            no_resize: args.no_resize,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Rewrite image URL cells into IMAGE() formulas.

By default every sheet is processed, URL columns are auto-detected from
their contents (preferring columns with image-like headers), and each URL cell
is replaced by =IMAGE(\"<url>\",\"\",3,<height>,<width>) with the original
URL kept as a cell note.

With --adjacent the URL column is left intact and a <header>_preview
column is inserted to its right. Running again reuses that column.

The output defaults to <input>-preview.xlsx next to the input file.")]
    /// Rewrite URL columns and save a new workbook
    Convert {
        /// Input workbook (.xlsx)
        input: PathBuf,

        /// Output workbook (default: <input>-preview.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Show what would change without writing a file
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// Count URL cells per sheet without writing anything
    Scan {
        /// Input workbook (.xlsx)
        input: PathBuf,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Suggest which columns hold image URLs
    Detect {
        /// Input workbook (.xlsx)
        input: PathBuf,

        /// Sheet to inspect (default: first sheet)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Row holding the column headers, 1-based
        #[arg(long, default_value = "1")]
        header_row: u32,

        /// Also accept scheme-less URLs when sampling contents
        #[arg(long)]
        lenient: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "xlsx_preview=debug"
    } else {
        "xlsx_preview=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Convert {
            input,
            output,
            selection,
            dry_run,
        } => cli::convert(
            input.clone(),
            output,
            &selection.into(),
            dry_run,
            cli.verbose,
        )
        .with_context(|| format!("failed to convert {}", input.display())),

        Commands::Scan {
            input,
            selection,
            json,
        } => cli::scan(input.clone(), &selection.into(), json)
            .with_context(|| format!("failed to scan {}", input.display())),

        Commands::Detect {
            input,
            sheet,
            header_row,
            lenient,
        } => cli::detect_columns(input.clone(), sheet, header_row, lenient)
            .with_context(|| format!("failed to inspect {}", input.display())),
    }
}
