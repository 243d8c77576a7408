use crate::core::detect::{detect, detect_by_content, headers};
use crate::core::selection::column_letter;
use crate::core::{scan as scan_workbook, Marketplace, PreviewJob};
use crate::error::{PreviewError, PreviewResult};
use crate::excel::{default_output_path, WorkbookLoader, WorkbookWriter};
use crate::types::{ColumnId, Dimensions, Mode, UrlPolicy};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Job settings collected from the command line. Anything left unset falls
/// back to the job file (if given) and then to the defaults.
#[derive(Debug, Clone, Default)]
pub struct JobOptions {
    pub config: Option<PathBuf>,
    pub sheets: Vec<String>,
    pub columns: Vec<String>,
    pub column_letters: Vec<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub adjacent: bool,
    pub no_notes: bool,
    pub lenient: bool,
    pub header_row: Option<u32>,
    pub marketplace: Option<Marketplace>,
    pub no_preserve_headers: bool,
    pub no_resize: bool,
}

impl JobOptions {
    /// Merge the flags over the job file (or the defaults)
    pub fn build_job(&self) -> PreviewResult<PreviewJob> {
        let mut job = match &self.config {
            Some(path) => PreviewJob::from_yaml_file(path)?,
            None => PreviewJob::default(),
        };

        if !self.sheets.is_empty() {
            job.sheets = self.sheets.clone();
        }
        if !self.columns.is_empty() || !self.column_letters.is_empty() {
            job.columns = self
                .columns
                .iter()
                .map(|h| ColumnId::Header(h.clone()))
                .chain(self.column_letters.iter().map(|l| ColumnId::Letter(l.clone())))
                .collect();
        }

        let size = job.rewrite.size;
        job.rewrite.size = Dimensions::new(
            self.width.unwrap_or(size.width),
            self.height.unwrap_or(size.height),
        );
        if self.adjacent {
            job.rewrite.mode = Mode::InsertAdjacent;
        }
        if self.no_notes {
            job.rewrite.keep_notes = false;
        }
        if self.lenient {
            job.rewrite.url_policy = UrlPolicy::Lenient;
        }
        if let Some(row) = self.header_row {
            job.rewrite.header_row = row;
        }
        if let Some(marketplace) = self.marketplace {
            job.marketplace = marketplace;
        }
        if self.no_preserve_headers {
            job.keep_header_heights = false;
        }
        if self.no_resize {
            job.adjust_grid = false;
        }

        job.rewrite.validate()?;
        Ok(job)
    }
}

/// Load an .xlsx workbook, rejecting other formats up front
fn load_workbook(input: &Path) -> PreviewResult<crate::types::Workbook> {
    if !is_xlsx(input) {
        return Err(PreviewError::Config(format!(
            "only .xlsx workbooks are supported: {}",
            input.display()
        )));
    }
    WorkbookLoader::new(input).load()
}

fn mode_label(mode: Mode) -> &'static str {
    match mode {
        Mode::ReplaceInPlace => "replace in place",
        Mode::InsertAdjacent => "new adjacent column",
    }
}

/// Execute the convert command
pub fn convert(
    input: PathBuf,
    output: Option<PathBuf>,
    options: &JobOptions,
    dry_run: bool,
    verbose: bool,
) -> PreviewResult<()> {
    let output = output.unwrap_or_else(|| default_output_path(&input));
    if same_location(&output, &input) {
        return Err(PreviewError::Config(
            "output path must differ from the input workbook".to_string(),
        ));
    }

    let job = options.build_job()?;

    println!("{}", "🖼️  xlsx-preview - Converting image URLs".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}", output.display());
    println!(
        "   Size:   {}x{} px, {}",
        job.rewrite.size.width,
        job.rewrite.size.height,
        mode_label(job.rewrite.mode)
    );
    println!();

    if dry_run {
        println!(
            "{}",
            "📋 DRY RUN MODE - No file will be written\n".yellow()
        );
    }

    if verbose {
        println!("{}", "📖 Reading Excel file...".cyan());
    }
    let mut workbook = load_workbook(&input)?;
    if verbose {
        println!("   Found {} sheets\n", workbook.sheets.len());
        println!("{}", "🔗 Rewriting URL cells...".cyan());
    }

    let report = job.run(&mut workbook)?;

    println!("{}", "✅ Rewrite Results:".bold().green());
    if report.sheets.is_empty() {
        println!("{}", "   ⚠️  No URL columns found".yellow());
    }
    for sheet in &report.sheets {
        let columns: Vec<String> = sheet
            .preview_columns
            .iter()
            .map(|&c| column_letter(c))
            .collect();
        println!(
            "   📊 Sheet: {}  converted: {}  skipped: {}  preview columns: {}",
            sheet.sheet.bright_blue().bold(),
            sheet.converted.to_string().green(),
            sheet.skipped.to_string().yellow(),
            columns.join(", ")
        );
    }
    println!();

    if dry_run {
        println!("{}", "📋 Dry run complete - no changes written".yellow());
        return Ok(());
    }

    if verbose {
        println!("{}", "💾 Writing Excel file...".cyan());
    }
    WorkbookWriter::new(&workbook).save(&output)?;

    println!("{}", "✅ Done!".bold().green());
    println!(
        "   {} cells converted, {} skipped",
        report.converted(),
        report.skipped()
    );
    println!("   Excel file: {}\n", output.display());

    Ok(())
}

/// Execute the scan command - count URL cells without writing anything
pub fn scan(input: PathBuf, options: &JobOptions, json: bool) -> PreviewResult<()> {
    let job = options.build_job()?;
    let workbook = load_workbook(&input)?;
    let rows = scan_workbook(&workbook, &job)?;

    if json {
        let out = serde_json::to_string_pretty(&rows)
            .map_err(|e| PreviewError::Config(format!("Failed to encode JSON: {}", e)))?;
        println!("{out}");
        return Ok(());
    }

    println!("{}", "🔍 xlsx-preview - URL Scan".bold().green());
    println!("   File: {}\n", input.display());
    println!("   {:<24} {:>8} {:>10}", "Sheet", "Columns", "URL cells");
    println!("   {}", "─".repeat(44));
    for row in &rows {
        println!(
            "   {:<24} {:>8} {:>10}",
            row.sheet,
            row.columns.len(),
            row.url_cells
        );
        if !row.columns.is_empty() {
            println!("      {}", row.columns.join(", ").cyan());
        }
    }
    let total: usize = rows.iter().map(|r| r.url_cells).sum();
    println!("   {}", "─".repeat(44));
    println!("   Total URL cells: {}\n", total.to_string().bold());

    Ok(())
}

/// Execute the detect command - list suggested URL columns of one sheet
pub fn detect_columns(
    input: PathBuf,
    sheet: Option<String>,
    header_row: u32,
    lenient: bool,
) -> PreviewResult<()> {
    let workbook = load_workbook(&input)?;
    let sheet = match sheet {
        Some(name) => workbook
            .sheet(&name)
            .ok_or(PreviewError::UnknownSheet(name))?,
        None => workbook
            .sheets
            .first()
            .ok_or_else(|| PreviewError::Load("Workbook has no sheets".to_string()))?,
    };

    let policy = if lenient {
        UrlPolicy::Lenient
    } else {
        UrlPolicy::Strict
    };
    let labels = headers(sheet, header_row);
    let by_name = detect(&labels);
    let by_content = detect_by_content(sheet, header_row, policy);

    println!("{}", "🔎 xlsx-preview - Column Detection".bold().green());
    println!("   File:  {}", input.display());
    println!("   Sheet: {}\n", sheet.name.bright_blue().bold());

    for (idx, label) in labels.iter().enumerate() {
        let col = idx as u16;
        let mut hints = Vec::new();
        if by_name.contains(&col) {
            hints.push("name");
        }
        if by_content.contains(&col) {
            hints.push("content");
        }
        if hints.is_empty() {
            continue;
        }
        println!(
            "   {:>4}  {}  ({})",
            column_letter(col),
            label.cyan(),
            hints.join(" + ")
        );
    }

    if by_name.is_empty() && by_content.is_empty() {
        println!("{}", "   ⚠️  No URL columns detected".yellow());
    }
    println!();

    Ok(())
}

/// True when both paths name the same file, however they are spelled.
/// Paths that do not exist yet are compared through their parent directory.
fn same_location(a: &Path, b: &Path) -> bool {
    resolve_location(a) == resolve_location(b)
}

fn resolve_location(path: &Path) -> PathBuf {
    if let Ok(full) = path.canonicalize() {
        return full;
    }
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    match (parent.canonicalize(), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

/// True when `path` has an .xlsx extension
pub fn is_xlsx(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("xlsx"))
}
