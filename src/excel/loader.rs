//! Workbook loader: Excel (.xlsx) → in-memory [`Workbook`]

use crate::core::formula::strip_future_prefix;
use crate::error::{PreviewError, PreviewResult};
use crate::types::{CellValue, Sheet, Workbook};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Error values a cell can hold; written back as `=<literal>` formulas
const ERROR_LITERALS: [&str; 8] = [
    "#NULL!",
    "#DIV/0!",
    "#VALUE!",
    "#REF!",
    "#NAME?",
    "#NUM!",
    "#N/A",
    "#GETTING_DATA",
];

/// Reads every worksheet of an .xlsx file into a [`Workbook`]
pub struct WorkbookLoader {
    path: PathBuf,
}

impl WorkbookLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self) -> PreviewResult<Workbook> {
        if !self.path.exists() {
            return Err(PreviewError::Load(format!(
                "File not found: {}",
                self.path.display()
            )));
        }
        let xlsx: Xlsx<_> = open_workbook(&self.path)
            .map_err(|e| PreviewError::Load(format!("Failed to open Excel file: {}", e)))?;
        read_workbook(xlsx)
    }

    /// Load from an in-memory upload
    pub fn load_bytes(bytes: Vec<u8>) -> PreviewResult<Workbook> {
        let xlsx = Xlsx::new(Cursor::new(bytes))
            .map_err(|e| PreviewError::Load(format!("Failed to read Excel data: {}", e)))?;
        read_workbook(xlsx)
    }
}

fn read_workbook<RS: Read + Seek>(mut xlsx: Xlsx<RS>) -> PreviewResult<Workbook> {
    let mut workbook = Workbook::new();

    for name in xlsx.sheet_names() {
        let values = xlsx
            .worksheet_range(&name)
            .map_err(|e| PreviewError::Load(format!("Failed to read sheet '{}': {}", name, e)))?;

        let formulas = match xlsx.worksheet_formula(&name) {
            Ok(range) => Some(range),
            Err(e) => {
                warn!(sheet = %name, error = %e, "could not read formulas, keeping cached values");
                None
            }
        };

        let sheet = read_sheet(&name, &values, formulas.as_ref());
        debug!(
            sheet = %name,
            rows = sheet.row_count(),
            columns = sheet.column_count(),
            "loaded sheet"
        );
        workbook.add_sheet(sheet);
    }

    Ok(workbook)
}

/// Build a sheet from calamine ranges; ranges carry their own start
/// offset, so cells land at their absolute positions
fn read_sheet(name: &str, values: &Range<Data>, formulas: Option<&Range<String>>) -> Sheet {
    let mut sheet = Sheet::new(name);

    if let Some((row0, col0)) = values.start() {
        for (r, c, data) in values.cells() {
            let value = convert_data(data);
            if !matches!(value, CellValue::Empty) {
                sheet.set(row0 + r as u32, (col0 as usize + c) as u16, value);
            }
        }
    }

    if let Some(formulas) = formulas {
        if let Some((row0, col0)) = formulas.start() {
            for (r, c, formula) in formulas.cells() {
                if formula.is_empty() {
                    continue;
                }
                let value = match error_literal(formula) {
                    Some(error) => CellValue::Error(error.to_string()),
                    None => CellValue::formula(strip_future_prefix(formula)),
                };
                sheet.set(row0 + r as u32, (col0 as usize + c) as u16, value);
            }
        }
    }

    sheet
}

/// Convert a calamine cell into a [`CellValue`]
fn convert_data(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) if dt.is_duration() => CellValue::Duration(dt.as_f64()),
        Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
        #[allow(unreachable_patterns)]
        other => CellValue::Text(other.to_string()),
    }
}

/// The error literal a formula consists of, e.g. `#N/A` for `=#N/A`
fn error_literal(formula: &str) -> Option<&'static str> {
    let body = formula.trim().trim_start_matches('=').trim();
    ERROR_LITERALS
        .iter()
        .copied()
        .find(|e| e.eq_ignore_ascii_case(body))
}
