use crate::error::{PreviewError, PreviewResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

//==============================================================================
// Cells
//==============================================================================

/// The value held by a single worksheet cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Date or time as an Excel serial number
    DateTime(f64),
    /// Elapsed time in days, shown as `[h]:mm:ss`
    Duration(f64),
    /// Formula text, always with a leading `=`
    Formula(String),
    /// Error literal such as `#N/A`
    Error(String),
}

impl CellValue {
    pub fn text<S: Into<String>>(s: S) -> Self {
        CellValue::Text(s.into())
    }

    /// Create a formula value, adding the leading `=` if it is missing
    pub fn formula<S: Into<String>>(s: S) -> Self {
        let s = s.into();
        if s.starts_with('=') {
            CellValue::Formula(s)
        } else {
            CellValue::Formula(format!("={s}"))
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    pub fn is_formula(&self) -> bool {
        matches!(self, CellValue::Formula(_))
    }

    /// Plain text content, if this is a text cell
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) | CellValue::Formula(s) | CellValue::Error(s) => write!(f, "{s}"),
            CellValue::Number(n) | CellValue::DateTime(n) | CellValue::Duration(n) => {
                write!(f, "{n}")
            }
            CellValue::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
        }
    }
}

/// A cell: its value plus an optional note (Excel comment)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cell {
    pub value: CellValue,
    pub note: Option<String>,
}

impl Cell {
    pub fn new(value: CellValue) -> Self {
        Self { value, note: None }
    }
}

impl From<CellValue> for Cell {
    fn from(value: CellValue) -> Self {
        Cell::new(value)
    }
}

static EMPTY: CellValue = CellValue::Empty;

//==============================================================================
// Sheets and workbooks
//==============================================================================

/// A worksheet held fully in memory as a dense grid of 0-based (row, col) cells
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
    /// Column widths in Excel character units
    pub column_widths: BTreeMap<u16, f64>,
    /// Row heights in points
    pub row_heights: BTreeMap<u32, f64>,
}

impl Sheet {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Build a sheet from plain values, row by row
    pub fn from_rows<S: Into<String>>(name: S, rows: Vec<Vec<CellValue>>) -> Self {
        let mut sheet = Sheet::new(name);
        sheet.rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Cell::new).collect())
            .collect();
        sheet
    }

    pub fn row_count(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Width of the widest row
    pub fn column_count(&self) -> u16 {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0) as u16
    }

    pub fn get(&self, row: u32, col: u16) -> Option<&Cell> {
        self.rows
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
    }

    /// Value at (row, col); cells outside the grid read as empty
    pub fn value(&self, row: u32, col: u16) -> &CellValue {
        self.get(row, col).map(|c| &c.value).unwrap_or(&EMPTY)
    }

    /// Mutable access to a cell, growing the grid as needed
    pub fn cell_mut(&mut self, row: u32, col: u16) -> &mut Cell {
        let (row, col) = (row as usize, col as usize);
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize_with(col + 1, Cell::default);
        }
        &mut cells[col]
    }

    pub fn set(&mut self, row: u32, col: u16, value: CellValue) {
        self.cell_mut(row, col).value = value;
    }

    pub fn set_note<S: Into<String>>(&mut self, row: u32, col: u16, note: S) {
        self.cell_mut(row, col).note = Some(note.into());
    }

    /// Insert an empty column at `at`, shifting that column and everything
    /// to its right one position over. Column widths shift with their columns.
    pub fn insert_column(&mut self, at: u16) {
        let idx = at as usize;
        for row in &mut self.rows {
            if row.len() > idx {
                row.insert(idx, Cell::default());
            }
        }

        let shifted: BTreeMap<u16, f64> = self
            .column_widths
            .iter()
            .map(|(&col, &w)| if col >= at { (col + 1, w) } else { (col, w) })
            .collect();
        self.column_widths = shifted;
    }

    pub fn set_column_width(&mut self, col: u16, width: f64) {
        self.column_widths.insert(col, width);
    }

    pub fn set_row_height(&mut self, row: u32, height: f64) {
        self.row_heights.insert(row, height);
    }
}

/// An ordered collection of sheets
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sheet(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.name == name)
    }
}

//==============================================================================
// Rewrite configuration
//==============================================================================

/// Identifies a column of a sheet
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnId {
    /// 0-based column index
    Index(u16),
    /// Excel column letters, e.g. `C` or `AA`
    Letter(String),
    /// Header text in the header row (compared after trimming)
    Header(String),
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnId::Index(i) => write!(f, "#{i}"),
            ColumnId::Letter(l) => write!(f, "{l}"),
            ColumnId::Header(h) => write!(f, "{h}"),
        }
    }
}

/// Target display size of a preview image, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn validate(&self) -> PreviewResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PreviewError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Edge length used for sizing the grid around a preview
    pub fn cell_px(&self) -> u32 {
        self.width.max(self.height)
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::new(140, 140)
    }
}

/// Where the preview formula is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Overwrite the URL cell with the formula
    #[default]
    ReplaceInPlace,
    /// Keep the URL cell and write the formula into a new column to its right
    InsertAdjacent,
}

/// Which cell texts count as image URLs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlPolicy {
    /// Only `http://` and `https://` URLs
    #[default]
    Strict,
    /// Also scheme-less hosts such as `cdn.example.com/a.jpg`, normalized to https
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    pub size: Dimensions,
    pub mode: Mode,
    /// 1-based row holding column headers; data starts on the next row
    pub header_row: u32,
    /// Attach the original URL as a note when rewriting in place
    pub keep_notes: bool,
    pub url_policy: UrlPolicy,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            size: Dimensions::default(),
            mode: Mode::default(),
            header_row: 1,
            keep_notes: true,
            url_policy: UrlPolicy::default(),
        }
    }
}

impl RewriteConfig {
    pub fn validate(&self) -> PreviewResult<()> {
        self.size.validate()?;
        if self.header_row == 0 {
            return Err(PreviewError::Config(
                "header row is 1-based and must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// 0-based index of the header row
    pub fn header_index(&self) -> u32 {
        self.header_row.saturating_sub(1)
    }
}

//==============================================================================
// Reports
//==============================================================================

/// Outcome of rewriting one sheet
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SheetReport {
    pub sheet: String,
    /// Source URL columns (0-based, positions before any insertion)
    pub target_columns: Vec<u16>,
    /// Columns now holding preview formulas (0-based, final positions)
    pub preview_columns: Vec<u16>,
    pub converted: usize,
    /// Non-empty cells in target columns that were not URLs
    pub skipped: usize,
}
