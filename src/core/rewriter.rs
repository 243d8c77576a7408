//! Cell rewriter: image URL cells → IMAGE() preview formulas
//!
//! A rewrite is a single pass over the data rows of one sheet. All inputs
//! are validated before the first cell is touched, so a failed rewrite
//! leaves the sheet exactly as it was.
//!
//! Cells that already hold a formula are never URL-like, which makes an
//! in-place rewrite of its own output a no-op. In adjacent mode a column
//! right of the source whose header ends in `_preview` and which holds only
//! IMAGE formulas is reused instead of inserting another one.

use crate::core::detect::header_text;
use crate::core::formula::{image_formula, is_image_formula};
use crate::core::selection::resolve_columns;
use crate::error::PreviewResult;
use crate::types::{
    CellValue, ColumnId, Dimensions, Mode, RewriteConfig, Sheet, SheetReport,
};
use crate::url;
use std::collections::BTreeSet;
use tracing::{debug, trace};

/// Suffix of the header written above an inserted preview column
pub const PREVIEW_SUFFIX: &str = "_preview";

/// Rewrite `url_columns` of `sheet` with default settings for everything
/// except `size` and `mode`
pub fn rewrite(
    sheet: &mut Sheet,
    url_columns: &[ColumnId],
    size: Dimensions,
    mode: Mode,
) -> PreviewResult<SheetReport> {
    let config = RewriteConfig {
        size,
        mode,
        ..Default::default()
    };
    CellRewriter::new(config).rewrite(sheet, url_columns)
}

/// Rewrites URL columns of a sheet according to a [`RewriteConfig`]
pub struct CellRewriter {
    config: RewriteConfig,
}

impl CellRewriter {
    pub fn new(config: RewriteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RewriteConfig {
        &self.config
    }

    /// Validate the selection against `sheet`, then rewrite it
    pub fn rewrite(&self, sheet: &mut Sheet, columns: &[ColumnId]) -> PreviewResult<SheetReport> {
        self.config.validate()?;
        let targets = resolve_columns(sheet, columns, self.config.header_row)?;
        Ok(self.rewrite_resolved(sheet, &targets))
    }

    /// Rewrite already-resolved, in-range column indices
    pub(crate) fn rewrite_resolved(&self, sheet: &mut Sheet, targets: &BTreeSet<u16>) -> SheetReport {
        let mut report = SheetReport {
            sheet: sheet.name.clone(),
            target_columns: targets.iter().copied().collect(),
            ..Default::default()
        };

        match self.config.mode {
            Mode::ReplaceInPlace => self.replace_in_place(sheet, targets, &mut report),
            Mode::InsertAdjacent => self.insert_adjacent(sheet, targets, &mut report),
        }

        debug!(
            sheet = %report.sheet,
            mode = ?self.config.mode,
            converted = report.converted,
            skipped = report.skipped,
            "rewrote sheet"
        );
        report
    }

    fn replace_in_place(&self, sheet: &mut Sheet, targets: &BTreeSet<u16>, report: &mut SheetReport) {
        for row in self.data_rows(sheet) {
            for &col in targets {
                let url = match self.classify(sheet.value(row, col), report) {
                    Some(url) => url,
                    None => continue,
                };

                trace!(row, col, %url, "replacing URL cell");
                sheet.set(row, col, CellValue::Formula(image_formula(&url, self.config.size)));
                if self.config.keep_notes {
                    sheet.set_note(row, col, format!("Original URL:\n{url}"));
                }
                report.converted += 1;
            }
        }
        report.preview_columns = targets.iter().copied().collect();
    }

    fn insert_adjacent(&self, sheet: &mut Sheet, targets: &BTreeSet<u16>, report: &mut SheetReport) {
        let header_index = self.config.header_index();
        let mut inserted: u16 = 0;

        // Left to right, so earlier insertions shift later sources by a known offset
        for &col in targets {
            let source = col + inserted;
            let preview = source + 1;

            if self.is_preview_column(sheet, preview) {
                debug!(sheet = %sheet.name, column = preview, "reusing existing preview column");
            } else {
                // Blank headers are named after the column's original position
                let base = header_text(sheet, header_index, source)
                    .unwrap_or_else(|| format!("Col {}", col as u32 + 1));
                let preview_header = format!("{base}{PREVIEW_SUFFIX}");
                sheet.insert_column(preview);
                sheet.set(header_index, preview, CellValue::Text(preview_header));
                inserted += 1;
            }

            for row in self.data_rows(sheet) {
                if let Some(url) = self.classify(sheet.value(row, source), report) {
                    trace!(row, col = source, %url, "writing adjacent preview");
                    sheet.set(row, preview, CellValue::Formula(image_formula(&url, self.config.size)));
                    report.converted += 1;
                }
            }
            report.preview_columns.push(preview);
        }
    }

    /// True when `col` is a preview column from an earlier run: its header
    /// ends in [`PREVIEW_SUFFIX`] and its data cells are empty or IMAGE formulas
    fn is_preview_column(&self, sheet: &Sheet, col: u16) -> bool {
        let header_index = self.config.header_index();
        let labelled = matches!(
            sheet.value(header_index, col),
            CellValue::Text(s) if s.trim().ends_with(PREVIEW_SUFFIX)
        );
        labelled
            && self.data_rows(sheet).all(|row| match sheet.value(row, col) {
                CellValue::Formula(f) => is_image_formula(f),
                other => other.is_empty(),
            })
    }

    /// Rows strictly below the header row
    fn data_rows(&self, sheet: &Sheet) -> std::ops::Range<u32> {
        self.config.header_row..sheet.row_count().max(self.config.header_row)
    }

    /// URL to embed for `value`, counting non-empty misses as skipped
    fn classify(&self, value: &CellValue, report: &mut SheetReport) -> Option<String> {
        if value.is_empty() {
            return None;
        }
        let url = value
            .as_text()
            .and_then(|text| url::qualifying_url(text, self.config.url_policy));
        if url.is_none() {
            report.skipped += 1;
        }
        url
    }
}
