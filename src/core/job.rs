//! Preview jobs: which sheets and columns to rewrite, and how
//!
//! A job is the explicit form of every choice a user makes before
//! converting a workbook. Jobs can be built in code, from CLI flags, or
//! loaded from a YAML file:
//!
//! ```yaml
//! sheets: [Items]
//! columns:
//!   - header: Main Image URL
//!   - letter: F
//! rewrite:
//!   size: { width: 120, height: 120 }
//!   mode: insert_adjacent
//!   header_row: 3
//! marketplace: amazon
//! ```

use crate::core::detect::{detect, detect_by_content, headers};
use crate::core::layout::{adjust_dimensions, Marketplace};
use crate::core::rewriter::CellRewriter;
use crate::core::selection::resolve_columns;
use crate::error::{PreviewError, PreviewResult};
use crate::types::{ColumnId, RewriteConfig, Sheet, SheetReport, Workbook};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewJob {
    /// Sheets to process; empty means every sheet
    pub sheets: Vec<String>,
    /// URL columns; empty means auto-detect per sheet
    pub columns: Vec<ColumnId>,
    pub rewrite: RewriteConfig,
    pub marketplace: Marketplace,
    /// Keep the marketplace's template rows at their original height
    pub keep_header_heights: bool,
    /// Resize preview columns and data rows to fit the image size
    pub adjust_grid: bool,
}

impl Default for PreviewJob {
    fn default() -> Self {
        Self {
            sheets: Vec::new(),
            columns: Vec::new(),
            rewrite: RewriteConfig::default(),
            marketplace: Marketplace::default(),
            keep_header_heights: true,
            adjust_grid: true,
        }
    }
}

/// Outcome of a whole job
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct JobReport {
    pub sheets: Vec<SheetReport>,
}

impl JobReport {
    pub fn converted(&self) -> usize {
        self.sheets.iter().map(|s| s.converted).sum()
    }

    pub fn skipped(&self) -> usize {
        self.sheets.iter().map(|s| s.skipped).sum()
    }
}

impl PreviewJob {
    pub fn from_yaml_str(yaml: &str) -> PreviewResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> PreviewResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Rows at the top of each sheet whose height is never changed
    pub fn preserve_top_rows(&self) -> u32 {
        if self.keep_header_heights {
            self.marketplace.preserve_top_rows()
        } else {
            0
        }
    }

    /// Names of the sheets this job touches, in workbook order for `All`
    pub fn target_sheets(&self, workbook: &Workbook) -> PreviewResult<Vec<String>> {
        if self.sheets.is_empty() {
            return Ok(workbook.sheet_names());
        }
        for name in &self.sheets {
            if workbook.sheet(name).is_none() {
                return Err(PreviewError::UnknownSheet(name.clone()));
            }
        }
        Ok(self.sheets.clone())
    }

    /// URL columns of `sheet`: the configured ones, or auto-detected.
    ///
    /// Auto-detection prefers columns whose header looks like an image
    /// column and which hold URLs in the sampled rows. When no such column
    /// exists, every column with URL content is used.
    pub fn resolve_targets(&self, sheet: &Sheet) -> PreviewResult<BTreeSet<u16>> {
        let header_row = self.rewrite.header_row;
        if !self.columns.is_empty() {
            return resolve_columns(sheet, &self.columns, header_row);
        }

        let by_content = detect_by_content(sheet, header_row, self.rewrite.url_policy);
        let by_name: BTreeSet<u16> = detect(&headers(sheet, header_row))
            .intersection(&by_content)
            .copied()
            .collect();
        if !by_name.is_empty() {
            debug!(sheet = %sheet.name, columns = ?by_name, "detected URL columns by header");
            return Ok(by_name);
        }

        debug!(sheet = %sheet.name, columns = ?by_content, "detected URL columns by content");
        Ok(by_content)
    }

    /// Rewrite every target sheet of `workbook`.
    ///
    /// Sheets and columns are resolved for all target sheets before any of
    /// them is modified, so an invalid selection leaves the workbook intact.
    pub fn run(&self, workbook: &mut Workbook) -> PreviewResult<JobReport> {
        self.rewrite.validate()?;

        let mut plan = Vec::new();
        for name in self.target_sheets(workbook)? {
            let sheet = workbook
                .sheet(&name)
                .ok_or_else(|| PreviewError::UnknownSheet(name.clone()))?;
            let targets = self.resolve_targets(sheet)?;
            plan.push((name, targets));
        }

        let rewriter = CellRewriter::new(self.rewrite.clone());
        let px = self.rewrite.size.cell_px();
        let mut report = JobReport::default();

        for (name, targets) in plan {
            if targets.is_empty() {
                info!(sheet = %name, "no URL columns, skipping sheet");
                continue;
            }
            let sheet = workbook
                .sheet_mut(&name)
                .ok_or_else(|| PreviewError::UnknownSheet(name.clone()))?;

            let sheet_report = rewriter.rewrite_resolved(sheet, &targets);
            if self.adjust_grid {
                adjust_dimensions(
                    sheet,
                    &sheet_report.preview_columns,
                    px,
                    self.preserve_top_rows(),
                );
            }
            info!(
                sheet = %name,
                converted = sheet_report.converted,
                skipped = sheet_report.skipped,
                "sheet processed"
            );
            report.sheets.push(sheet_report);
        }

        Ok(report)
    }
}
