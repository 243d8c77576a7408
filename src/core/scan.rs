//! Read-only summary of what a job would convert

use crate::core::detect::headers;
use crate::core::job::PreviewJob;
use crate::error::{PreviewError, PreviewResult};
use crate::types::{CellValue, Workbook};
use crate::url;
use serde::Serialize;

/// One line of the scan summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanRow {
    pub sheet: String,
    /// Header labels of the target columns
    pub columns: Vec<String>,
    pub url_cells: usize,
}

/// Count URL cells in the columns `job` would target, per target sheet
pub fn scan(workbook: &Workbook, job: &PreviewJob) -> PreviewResult<Vec<ScanRow>> {
    let header_row = job.rewrite.header_row;
    let policy = job.rewrite.url_policy;
    let mut rows = Vec::new();

    for name in job.target_sheets(workbook)? {
        let sheet = workbook
            .sheet(&name)
            .ok_or_else(|| PreviewError::UnknownSheet(name.clone()))?;
        let targets = job.resolve_targets(sheet)?;
        let labels = headers(sheet, header_row);

        let mut url_cells = 0;
        for row in header_row..sheet.row_count().max(header_row) {
            for &col in &targets {
                if let CellValue::Text(s) = sheet.value(row, col) {
                    if url::qualifying_url(s, policy).is_some() {
                        url_cells += 1;
                    }
                }
            }
        }

        rows.push(ScanRow {
            sheet: name,
            columns: targets
                .iter()
                .map(|&c| {
                    labels
                        .get(c as usize)
                        .cloned()
                        .unwrap_or_else(|| format!("Col {}", c as u32 + 1))
                })
                .collect(),
            url_cells,
        });
    }

    Ok(rows)
}
