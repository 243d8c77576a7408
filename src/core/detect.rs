//! URL column auto-detection
//!
//! Two independent heuristics: one looks only at header names, the other
//! samples the first data rows for URL-like text.

use crate::core::rewriter::PREVIEW_SUFFIX;
use crate::types::{CellValue, Sheet, UrlPolicy};
use crate::url;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Number of data rows sampled by [`detect_by_content`]
pub const CONTENT_SAMPLE_ROWS: u32 = 50;

fn image_header_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(image|img|photo|picture|thumbnail|url|link|src)")
            .expect("header pattern is valid")
    })
}

/// Pick columns whose header names suggest image URLs.
/// Preview columns written by an earlier run are never picked.
pub fn detect<S: AsRef<str>>(column_names: &[S]) -> BTreeSet<u16> {
    column_names
        .iter()
        .enumerate()
        .filter(|(_, name)| {
            let name = name.as_ref().trim();
            !name.ends_with(PREVIEW_SUFFIX) && image_header_pattern().is_match(name)
        })
        .map(|(i, _)| i as u16)
        .collect()
}

/// Pick columns with a URL-like value in any of the first sampled data rows
pub fn detect_by_content(sheet: &Sheet, header_row: u32, policy: UrlPolicy) -> BTreeSet<u16> {
    let first = header_row;
    let last = sheet
        .row_count()
        .min(header_row.saturating_add(CONTENT_SAMPLE_ROWS));
    let mut hits = BTreeSet::new();

    for col in 0..sheet.column_count() {
        let found = (first..last).any(|row| match sheet.value(row, col) {
            CellValue::Text(s) => url::qualifying_url(s, policy).is_some(),
            _ => false,
        });
        if found {
            hits.insert(col);
        }
    }

    hits
}

/// Header labels of the header row (1-based); blank headers read as `Col <n>`
pub fn headers(sheet: &Sheet, header_row: u32) -> Vec<String> {
    let row = header_row.saturating_sub(1);
    (0..sheet.column_count())
        .map(|col| header_text(sheet, row, col).unwrap_or_else(|| format!("Col {}", col as u32 + 1)))
        .collect()
}

/// Header text of one column given the 0-based header row index
pub(crate) fn header_text(sheet: &Sheet, header_index: u32, col: u16) -> Option<String> {
    match sheet.value(header_index, col) {
        CellValue::Text(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        CellValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
