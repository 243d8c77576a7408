//! Column selection: resolving column ids against a sheet

use crate::error::{PreviewError, PreviewResult};
use crate::types::{CellValue, ColumnId, Sheet};
use std::collections::BTreeSet;

/// Highest column count Excel supports (A..XFD)
pub const MAX_COLUMNS: u32 = 16_384;

/// Convert a 0-based column index to Excel letters (0→A, 25→Z, 26→AA)
pub fn column_letter(index: u16) -> String {
    let mut result = String::new();
    let mut idx = index as usize;

    loop {
        let remainder = idx % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }

    result
}

/// Convert Excel column letters to a 0-based index (A→0, AA→26).
/// Returns `None` for anything that is not a valid column name.
pub fn column_index(letters: &str) -> Option<u16> {
    let letters = letters.trim();
    if letters.is_empty() || letters.len() > 3 {
        return None;
    }

    let mut n: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        n = n * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
    }

    if n > MAX_COLUMNS {
        return None;
    }
    Some((n - 1) as u16)
}

/// Resolve each id to a 0-based column index of `sheet`.
///
/// `header_row` is 1-based and only matters for [`ColumnId::Header`].
/// Fails on the first id that names no existing column.
pub fn resolve_columns(
    sheet: &Sheet,
    ids: &[ColumnId],
    header_row: u32,
) -> PreviewResult<BTreeSet<u16>> {
    let width = sheet.column_count();
    let mut resolved = BTreeSet::new();

    for id in ids {
        let col = match id {
            ColumnId::Index(i) => Some(*i).filter(|i| *i < width),
            ColumnId::Letter(letters) => column_index(letters).filter(|i| *i < width),
            ColumnId::Header(name) => find_header(sheet, name, header_row),
        };

        match col {
            Some(col) => {
                resolved.insert(col);
            }
            None => {
                return Err(PreviewError::UnknownColumn {
                    sheet: sheet.name.clone(),
                    column: id.to_string(),
                })
            }
        }
    }

    Ok(resolved)
}

fn find_header(sheet: &Sheet, name: &str, header_row: u32) -> Option<u16> {
    let wanted = name.trim();
    let row = sheet.rows.get(header_row.saturating_sub(1) as usize)?;
    row.iter()
        .position(|cell| match &cell.value {
            CellValue::Text(s) => s.trim() == wanted,
            _ => false,
        })
        .map(|i| i as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> Sheet {
        Sheet::from_rows(
            "Items",
            vec![
                vec![
                    CellValue::text("SKU"),
                    CellValue::text(" Main Image "),
                    CellValue::text("Swatch"),
                ],
                vec![
                    CellValue::text("A-1"),
                    CellValue::text("https://x.io/a.jpg"),
                    CellValue::Empty,
                ],
            ],
        )
    }

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(701), "ZZ");
        assert_eq!(column_letter(702), "AAA");
        assert_eq!(column_letter(16_383), "XFD");
    }

    #[test]
    fn test_column_index() {
        assert_eq!(column_index("A"), Some(0));
        assert_eq!(column_index("z"), Some(25));
        assert_eq!(column_index("AA"), Some(26));
        assert_eq!(column_index("XFD"), Some(16_383));
        assert_eq!(column_index("XFE"), None);
        assert_eq!(column_index("A1"), None);
        assert_eq!(column_index(""), None);
        assert_eq!(column_index("ABCD"), None);
    }

    #[test]
    fn test_resolve_mixed_ids() {
        let ids = vec![
            ColumnId::Header("Main Image".to_string()),
            ColumnId::Letter("c".to_string()),
            ColumnId::Index(1),
        ];
        let cols = resolve_columns(&sheet(), &ids, 1).unwrap();
        assert_eq!(cols.into_iter().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_resolve_unknown_header() {
        let err = resolve_columns(&sheet(), &[ColumnId::Header("Price".to_string())], 1)
            .unwrap_err();
        match err {
            PreviewError::UnknownColumn { sheet, column } => {
                assert_eq!(sheet, "Items");
                assert_eq!(column, "Price");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_out_of_range() {
        assert!(resolve_columns(&sheet(), &[ColumnId::Index(3)], 1).is_err());
        assert!(resolve_columns(&sheet(), &[ColumnId::Letter("D".to_string())], 1).is_err());
    }

    #[test]
    fn test_resolve_header_respects_header_row() {
        // Row 2 holds no "SKU" header
        assert!(resolve_columns(&sheet(), &[ColumnId::Header("SKU".to_string())], 2).is_err());
    }
}
