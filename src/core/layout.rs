//! Grid sizing so previews are visible without resizing by hand

use crate::types::Sheet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Excel column width units per pixel (default font, ~7px per character)
const PX_PER_WIDTH_UNIT: f64 = 7.0;
/// Points per pixel at 96 DPI
const POINTS_PER_PX: f64 = 0.75;

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub fn px_to_column_width(px: u32) -> f64 {
    round2(px as f64 / PX_PER_WIDTH_UNIT)
}

pub fn px_to_row_height(px: u32) -> f64 {
    round2(px as f64 * POINTS_PER_PX)
}

/// Marketplace template presets; each keeps a number of leading template
/// rows at their original height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marketplace {
    #[default]
    Walmart,
    TargetMirakl,
    Ebay,
    Amazon,
    None,
}

impl Marketplace {
    pub const ALL: [Marketplace; 5] = [
        Marketplace::Walmart,
        Marketplace::TargetMirakl,
        Marketplace::Ebay,
        Marketplace::Amazon,
        Marketplace::None,
    ];

    /// Header rows to leave untouched when resizing
    pub fn preserve_top_rows(self) -> u32 {
        match self {
            Marketplace::Walmart => 6,
            Marketplace::TargetMirakl => 2,
            Marketplace::Ebay => 1,
            Marketplace::Amazon => 4,
            Marketplace::None => 0,
        }
    }
}

impl fmt::Display for Marketplace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Marketplace::Walmart => "walmart",
            Marketplace::TargetMirakl => "target-mirakl",
            Marketplace::Ebay => "ebay",
            Marketplace::Amazon => "amazon",
            Marketplace::None => "none",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Marketplace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match key.as_str() {
            "walmart" => Ok(Marketplace::Walmart),
            "target" | "mirakl" | "targetmirakl" => Ok(Marketplace::TargetMirakl),
            "ebay" => Ok(Marketplace::Ebay),
            "amazon" => Ok(Marketplace::Amazon),
            "none" => Ok(Marketplace::None),
            _ => Err(format!(
                "unknown marketplace '{s}' (expected one of: {})",
                Marketplace::ALL
                    .iter()
                    .map(|m| m.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

/// Widen `columns` and heighten every row after the first
/// `preserve_top_rows` rows so a `px`-sized preview fits its cell
pub fn adjust_dimensions(sheet: &mut Sheet, columns: &[u16], px: u32, preserve_top_rows: u32) {
    let width = px_to_column_width(px);
    for &col in columns {
        sheet.set_column_width(col, width);
    }

    let height = px_to_row_height(px);
    for row in preserve_top_rows..sheet.row_count() {
        sheet.set_row_height(row, height);
    }

    tracing::debug!(
        sheet = %sheet.name,
        columns = columns.len(),
        width,
        height,
        preserve_top_rows,
        "adjusted grid dimensions"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;

    #[test]
    fn test_px_conversions() {
        assert_eq!(px_to_column_width(140), 20.0);
        assert_eq!(px_to_column_width(100), 14.29);
        assert_eq!(px_to_row_height(140), 105.0);
        assert_eq!(px_to_row_height(81), 60.75);
    }

    #[test]
    fn test_marketplace_presets() {
        assert_eq!(Marketplace::Walmart.preserve_top_rows(), 6);
        assert_eq!(Marketplace::TargetMirakl.preserve_top_rows(), 2);
        assert_eq!(Marketplace::Ebay.preserve_top_rows(), 1);
        assert_eq!(Marketplace::Amazon.preserve_top_rows(), 4);
        assert_eq!(Marketplace::None.preserve_top_rows(), 0);
    }

    #[test]
    fn test_marketplace_from_str() {
        assert_eq!("Target/Mirakl".parse(), Ok(Marketplace::TargetMirakl));
        assert_eq!("eBay".parse(), Ok(Marketplace::Ebay));
        assert_eq!("AMAZON".parse(), Ok(Marketplace::Amazon));
        assert!("etsy".parse::<Marketplace>().is_err());
        for m in Marketplace::ALL {
            assert_eq!(m.to_string().parse(), Ok(m));
        }
    }

    #[test]
    fn test_adjust_dimensions_preserves_top_rows() {
        let rows = (0..5).map(|i| vec![CellValue::Number(i as f64)]).collect();
        let mut sheet = Sheet::from_rows("s", rows);

        adjust_dimensions(&mut sheet, &[2], 140, 2);

        assert_eq!(sheet.column_widths.get(&2), Some(&20.0));
        assert_eq!(sheet.row_heights.get(&0), None);
        assert_eq!(sheet.row_heights.get(&1), None);
        assert_eq!(sheet.row_heights.get(&2), Some(&105.0));
        assert_eq!(sheet.row_heights.get(&4), Some(&105.0));
    }
}
