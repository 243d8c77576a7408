//! Workbook serializer: in-memory [`Workbook`] → Excel (.xlsx)

use crate::core::formula::with_future_prefix;
use crate::error::{PreviewError, PreviewResult};
use crate::types::{CellValue, Sheet, Workbook};
use rust_xlsxwriter::{Format, Formula, Note, Worksheet};
use std::path::{Path, PathBuf};

/// Author shown on notes written by this tool
pub const NOTE_AUTHOR: &str = "PreviewBot";

/// `<stem>-preview.xlsx` next to the input file
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = match input.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("xlsx") => input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
        _ => input
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };
    input.with_file_name(format!("{stem}-preview.xlsx"))
}

/// Writes a [`Workbook`] with values, formulas, notes and grid sizes
pub struct WorkbookWriter<'a> {
    workbook: &'a Workbook,
}

impl<'a> WorkbookWriter<'a> {
    pub fn new(workbook: &'a Workbook) -> Self {
        Self { workbook }
    }

    /// Save the workbook to an .xlsx file
    pub fn save(&self, output_path: &Path) -> PreviewResult<()> {
        let mut xlsx = self.build()?;
        xlsx.save(output_path)
            .map_err(|e| PreviewError::Save(format!("Failed to save Excel file: {}", e)))?;
        Ok(())
    }

    /// Serialize the workbook into an in-memory .xlsx download
    pub fn to_bytes(&self) -> PreviewResult<Vec<u8>> {
        let mut xlsx = self.build()?;
        xlsx.save_to_buffer()
            .map_err(|e| PreviewError::Save(format!("Failed to serialize Excel file: {}", e)))
    }

    fn build(&self) -> PreviewResult<rust_xlsxwriter::Workbook> {
        let mut xlsx = rust_xlsxwriter::Workbook::new();
        for sheet in &self.workbook.sheets {
            let worksheet = xlsx.add_worksheet();
            worksheet.set_name(&sheet.name).map_err(|e| {
                PreviewError::Save(format!("Failed to set worksheet name: {}", e))
            })?;
            write_sheet(worksheet, sheet)?;
        }
        Ok(xlsx)
    }
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &Sheet) -> PreviewResult<()> {
    for (row_idx, row) in sheet.rows.iter().enumerate() {
        let row_idx = row_idx as u32;
        for (col_idx, cell) in row.iter().enumerate() {
            let col_idx = col_idx as u16;
            write_value(worksheet, row_idx, col_idx, &cell.value)?;

            if let Some(text) = &cell.note {
                let note = Note::new(text).set_author(NOTE_AUTHOR);
                worksheet
                    .insert_note(row_idx, col_idx, &note)
                    .map_err(|e| PreviewError::Save(format!("Failed to add note: {}", e)))?;
            }
        }
    }

    for (&col, &width) in &sheet.column_widths {
        worksheet
            .set_column_width(col, width)
            .map_err(|e| PreviewError::Save(format!("Failed to set column width: {}", e)))?;
    }
    for (&row, &height) in &sheet.row_heights {
        worksheet
            .set_row_height(row, height)
            .map_err(|e| PreviewError::Save(format!("Failed to set row height: {}", e)))?;
    }

    Ok(())
}

/// Number format for a date serial: date only, time only, or both
fn datetime_format(serial: f64) -> Format {
    let pattern = if serial.fract() == 0.0 {
        "yyyy-mm-dd"
    } else if serial < 1.0 {
        "hh:mm:ss"
    } else {
        "yyyy-mm-dd hh:mm:ss"
    };
    Format::new().set_num_format(pattern)
}

fn write_value(worksheet: &mut Worksheet, row: u32, col: u16, value: &CellValue) -> PreviewResult<()> {
    let result = match value {
        CellValue::Empty => return Ok(()),
        CellValue::Text(s) => worksheet.write_string(row, col, s).map(|_| ()),
        CellValue::Error(e) => worksheet
            .write_formula(row, col, Formula::new(format!("={e}")).set_result(e))
            .map(|_| ()),
        CellValue::Number(n) => worksheet.write_number(row, col, *n).map(|_| ()),
        CellValue::DateTime(n) => worksheet
            .write_number_with_format(row, col, *n, &datetime_format(*n))
            .map(|_| ()),
        CellValue::Duration(n) => worksheet
            .write_number_with_format(row, col, *n, &Format::new().set_num_format("[h]:mm:ss"))
            .map(|_| ()),
        CellValue::Bool(b) => worksheet.write_boolean(row, col, *b).map(|_| ()),
        CellValue::Formula(f) => worksheet
            .write_formula(row, col, Formula::new(with_future_prefix(f)))
            .map(|_| ()),
    };
    result.map_err(|e| PreviewError::Save(format!("Failed to write cell ({row}, {col}): {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("/data/master.xlsx")),
            PathBuf::from("/data/master-preview.xlsx")
        );
        assert_eq!(
            default_output_path(Path::new("Master.XLSX")),
            PathBuf::from("Master-preview.xlsx")
        );
        assert_eq!(
            default_output_path(Path::new("export.xlsm")),
            PathBuf::from("export.xlsm-preview.xlsx")
        );
    }

    #[test]
    fn test_to_bytes_produces_zip() {
        let mut wb = Workbook::new();
        let mut sheet = Sheet::new("Items");
        sheet.set(0, 0, CellValue::text("Image"));
        sheet.set(1, 0, CellValue::formula("IMAGE(\"https://x.io/a.png\",\"\",3,80,80)"));
        sheet.set_note(1, 0, "Original URL:\nhttps://x.io/a.png");
        sheet.set_column_width(0, 20.0);
        sheet.set_row_height(1, 60.0);
        wb.add_sheet(sheet);

        let bytes = WorkbookWriter::new(&wb).to_bytes().unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_datetime_format() {
        assert_eq!(datetime_format(45413.0), Format::new().set_num_format("yyyy-mm-dd"));
        assert_eq!(datetime_format(0.5), Format::new().set_num_format("hh:mm:ss"));
        assert_eq!(
            datetime_format(45413.25),
            Format::new().set_num_format("yyyy-mm-dd hh:mm:ss")
        );
    }

    #[test]
    fn test_invalid_sheet_name_fails() {
        let mut wb = Workbook::new();
        wb.add_sheet(Sheet::new("bad[name]"));
        assert!(matches!(
            WorkbookWriter::new(&wb).to_bytes(),
            Err(PreviewError::Save(_))
        ));
    }
}
