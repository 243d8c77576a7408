//! CLI command tests

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use xlsx_preview::cli::{commands, JobOptions};
use xlsx_preview::excel::WorkbookLoader;
use xlsx_preview::types::CellValue;

fn write_items(path: &Path) {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Items").unwrap();
    sheet.write_string(0, 0, "Title").unwrap();
    sheet.write_string(0, 1, "Photo").unwrap();
    sheet.write_string(1, 0, "Mug").unwrap();
    sheet.write_string(1, 1, "https://x.io/mug.jpg").unwrap();
    sheet.write_string(2, 0, "Cap").unwrap();
    sheet.write_string(2, 1, "cdn.x.io/cap.jpg").unwrap();
    workbook.save(path).unwrap();
}

fn setup() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("items.xlsx");
    write_items(&input);
    (dir, input)
}

// ═══════════════════════════════════════════════════════════════════════════
// CONVERT COMMAND TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_convert_default_output_name() {
    let (dir, input) = setup();

    let result = commands::convert(input, None, &JobOptions::default(), false, false);

    assert!(result.is_ok(), "Convert should succeed: {result:?}");
    let output = dir.path().join("items-preview.xlsx");
    assert!(output.exists(), "Default output file should exist");

    let workbook = WorkbookLoader::new(&output).load().unwrap();
    let sheet = workbook.sheet("Items").unwrap();
    assert!(sheet.value(1, 1).is_formula());
    // Scheme-less URL is left alone under the strict policy
    assert_eq!(sheet.value(2, 1), &CellValue::text("cdn.x.io/cap.jpg"));
}

#[test]
fn test_convert_lenient() {
    let (dir, input) = setup();
    let output = dir.path().join("lenient.xlsx");
    let options = JobOptions {
        lenient: true,
        width: Some(50),
        height: Some(50),
        ..Default::default()
    };

    commands::convert(input, Some(output.clone()), &options, false, true).unwrap();

    let workbook = WorkbookLoader::new(&output).load().unwrap();
    assert_eq!(
        workbook.sheet("Items").unwrap().value(2, 1),
        &CellValue::Formula("=IMAGE(\"https://cdn.x.io/cap.jpg\",\"\",3,50,50)".to_string())
    );
}

#[test]
fn test_convert_dry_run_writes_nothing() {
    let (dir, input) = setup();
    let output = dir.path().join("dry.xlsx");

    commands::convert(input, Some(output.clone()), &JobOptions::default(), true, false).unwrap();

    assert!(!output.exists(), "Dry run must not write the output");
}

#[test]
fn test_convert_unknown_column() {
    let (dir, input) = setup();
    let output = dir.path().join("out.xlsx");
    let options = JobOptions {
        columns: vec!["Image".to_string()],
        ..Default::default()
    };

    let result = commands::convert(input, Some(output.clone()), &options, false, false);

    assert!(result.is_err());
    assert!(!output.exists());
}

#[test]
fn test_convert_with_job_file() {
    let (dir, input) = setup();
    let output = dir.path().join("job.xlsx");
    let job_file = dir.path().join("job.yaml");
    std::fs::write(
        &job_file,
        "columns:\n  - letter: B\nrewrite:\n  mode: insert_adjacent\n  size: { width: 90, height: 90 }\n",
    )
    .unwrap();
    let options = JobOptions {
        config: Some(job_file),
        ..Default::default()
    };

    commands::convert(input, Some(output.clone()), &options, false, false).unwrap();

    let workbook = WorkbookLoader::new(&output).load().unwrap();
    let sheet = workbook.sheet("Items").unwrap();
    assert_eq!(sheet.value(0, 2), &CellValue::text("Photo_preview"));
    assert_eq!(
        sheet.value(1, 2),
        &CellValue::Formula("=IMAGE(\"https://x.io/mug.jpg\",\"\",3,90,90)".to_string())
    );
}

#[test]
fn test_convert_refuses_to_overwrite_input_via_other_spelling() {
    let (dir, input) = setup();
    let before = std::fs::read(&input).unwrap();
    let output = dir.path().join(".").join("items.xlsx");

    let result = commands::convert(input.clone(), Some(output), &JobOptions::default(), false, false);

    assert!(result.is_err(), "Writing over the input must be refused");
    assert_eq!(std::fs::read(&input).unwrap(), before);
}

#[test]
fn test_convert_missing_job_file() {
    let (dir, input) = setup();
    let options = JobOptions {
        config: Some(dir.path().join("nope.yaml")),
        ..Default::default()
    };
    assert!(commands::convert(input, None, &options, false, false).is_err());
}

#[test]
fn test_convert_nonexistent_input() {
    let result = commands::convert(
        PathBuf::from("nonexistent.xlsx"),
        None,
        &JobOptions::default(),
        false,
        false,
    );
    assert!(result.is_err(), "Convert should fail on nonexistent file");
}

// ═══════════════════════════════════════════════════════════════════════════
// SCAN / DETECT COMMAND TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_scan_table_and_json() {
    let (_dir, input) = setup();
    assert!(commands::scan(input.clone(), &JobOptions::default(), false).is_ok());
    assert!(commands::scan(input, &JobOptions::default(), true).is_ok());
}

#[test]
fn test_scan_unknown_sheet() {
    let (_dir, input) = setup();
    let options = JobOptions {
        sheets: vec!["Missing".to_string()],
        ..Default::default()
    };
    assert!(commands::scan(input, &options, false).is_err());
}

#[test]
fn test_detect_columns() {
    let (_dir, input) = setup();
    assert!(commands::detect_columns(input.clone(), None, 1, false).is_ok());
    assert!(commands::detect_columns(input.clone(), Some("Items".to_string()), 1, true).is_ok());
    assert!(commands::detect_columns(input, Some("Other".to_string()), 1, false).is_err());
}
