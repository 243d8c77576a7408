//! xlsx-preview - inline image previews for Excel workbooks
//!
//! This library rewrites columns of image URLs in an .xlsx workbook into
//! Excel's native `IMAGE()` formula, so the images render inside the cells
//! when the file is reopened.
//!
//! # Features
//!
//! - In-place rewrite, or a new `<header>_preview` column next to each URL column
//! - Column auto-detection by header name or by cell contents
//! - Strict (`http(s)://` only) or lenient URL recognition
//! - Grid resizing with marketplace template presets
//! - YAML job files
//!
//! # Example
//!
//! ```no_run
//! use xlsx_preview::core::PreviewJob;
//! use xlsx_preview::excel::{WorkbookLoader, WorkbookWriter};
//! use std::path::Path;
//!
//! let mut workbook = WorkbookLoader::new("masterfile.xlsx").load()?;
//!
//! let job = PreviewJob::default();
//! let report = job.run(&mut workbook)?;
//! println!("Converted {} cells", report.converted());
//!
//! WorkbookWriter::new(&workbook).save(Path::new("masterfile-preview.xlsx"))?;
//! # Ok::<(), xlsx_preview::error::PreviewError>(())
//! ```

pub mod cli;
pub mod core;
pub mod error;
pub mod excel;
pub mod types;
pub mod url;

// Re-export commonly used types
pub use error::{PreviewError, PreviewResult};
pub use types::{Cell, CellValue, ColumnId, Dimensions, Mode, RewriteConfig, Sheet, Workbook};
