//! Excel load/save
//!
//! - Load: Excel (.xlsx) → in-memory workbook (calamine)
//! - Save: in-memory workbook → Excel (.xlsx) with formulas and notes (rust_xlsxwriter)

mod loader;
mod writer;

pub use loader::WorkbookLoader;
pub use writer::{default_output_path, WorkbookWriter, NOTE_AUTHOR};
