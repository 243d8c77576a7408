//! Core rewrite engine: URL columns in, IMAGE() formulas out

pub mod detect;
pub mod formula;
pub mod job;
pub mod layout;
pub mod rewriter;
pub mod scan;
pub mod selection;

pub use job::{JobReport, PreviewJob};
pub use layout::Marketplace;
pub use rewriter::{rewrite, CellRewriter};
pub use scan::{scan, ScanRow};
