//! CLI command handlers

pub mod commands;

pub use commands::{convert, detect_columns, scan, JobOptions};
