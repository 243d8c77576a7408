use thiserror::Error;

pub type PreviewResult<T> = Result<T, PreviewError>;

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to load workbook: {0}")]
    Load(String),

    #[error("Failed to save workbook: {0}")]
    Save(String),

    #[error("Sheet not found: {0}")]
    UnknownSheet(String),

    #[error("Column '{column}' not found in sheet '{sheet}'")]
    UnknownColumn { sheet: String, column: String },

    #[error("Image size must be positive, got {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("Configuration error: {0}")]
    Config(String),
}
