use std::path::PathBuf;

use thiserror::Error;

/// Why the dataset could not be loaded. Fatal at startup.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("missing required column '{column}'")]
    MissingColumn { column: &'static str },

    #[error("row {row}: column '{column}' has invalid value '{value}'")]
    Malformed {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("unexpected layout: {0}")]
    Layout(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

/// Pager misuse. The caller clamps and retries.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageError {
    #[error("page {page} is outside 1..={total_pages}")]
    InvalidPage { page: usize, total_pages: usize },

    #[error("page size must be at least 1")]
    ZeroPageSize,
}
