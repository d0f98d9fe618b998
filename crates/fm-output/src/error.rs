//! Error types for fm-output.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("table {table:?}: column {column:?} has {got} rows, expected {expected}")]
    ColumnLength { table: String, column: String, expected: usize, got: usize },

    #[error("table {table:?}: duplicate column {column:?}")]
    DuplicateColumn { table: String, column: String },

    #[error("writer already finished")]
    Finished,

    /// The requested backend was not compiled in.
    #[error("output format {0:?} requires the `{0}` feature of fm-output")]
    FormatUnavailable(&'static str),

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[cfg(feature = "parquet")]
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[cfg(feature = "parquet")]
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

pub type OutputResult<T> = Result<T, OutputError>;
