//! The `OutputWriter` trait implemented by all backend writers.

use std::path::Path;

use fm_core::OutputFormat;

use crate::{CsvWriter, OutputResult, OutputTable};

/// Trait implemented by CSV, SQLite, and Parquet writers.
pub trait OutputWriter {
    /// Write one complete layer.  Writing a layer name twice replaces it.
    fn write_table(&mut self, table: &OutputTable) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent; later calls are no-ops.
    fn finish(&mut self) -> OutputResult<()>;
}

/// Create `dir` if needed and open the writer for `format`.
pub fn open_writer(format: OutputFormat, dir: &Path) -> OutputResult<Box<dyn OutputWriter>> {
    std::fs::create_dir_all(dir)?;
    match format {
        OutputFormat::Csv => Ok(Box::new(CsvWriter::new(dir)?)),

        #[cfg(feature = "sqlite")]
        OutputFormat::Sqlite => Ok(Box::new(crate::SqliteWriter::new(dir)?)),
        #[cfg(not(feature = "sqlite"))]
        OutputFormat::Sqlite => Err(crate::OutputError::FormatUnavailable("sqlite")),

        #[cfg(feature = "parquet")]
        OutputFormat::Parquet => Ok(Box::new(crate::ParquetWriter::new(dir)?)),
        #[cfg(not(feature = "parquet"))]
        OutputFormat::Parquet => Err(crate::OutputError::FormatUnavailable("parquet")),
    }
}
