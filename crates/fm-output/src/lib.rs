//! `fm-output` — writers for the three result layers.
//!
//! | Layer                       | Rows                  | Geometry     |
//! |-----------------------------|-----------------------|--------------|
//! | `Node_results`              | one per vertex        | `POINT`      |
//! | `Network_Condition_results` | one per link          | `LINESTRING` |
//! | `Geo_summary_results`       | one per polygon       | `MULTIPOLYGON` |
//!
//! Geometry is always written as a WKT text column named `geometry`, last.
//!
//! | Feature   | Backend | Files created                        |
//! |-----------|---------|--------------------------------------|
//! | *(none)*  | CSV     | `<layer>.csv`                        |
//! | `sqlite`  | SQLite  | `results.db`, one table per layer    |
//! | `parquet` | Parquet | `<layer>.parquet`                    |
//!
//! # Usage
//!
//! ```rust,ignore
//! use fm_output::{node_table, open_writer};
//!
//! let mut writer = open_writer(OutputFormat::Csv, Path::new("./results"))?;
//! writer.write_table(&node_table(&results))?;
//! writer.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod layers;
pub mod table;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use layers::{network_table, node_table, summary_table};
pub use table::{ColumnData, OutputColumn, OutputTable};
pub use writer::{open_writer, OutputWriter};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

#[cfg(feature = "parquet")]
pub use parquet::ParquetWriter;
