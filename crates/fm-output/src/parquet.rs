//! Parquet output backend (feature `parquet`).
//!
//! One file per layer, `<layer>.parquet`.  Numeric columns are nullable
//! `Float64`, tags nullable `UInt8`, text and geometry `Utf8`.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Builder, StringBuilder, UInt8Builder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use tracing::debug;

use crate::table::ColumnData;
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult, OutputTable};

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

fn to_array(data: &ColumnData) -> (DataType, bool, ArrayRef) {
    match data {
        ColumnData::Float(v) => {
            let mut b = Float64Builder::with_capacity(v.len());
            for x in v {
                b.append_option(*x);
            }
            (DataType::Float64, true, Arc::new(b.finish()))
        }
        ColumnData::Tag(v) => {
            let mut b = UInt8Builder::with_capacity(v.len());
            for x in v {
                b.append_option(*x);
            }
            (DataType::UInt8, true, Arc::new(b.finish()))
        }
        ColumnData::Text(v) => {
            let mut b = StringBuilder::new();
            for x in v {
                b.append_value(x);
            }
            (DataType::Utf8, false, Arc::new(b.finish()))
        }
    }
}

/// Writes each layer to its own Parquet file.
///
/// Each file is closed (footer written) as soon as its layer is written.
pub struct ParquetWriter {
    dir:      PathBuf,
    finished: bool,
}

impl ParquetWriter {
    pub fn new(dir: &Path) -> OutputResult<Self> {
        Ok(Self { dir: dir.to_path_buf(), finished: false })
    }
}

impl OutputWriter for ParquetWriter {
    fn write_table(&mut self, table: &OutputTable) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished);
        }
        let mut fields = Vec::with_capacity(table.columns.len() + 1);
        let mut arrays: Vec<ArrayRef> = Vec::with_capacity(table.columns.len() + 1);
        for column in &table.columns {
            let (data_type, nullable, array) = to_array(&column.data);
            fields.push(Field::new(column.name.as_str(), data_type, nullable));
            arrays.push(array);
        }
        let (data_type, _, geometry) = to_array(&ColumnData::Text(table.geometry.clone()));
        fields.push(Field::new("geometry", data_type, false));
        arrays.push(geometry);

        let schema = Arc::new(Schema::new(fields));
        let batch = RecordBatch::try_new(Arc::clone(&schema), arrays)?;

        let path = self.dir.join(format!("{}.parquet", table.name));
        let mut writer = ArrowWriter::try_new(File::create(&path)?, schema, Some(snappy_props()))?;
        writer.write(&batch)?;
        writer.close()?;
        debug!(path = %path.display(), rows = table.row_count(), "wrote Parquet layer");
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.finished = true;
        Ok(())
    }
}
