//! CSV output backend.
//!
//! One file per layer, `<layer>.csv`, in the configured output directory.
//! Nulls are empty cells.

use std::path::{Path, PathBuf};

use csv::Writer;
use tracing::debug;

use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult, OutputTable};

/// Writes each layer to its own CSV file.
pub struct CsvWriter {
    dir:      PathBuf,
    finished: bool,
}

impl CsvWriter {
    pub fn new(dir: &Path) -> OutputResult<Self> {
        Ok(Self { dir: dir.to_path_buf(), finished: false })
    }

    pub fn path_for(&self, layer: &str) -> PathBuf {
        self.dir.join(format!("{layer}.csv"))
    }
}

impl OutputWriter for CsvWriter {
    fn write_table(&mut self, table: &OutputTable) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished);
        }
        let path = self.path_for(&table.name);
        let mut w = Writer::from_path(&path)?;
        w.write_record(table.header())?;

        let mut record = Vec::with_capacity(table.columns.len() + 1);
        for row in 0..table.row_count() {
            record.clear();
            record.extend(table.columns.iter().map(|c| c.data.cell(row)));
            record.push(table.geometry[row].clone());
            w.write_record(&record)?;
        }
        w.flush()?;
        debug!(path = %path.display(), rows = table.row_count(), "wrote CSV layer");
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.finished = true;
        Ok(())
    }
}
