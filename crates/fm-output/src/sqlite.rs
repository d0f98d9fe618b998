//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `results.db` in the configured output directory with one
//! table per layer.  Geometry is a WKT `TEXT` column.

use std::path::Path;

use rusqlite::types::Value;
use rusqlite::Connection;
use tracing::debug;

use crate::table::ColumnData;
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult, OutputTable};

/// Writes result layers to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

fn quote(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn sql_type(data: &ColumnData) -> &'static str {
    match data {
        ColumnData::Float(_) => "REAL",
        ColumnData::Text(_) => "TEXT",
        ColumnData::Tag(_) => "INTEGER",
    }
}

fn sql_value(data: &ColumnData, row: usize) -> Value {
    match data {
        ColumnData::Float(v) => v[row].map_or(Value::Null, Value::Real),
        ColumnData::Text(v) => Value::Text(v[row].clone()),
        ColumnData::Tag(v) => v[row].map_or(Value::Null, |t| Value::Integer(i64::from(t))),
    }
}

impl SqliteWriter {
    /// Open (or create) `results.db` in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("results.db"))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;",
        )?;
        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_table(&mut self, table: &OutputTable) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished);
        }
        let name = quote(&table.name);
        let mut defs: Vec<String> = table
            .columns
            .iter()
            .map(|c| format!("{} {}", quote(&c.name), sql_type(&c.data)))
            .collect();
        defs.push("geometry TEXT NOT NULL".into());
        let placeholders: Vec<String> = (1..=defs.len()).map(|i| format!("?{i}")).collect();

        let tx = self.conn.unchecked_transaction()?;
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {name};
             CREATE TABLE {name} ({});",
            defs.join(", ")
        ))?;
        {
            let mut stmt =
                tx.prepare(&format!("INSERT INTO {name} VALUES ({})", placeholders.join(", ")))?;
            for row in 0..table.row_count() {
                let values = table
                    .columns
                    .iter()
                    .map(|c| sql_value(&c.data, row))
                    .chain(std::iter::once(Value::Text(table.geometry[row].clone())));
                stmt.execute(rusqlite::params_from_iter(values))?;
            }
        }
        tx.commit()?;
        debug!(table = %table.name, rows = table.row_count(), "wrote SQLite layer");
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
