//! Backend-neutral tabular layer.

use crate::{OutputError, OutputResult};

/// Values of one output column.  `None` is written as null.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnData {
    Float(Vec<Option<f64>>),
    Text(Vec<String>),
    /// 0/1 flood tags.
    Tag(Vec<Option<u8>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Float(v) => v.len(),
            ColumnData::Text(v) => v.len(),
            ColumnData::Tag(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cell `row` as CSV text; null is the empty string.
    pub fn cell(&self, row: usize) -> String {
        match self {
            ColumnData::Float(v) => v[row].map(|x| x.to_string()).unwrap_or_default(),
            ColumnData::Text(v) => v[row].clone(),
            ColumnData::Tag(v) => v[row].map(|x| x.to_string()).unwrap_or_default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OutputColumn {
    pub name: String,
    pub data: ColumnData,
}

/// A named layer: attribute columns plus one WKT geometry per row.
#[derive(Clone, Debug)]
pub struct OutputTable {
    pub name:     String,
    pub columns:  Vec<OutputColumn>,
    pub geometry: Vec<String>,
}

impl OutputTable {
    pub fn new(name: impl Into<String>, geometry: Vec<String>) -> Self {
        Self { name: name.into(), columns: Vec::new(), geometry }
    }

    pub fn row_count(&self) -> usize {
        self.geometry.len()
    }

    pub fn push(&mut self, name: impl Into<String>, data: ColumnData) -> OutputResult<()> {
        let name = name.into();
        if name == "geometry" || self.columns.iter().any(|c| c.name == name) {
            return Err(OutputError::DuplicateColumn { table: self.name.clone(), column: name });
        }
        if data.len() != self.row_count() {
            return Err(OutputError::ColumnLength {
                table:    self.name.clone(),
                column:   name,
                expected: self.row_count(),
                got:      data.len(),
            });
        }
        self.columns.push(OutputColumn { name, data });
        Ok(())
    }

    pub fn column(&self, name: &str) -> Option<&ColumnData> {
        self.columns.iter().find(|c| c.name == name).map(|c| &c.data)
    }

    /// Header row: attribute columns, then `geometry`.
    pub fn header(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).chain(std::iter::once("geometry")).collect()
    }
}
