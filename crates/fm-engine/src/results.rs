//! Per-vertex result table.

use fm_core::Coord;
use fm_network::RoadNetwork;

use crate::{EngineError, EngineResult};

/// One named value per network vertex, in `VertexId` order.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultColumn {
    pub name:   String,
    pub values: Vec<f64>,
}

/// Accessibility results: one row per vertex, columns appended phase by
/// phase (initial distances, scenario distances, closeness loss).
#[derive(Clone, Debug)]
pub struct NodeResults {
    vertices: Vec<Coord>,
    columns:  Vec<ResultColumn>,
}

impl NodeResults {
    /// Empty table with one row per vertex of `network`.
    pub fn new(network: &RoadNetwork) -> Self {
        Self { vertices: network.vertex_pos.clone(), columns: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[Coord] {
        &self.vertices
    }

    pub fn columns(&self) -> &[ResultColumn] {
        &self.columns
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.iter().find(|c| c.name == name).map(|c| c.values.as_slice())
    }

    /// Append a column, or overwrite an existing one of the same name in
    /// place (re-running a phase replaces its columns).
    pub fn push(&mut self, column: ResultColumn) -> EngineResult<()> {
        if column.values.len() != self.vertices.len() {
            return Err(EngineError::ColumnLength {
                name:     column.name,
                expected: self.vertices.len(),
                got:      column.values.len(),
            });
        }
        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
        Ok(())
    }

    pub fn extend(&mut self, columns: impl IntoIterator<Item = ResultColumn>) -> EngineResult<()> {
        for c in columns {
            self.push(c)?;
        }
        Ok(())
    }
}
