//! In-memory vector layers exchanged with the loading collaborator.
//!
//! A layer is a geometry vector plus an [`AttributeTable`] with one row per
//! feature.  Numeric attributes use `NaN` for a missing value; this is how a
//! link with no flood statistic for a scenario is represented.

use geo::{LineString, MultiPolygon, Point};

use crate::{NetworkError, NetworkResult};

// ── AttributeTable ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum ColumnValues {
    /// `NaN` marks a missing value.
    Number(Vec<f64>),
    Text(Vec<String>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Number(v) => v.len(),
            ColumnValues::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn select(&self, rows: &[usize]) -> ColumnValues {
        match self {
            ColumnValues::Number(v) => ColumnValues::Number(rows.iter().map(|&r| v[r]).collect()),
            ColumnValues::Text(v) => ColumnValues::Text(rows.iter().map(|&r| v[r].clone()).collect()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AttributeColumn {
    pub name:   String,
    pub values: ColumnValues,
}

/// Column-oriented feature attributes.  Column order is preserved.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeTable {
    rows:    usize,
    columns: Vec<AttributeColumn>,
}

impl AttributeTable {
    pub fn new(rows: usize) -> Self {
        Self { rows, columns: Vec::new() }
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> &[AttributeColumn] {
        &self.columns
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Numeric column by name, or `None` if absent or textual.
    pub fn number(&self, name: &str) -> Option<&[f64]> {
        self.columns.iter().find(|c| c.name == name).and_then(|c| match &c.values {
            ColumnValues::Number(v) => Some(v.as_slice()),
            ColumnValues::Text(_) => None,
        })
    }

    pub fn push(&mut self, name: impl Into<String>, values: ColumnValues) -> NetworkResult<()> {
        let name = name.into();
        if values.len() != self.rows {
            return Err(NetworkError::AttributeLength {
                name,
                expected: self.rows,
                got: values.len(),
            });
        }
        if self.contains(&name) {
            return Err(NetworkError::DuplicateAttribute(name));
        }
        self.columns.push(AttributeColumn { name, values });
        Ok(())
    }

    pub fn push_number(&mut self, name: impl Into<String>, values: Vec<f64>) -> NetworkResult<()> {
        self.push(name, ColumnValues::Number(values))
    }

    pub fn push_text(&mut self, name: impl Into<String>, values: Vec<String>) -> NetworkResult<()> {
        self.push(name, ColumnValues::Text(values))
    }

    /// A new table holding `rows` (by index, repeats allowed) of this one.
    pub fn select_rows(&self, rows: &[usize]) -> AttributeTable {
        AttributeTable {
            rows:    rows.len(),
            columns: self
                .columns
                .iter()
                .map(|c| AttributeColumn { name: c.name.clone(), values: c.values.select(rows) })
                .collect(),
        }
    }
}

// ── Layers ────────────────────────────────────────────────────────────────────

/// Road links.  One row per line feature.
#[derive(Clone, Debug)]
pub struct LineLayer {
    pub crs:        String,
    pub geometries: Vec<LineString<f64>>,
    pub attributes: AttributeTable,
}

/// Facility locations.
#[derive(Clone, Debug)]
pub struct PointLayer {
    pub crs:        String,
    pub points:     Vec<Point<f64>>,
    pub attributes: AttributeTable,
}

/// Aggregation areas (census tracts, sub-watersheds, …).
#[derive(Clone, Debug)]
pub struct PolygonLayer {
    pub crs:        String,
    pub polygons:   Vec<MultiPolygon<f64>>,
    pub attributes: AttributeTable,
}

impl LineLayer {
    /// Geometry-only layer; attributes are added with
    /// [`AttributeTable::push_number`] on `self.attributes`.
    pub fn new(crs: impl Into<String>, geometries: Vec<LineString<f64>>) -> Self {
        let rows = geometries.len();
        Self { crs: crs.into(), geometries, attributes: AttributeTable::new(rows) }
    }

    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }
}

impl PointLayer {
    pub fn new(crs: impl Into<String>, points: Vec<Point<f64>>) -> Self {
        let rows = points.len();
        Self { crs: crs.into(), points, attributes: AttributeTable::new(rows) }
    }
}

impl PolygonLayer {
    pub fn new(crs: impl Into<String>, polygons: Vec<MultiPolygon<f64>>) -> Self {
        let rows = polygons.len();
        Self { crs: crs.into(), polygons, attributes: AttributeTable::new(rows) }
    }
}

/// Fail unless `found` names the same reference system as `expected`.
pub fn check_crs(expected: &str, found: &str) -> NetworkResult<()> {
    if expected.eq_ignore_ascii_case(found) {
        Ok(())
    } else {
        Err(NetworkError::CrsMismatch { expected: expected.into(), found: found.into() })
    }
}
