//! CSV + WKT layer loaders.
//!
//! # CSV format
//!
//! One row per feature.  The geometry is a WKT string in a column named
//! `geometry` (or `wkt`); every other column becomes an attribute.
//!
//! ```csv
//! link_id,length,max_run_0415,geometry
//! 1,120.5,0.2,"LINESTRING (512000 3290000, 512120.5 3290000)"
//! 2,80.0,,"LINESTRING (512120.5 3290000, 512120.5 3290080)"
//! ```
//!
//! A column is numeric when every non-empty cell parses as `f64`; empty
//! cells in a numeric column become `NaN`.  Anything else is kept as text.
//!
//! # Reference system
//!
//! CSV carries no CRS.  If a sidecar file with the same stem and a `.crs`
//! extension exists (`roads.crs` next to `roads.csv`), its trimmed content is
//! the layer CRS and must match the analysis CRS.  Without a sidecar the
//! layer is assumed to be in the analysis CRS.  Reprojection is the
//! caller's job.

use std::io::Read;
use std::path::Path;

use geo::{Geometry, LineString, MultiPolygon, Point};
use tracing::debug;
use wkt::TryFromWkt;

use crate::layer::{check_crs, AttributeTable, LineLayer, PointLayer, PolygonLayer};
use crate::{NetworkError, NetworkResult};

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a line layer.  With `explode`, each part of a `MULTILINESTRING`
/// becomes its own feature carrying a copy of the row's attributes;
/// otherwise multi-part rows are rejected as malformed.
pub fn load_lines_csv(path: &Path, crs: &str, explode: bool) -> NetworkResult<LineLayer> {
    let crs = layer_crs(path, crs)?;
    let raw = read_raw(std::fs::File::open(path)?)?;
    let layer = lines_from_raw(raw, crs, explode)?;
    debug!(path = %path.display(), features = layer.len(), "loaded line layer");
    Ok(layer)
}

/// Load a point layer.  `MULTIPOINT` rows contribute one point per member.
pub fn load_points_csv(path: &Path, crs: &str) -> NetworkResult<PointLayer> {
    let crs = layer_crs(path, crs)?;
    let raw = read_raw(std::fs::File::open(path)?)?;
    let layer = points_from_raw(raw, crs)?;
    debug!(path = %path.display(), features = layer.points.len(), "loaded point layer");
    Ok(layer)
}

/// Load a polygon layer.  `POLYGON` rows are wrapped as single-member
/// multipolygons.
pub fn load_polygons_csv(path: &Path, crs: &str) -> NetworkResult<PolygonLayer> {
    let crs = layer_crs(path, crs)?;
    let raw = read_raw(std::fs::File::open(path)?)?;
    let layer = polygons_from_raw(raw, crs)?;
    debug!(path = %path.display(), features = layer.polygons.len(), "loaded polygon layer");
    Ok(layer)
}

/// Like [`load_lines_csv`] but reads from any `Read` source and takes the
/// CRS as given.
pub fn read_lines<R: Read>(reader: R, crs: &str, explode: bool) -> NetworkResult<LineLayer> {
    lines_from_raw(read_raw(reader)?, crs.to_owned(), explode)
}

pub fn read_points<R: Read>(reader: R, crs: &str) -> NetworkResult<PointLayer> {
    points_from_raw(read_raw(reader)?, crs.to_owned())
}

pub fn read_polygons<R: Read>(reader: R, crs: &str) -> NetworkResult<PolygonLayer> {
    polygons_from_raw(read_raw(reader)?, crs.to_owned())
}

// ── Raw CSV ───────────────────────────────────────────────────────────────────

struct RawLayer {
    wkt:     Vec<String>,
    names:   Vec<String>,
    /// `cells[column][row]`
    cells:   Vec<Vec<String>>,
}

fn read_raw<R: Read>(reader: R) -> NetworkResult<RawLayer> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();

    let geom_col = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("geometry") || h.eq_ignore_ascii_case("wkt"))
        .ok_or_else(|| NetworkError::MissingAttribute("geometry".into()))?;

    let names: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != geom_col)
        .map(|(_, h)| h.to_owned())
        .collect();

    let mut wkt = Vec::new();
    let mut cells: Vec<Vec<String>> = vec![Vec::new(); names.len()];
    for record in rdr.records() {
        let record = record?;
        let mut col = 0;
        for (i, field) in record.iter().enumerate() {
            if i == geom_col {
                wkt.push(field.to_owned());
            } else {
                cells[col].push(field.to_owned());
                col += 1;
            }
        }
    }
    Ok(RawLayer { wkt, names, cells })
}

impl RawLayer {
    /// Typed attribute table for the rows listed in `rows`.
    fn attributes(&self, rows: &[usize]) -> NetworkResult<AttributeTable> {
        let mut table = AttributeTable::new(rows.len());
        for (name, cells) in self.names.iter().zip(&self.cells) {
            match parse_numbers(cells) {
                Some(all) => table.push_number(name.clone(), rows.iter().map(|&r| all[r]).collect())?,
                None => table.push_text(name.clone(), rows.iter().map(|&r| cells[r].clone()).collect())?,
            }
        }
        Ok(table)
    }
}

fn parse_numbers(cells: &[String]) -> Option<Vec<f64>> {
    cells
        .iter()
        .map(|c| {
            let t = c.trim();
            if t.is_empty() { Some(f64::NAN) } else { t.parse::<f64>().ok() }
        })
        .collect()
}

fn parse_geometry(row: usize, text: &str) -> NetworkResult<Geometry<f64>> {
    Geometry::<f64>::try_from_wkt_str(text.trim())
        .map_err(|e| NetworkError::Wkt { row, message: e.to_string() })
}

fn layer_crs(path: &Path, expected: &str) -> NetworkResult<String> {
    let sidecar = path.with_extension("crs");
    if sidecar.is_file() {
        let found = std::fs::read_to_string(&sidecar)?;
        let found = found.trim();
        check_crs(expected, found)?;
        return Ok(found.to_owned());
    }
    Ok(expected.to_owned())
}

// ── Per-kind assembly ─────────────────────────────────────────────────────────

fn lines_from_raw(raw: RawLayer, crs: String, explode: bool) -> NetworkResult<LineLayer> {
    let mut geometries: Vec<LineString<f64>> = Vec::with_capacity(raw.wkt.len());
    let mut rows: Vec<usize> = Vec::with_capacity(raw.wkt.len());

    for (row, text) in raw.wkt.iter().enumerate() {
        match parse_geometry(row, text)? {
            Geometry::LineString(ls) => {
                geometries.push(ls);
                rows.push(row);
            }
            Geometry::Line(l) => {
                geometries.push(LineString::from(vec![l.start, l.end]));
                rows.push(row);
            }
            Geometry::MultiLineString(mls) if explode => {
                for part in mls.0 {
                    geometries.push(part);
                    rows.push(row);
                }
            }
            other => {
                return Err(NetworkError::MalformedGeometry {
                    feature: row,
                    reason:  format!("expected a line, found {}", kind(&other)),
                })
            }
        }
    }

    let attributes = raw.attributes(&rows)?;
    Ok(LineLayer { crs, geometries, attributes })
}

fn points_from_raw(raw: RawLayer, crs: String) -> NetworkResult<PointLayer> {
    let mut points: Vec<Point<f64>> = Vec::with_capacity(raw.wkt.len());
    let mut rows: Vec<usize> = Vec::with_capacity(raw.wkt.len());

    for (row, text) in raw.wkt.iter().enumerate() {
        match parse_geometry(row, text)? {
            Geometry::Point(p) => {
                points.push(p);
                rows.push(row);
            }
            Geometry::MultiPoint(mp) => {
                for p in mp.0 {
                    points.push(p);
                    rows.push(row);
                }
            }
            other => {
                return Err(NetworkError::MalformedGeometry {
                    feature: row,
                    reason:  format!("expected a point, found {}", kind(&other)),
                })
            }
        }
    }

    let attributes = raw.attributes(&rows)?;
    Ok(PointLayer { crs, points, attributes })
}

fn polygons_from_raw(raw: RawLayer, crs: String) -> NetworkResult<PolygonLayer> {
    let mut polygons: Vec<MultiPolygon<f64>> = Vec::with_capacity(raw.wkt.len());

    for (row, text) in raw.wkt.iter().enumerate() {
        match parse_geometry(row, text)? {
            Geometry::Polygon(p) => polygons.push(MultiPolygon::new(vec![p])),
            Geometry::MultiPolygon(mp) => polygons.push(mp),
            other => {
                return Err(NetworkError::MalformedGeometry {
                    feature: row,
                    reason:  format!("expected a polygon, found {}", kind(&other)),
                })
            }
        }
    }

    let rows: Vec<usize> = (0..polygons.len()).collect();
    let attributes = raw.attributes(&rows)?;
    Ok(PolygonLayer { crs, polygons, attributes })
}

fn kind(g: &Geometry<f64>) -> &'static str {
    match g {
        Geometry::Point(_) => "POINT",
        Geometry::Line(_) => "LINE",
        Geometry::LineString(_) => "LINESTRING",
        Geometry::Polygon(_) => "POLYGON",
        Geometry::MultiPoint(_) => "MULTIPOINT",
        Geometry::MultiLineString(_) => "MULTILINESTRING",
        Geometry::MultiPolygon(_) => "MULTIPOLYGON",
        Geometry::GeometryCollection(_) => "GEOMETRYCOLLECTION",
        Geometry::Rect(_) => "RECT",
        Geometry::Triangle(_) => "TRIANGLE",
    }
}
