//! Point-in-polygon join and per-polygon summary statistics.
//!
//! Every result vertex is a point.  A polygon aggregates the points that
//! intersect it (boundary included), so a point on a shared edge counts
//! toward both neighbours.  Polygons without points keep their row with
//! every statistic `None`.

use geo::{BoundingRect, Intersects, MultiPolygon, Point};
use rstar::primitives::GeomWithData;
use rstar::{RTree, AABB};
use tracing::debug;

use fm_engine::NodeResults;
use fm_network::{AttributeTable, PolygonLayer};

type IndexedPoint = GeomWithData<[f64; 2], usize>;

// ── Statistics ────────────────────────────────────────────────────────────────

/// Aggregates computed per polygon and result column, in column order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SummaryStats {
    Mean,
    Std,
    Max,
    Min,
}

impl SummaryStats {
    pub const ALL: [SummaryStats; 4] =
        [SummaryStats::Mean, SummaryStats::Std, SummaryStats::Max, SummaryStats::Min];

    pub fn suffix(self) -> &'static str {
        match self {
            SummaryStats::Mean => "mean",
            SummaryStats::Std => "std",
            SummaryStats::Max => "max",
            SummaryStats::Min => "min",
        }
    }

    /// `NaN` inputs are ignored.  `None` when no value remains, and for the
    /// sample standard deviation when fewer than two remain.
    pub fn compute(self, values: &[f64]) -> Option<f64> {
        let mut n = 0usize;
        let mut sum = 0.0;
        let mut max = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;
        for &v in values.iter().filter(|v| !v.is_nan()) {
            n += 1;
            sum += v;
            max = max.max(v);
            min = min.min(v);
        }
        if n == 0 {
            return None;
        }
        let mean = sum / n as f64;
        match self {
            SummaryStats::Mean => Some(mean),
            SummaryStats::Max => Some(max),
            SummaryStats::Min => Some(min),
            SummaryStats::Std => {
                if n < 2 {
                    return None;
                }
                let ss: f64 = values
                    .iter()
                    .filter(|v| !v.is_nan())
                    .map(|v| (v - mean) * (v - mean))
                    .sum();
                Some((ss / (n - 1) as f64).sqrt())
            }
        }
    }
}

/// `<column>_<stat>`, one value per polygon.
#[derive(Clone, Debug, PartialEq)]
pub struct StatColumn {
    pub name:   String,
    pub values: Vec<Option<f64>>,
}

/// Polygon layer joined with result statistics.
#[derive(Clone, Debug)]
pub struct PolygonSummary {
    pub crs:          String,
    pub polygons:     Vec<MultiPolygon<f64>>,
    /// The polygon layer's own attributes, carried through.
    pub attributes:   AttributeTable,
    /// Number of result vertices inside each polygon.
    pub point_counts: Vec<usize>,
    pub stats:        Vec<StatColumn>,
}

impl PolygonSummary {
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.stats.iter().find(|c| c.name == name).map(|c| c.values.as_slice())
    }
}

// ── Join ──────────────────────────────────────────────────────────────────────

/// Summarise every numeric column of `results` over `polygons`.
pub fn summarize(polygons: &PolygonLayer, results: &NodeResults) -> PolygonSummary {
    let members = join_points(polygons, results);

    let mut stats = Vec::with_capacity(results.columns().len() * SummaryStats::ALL.len());
    for column in results.columns() {
        let grouped: Vec<Vec<f64>> = members
            .iter()
            .map(|pts| pts.iter().map(|&i| column.values[i]).collect())
            .collect();
        for stat in SummaryStats::ALL {
            stats.push(StatColumn {
                name:   format!("{}_{}", column.name, stat.suffix()),
                values: grouped.iter().map(|vals| stat.compute(vals)).collect(),
            });
        }
    }

    let point_counts: Vec<usize> = members.iter().map(Vec::len).collect();
    debug!(
        polygons = polygons.polygons.len(),
        empty = point_counts.iter().filter(|&&n| n == 0).count(),
        columns = results.columns().len(),
        "summarized results at polygons"
    );

    PolygonSummary {
        crs:        polygons.crs.clone(),
        polygons:   polygons.polygons.clone(),
        attributes: polygons.attributes.clone(),
        point_counts,
        stats,
    }
}

/// Vertex indices inside each polygon, ascending.
fn join_points(polygons: &PolygonLayer, results: &NodeResults) -> Vec<Vec<usize>> {
    let tree: RTree<IndexedPoint> = RTree::bulk_load(
        results
            .vertices()
            .iter()
            .enumerate()
            .map(|(i, c)| GeomWithData::new([c.x, c.y], i))
            .collect(),
    );

    polygons
        .polygons
        .iter()
        .map(|poly| {
            let Some(rect) = poly.bounding_rect() else {
                return Vec::new();
            };
            let envelope = AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]);
            let mut inside: Vec<usize> = tree
                .locate_in_envelope(&envelope)
                .filter(|p| poly.intersects(&Point::new(p.geom()[0], p.geom()[1])))
                .map(|p| p.data)
                .collect();
            inside.sort_unstable();
            inside
        })
        .collect()
}
