//! Trim aggregation polygons to the study area.

use geo::{Area, BooleanOps, MultiPolygon, Polygon};
use tracing::debug;

use fm_network::PolygonLayer;

/// Intersect every polygon with `mask`.  Polygons that end up empty are
/// dropped along with their attribute rows; the rest keep input order.
pub fn clip_polygons(layer: &PolygonLayer, mask: &Polygon<f64>) -> PolygonLayer {
    let mask = MultiPolygon::new(vec![mask.clone()]);
    let mut kept_rows = Vec::new();
    let mut clipped = Vec::new();
    for (row, poly) in layer.polygons.iter().enumerate() {
        let part = poly.intersection(&mask);
        if part.0.is_empty() || part.unsigned_area() == 0.0 {
            continue;
        }
        kept_rows.push(row);
        clipped.push(part);
    }
    debug!(input = layer.polygons.len(), kept = clipped.len(), "clipped polygons to study area");

    let mut out = PolygonLayer::new(layer.crs.clone(), clipped);
    out.attributes = layer.attributes.select_rows(&kept_rows);
    out
}
