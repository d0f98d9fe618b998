//! Study-area mask derived from the network geometry.

use std::f64::consts::PI;

use geo::{BoundingRect, ConvexHull, Coord, MultiPoint, Point, Polygon};

use fm_core::ClipOptions;
use fm_network::RoadNetwork;

use crate::{SummaryError, SummaryResult};

/// Vertices per buffered corner.
const ARC_SEGMENTS: usize = 16;

/// Convex hull (or bounding box) of every link geometry, grown outward by
/// `options.buffer`.
///
/// The buffer is approximated by the hull of a regular polygon around each
/// mask corner.  The polygon circumscribes the true circle, so the result
/// always contains the exact buffered shape.
pub fn study_area(network: &RoadNetwork, options: &ClipOptions) -> SummaryResult<Polygon<f64>> {
    if !options.buffer.is_finite() || options.buffer < 0.0 {
        return Err(SummaryError::InvalidBuffer(options.buffer));
    }
    let coords: Vec<Point<f64>> = network
        .link_geometry
        .iter()
        .flat_map(|line| line.coords().copied().map(Point::from))
        .collect();
    let all = MultiPoint::from(coords);
    if all.0.is_empty() {
        return Err(SummaryError::EmptyStudyArea);
    }

    let corners: Vec<Coord<f64>> = if options.use_convex_hull {
        all.convex_hull().exterior().coords().copied().collect()
    } else {
        let rect = all.bounding_rect().ok_or(SummaryError::EmptyStudyArea)?;
        rect.to_polygon().exterior().coords().copied().collect()
    };

    if options.buffer == 0.0 {
        return Ok(MultiPoint::from(corners).convex_hull());
    }

    let radius = options.buffer / (PI / ARC_SEGMENTS as f64).cos();
    let grown: Vec<Point<f64>> = corners
        .iter()
        .flat_map(|c| {
            (0..ARC_SEGMENTS).map(move |k| {
                let a = 2.0 * PI * k as f64 / ARC_SEGMENTS as f64;
                Point::new(c.x + radius * a.cos(), c.y + radius * a.sin())
            })
        })
        .collect();
    Ok(MultiPoint::from(grown).convex_hull())
}
