//! Unit tests for fm-summary.

#[cfg(test)]
mod helpers {
    use geo::{coord, LineString, MultiPolygon, Rect};

    use fm_network::{AttributeTable, PolygonLayer, RoadNetwork, RoadNetworkBuilder};

    /// Ring (0,0) → (2,0) → (2,2) → (0,2) → (0,0), or the open path of the
    /// first `n` links.
    pub fn ring(n: usize) -> RoadNetwork {
        let pts = [(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0), (0.0, 0.0)];
        let mut b = RoadNetworkBuilder::new(false);
        for w in pts.windows(2).take(n) {
            b.add_line(&LineString::from(vec![w[0], w[1]]), 2.0).unwrap();
        }
        b.build(AttributeTable::new(n), "epsg:26915".into()).unwrap()
    }

    pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![Rect::new(coord! { x: x0, y: y0 }, coord! { x: x1, y: y1 }).to_polygon()])
    }

    pub fn layer(polys: Vec<MultiPolygon<f64>>) -> PolygonLayer {
        let ids: Vec<f64> = (1..=polys.len()).map(|i| i as f64).collect();
        let mut layer = PolygonLayer::new("epsg:26915", polys);
        layer.attributes.push_number("tract", ids).unwrap();
        layer
    }
}

// ── Study area ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod mask {
    use geo::{point, Area, Contains};

    use fm_core::ClipOptions;
    use fm_network::{AttributeTable, RoadNetworkBuilder};

    use crate::{study_area, SummaryError};

    use super::helpers::ring;

    #[test]
    fn hull_without_buffer() {
        let opts = ClipOptions { use_convex_hull: true, buffer: 0.0 };
        let area = study_area(&ring(4), &opts).unwrap();
        assert!((area.unsigned_area() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn hull_of_open_path_vs_bbox() {
        let net = ring(2);
        let hull = study_area(&net, &ClipOptions { use_convex_hull: true, buffer: 0.0 }).unwrap();
        let bbox = study_area(&net, &ClipOptions { use_convex_hull: false, buffer: 0.0 }).unwrap();
        assert!((hull.unsigned_area() - 2.0).abs() < 1e-9);
        assert!((bbox.unsigned_area() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn buffer_grows_outward() {
        let area = study_area(&ring(4), &ClipOptions::default()).unwrap();
        assert!(area.contains(&point!(x: -0.99, y: 1.0)));
        assert!(area.contains(&point!(x: 2.7, y: 2.7)));
        assert!(!area.contains(&point!(x: -1.1, y: 1.0)));
    }

    #[test]
    fn rejects_empty_network_and_bad_buffer() {
        let empty = RoadNetworkBuilder::new(false).build(AttributeTable::new(0), "x".into()).unwrap();
        assert!(matches!(
            study_area(&empty, &ClipOptions::default()),
            Err(SummaryError::EmptyStudyArea)
        ));
        assert!(matches!(
            study_area(&ring(4), &ClipOptions { use_convex_hull: true, buffer: -1.0 }),
            Err(SummaryError::InvalidBuffer(_))
        ));
    }
}

// ── Clipping ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod clip {
    use geo::Area;

    use fm_core::ClipOptions;

    use crate::{clip_polygons, study_area};

    use super::helpers::{layer, rect, ring};

    #[test]
    fn outside_polygons_dropped_with_their_rows() {
        let mask = study_area(&ring(4), &ClipOptions { use_convex_hull: true, buffer: 0.0 }).unwrap();
        let input = layer(vec![
            rect(1.0, 1.0, 3.0, 3.0),
            rect(10.0, 10.0, 11.0, 11.0),
            rect(0.5, 0.5, 1.0, 1.0),
        ]);
        let out = clip_polygons(&input, &mask);
        assert_eq!(out.polygons.len(), 2);
        assert_eq!(out.attributes.number("tract").unwrap(), &[1.0, 3.0]);
        assert!((out.polygons[0].unsigned_area() - 1.0).abs() < 1e-9);
        assert!((out.polygons[1].unsigned_area() - 0.25).abs() < 1e-9);
        assert_eq!(out.crs, "epsg:26915");
    }
}

// ── Statistics ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod stats {
    use fm_engine::{NodeResults, ResultColumn};

    use crate::{summarize, SummaryStats};

    use super::helpers::{layer, rect, ring};

    #[test]
    fn stat_definitions() {
        let v = [1.0, f64::NAN, 3.0];
        assert_eq!(SummaryStats::Mean.compute(&v), Some(2.0));
        assert_eq!(SummaryStats::Max.compute(&v), Some(3.0));
        assert_eq!(SummaryStats::Min.compute(&v), Some(1.0));
        let std = SummaryStats::Std.compute(&v).unwrap();
        assert!((std - 2f64.sqrt()).abs() < 1e-12);

        assert_eq!(SummaryStats::Std.compute(&[5.0]), None);
        assert_eq!(SummaryStats::Mean.compute(&[]), None);
        assert_eq!(SummaryStats::Mean.compute(&[f64::NAN]), None);
    }

    #[test]
    fn join_and_aggregate() {
        // Vertices: 0 (0,0), 1 (2,0), 2 (2,2), 3 (0,2).
        let net = ring(4);
        let mut results = NodeResults::new(&net);
        results.push(ResultColumn { name: "d".into(), values: vec![0.0, 1.0, 2.0, 1.0] }).unwrap();

        let polys = layer(vec![
            rect(-0.5, -0.5, 1.0, 2.5), // v0, v3
            rect(1.5, 1.5, 2.5, 2.5),   // v2
            rect(5.0, 5.0, 6.0, 6.0),   // nothing
            rect(2.0, -1.0, 3.0, 3.0),  // v1, v2 on the boundary
        ]);
        let summary = summarize(&polys, &results);

        assert_eq!(summary.len(), 4);
        assert_eq!(summary.point_counts, vec![2, 1, 0, 2]);
        let names: Vec<&str> = summary.stats.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["d_mean", "d_std", "d_max", "d_min"]);

        let mean = summary.column("d_mean").unwrap();
        assert_eq!(mean, &[Some(0.5), Some(2.0), None, Some(1.5)]);
        let std = summary.column("d_std").unwrap();
        assert!((std[0].unwrap() - 0.5f64.sqrt()).abs() < 1e-12);
        assert_eq!(std[1], None);
        assert_eq!(std[2], None);
        assert_eq!(summary.column("d_max").unwrap()[0], Some(1.0));
        assert_eq!(summary.column("d_min").unwrap()[3], Some(1.0));
        assert_eq!(summary.attributes.number("tract").unwrap(), &[1.0, 2.0, 3.0, 4.0]);
    }
}
