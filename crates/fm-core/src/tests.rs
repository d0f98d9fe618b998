//! Unit tests for fm-core.

// ── Typed IDs ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod ids {
    use crate::{LinkId, VertexId};

    #[test]
    fn index_roundtrip() {
        let id = VertexId(7);
        assert_eq!(id.index(), 7);
        assert_eq!(usize::from(LinkId(3)), 3);
    }

    #[test]
    fn try_from_overflow() {
        assert!(VertexId::try_from(u32::MAX as usize + 1).is_err());
        assert_eq!(VertexId::try_from(5usize).unwrap(), VertexId(5));
    }

    #[test]
    fn display_uses_label() {
        assert_eq!(LinkId(4).to_string(), "link 4");
        assert_eq!(VertexId(0).to_string(), "vertex 0");
    }
}

// ── VertexKey ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod vertex_key {
    use std::collections::HashSet;

    use crate::{Coord, VertexKey};

    #[test]
    fn equal_coords_equal_keys() {
        let a = VertexKey::new(Coord { x: 1.5, y: -2.0 }).unwrap();
        let b = VertexKey::new(Coord { x: 1.5, y: -2.0 }).unwrap();
        assert_eq!(a, b);
        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn negative_zero_folds() {
        let a = VertexKey::new(Coord { x: 0.0, y: 1.0 }).unwrap();
        let b = VertexKey::new(Coord { x: -0.0, y: 1.0 }).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn float_noise_does_not_merge() {
        let a = VertexKey::new(Coord { x: 0.1 + 0.2, y: 0.0 }).unwrap();
        let b = VertexKey::new(Coord { x: 0.3, y: 0.0 }).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn non_finite_rejected() {
        assert!(VertexKey::new(Coord { x: f64::NAN, y: 0.0 }).is_none());
        assert!(VertexKey::new(Coord { x: 0.0, y: f64::INFINITY }).is_none());
    }

    #[test]
    fn coord_roundtrip() {
        let c = Coord { x: 512_345.25, y: 3_290_001.5 };
        assert_eq!(VertexKey::new(c).unwrap().coord(), c);
    }
}

// ── Naming ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod naming {
    use std::path::Path;

    use crate::naming::*;

    #[test]
    fn column_names() {
        assert_eq!(initial_distance_column("hospital"), "Initial_dist_hospital");
        assert_eq!(scenario_distance_column("max_r1", "hospital"), "max_r1_hospital");
        assert_eq!(closeness_loss_column("hospital", "max_r1"), "CL_hospital_max_r1");
        assert_eq!(flood_tag_column("max_r1", 0.6, None), "max_r1_0.6");
        assert_eq!(flood_tag_column("max_r1", 2.5, Some("ft")), "max_r1_2.5_ft");
    }

    #[test]
    fn scenario_from_raster() {
        let p = Path::new("/data/depth/run_0415.max.tif");
        assert_eq!(scenario_id_from_raster_path(p).as_deref(), Some("max_run_0415"));
        assert_eq!(scenario_id_from_raster_path(Path::new("/")), None);
    }
}

// ── Config ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use crate::{AnalysisConfig, ElevationTagOptions, FacilitySelection, OutputFormat};

    #[test]
    fn defaults_applied() {
        let cfg = AnalysisConfig::from_json_str(r#"{ "network_path": "roads.csv" }"#).unwrap();
        assert_eq!(cfg.crs, "epsg:26915");
        assert_eq!(cfg.weight_attribute, "length");
        assert_eq!(cfg.link_removal_threshold, 0.6);
        assert_eq!(cfg.wading_height(), 0.6);
        assert_eq!(cfg.initial_inaccessibility_code, 999.0);
        assert_eq!(cfg.scenario_inaccessibility_code, 1e5);
        assert_eq!(cfg.encode_no_data_as, Some(0));
        assert_eq!(cfg.facility_labels, FacilitySelection::All);
        assert_eq!(cfg.output_format, OutputFormat::Csv);
        assert!(cfg.clip.use_convex_hull);
    }

    #[test]
    fn selection_forms() {
        let one = AnalysisConfig::from_json_str(
            r#"{ "network_path": "r.csv", "facility_labels": "hospital" }"#,
        ).unwrap();
        assert_eq!(one.facility_labels, FacilitySelection::Only(vec!["hospital".into()]));

        let many = AnalysisConfig::from_json_str(
            r#"{ "network_path": "r.csv", "facility_labels": ["a", "b"] }"#,
        ).unwrap();
        assert!(many.facility_labels.includes("b"));
        assert!(!many.facility_labels.includes("c"));
    }

    #[test]
    fn null_no_data_tag() {
        let cfg = AnalysisConfig::from_json_str(
            r#"{ "network_path": "r.csv", "encode_no_data_as": null }"#,
        ).unwrap();
        assert_eq!(cfg.encode_no_data_as, None);
    }

    #[test]
    fn equal_codes_rejected() {
        let err = AnalysisConfig::from_json_str(
            r#"{ "network_path": "r.csv",
                 "initial_inaccessibility_code": 5.0,
                 "scenario_inaccessibility_code": 5.0 }"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn zero_threads_rejected() {
        let mut cfg = AnalysisConfig::new("r.csv");
        cfg.threads = Some(0);
        assert!(cfg.validate().is_err());
        cfg.threads = Some(2);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn negative_threshold_rejected() {
        let json = r#"{ "network_path": "r.csv", "link_removal_threshold": -1.0, "wading_height": 0.5 }"#;
        assert!(AnalysisConfig::from_json_str(json).is_err());

        let mut cfg = AnalysisConfig::new("r.csv");
        cfg.wading_height = Some(0.5);
        cfg.link_removal_threshold = -0.01;
        assert!(cfg.validate().is_err());
        cfg.link_removal_threshold = 0.0;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn elevation_tagging_block() {
        let cfg = AnalysisConfig::from_json_str(
            r#"{ "network_path": "r.csv", "elevation_tagging": { "factor": 1.0, "scenario_pattern": "r1" } }"#,
        )
        .unwrap();
        let elev = cfg.elevation_tagging.unwrap();
        assert_eq!(elev.elevation_attribute, "min_ele");
        assert_eq!(elev.factor, 1.0);
        assert_eq!(elev.suffix.as_deref(), Some("ft"));
        assert_eq!(elev.scenario_pattern, "r1");

        let none = AnalysisConfig::from_json_str(r#"{ "network_path": "r.csv" }"#).unwrap();
        assert!(none.elevation_tagging.is_none());
    }

    #[test]
    fn elevation_tag_names_must_not_clash() {
        let mut cfg = AnalysisConfig::new("r.csv");
        cfg.wading_height = Some(2.0);
        cfg.flood_tag_suffix = Some("ft".into());
        cfg.elevation_tagging = Some(ElevationTagOptions::default());
        assert!(cfg.validate().is_err());

        cfg.flood_tag_suffix = None;
        assert!(cfg.validate().is_ok());

        cfg.elevation_tagging = Some(ElevationTagOptions { factor: f64::NAN, ..Default::default() });
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn explicit_wading_height() {
        let mut cfg = AnalysisConfig::new("r.csv");
        cfg.wading_height = Some(2.0);
        assert_eq!(cfg.wading_height(), 2.0);
    }
}
