//! Tests for fm-output.

#[cfg(test)]
mod fixtures {
    use geo::{coord, LineString, MultiPolygon, Rect};

    use fm_engine::{NodeResults, ResultColumn, TagColumn};
    use fm_network::{AttributeTable, PolygonLayer, RoadNetwork, RoadNetworkBuilder};

    /// (0,0) ── (1,0) ── (2,0) with a scenario column and a road name.
    pub fn network() -> RoadNetwork {
        let mut b = RoadNetworkBuilder::new(false);
        b.add_line(&LineString::from(vec![(0.0, 0.0), (1.0, 0.0)]), 1.0).unwrap();
        b.add_line(&LineString::from(vec![(1.0, 0.0), (2.0, 0.0)]), 1.0).unwrap();
        let mut attrs = AttributeTable::new(2);
        attrs.push_number("length", vec![1.0, 1.0]).unwrap();
        attrs.push_number("max_r1", vec![0.9, f64::NAN]).unwrap();
        attrs.push_text("name", vec!["Main St".into(), "Oak, Ave".into()]).unwrap();
        b.build(attrs, "epsg:26915".into()).unwrap()
    }

    pub fn results(net: &RoadNetwork) -> NodeResults {
        let mut r = NodeResults::new(net);
        r.push(ResultColumn { name: "Initial_dist_h".into(), values: vec![0.0, 1.0, 2.0] }).unwrap();
        r.push(ResultColumn { name: "max_r1_h".into(), values: vec![0.0, 1.0, 1e5] }).unwrap();
        r
    }

    pub fn tags() -> Vec<TagColumn> {
        vec![TagColumn { name: "max_r1_0.6".into(), values: vec![Some(1), None] }]
    }

    pub fn polygons() -> PolygonLayer {
        let square = |x0: f64, x1: f64| {
            MultiPolygon::new(vec![Rect::new(coord! { x: x0, y: -1.0 }, coord! { x: x1, y: 1.0 }).to_polygon()])
        };
        let mut layer = PolygonLayer::new("epsg:26915", vec![square(-0.5, 1.5), square(5.0, 6.0)]);
        layer.attributes.push_number("tract", vec![101.0, 102.0]).unwrap();
        layer
    }
}

// ── Layer tables ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod layers {
    use crate::table::ColumnData;
    use crate::{network_table, node_table, summary_table, OutputError, OutputTable};

    use super::fixtures;

    #[test]
    fn node_table_has_points_and_result_columns() {
        let net = fixtures::network();
        let table = node_table(&fixtures::results(&net)).unwrap();
        assert_eq!(table.name, "Node_results");
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.header(), ["Initial_dist_h", "max_r1_h", "geometry"]);
        assert!(table.geometry.iter().all(|g| g.starts_with("POINT")));
    }

    #[test]
    fn network_table_keeps_attributes_and_tags() {
        let net = fixtures::network();
        let table = network_table(&net, &fixtures::tags()).unwrap();
        assert_eq!(table.header(), ["length", "max_r1", "name", "max_r1_0.6", "geometry"]);
        assert_eq!(table.column("max_r1"), Some(&ColumnData::Float(vec![Some(0.9), None])));
        assert_eq!(table.column("max_r1_0.6"), Some(&ColumnData::Tag(vec![Some(1), None])));
        assert!(table.geometry[0].starts_with("LINESTRING"));
    }

    #[test]
    fn summary_table_null_for_empty_polygon() {
        let net = fixtures::network();
        let summary = fm_summary::summarize(&fixtures::polygons(), &fixtures::results(&net));
        let table = summary_table(&summary).unwrap();
        assert_eq!(table.name, "Geo_summary_results");
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.header()[0], "tract");
        match table.column("Initial_dist_h_mean") {
            Some(ColumnData::Float(v)) => assert_eq!(v, &vec![Some(0.5), None]),
            other => panic!("unexpected column {other:?}"),
        }
        assert!(table.geometry[0].starts_with("MULTIPOLYGON"));
    }

    #[test]
    fn table_rejects_bad_columns() {
        let mut t = OutputTable::new("t", vec!["POINT(0 0)".into()]);
        t.push("a", ColumnData::Float(vec![Some(1.0)])).unwrap();
        assert!(matches!(
            t.push("a", ColumnData::Float(vec![None])),
            Err(OutputError::DuplicateColumn { .. })
        ));
        assert!(matches!(
            t.push("geometry", ColumnData::Text(vec!["x".into()])),
            Err(OutputError::DuplicateColumn { .. })
        ));
        assert!(matches!(
            t.push("b", ColumnData::Tag(vec![])),
            Err(OutputError::ColumnLength { expected: 1, got: 0, .. })
        ));
    }
}

// ── CSV backend ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use fm_core::OutputFormat;

    use crate::writer::OutputWriter;
    use crate::{network_table, node_table, open_writer, CsvWriter, OutputError};

    use super::fixtures;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn node_results_round_trip() {
        let dir = tmp();
        let net = fixtures::network();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_table(&node_table(&fixtures::results(&net)).unwrap()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("Node_results.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["Initial_dist_h", "max_r1_h", "geometry"]);

        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[2][0], "2");
        assert_eq!(&rows[2][1], "100000");
        assert!(rows[2][2].starts_with("POINT"));
    }

    #[test]
    fn nulls_are_empty_and_text_is_quoted() {
        let dir = tmp();
        let net = fixtures::network();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_table(&network_table(&net, &fixtures::tags()).unwrap()).unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("Network_Condition_results.csv")).unwrap();
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(&rows[0][1], "0.9");
        assert_eq!(&rows[1][1], "");
        assert_eq!(&rows[1][2], "Oak, Ave");
        assert_eq!(&rows[0][3], "1");
        assert_eq!(&rows[1][3], "");
    }

    #[test]
    fn finish_is_idempotent_and_final() {
        let dir = tmp();
        let net = fixtures::network();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
        assert!(matches!(
            w.write_table(&node_table(&fixtures::results(&net)).unwrap()),
            Err(OutputError::Finished)
        ));
    }

    #[test]
    fn open_writer_creates_directory() {
        let dir = tmp();
        let out = dir.path().join("nested").join("results");
        let mut w = open_writer(OutputFormat::Csv, &out).unwrap();
        let net = fixtures::network();
        w.write_table(&node_table(&fixtures::results(&net)).unwrap()).unwrap();
        w.finish().unwrap();
        assert!(out.join("Node_results.csv").exists());
    }

    #[cfg(not(feature = "parquet"))]
    #[test]
    fn missing_backend_reported() {
        let dir = tmp();
        assert!(matches!(
            open_writer(OutputFormat::Parquet, dir.path()),
            Err(OutputError::FormatUnavailable("parquet"))
        ));
    }
}

// ── SQLite backend ────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use crate::writer::OutputWriter;
    use crate::{network_table, node_table, SqliteWriter};

    use super::fixtures;

    #[test]
    fn layers_become_tables() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let net = fixtures::network();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_table(&node_table(&fixtures::results(&net)).unwrap()).unwrap();
        w.write_table(&network_table(&net, &fixtures::tags()).unwrap()).unwrap();
        // Rewriting a layer replaces it.
        w.write_table(&node_table(&fixtures::results(&net)).unwrap()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("results.db")).unwrap();
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM Node_results", [], |r| r.get(0)).unwrap();
        assert_eq!(n, 3);
        let d: f64 = conn
            .query_row("SELECT \"max_r1_h\" FROM Node_results WHERE rowid = 3", [], |r| r.get(0))
            .unwrap();
        assert_eq!(d, 1e5);
        let tag: Option<i64> = conn
            .query_row(
                "SELECT \"max_r1_0.6\" FROM Network_Condition_results WHERE rowid = 2",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(tag, None);
    }
}

// ── Parquet backend ───────────────────────────────────────────────────────────

#[cfg(all(test, feature = "parquet"))]
mod parquet_tests {
    use arrow::datatypes::DataType;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    use crate::writer::OutputWriter;
    use crate::{network_table, ParquetWriter};

    use super::fixtures;

    #[test]
    fn schema_and_rows() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let net = fixtures::network();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.write_table(&network_table(&net, &fixtures::tags()).unwrap()).unwrap();
        w.finish().unwrap();

        let file = std::fs::File::open(dir.path().join("Network_Condition_results.parquet")).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        let schema = builder.schema().clone();
        let rows: usize = builder.build().unwrap().map(|b| b.unwrap().num_rows()).sum();
        assert_eq!(rows, 2);

        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(names, ["length", "max_r1", "name", "max_r1_0.6", "geometry"]);
        assert_eq!(*schema.field_with_name("max_r1").unwrap().data_type(), DataType::Float64);
        assert_eq!(*schema.field_with_name("max_r1_0.6").unwrap().data_type(), DataType::UInt8);
        assert_eq!(*schema.field_with_name("geometry").unwrap().data_type(), DataType::Utf8);
    }
}
