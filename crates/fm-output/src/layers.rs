//! Conversions from engine results to output tables.

use geo::Point;
use wkt::ToWkt;

use fm_engine::{NodeResults, TagColumn};
use fm_network::{ColumnValues, RoadNetwork};
use fm_summary::PolygonSummary;

use crate::table::{ColumnData, OutputTable};
use crate::OutputResult;

pub const NODE_RESULTS: &str = "Node_results";
pub const NETWORK_CONDITION_RESULTS: &str = "Network_Condition_results";
pub const GEO_SUMMARY_RESULTS: &str = "Geo_summary_results";

fn nullable(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().map(|v| (!v.is_nan()).then_some(*v)).collect()
}

fn attribute_data(values: &ColumnValues) -> ColumnData {
    match values {
        ColumnValues::Number(v) => ColumnData::Float(nullable(v)),
        ColumnValues::Text(v) => ColumnData::Text(v.clone()),
    }
}

/// One row per vertex, a POINT at its coordinate, every result column.
pub fn node_table(results: &NodeResults) -> OutputResult<OutputTable> {
    let geometry = results.vertices().iter().map(|&c| Point::from(c).wkt_string()).collect();
    let mut table = OutputTable::new(NODE_RESULTS, geometry);
    for column in results.columns() {
        table.push(column.name.clone(), ColumnData::Float(nullable(&column.values)))?;
    }
    Ok(table)
}

/// The network's own attributes plus one column per flood tag.
pub fn network_table(network: &RoadNetwork, tags: &[TagColumn]) -> OutputResult<OutputTable> {
    let geometry = network.link_geometry.iter().map(|l| l.wkt_string()).collect();
    let mut table = OutputTable::new(NETWORK_CONDITION_RESULTS, geometry);
    for column in network.attributes.columns() {
        table.push(column.name.clone(), attribute_data(&column.values))?;
    }
    for tag in tags {
        table.push(tag.name.clone(), ColumnData::Tag(tag.values.clone()))?;
    }
    Ok(table)
}

/// Polygon attributes followed by the `<column>_<stat>` columns.
pub fn summary_table(summary: &PolygonSummary) -> OutputResult<OutputTable> {
    let geometry = summary.polygons.iter().map(|p| p.wkt_string()).collect();
    let mut table = OutputTable::new(GEO_SUMMARY_RESULTS, geometry);
    for column in summary.attributes.columns() {
        table.push(column.name.clone(), attribute_data(&column.values))?;
    }
    for stat in &summary.stats {
        table.push(stat.name.clone(), ColumnData::Float(stat.values.clone()))?;
    }
    Ok(table)
}
