//! Column naming conventions for result tables.

/// Prefix carried by per-scenario flood-depth attributes on the network.
pub const SCENARIO_PREFIX: &str = "max_";

/// `Initial_dist_<facility>`
pub fn initial_distance_column(facility: &str) -> String {
    format!("Initial_dist_{facility}")
}

/// `<scenario>_<facility>`
pub fn scenario_distance_column(scenario: &str, facility: &str) -> String {
    format!("{scenario}_{facility}")
}

/// `CL_<facility>_<scenario>`
pub fn closeness_loss_column(facility: &str, scenario: &str) -> String {
    format!("CL_{facility}_{scenario}")
}

/// `<scenario>_<wading_height>[_<suffix>]`
pub fn flood_tag_column(scenario: &str, wading_height: f64, suffix: Option<&str>) -> String {
    match suffix {
        Some(s) if !s.is_empty() => format!("{scenario}_{wading_height}_{s}"),
        _ => format!("{scenario}_{wading_height}"),
    }
}

/// Scenario id for a flood raster: `max_` + the file name up to its first dot.
///
/// `/data/depth/run_0415.max.tif` → `max_run_0415`.
pub fn scenario_id_from_raster_path(path: &std::path::Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let stem = name.split('.').next().filter(|s| !s.is_empty())?;
    Some(format!("{SCENARIO_PREFIX}{stem}"))
}
