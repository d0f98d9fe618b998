//! Fluent builder for constructing an [`Analysis`].

use std::path::Path;

use geo::Point;
use tracing::info;

use fm_core::AnalysisConfig;
use fm_engine::CancelToken;
use fm_network::{
    check_crs, load_lines_csv, load_points_csv, load_polygons_csv, FacilityIndex, PolygonLayer,
    RoadNetwork,
};

use crate::{Analysis, AnalysisResult};

/// Fluent builder for [`Analysis`].
///
/// Inputs not supplied in memory are loaded from the paths in the
/// [`AnalysisConfig`].
///
/// | Method              | Default                                   |
/// |---------------------|-------------------------------------------|
/// | `.network(n)`       | `config.network_path`                     |
/// | `.facility(l, pts)` | every entry of `config.facilities`        |
/// | `.polygons(layer)`  | `config.polygons_path`, if any            |
/// | `.cancel_token(t)`  | a fresh, never-cancelled token            |
///
/// # Example
///
/// ```rust,ignore
/// let analysis = AnalysisBuilder::new(config)
///     .network(network)
///     .facility("hospital", hospital_points)
///     .build()?;
/// ```
pub struct AnalysisBuilder {
    config:     AnalysisConfig,
    network:    Option<RoadNetwork>,
    facilities: Vec<(String, Vec<Point<f64>>)>,
    polygons:   Option<PolygonLayer>,
    cancel:     Option<CancelToken>,
}

impl AnalysisBuilder {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            network:    None,
            facilities: Vec::new(),
            polygons:   None,
            cancel:     None,
        }
    }

    /// Read and validate a JSON configuration file.
    pub fn from_config_path(path: &Path) -> AnalysisResult<Self> {
        Ok(Self::new(AnalysisConfig::from_json_path(path)?))
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Use an already-built network instead of `config.network_path`.
    pub fn network(mut self, network: RoadNetwork) -> Self {
        self.network = Some(network);
        self
    }

    /// Add a facility from in-memory points.  Once any facility is given,
    /// `config.facilities` is ignored.
    pub fn facility(mut self, label: impl Into<String>, points: Vec<Point<f64>>) -> Self {
        self.facilities.push((label.into(), points));
        self
    }

    pub fn polygons(mut self, polygons: PolygonLayer) -> Self {
        self.polygons = Some(polygons);
        self
    }

    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Validate the configuration, load missing inputs, snap facilities,
    /// and resolve the scenario list.
    pub fn build(self) -> AnalysisResult<Analysis> {
        let config = self.config;
        config.validate()?;

        // ── Network ───────────────────────────────────────────────────────
        let network = match self.network {
            Some(n) => {
                check_crs(&config.crs, n.crs())?;
                n
            }
            None => {
                let layer = load_lines_csv(&config.network_path, &config.crs, config.explode_multilines)?;
                RoadNetwork::from_layer(&layer, &config.weight_attribute, config.directed)?
            }
        };
        info!(
            vertices = network.vertex_count(),
            links = network.link_count(),
            directed = network.is_directed(),
            "road network ready"
        );

        // ── Facilities ────────────────────────────────────────────────────
        let mut facilities = FacilityIndex::new();
        if self.facilities.is_empty() {
            for (label, path) in &config.facilities {
                let layer = load_points_csv(path, &config.crs)?;
                facilities.register(&network, label, &layer.points)?;
            }
        } else {
            for (label, points) in &self.facilities {
                facilities.register(&network, label, points)?;
            }
        }
        info!(facilities = facilities.len(), "facilities snapped");

        // ── Polygons ──────────────────────────────────────────────────────
        let polygons = match (self.polygons, &config.polygons_path) {
            (Some(p), _) => {
                check_crs(&config.crs, &p.crs)?;
                Some(p)
            }
            (None, Some(path)) => Some(load_polygons_csv(path, &config.crs)?),
            (None, None) => None,
        };

        // ── Scenarios ─────────────────────────────────────────────────────
        let scenarios =
            if config.scenarios.is_empty() { network.scenario_ids() } else { config.scenarios.clone() };
        info!(scenarios = scenarios.len(), "scenarios resolved");

        Ok(Analysis {
            config,
            network,
            facilities,
            polygons,
            scenarios,
            cancel: self.cancel.unwrap_or_default(),
        })
    }
}
