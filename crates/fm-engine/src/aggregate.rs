//! Accessibility aggregation: closeness loss per vertex, flood tags per link.

use tracing::{debug, info, warn};

use fm_core::naming::{
    closeness_loss_column, flood_tag_column, initial_distance_column, scenario_distance_column,
};
use fm_core::{ElevationTagOptions, CL_EPSILON};
use fm_network::RoadNetwork;

use crate::results::{NodeResults, ResultColumn};
use crate::{EngineError, EngineResult};

// ── Closeness loss ────────────────────────────────────────────────────────────

/// `1 − (initial + ε) / (scenario + ε)`.
///
/// `0` when the distance is unchanged, approaching `1` as the scenario
/// distance grows (including the unreachable sentinel).  `ε` only guards
/// the vertex that *is* the facility, where both distances are zero.
#[inline]
pub fn closeness_loss(initial: f64, scenario: f64) -> f64 {
    1.0 - (initial + CL_EPSILON) / (scenario + CL_EPSILON)
}

impl NodeResults {
    /// Add `CL_<facility>_<scenario>` for every pair whose initial and
    /// scenario distance columns are both present.
    ///
    /// Pairs with a missing input (a failed or cancelled unit) are skipped.
    /// Returns the number of columns written.
    pub fn estimate_closeness_loss(
        &mut self,
        facilities: &[String],
        scenarios:  &[String],
    ) -> EngineResult<usize> {
        let mut computed = Vec::new();
        for facility in facilities {
            let Some(initial) = self.column(&initial_distance_column(facility)) else {
                warn!(facility = %facility, "no initial distances; closeness loss skipped");
                continue;
            };
            for scenario in scenarios {
                let Some(disturbed) = self.column(&scenario_distance_column(scenario, facility))
                else {
                    debug!(facility = %facility, scenario = %scenario, "no scenario distances");
                    continue;
                };
                let values = initial
                    .iter()
                    .zip(disturbed)
                    .map(|(&d0, &ds)| closeness_loss(d0, ds))
                    .collect();
                computed.push(ResultColumn { name: closeness_loss_column(facility, scenario), values });
            }
        }
        let n = computed.len();
        self.extend(computed)?;
        info!(columns = n, "closeness loss estimated");
        Ok(n)
    }
}

// ── Flood tags ────────────────────────────────────────────────────────────────

/// One 0/1 tag per network link; `None` is an untagged link.
#[derive(Clone, Debug, PartialEq)]
pub struct TagColumn {
    pub name:   String,
    pub values: Vec<Option<u8>>,
}

impl TagColumn {
    pub fn flooded_count(&self) -> usize {
        self.values.iter().filter(|v| **v == Some(1)).count()
    }
}

#[inline]
fn tag(statistic: f64, wading_height: f64) -> u8 {
    u8::from(statistic >= wading_height)
}

/// Tag every link of each scenario: `1` when its value is at or above
/// `wading_height`, `0` below it.
///
/// Links with no value (`NaN`) get `no_data`.  `Some(0)` treats them as
/// passable; `None` leaves them untagged.
pub fn tag_flooded_links(
    network:       &RoadNetwork,
    scenarios:     &[String],
    wading_height: f64,
    suffix:        Option<&str>,
    no_data:       Option<u8>,
) -> EngineResult<Vec<TagColumn>> {
    scenarios
        .iter()
        .map(|scenario| {
            let values = network
                .scenario_values(scenario)
                .ok_or_else(|| EngineError::UnknownScenario(scenario.clone()))?;
            let values = values
                .iter()
                .map(|&v| if v.is_finite() { Some(tag(v, wading_height)) } else { no_data })
                .collect();
            Ok(TagColumn { name: flood_tag_column(scenario, wading_height, suffix), values })
        })
        .collect()
}

// ── Elevation-differential tags ───────────────────────────────────────────────

/// Tagging against depth above the road surface: a link is flooded when
/// `value − elevation × factor ≥ wading_height`.
#[derive(Clone, Debug, PartialEq)]
pub struct ElevationTagging {
    /// Numeric network attribute holding the road elevation.
    pub elevation_attribute: String,
    /// Converts elevation into scenario units (metres → feet by default).
    pub factor:              f64,
    pub wading_height:       f64,
    pub suffix:              Option<String>,
}

impl Default for ElevationTagging {
    fn default() -> Self {
        Self {
            elevation_attribute: "min_ele".into(),
            factor:              3.28084,
            wading_height:       2.0,
            suffix:              Some("ft".into()),
        }
    }
}

impl From<&ElevationTagOptions> for ElevationTagging {
    fn from(opts: &ElevationTagOptions) -> Self {
        Self {
            elevation_attribute: opts.elevation_attribute.clone(),
            factor:              opts.factor,
            wading_height:       opts.wading_height,
            suffix:              opts.suffix.clone(),
        }
    }
}

impl ElevationTagging {
    /// Tag each of `scenarios` whose id contains `pattern`, keeping their
    /// order.  An empty pattern tags them all.
    pub fn tag_scenarios(
        &self,
        network:   &RoadNetwork,
        scenarios: &[String],
        pattern:   &str,
    ) -> EngineResult<Vec<TagColumn>> {
        scenarios
            .iter()
            .filter(|id| id.contains(pattern))
            .map(|id| tag_flooded_links_by_elevation(network, id, self))
            .collect()
    }

    /// Tag every scenario whose id contains `pattern`, in network attribute
    /// order.
    pub fn tag_matching(&self, network: &RoadNetwork, pattern: &str) -> EngineResult<Vec<TagColumn>> {
        self.tag_scenarios(network, &network.scenario_ids(), pattern)
    }
}

/// Elevation-differential tags for one scenario.  Links missing either the
/// scenario value or the elevation are untagged.
pub fn tag_flooded_links_by_elevation(
    network:  &RoadNetwork,
    scenario: &str,
    params:   &ElevationTagging,
) -> EngineResult<TagColumn> {
    let values = network
        .scenario_values(scenario)
        .ok_or_else(|| EngineError::UnknownScenario(scenario.to_owned()))?;
    let elevation = network
        .attributes
        .number(&params.elevation_attribute)
        .ok_or_else(|| EngineError::UnknownAttribute(params.elevation_attribute.clone()))?;

    let tags = values
        .iter()
        .zip(elevation)
        .map(|(&v, &e)| {
            let depth = v - e * params.factor;
            depth.is_finite().then(|| tag(depth, params.wading_height))
        })
        .collect();
    Ok(TagColumn {
        name:   flood_tag_column(scenario, params.wading_height, params.suffix.as_deref()),
        values: tags,
    })
}
