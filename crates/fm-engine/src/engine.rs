//! The distance engine: initial and per-scenario distance columns.
//!
//! # Units of work
//!
//! A scenario batch is the cross product `scenario_ids × facilities`,
//! scenario-major.  Each unit reads the shared, immutable network and
//! facility index, builds its own [`ScenarioGraph`], and returns one column.
//! Units never write shared state, so they run in any order; results are
//! reassembled in input order, never completion order.

use tracing::{debug, info, warn};

use fm_core::naming::{initial_distance_column, scenario_distance_column};
use fm_core::FacilitySelection;
use fm_network::{Facility, FacilityIndex, RoadNetwork};

use crate::graph::ScenarioGraph;
use crate::results::ResultColumn;
use crate::{CancelToken, EngineError, EngineResult};

// ── Batch results ─────────────────────────────────────────────────────────────

/// Per-unit summary, in input order.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitReport {
    pub scenario:      String,
    pub facility:      String,
    pub removed_links: usize,
    pub unreachable:   usize,
}

/// A unit whose facility could not be wired in its scenario.  Other units
/// are unaffected.
#[derive(Debug)]
pub struct UnitFailure {
    pub scenario: String,
    pub facility: String,
    pub error:    EngineError,
}

#[derive(Debug, Default)]
pub struct ScenarioBatch {
    /// Completed columns, `scenario_ids × facilities` order.
    pub columns:   Vec<ResultColumn>,
    pub reports:   Vec<UnitReport>,
    pub failures:  Vec<UnitFailure>,
    /// Units skipped because the batch was cancelled.
    pub cancelled: usize,
}

impl ScenarioBatch {
    pub fn is_complete(&self) -> bool {
        self.cancelled == 0 && self.failures.is_empty()
    }
}

// ── DistanceEngine ────────────────────────────────────────────────────────────

/// Shortest-distance computations over one network and facility index.
///
/// Holding shared borrows of both inputs for its whole lifetime, the engine
/// guarantees neither is mutated while units are in flight.
pub struct DistanceEngine<'a> {
    network:    &'a RoadNetwork,
    facilities: &'a FacilityIndex,
    cancel:     CancelToken,
}

impl<'a> DistanceEngine<'a> {
    /// # Errors
    ///
    /// [`EngineError::EmptyNetwork`] or [`EngineError::NoFacilities`]; both
    /// abort before any distance is computed.
    pub fn new(network: &'a RoadNetwork, facilities: &'a FacilityIndex) -> EngineResult<Self> {
        if network.is_empty() {
            return Err(EngineError::EmptyNetwork);
        }
        if facilities.is_empty() {
            return Err(EngineError::NoFacilities);
        }
        Ok(Self { network, facilities, cancel: CancelToken::new() })
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn network(&self) -> &RoadNetwork {
        self.network
    }

    fn select(&self, selection: &FacilitySelection) -> EngineResult<Vec<&'a Facility>> {
        let selected = self.facilities.select(selection).map_err(EngineError::UnknownFacility)?;
        if selected.is_empty() {
            return Err(EngineError::NoFacilities);
        }
        Ok(selected)
    }

    // ── Undisturbed network ───────────────────────────────────────────────

    /// `Initial_dist_<facility>` for every selected facility, in
    /// registration order.  Unreachable vertices get `code`.
    pub fn compute_initial_distances(
        &self,
        selection: &FacilitySelection,
        code:      f64,
    ) -> EngineResult<Vec<ResultColumn>> {
        let facilities = self.select(selection)?;
        info!(facilities = facilities.len(), "computing initial distances");

        let columns = self.map_units(&facilities, |facility| {
            let graph = ScenarioGraph::undisturbed(self.network, facility)?;
            let field = graph.shortest_distances();
            debug!(facility = %facility.label, unreachable = field.unreachable_count(), "initial distances");
            Ok(ResultColumn {
                name:   initial_distance_column(&facility.label),
                values: field.to_column(code),
            })
        });
        columns.into_iter().collect()
    }

    // ── Flood scenarios ───────────────────────────────────────────────────

    /// `<scenario>_<facility>` for every (scenario, facility) pair.
    ///
    /// # Errors
    ///
    /// Unknown scenarios or facilities and a non-finite threshold abort the
    /// whole batch up front.  A facility that cannot be wired in one unit is
    /// reported in [`ScenarioBatch::failures`] and does not stop the others.
    pub fn compute_scenario_distances(
        &self,
        scenario_ids: &[String],
        selection:    &FacilitySelection,
        threshold:    f64,
        code:         f64,
    ) -> EngineResult<ScenarioBatch> {
        if !threshold.is_finite() {
            return Err(EngineError::InvalidThreshold(threshold));
        }
        let facilities = self.select(selection)?;
        let mut scenarios: Vec<(&str, &[f64])> = Vec::with_capacity(scenario_ids.len());
        for id in scenario_ids {
            let values = self
                .network
                .scenario_values(id)
                .ok_or_else(|| EngineError::UnknownScenario(id.clone()))?;
            scenarios.push((id.as_str(), values));
        }

        let units: Vec<(&str, &[f64], &Facility)> = scenarios
            .iter()
            .flat_map(|&(id, values)| facilities.iter().map(move |&f| (id, values, f)))
            .collect();
        info!(
            scenarios = scenarios.len(),
            facilities = facilities.len(),
            units = units.len(),
            threshold,
            "performing scenario analysis"
        );

        let outcomes = self.map_units(&units, |&(scenario, values, facility)| {
            if self.cancel.is_cancelled() {
                return None;
            }
            let result = ScenarioGraph::for_scenario(self.network, values, threshold, facility)
                .map(|graph| {
                    let field = graph.shortest_distances();
                    let report = UnitReport {
                        scenario:      scenario.to_owned(),
                        facility:      facility.label.clone(),
                        removed_links: graph.removed_link_count(),
                        unreachable:   field.unreachable_count(),
                    };
                    debug!(
                        scenario,
                        facility = %facility.label,
                        removed = report.removed_links,
                        unreachable = report.unreachable,
                        "scenario unit done"
                    );
                    let column = ResultColumn {
                        name:   scenario_distance_column(scenario, &facility.label),
                        values: field.to_column(code),
                    };
                    (column, report)
                });
            Some((scenario, facility, result))
        });

        // Sequential, input-ordered merge.
        let mut batch = ScenarioBatch::default();
        for outcome in outcomes {
            match outcome {
                None => batch.cancelled += 1,
                Some((_, _, Ok((column, report)))) => {
                    batch.columns.push(column);
                    batch.reports.push(report);
                }
                Some((scenario, facility, Err(error))) => {
                    warn!(scenario, facility = %facility.label, %error, "scenario unit failed");
                    batch.failures.push(UnitFailure {
                        scenario: scenario.to_owned(),
                        facility: facility.label.clone(),
                        error,
                    });
                }
            }
        }
        if batch.cancelled > 0 {
            warn!(cancelled = batch.cancelled, "scenario batch cancelled");
        }
        Ok(batch)
    }

    /// Apply `f` to every unit, preserving input order in the output.
    ///
    /// With the `parallel` feature the units run on the current Rayon pool
    /// (install a sized pool around the call to bound the worker count).
    fn map_units<U, T, F>(&self, units: &[U], f: F) -> Vec<T>
    where
        U: Sync,
        T: Send,
        F: Fn(&U) -> T + Sync + Send,
    {
        #[cfg(not(feature = "parallel"))]
        {
            units.iter().map(f).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            units.par_iter().map(f).collect()
        }
    }
}
