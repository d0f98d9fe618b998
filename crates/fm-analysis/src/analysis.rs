//! The analysis run: distances, aggregation, summary, output.

use tracing::{info, warn};

use fm_core::AnalysisConfig;
use fm_engine::{
    tag_flooded_links, CancelToken, DistanceEngine, ElevationTagging, EngineError, NodeResults,
    TagColumn, UnitFailure, UnitReport,
};
use fm_network::{FacilityIndex, PolygonLayer, RoadNetwork};
use fm_output::{network_table, node_table, open_writer, summary_table};
use fm_summary::{clip_polygons, study_area, summarize, PolygonSummary};

use crate::{AnalysisError, AnalysisObserver, AnalysisResult, Phase};

/// Everything a run produces.
#[derive(Debug)]
pub struct AnalysisOutput {
    pub results:   NodeResults,
    /// Depth tags, one per scenario, then any elevation-differential tags.
    /// These become the extra columns of `Network_Condition_results`.
    pub tags:      Vec<TagColumn>,
    pub summary:   Option<PolygonSummary>,
    pub reports:   Vec<UnitReport>,
    pub failures:  Vec<UnitFailure>,
    /// Scenario units skipped after cancellation.
    pub cancelled: usize,
}

/// A loaded, snapped, ready-to-run analysis.  Build with
/// [`AnalysisBuilder`][crate::AnalysisBuilder].
pub struct Analysis {
    pub(crate) config:     AnalysisConfig,
    pub(crate) network:    RoadNetwork,
    pub(crate) facilities: FacilityIndex,
    pub(crate) polygons:   Option<PolygonLayer>,
    pub(crate) scenarios:  Vec<String>,
    pub(crate) cancel:     CancelToken,
}

impl Analysis {
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    pub fn facilities(&self) -> &FacilityIndex {
        &self.facilities
    }

    pub fn scenarios(&self) -> &[String] {
        &self.scenarios
    }

    /// Token that stops the scenario phase between units.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Run every phase.
    ///
    /// Structural errors abort the run.  A facility that cannot be wired in
    /// one scenario only loses that unit's column (see
    /// [`AnalysisOutput::failures`]).
    pub fn run(&self, observer: &mut dyn AnalysisObserver) -> AnalysisResult<AnalysisOutput> {
        let cfg = &self.config;
        let engine = DistanceEngine::new(&self.network, &self.facilities)?
            .with_cancel_token(self.cancel.clone());
        let labels: Vec<String> = self
            .facilities
            .select(&cfg.facility_labels)
            .map_err(EngineError::UnknownFacility)?
            .into_iter()
            .map(|f| f.label.clone())
            .collect();
        let mut results = NodeResults::new(&self.network);

        // ── ① Initial distances ───────────────────────────────────────────
        observer.on_phase_start(Phase::InitialDistances, labels.len());
        let initial = self.in_pool(|| {
            engine.compute_initial_distances(&cfg.facility_labels, cfg.initial_inaccessibility_code)
        })??;
        results.extend(initial)?;
        observer.on_phase_end(Phase::InitialDistances);

        // ── ② Scenario distances ──────────────────────────────────────────
        observer.on_phase_start(Phase::ScenarioDistances, self.scenarios.len() * labels.len());
        let batch = self.in_pool(|| {
            engine.compute_scenario_distances(
                &self.scenarios,
                &cfg.facility_labels,
                cfg.link_removal_threshold,
                cfg.scenario_inaccessibility_code,
            )
        })??;
        for report in &batch.reports {
            observer.on_unit_complete(report);
        }
        for failure in &batch.failures {
            observer.on_unit_failed(failure);
        }
        results.extend(batch.columns)?;
        observer.on_phase_end(Phase::ScenarioDistances);

        // ── ③ Closeness loss ──────────────────────────────────────────────
        observer.on_phase_start(Phase::ClosenessLoss, self.scenarios.len() * labels.len());
        results.estimate_closeness_loss(&labels, &self.scenarios)?;
        observer.on_phase_end(Phase::ClosenessLoss);

        // ── ④ Flood tags ──────────────────────────────────────────────────
        let elevation = cfg
            .elevation_tagging
            .as_ref()
            .map(|opts| (ElevationTagging::from(opts), opts.scenario_pattern.as_str()));
        let elevation_units = elevation.as_ref().map_or(0, |(_, pattern)| {
            self.scenarios.iter().filter(|id| id.contains(pattern)).count()
        });
        observer.on_phase_start(Phase::FloodTags, self.scenarios.len() + elevation_units);
        let mut tags = tag_flooded_links(
            &self.network,
            &self.scenarios,
            cfg.wading_height(),
            cfg.flood_tag_suffix.as_deref(),
            cfg.encode_no_data_as,
        )?;
        if let Some((params, pattern)) = &elevation {
            tags.extend(params.tag_scenarios(&self.network, &self.scenarios, pattern)?);
        }
        observer.on_phase_end(Phase::FloodTags);

        // ── ⑤ Polygon summary ─────────────────────────────────────────────
        let summary = match &self.polygons {
            Some(polygons) => {
                observer.on_phase_start(Phase::Summary, polygons.polygons.len());
                let mask = study_area(&self.network, &cfg.clip)?;
                let clipped = clip_polygons(polygons, &mask);
                let summary = summarize(&clipped, &results);
                observer.on_phase_end(Phase::Summary);
                Some(summary)
            }
            None => None,
        };

        if batch.cancelled > 0 {
            warn!(cancelled = batch.cancelled, "analysis finished with cancelled units");
        }
        info!(columns = results.columns().len(), tags = tags.len(), "analysis complete");

        Ok(AnalysisOutput {
            results,
            tags,
            summary,
            reports: batch.reports,
            failures: batch.failures,
            cancelled: batch.cancelled,
        })
    }

    /// Write `Node_results`, `Network_Condition_results` and, when present,
    /// `Geo_summary_results` to `config.output_dir`.
    pub fn write(&self, output: &AnalysisOutput) -> AnalysisResult<()> {
        let dir = &self.config.output_dir;
        let mut writer = open_writer(self.config.output_format, dir)?;
        writer.write_table(&node_table(&output.results)?)?;
        writer.write_table(&network_table(&self.network, &output.tags)?)?;
        if let Some(summary) = &output.summary {
            writer.write_table(&summary_table(summary)?)?;
        }
        writer.finish()?;
        info!(dir = %dir.display(), format = ?self.config.output_format, "results written");
        Ok(())
    }

    /// Run `f` on a pool of `config.threads` workers, or on the global pool
    /// when unset.
    #[cfg(feature = "parallel")]
    fn in_pool<T: Send>(&self, f: impl FnOnce() -> T + Send) -> AnalysisResult<T> {
        match self.config.threads {
            None => Ok(f()),
            Some(n) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| AnalysisError::ThreadPool(e.to_string()))?;
                Ok(pool.install(f))
            }
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn in_pool<T>(&self, f: impl FnOnce() -> T) -> AnalysisResult<T> {
        Ok(f())
    }
}
