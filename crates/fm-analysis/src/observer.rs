//! Analysis observer trait for progress reporting.

use std::fmt;

use fm_engine::{UnitFailure, UnitReport};

/// Stages of [`Analysis::run`][crate::Analysis::run], in execution order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    InitialDistances,
    ScenarioDistances,
    ClosenessLoss,
    FloodTags,
    Summary,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::InitialDistances => "initial distances",
            Phase::ScenarioDistances => "scenario distances",
            Phase::ClosenessLoss => "closeness loss",
            Phase::FloodTags => "flood tags",
            Phase::Summary => "polygon summary",
        })
    }
}

/// Callbacks invoked by [`Analysis::run`][crate::Analysis::run].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// Units of the scenario phase run concurrently; their callbacks are
/// delivered afterwards, in input order.
pub trait AnalysisObserver {
    /// `units` is the number of work items the phase will process.
    fn on_phase_start(&mut self, _phase: Phase, _units: usize) {}

    fn on_unit_complete(&mut self, _report: &UnitReport) {}

    /// A (scenario, facility) unit that produced no column.
    fn on_unit_failed(&mut self, _failure: &UnitFailure) {}

    fn on_phase_end(&mut self, _phase: Phase) {}
}

/// An [`AnalysisObserver`] that does nothing.
pub struct NoopObserver;

impl AnalysisObserver for NoopObserver {}
