//! Numeric sentinels shared by the engine and the aggregator.
//!
//! The two inaccessibility codes are deliberately different so that a value
//! in an output table tells you which phase produced it.  Keep them distinct.

/// Distance reported for a vertex with no path to a facility in the
/// undisturbed network.
pub const INITIAL_INACCESSIBILITY_CODE: f64 = 999.0;

/// Distance reported for a vertex with no path to a facility in a flood
/// scenario graph.
pub const SCENARIO_INACCESSIBILITY_CODE: f64 = 1e5;

/// Added to both distances in the closeness-loss ratio so a vertex that *is*
/// an access point (0 / 0) yields 0 instead of NaN.
pub const CL_EPSILON: f64 = 1e-15;
