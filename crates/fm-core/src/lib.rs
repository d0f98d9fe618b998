//! `fm-core` — foundational types for the `floodmob` accessibility engine.
//!
//! This crate is a dependency of every other `fm-*` crate.  It has no `fm-*`
//! dependencies of its own.
//!
//! # What lives here
//!
//! | Module       | Contents                                                 |
//! |--------------|----------------------------------------------------------|
//! | [`ids`]      | `VertexId`, `LinkId`                                     |
//! | [`geo`]      | `Coord`, `VertexKey` (exact coordinate identity)          |
//! | [`codes`]    | Inaccessibility sentinels, closeness-loss epsilon        |
//! | [`naming`]   | Result column naming conventions                         |
//! | [`config`]   | `AnalysisConfig`, `FacilitySelection`, `ClipOptions`, `ElevationTagOptions` |
//! | [`error`]    | `FmError`, `FmResult`                                    |

pub mod codes;
pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod naming;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use codes::{CL_EPSILON, INITIAL_INACCESSIBILITY_CODE, SCENARIO_INACCESSIBILITY_CODE};
pub use config::{AnalysisConfig, ClipOptions, ElevationTagOptions, FacilitySelection, OutputFormat};
pub use error::{FmError, FmResult};
pub use geo::{Coord, VertexKey};
pub use ids::{LinkId, VertexId};
