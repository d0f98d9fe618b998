//! `fm-engine` — flood-scenario accessibility computations.
//!
//! # Pipeline
//!
//! ```text
//! RoadNetwork + FacilityIndex
//!   ① compute_initial_distances   — undisturbed graph, one sink per facility
//!   ② compute_scenario_distances  — scenario × facility units, links whose
//!                                   scenario value exceeds the threshold
//!                                   removed (parallel with `parallel`)
//!   ③ estimate_closeness_loss     — CL = 1 − (d₀ + ε) / (dₛ + ε)
//!   ④ tag_flooded_links           — per-link 0/1 flood tags
//! ```
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`graph`]     | `ScenarioGraph`, `DistanceField`, `PathOutcome`            |
//! | [`engine`]    | `DistanceEngine`, `ScenarioBatch`, `UnitReport`            |
//! | [`results`]   | `NodeResults`, `ResultColumn`                              |
//! | [`aggregate`] | `closeness_loss`, flood tagging, `TagColumn`               |
//! | [`cancel`]    | `CancelToken`                                              |
//! | [`error`]     | `EngineError`, `EngineResult<T>`                           |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | *(default)* Runs scenario units on Rayon's thread pool. |

pub mod aggregate;
pub mod cancel;
pub mod engine;
pub mod error;
pub mod graph;
pub mod results;


pub use aggregate::{
    closeness_loss, tag_flooded_links, tag_flooded_links_by_elevation, ElevationTagging, TagColumn,
};
pub use cancel::CancelToken;
pub use engine::{DistanceEngine, ScenarioBatch, UnitFailure, UnitReport};
pub use error::{EngineError, EngineResult};
pub use graph::{DistanceField, PathOutcome, ScenarioGraph};
pub use results::{NodeResults, ResultColumn};
