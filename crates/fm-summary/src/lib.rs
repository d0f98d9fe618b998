//! `fm-summary` — polygon-level aggregation of per-vertex results.
//!
//! ```text
//! RoadNetwork ──► study_area (convex hull | bbox, buffered)
//! PolygonLayer ─► clip_polygons(mask)      polygons outside the area dropped
//! NodeResults ──► summarize(polygons)      mean / std / max / min per column
//! ```
//!
//! | Module     | Contents                                       |
//! |------------|------------------------------------------------|
//! | [`mask`]   | `study_area`                                   |
//! | [`clip`]   | `clip_polygons`                                |
//! | [`stats`]  | `summarize`, `PolygonSummary`, `SummaryStats`  |
//! | [`error`]  | `SummaryError`, `SummaryResult<T>`             |

pub mod clip;
pub mod error;
pub mod mask;
pub mod stats;

#[cfg(test)]
mod tests;

pub use clip::clip_polygons;
pub use error::{SummaryError, SummaryResult};
pub use mask::study_area;
pub use stats::{summarize, PolygonSummary, StatColumn, SummaryStats};
