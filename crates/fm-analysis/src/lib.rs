//! `fm-analysis` — end-to-end flood accessibility analysis.
//!
//! # Phases
//!
//! ```text
//! AnalysisBuilder::build     — load network / facilities / polygons, snap
//! Analysis::run(observer)
//!   ① InitialDistances       — undisturbed distance per facility
//!   ② ScenarioDistances      — scenario × facility units
//!   ③ ClosenessLoss          — CL per (facility, scenario)
//!   ④ FloodTags              — per-link 0/1 tags at the wading height, plus
//!                              elevation-differential tags when configured
//!   ⑤ Summary                — polygon statistics (when polygons are given)
//! Analysis::write(output)    — Node / Network_Condition / Geo_summary layers
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use fm_analysis::{AnalysisBuilder, NoopObserver};
//!
//! let analysis = AnalysisBuilder::from_config_path(Path::new("flood.json"))?.build()?;
//! let output = analysis.run(&mut NoopObserver)?;
//! analysis.write(&output)?;
//! ```

pub mod analysis;
pub mod builder;
pub mod error;
pub mod observer;


pub use analysis::{Analysis, AnalysisOutput};
pub use builder::AnalysisBuilder;
pub use error::{AnalysisError, AnalysisResult};
pub use observer::{AnalysisObserver, NoopObserver, Phase};
