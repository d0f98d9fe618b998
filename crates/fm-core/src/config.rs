//! Run configuration.
//!
//! Loaded from a JSON file by the application crate and handed to the
//! analysis builder.  Every field except the input paths has a default.
//!
//! ```json
//! {
//!   "network_path": "data/roads.csv",
//!   "facilities": { "hospital": "data/hospitals.csv" },
//!   "polygons_path": "data/tracts.csv",
//!   "link_removal_threshold": 0.6,
//!   "output_dir": "results"
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::codes::{INITIAL_INACCESSIBILITY_CODE, SCENARIO_INACCESSIBILITY_CODE};
use crate::naming::flood_tag_column;
use crate::{FmError, FmResult};

// ── FacilitySelection ─────────────────────────────────────────────────────────

/// Which registered facilities a computation covers.
///
/// Deserializes from `"All"`, a single label, or a list of labels.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawSelection", into = "RawSelection")]
pub enum FacilitySelection {
    #[default]
    All,
    Only(Vec<String>),
}

impl FacilitySelection {
    pub fn includes(&self, label: &str) -> bool {
        match self {
            FacilitySelection::All => true,
            FacilitySelection::Only(labels) => labels.iter().any(|l| l == label),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawSelection {
    Word(String),
    List(Vec<String>),
}

impl TryFrom<RawSelection> for FacilitySelection {
    type Error = String;

    fn try_from(raw: RawSelection) -> Result<Self, String> {
        match raw {
            RawSelection::Word(w) if w == "All" => Ok(FacilitySelection::All),
            RawSelection::Word(w) if w.is_empty() => Err("empty facility label".into()),
            RawSelection::Word(w) => Ok(FacilitySelection::Only(vec![w])),
            RawSelection::List(l) => Ok(FacilitySelection::Only(l)),
        }
    }
}

impl From<FacilitySelection> for RawSelection {
    fn from(sel: FacilitySelection) -> Self {
        match sel {
            FacilitySelection::All => RawSelection::Word("All".into()),
            FacilitySelection::Only(l) => RawSelection::List(l),
        }
    }
}

// ── ClipOptions ───────────────────────────────────────────────────────────────

/// How aggregation polygons are trimmed to the study area before the join.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipOptions {
    /// Convex hull of the network when `true`, its bounding box otherwise.
    pub use_convex_hull: bool,
    /// Outward margin added to the mask, in CRS units.
    pub buffer: f64,
}

impl Default for ClipOptions {
    fn default() -> Self {
        Self { use_convex_hull: true, buffer: 1.0 }
    }
}

// ── ElevationTagOptions ───────────────────────────────────────────────────────

/// Extra flood tags from depth above the road surface:
/// `scenario_value − elevation × factor ≥ wading_height`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevationTagOptions {
    /// Numeric network attribute holding the road elevation.
    pub elevation_attribute: String,
    /// Converts elevation into scenario units.  Metres to feet by default.
    pub factor: f64,
    pub wading_height: f64,
    pub suffix: Option<String>,
    /// Only scenarios whose id contains this are tagged.  Empty matches all.
    pub scenario_pattern: String,
}

impl Default for ElevationTagOptions {
    fn default() -> Self {
        Self {
            elevation_attribute: "min_ele".into(),
            factor:              3.28084,
            wading_height:       2.0,
            suffix:              Some("ft".into()),
            scenario_pattern:    String::new(),
        }
    }
}

// ── OutputFormat ──────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Sqlite,
    Parquet,
}

// ── AnalysisConfig ────────────────────────────────────────────────────────────

/// Top-level analysis configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Reference-system label every input layer must carry.
    #[serde(default = "default_crs")]
    pub crs: String,

    /// Road network layer (line features).
    pub network_path: PathBuf,

    /// Facility label → point layer.  Iterated in label order.
    #[serde(default)]
    pub facilities: BTreeMap<String, PathBuf>,

    /// Aggregation polygons.  No polygon summary is produced when absent.
    #[serde(default)]
    pub polygons_path: Option<PathBuf>,

    /// Network attribute used as edge weight.
    #[serde(default = "default_weight_attribute")]
    pub weight_attribute: String,

    /// Split multi-part line features into one link per part.
    #[serde(default)]
    pub explode_multilines: bool,

    /// Treat each line as one-way from its first to its last coordinate.
    #[serde(default)]
    pub directed: bool,

    /// Explicit scenario ids.  When empty, every network attribute that
    /// starts with `max_` is a scenario.
    #[serde(default)]
    pub scenarios: Vec<String>,

    /// Links whose scenario value exceeds this are removed from that
    /// scenario's graph.
    #[serde(default = "default_link_removal_threshold")]
    pub link_removal_threshold: f64,

    /// Depth at or above which a link is tagged flooded.  Defaults to the
    /// link-removal threshold.
    #[serde(default)]
    pub wading_height: Option<f64>,

    /// Appended to flood-tag column names, e.g. `"ft"`.
    #[serde(default)]
    pub flood_tag_suffix: Option<String>,

    /// Also tag links by elevation differential.  Off when absent.
    #[serde(default)]
    pub elevation_tagging: Option<ElevationTagOptions>,

    /// Tag given to links with no flood statistic.  `0` treats them as
    /// passable; `null` leaves them untagged.
    #[serde(default = "default_no_data_tag")]
    pub encode_no_data_as: Option<u8>,

    #[serde(default = "default_initial_code")]
    pub initial_inaccessibility_code: f64,

    #[serde(default = "default_scenario_code")]
    pub scenario_inaccessibility_code: f64,

    #[serde(default)]
    pub facility_labels: FacilitySelection,

    #[serde(default)]
    pub clip: ClipOptions,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default)]
    pub output_format: OutputFormat,

    /// Worker thread count passed to Rayon.  `None` uses all logical cores.
    #[serde(default)]
    pub threads: Option<usize>,
}

fn default_crs() -> String { "epsg:26915".into() }
fn default_weight_attribute() -> String { "length".into() }
fn default_link_removal_threshold() -> f64 { 0.6 }
fn default_no_data_tag() -> Option<u8> { Some(0) }
fn default_initial_code() -> f64 { INITIAL_INACCESSIBILITY_CODE }
fn default_scenario_code() -> f64 { SCENARIO_INACCESSIBILITY_CODE }
fn default_output_dir() -> PathBuf { PathBuf::from("results") }

impl AnalysisConfig {
    /// A configuration with every default applied.
    pub fn new(network_path: impl Into<PathBuf>) -> Self {
        Self {
            crs:                           default_crs(),
            network_path:                  network_path.into(),
            facilities:                    BTreeMap::new(),
            polygons_path:                 None,
            weight_attribute:              default_weight_attribute(),
            explode_multilines:            false,
            directed:                      false,
            scenarios:                     Vec::new(),
            link_removal_threshold:        default_link_removal_threshold(),
            wading_height:                 None,
            flood_tag_suffix:              None,
            elevation_tagging:             None,
            encode_no_data_as:             default_no_data_tag(),
            initial_inaccessibility_code:  default_initial_code(),
            scenario_inaccessibility_code: default_scenario_code(),
            facility_labels:               FacilitySelection::All,
            clip:                          ClipOptions::default(),
            output_dir:                    default_output_dir(),
            output_format:                 OutputFormat::Csv,
            threads:                       None,
        }
    }

    /// Read and validate a JSON configuration file.
    pub fn from_json_path(path: &Path) -> FmResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> FmResult<Self> {
        let config: AnalysisConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    #[inline]
    pub fn wading_height(&self) -> f64 {
        self.wading_height.unwrap_or(self.link_removal_threshold)
    }

    /// Reject values that would make the run meaningless.
    pub fn validate(&self) -> FmResult<()> {
        if !self.link_removal_threshold.is_finite() || self.link_removal_threshold < 0.0 {
            return Err(FmError::Config(format!(
                "link_removal_threshold must be finite and >= 0, got {}",
                self.link_removal_threshold
            )));
        }
        let wading = self.wading_height();
        if !wading.is_finite() || wading < 0.0 {
            return Err(FmError::Config(format!(
                "wading_height must be finite and >= 0, got {wading}"
            )));
        }
        for (name, code) in [
            ("initial_inaccessibility_code", self.initial_inaccessibility_code),
            ("scenario_inaccessibility_code", self.scenario_inaccessibility_code),
        ] {
            if !code.is_finite() || code < 0.0 {
                return Err(FmError::Config(format!(
                    "{name} must be finite and >= 0, got {code}"
                )));
            }
        }
        if self.initial_inaccessibility_code == self.scenario_inaccessibility_code {
            return Err(FmError::Config(
                "initial and scenario inaccessibility codes must differ".into(),
            ));
        }
        if let Some(elev) = &self.elevation_tagging {
            if !elev.factor.is_finite() || !elev.wading_height.is_finite() {
                return Err(FmError::Config(format!(
                    "elevation_tagging factor and wading_height must be finite, got {} and {}",
                    elev.factor, elev.wading_height
                )));
            }
            let depth_tag = flood_tag_column("", wading, self.flood_tag_suffix.as_deref());
            let elev_tag  = flood_tag_column("", elev.wading_height, elev.suffix.as_deref());
            if depth_tag == elev_tag {
                return Err(FmError::Config(format!(
                    "elevation tags would reuse the depth tag names (*{depth_tag}); \
                     change elevation_tagging.suffix or wading_height"
                )));
            }
        }
        if !self.clip.buffer.is_finite() || self.clip.buffer < 0.0 {
            return Err(FmError::Config(format!(
                "clip.buffer must be finite and >= 0, got {}",
                self.clip.buffer
            )));
        }
        if self.threads == Some(0) {
            return Err(FmError::Config("threads must be at least 1".into()));
        }
        Ok(())
    }
}
