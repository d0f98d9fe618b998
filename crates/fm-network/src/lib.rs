//! `fm-network` — road network graph, facility snapping, and layer loading.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`layer`]   | `LineLayer`, `PointLayer`, `PolygonLayer`, `AttributeTable`  |
//! | [`loader`]  | CSV + WKT readers for the three layer kinds                  |
//! | [`network`] | `RoadNetwork` (coordinate-keyed vertices, CSR, R-tree), `RoadNetworkBuilder` |
//! | [`snap`]    | `FacilityIndex`, `Facility`                                  |
//! | [`error`]   | `NetworkError`, `NetworkResult<T>`                           |

pub mod error;
pub mod layer;
pub mod loader;
pub mod network;
pub mod snap;


pub use error::{NetworkError, NetworkResult};
pub use layer::{check_crs, AttributeColumn, AttributeTable, ColumnValues, LineLayer, PointLayer, PolygonLayer};
pub use loader::{load_lines_csv, load_points_csv, load_polygons_csv};
pub use network::{RoadNetwork, RoadNetworkBuilder};
pub use snap::{Facility, FacilityIndex};
