//! Facility snapping.
//!
//! Each facility point is attached to the nearest network vertex; a facility
//! owns the *set* of vertices its points snapped to.  Several points may
//! collapse onto one vertex.

use geo::Point;
use tracing::debug;

use fm_core::{FacilitySelection, VertexId};

use crate::network::RoadNetwork;
use crate::{NetworkError, NetworkResult};

/// A named facility and its access vertices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Facility {
    pub label:  String,
    /// Distinct snapped vertices, in the order their points were first seen.
    pub access: Vec<VertexId>,
}

/// Facilities in registration order.  Immutable once the engine runs.
#[derive(Clone, Debug, Default)]
pub struct FacilityIndex {
    facilities: Vec<Facility>,
}

impl FacilityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snap `points` to `network` and register them under `label`.
    ///
    /// Returns the snapped vertex of every input point, in input order.
    /// Registering an existing label replaces its access set in place.
    ///
    /// # Errors
    ///
    /// [`NetworkError::EmptyNetwork`] if the network has no vertices,
    /// [`NetworkError::EmptyFacility`] if `points` is empty,
    /// [`NetworkError::MalformedGeometry`] for a non-finite point.
    pub fn register(
        &mut self,
        network: &RoadNetwork,
        label:   &str,
        points:  &[Point<f64>],
    ) -> NetworkResult<Vec<VertexId>> {
        if network.is_empty() {
            return Err(NetworkError::EmptyNetwork);
        }
        if points.is_empty() {
            return Err(NetworkError::EmptyFacility(label.to_owned()));
        }

        let mut snapped = Vec::with_capacity(points.len());
        let mut access: Vec<VertexId> = Vec::new();
        for (i, p) in points.iter().enumerate() {
            if !(p.x().is_finite() && p.y().is_finite()) {
                return Err(NetworkError::MalformedGeometry {
                    feature: i,
                    reason:  "non-finite point".into(),
                });
            }
            let v = network.nearest_vertex(p.0).ok_or(NetworkError::EmptyNetwork)?;
            snapped.push(v);
            if !access.contains(&v) {
                access.push(v);
            }
        }

        debug!(facility = label, points = points.len(), access = access.len(), "snapped facility");

        let facility = Facility { label: label.to_owned(), access };
        match self.facilities.iter_mut().find(|f| f.label == label) {
            Some(existing) => *existing = facility,
            None => self.facilities.push(facility),
        }
        Ok(snapped)
    }

    pub fn get(&self, label: &str) -> Option<&Facility> {
        self.facilities.iter().find(|f| f.label == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Facility> + '_ {
        self.facilities.iter()
    }

    /// Facilities covered by `selection`, in registration order.
    ///
    /// Labels in the selection that were never registered are returned as
    /// the error value.
    pub fn select(&self, selection: &FacilitySelection) -> Result<Vec<&Facility>, String> {
        if let FacilitySelection::Only(labels) = selection {
            if let Some(missing) = labels.iter().find(|l| self.get(l).is_none()) {
                return Err(missing.clone());
            }
        }
        Ok(self.facilities.iter().filter(|f| selection.includes(&f.label)).collect())
    }

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }
}
