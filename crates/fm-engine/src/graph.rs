//! Per-scenario graph variants and sink-based shortest distances.
//!
//! # Sink semantics
//!
//! A facility is modelled as one synthetic sink vertex joined to each of its
//! access vertices by a zero-weight edge.  The distance from `v` to the sink
//! is therefore the distance from `v` to the *nearest* access vertex.  The
//! sink is never materialised: the search starts with every access vertex
//! at distance 0, which is the same thing.
//!
//! # Variants
//!
//! A [`ScenarioGraph`] borrows the immutable base network and owns a link
//! mask plus its sink wiring.  Each (scenario, facility) unit builds its own,
//! so concurrent units never observe each other.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use tracing::warn;

use fm_core::{Coord, LinkId, VertexId};
use fm_network::{Facility, RoadNetwork};

use crate::{EngineError, EngineResult};

// ── PathOutcome ───────────────────────────────────────────────────────────────

/// Result of a single vertex-to-facility lookup.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PathOutcome {
    Reachable(f64),
    /// No path in this graph variant.  Includes vertices whose every link
    /// was removed.
    Unreachable,
    /// The queried vertex does not exist in the base network.
    GraphError,
}

impl PathOutcome {
    /// Distance, or `code` for both unreachable and graph-error outcomes.
    #[inline]
    pub fn or_sentinel(self, code: f64) -> f64 {
        match self {
            PathOutcome::Reachable(d) => d,
            PathOutcome::Unreachable | PathOutcome::GraphError => code,
        }
    }
}

// ── ScenarioGraph ─────────────────────────────────────────────────────────────

pub struct ScenarioGraph<'a> {
    network:     &'a RoadNetwork,
    /// `kept[l]` is true when link `l` survives in this variant.
    kept:        Vec<bool>,
    removed:     usize,
    sink_access: Vec<VertexId>,
}

impl<'a> ScenarioGraph<'a> {
    /// Every link kept.
    pub fn undisturbed(network: &'a RoadNetwork, facility: &Facility) -> EngineResult<Self> {
        let kept = vec![true; network.link_count()];
        Self::with_mask(network, kept, 0, facility)
    }

    /// Links with `values[l] > threshold` removed.
    ///
    /// A `NaN` value never compares greater, so links without flood data
    /// stay in the graph.
    pub fn for_scenario(
        network:   &'a RoadNetwork,
        values:    &[f64],
        threshold: f64,
        facility:  &Facility,
    ) -> EngineResult<Self> {
        debug_assert_eq!(values.len(), network.link_count());
        let kept: Vec<bool> = values.iter().map(|&v| !(v > threshold)).collect();
        let removed = kept.iter().filter(|&&k| !k).count();
        Self::with_mask(network, kept, removed, facility)
    }

    fn with_mask(
        network:  &'a RoadNetwork,
        kept:     Vec<bool>,
        removed:  usize,
        facility: &Facility,
    ) -> EngineResult<Self> {
        let mut sink_access = Vec::with_capacity(facility.access.len());
        for &v in &facility.access {
            if !network.contains_vertex(v) {
                warn!(facility = %facility.label, vertex = %v, "access vertex not in network; skipped");
                continue;
            }
            if !sink_access.contains(&v) {
                sink_access.push(v);
            }
        }
        if sink_access.is_empty() {
            return Err(EngineError::DisconnectedFacility { facility: facility.label.clone() });
        }
        Ok(Self { network, kept, removed, sink_access })
    }

    #[inline]
    pub fn contains_link(&self, link: LinkId) -> bool {
        self.kept.get(link.index()).copied().unwrap_or(false)
    }

    pub fn removed_link_count(&self) -> usize {
        self.removed
    }

    /// Access vertices wired to the sink.
    pub fn sink_access(&self) -> &[VertexId] {
        &self.sink_access
    }

    /// Single-sink Dijkstra over the kept links.
    ///
    /// Time complexity: O((V + E) log V).
    pub fn shortest_distances(&self) -> DistanceField {
        let net = self.network;
        let mut dist = vec![f64::INFINITY; net.vertex_count()];

        // Min-heap: (cost, vertex).  VertexId as secondary key keeps the pop
        // order deterministic on equal costs.
        let mut heap: BinaryHeap<Reverse<(Cost, VertexId)>> = BinaryHeap::new();
        for &a in &self.sink_access {
            dist[a.index()] = 0.0;
            heap.push(Reverse((Cost(0.0), a)));
        }

        while let Some(Reverse((Cost(cost), v))) = heap.pop() {
            // Skip stale heap entries.
            if cost > dist[v.index()] {
                continue;
            }
            for (u, link) in net.approaches(v) {
                if !self.kept[link.index()] {
                    continue;
                }
                let next = cost + net.link_weight[link.index()];
                if next < dist[u.index()] {
                    dist[u.index()] = next;
                    heap.push(Reverse((Cost(next), u)));
                }
            }
        }

        DistanceField { dist }
    }
}

/// Total order over non-negative, non-NaN costs for the heap.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Cost(f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

// ── DistanceField ─────────────────────────────────────────────────────────────

/// Distance from every base-network vertex to one facility sink.
#[derive(Clone, Debug)]
pub struct DistanceField {
    dist: Vec<f64>,
}

impl DistanceField {
    pub fn outcome(&self, v: VertexId) -> PathOutcome {
        match self.dist.get(v.index()) {
            None => PathOutcome::GraphError,
            Some(d) if d.is_finite() => PathOutcome::Reachable(*d),
            Some(_) => PathOutcome::Unreachable,
        }
    }

    /// Lookup by coordinate; a coordinate that is not a vertex of `network`
    /// is a [`PathOutcome::GraphError`].
    pub fn outcome_at(&self, network: &RoadNetwork, c: Coord) -> PathOutcome {
        match network.vertex_at(c) {
            Some(v) => self.outcome(v),
            None => PathOutcome::GraphError,
        }
    }

    pub fn unreachable_count(&self) -> usize {
        self.dist.iter().filter(|d| !d.is_finite()).count()
    }

    /// One value per vertex; unreachable vertices get `code`.
    pub fn to_column(&self, code: f64) -> Vec<f64> {
        self.dist.iter().map(|&d| if d.is_finite() { d } else { code }).collect()
    }
}
