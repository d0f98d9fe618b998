//! Road network representation and builder.
//!
//! # Vertex identity
//!
//! A vertex *is* a coordinate: the first and last coordinate of every line
//! are interned through a `VertexKey → VertexId` map, so two endpoints that
//! coincide exactly share one vertex.  `VertexId`s are dense: all start
//! coordinates in link order come first, then the end coordinates not already
//! seen.  This fixes the row order of every per-vertex result.
//!
//! # Data layout
//!
//! Shortest paths are always computed *towards* a facility, so adjacency is
//! stored in **approach** form: the CSR slice of vertex `v` lists every
//! `(u, link)` such that `link` can be travelled from `u` into `v`.
//!
//! ```text
//! approach_from[ approach_start[v] .. approach_start[v+1] ]
//! ```
//!
//! Undirected links appear in both endpoints' slices; directed links only in
//! the slice of their last vertex.  A search that starts at the facility and
//! walks approach slices therefore yields "distance from u to facility".
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over vertex coordinates answers nearest-vertex
//! queries for facility snapping.

use geo::LineString;
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;

use fm_core::naming::SCENARIO_PREFIX;
use fm_core::{Coord, LinkId, VertexId, VertexKey};

use crate::layer::{AttributeTable, LineLayer};
use crate::{NetworkError, NetworkResult};

// ── R-tree vertex entry ───────────────────────────────────────────────────────

#[derive(Clone)]
struct VertexEntry {
    point: [f64; 2],
    id:    VertexId,
}

impl RTreeObject for VertexEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for VertexEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Immutable road graph.  Build with [`RoadNetworkBuilder`] or
/// [`RoadNetwork::from_layer`].
///
/// The network is `Sync` and never mutated after construction, so scenario
/// workers share it by reference.
pub struct RoadNetwork {
    // ── Vertex data ───────────────────────────────────────────────────────
    /// Coordinate of each vertex.  Indexed by `VertexId`.
    pub vertex_pos: Vec<Coord>,
    vertex_index:   FxHashMap<VertexKey, VertexId>,

    // ── Link data (indexed by LinkId = input feature order) ───────────────
    pub link_from:     Vec<VertexId>,
    pub link_to:       Vec<VertexId>,
    pub link_weight:   Vec<f64>,
    pub link_geometry: Vec<LineString<f64>>,
    /// Input attributes, one row per link.
    pub attributes:    AttributeTable,

    // ── CSR approach adjacency ────────────────────────────────────────────
    approach_start: Vec<u32>,
    approach_from:  Vec<VertexId>,
    approach_link:  Vec<LinkId>,

    directed:    bool,
    crs:         String,
    spatial_idx: RTree<VertexEntry>,
}

impl RoadNetwork {
    /// Build from a line layer, weighting each link by `weight_attribute`.
    pub fn from_layer(layer: &LineLayer, weight_attribute: &str, directed: bool) -> NetworkResult<Self> {
        let weights = layer
            .attributes
            .number(weight_attribute)
            .ok_or_else(|| NetworkError::MissingAttribute(weight_attribute.to_owned()))?;

        let mut b = RoadNetworkBuilder::with_capacity(directed, layer.len());
        for (line, &w) in layer.geometries.iter().zip(weights) {
            b.add_line(line, w)?;
        }
        b.build(layer.attributes.clone(), layer.crs.clone())
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn vertex_count(&self) -> usize {
        self.vertex_pos.len()
    }

    pub fn link_count(&self) -> usize {
        self.link_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_pos.is_empty()
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn crs(&self) -> &str {
        &self.crs
    }

    // ── Vertex identity ───────────────────────────────────────────────────

    /// `VertexId` of the vertex at exactly `c`, if any.
    pub fn vertex_at(&self, c: Coord) -> Option<VertexId> {
        VertexKey::new(c).and_then(|k| self.vertex_index.get(&k).copied())
    }

    #[inline]
    pub fn contains_vertex(&self, v: VertexId) -> bool {
        v.index() < self.vertex_pos.len()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Every `(u, link)` such that `link` leads from `u` into `v`.
    ///
    /// Contiguous slice of the CSR arrays.
    #[inline]
    pub fn approaches(&self, v: VertexId) -> impl Iterator<Item = (VertexId, LinkId)> + '_ {
        let start = self.approach_start[v.index()] as usize;
        let end   = self.approach_start[v.index() + 1] as usize;
        self.approach_from[start..end]
            .iter()
            .copied()
            .zip(self.approach_link[start..end].iter().copied())
    }

    #[inline]
    pub fn approach_degree(&self, v: VertexId) -> usize {
        (self.approach_start[v.index() + 1] - self.approach_start[v.index()]) as usize
    }

    // ── Scenario attributes ───────────────────────────────────────────────

    /// Attribute names that look like per-scenario flood statistics
    /// (`max_<scenario>`), in column order.
    pub fn scenario_ids(&self) -> Vec<String> {
        self.attributes
            .names()
            .filter(|n| n.starts_with(SCENARIO_PREFIX) && self.attributes.number(n).is_some())
            .map(str::to_owned)
            .collect()
    }

    /// Per-link values of a scenario attribute; `NaN` where missing.
    pub fn scenario_values(&self, scenario: &str) -> Option<&[f64]> {
        self.attributes.number(scenario)
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Vertex nearest to `c`.
    ///
    /// Ties are broken by the lowest `VertexId`, i.e. the vertex the builder
    /// saw first, so repeated runs always pick the same one.  Returns `None`
    /// only if the network has no vertices.
    pub fn nearest_vertex(&self, c: Coord) -> Option<VertexId> {
        let mut hits = self.spatial_idx.nearest_neighbor_iter_with_distance_2(&[c.x, c.y]);
        let (first, best_d2) = hits.next()?;
        let mut best = first.id;
        for (entry, d2) in hits {
            if d2 > best_d2 {
                break;
            }
            best = best.min(entry.id);
        }
        Some(best)
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] one line at a time, then call
/// [`build`](Self::build).
///
/// # Example
///
/// ```
/// use fm_network::{AttributeTable, RoadNetworkBuilder};
/// use geo::line_string;
///
/// let mut b = RoadNetworkBuilder::new(false);
/// b.add_line(&line_string![(x: 0.0, y: 0.0), (x: 5.0, y: 1.0), (x: 10.0, y: 0.0)], 10.0).unwrap();
/// b.add_line(&line_string![(x: 10.0, y: 0.0), (x: 10.0, y: 10.0)], 10.0).unwrap();
/// let net = b.build(AttributeTable::new(2), "epsg:26915".into()).unwrap();
/// assert_eq!(net.vertex_count(), 3); // interior (5, 1) is not a vertex
/// assert_eq!(net.link_count(), 2);
/// ```
pub struct RoadNetworkBuilder {
    directed:  bool,
    raw_links: Vec<RawLink>,
}

struct RawLink {
    first:    VertexKey,
    last:     VertexKey,
    weight:   f64,
    geometry: LineString<f64>,
}

impl RoadNetworkBuilder {
    pub fn new(directed: bool) -> Self {
        Self::with_capacity(directed, 0)
    }

    pub fn with_capacity(directed: bool, links: usize) -> Self {
        Self { directed, raw_links: Vec::with_capacity(links) }
    }

    /// Add one road link spanning the first and last coordinate of `line`.
    ///
    /// # Errors
    ///
    /// [`NetworkError::MalformedGeometry`] if the line has fewer than two
    /// coordinates or any non-finite coordinate;
    /// [`NetworkError::InvalidWeight`] if `weight` is negative or not finite.
    pub fn add_line(&mut self, line: &LineString<f64>, weight: f64) -> NetworkResult<LinkId> {
        let feature = self.raw_links.len();
        let link = LinkId::try_from(feature).map_err(|_| NetworkError::Capacity("links"))?;

        if line.0.len() < 2 {
            return Err(NetworkError::MalformedGeometry {
                feature,
                reason: format!("line has {} coordinate(s), need at least 2", line.0.len()),
            });
        }
        if line.0.iter().any(|c| !(c.x.is_finite() && c.y.is_finite())) {
            return Err(NetworkError::MalformedGeometry {
                feature,
                reason: "non-finite coordinate".into(),
            });
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(NetworkError::InvalidWeight { link, value: weight });
        }

        let key = |c: Coord| {
            VertexKey::new(c).ok_or_else(|| NetworkError::MalformedGeometry {
                feature,
                reason: "non-finite coordinate".into(),
            })
        };
        let first = key(line.0[0])?;
        let last  = key(line.0[line.0.len() - 1])?;
        self.raw_links.push(RawLink { first, last, weight, geometry: line.clone() });
        Ok(link)
    }

    pub fn link_count(&self) -> usize { self.raw_links.len() }

    /// Consume the builder and produce a [`RoadNetwork`].
    ///
    /// `attributes` must have one row per added line.  Vertex ids go to every
    /// distinct first coordinate in link order, then to the last coordinates
    /// not seen among them, again in link order.
    pub fn build(self, attributes: AttributeTable, crs: String) -> NetworkResult<RoadNetwork> {
        let link_count = self.raw_links.len();

        if attributes.row_count() != link_count {
            return Err(NetworkError::AttributeLength {
                name:     "<attribute table>".into(),
                expected: link_count,
                got:      attributes.row_count(),
            });
        }

        let mut vertices: Vec<Coord> = Vec::with_capacity(link_count + 1);
        let mut vertex_index: FxHashMap<VertexKey, VertexId> =
            FxHashMap::with_capacity_and_hasher(link_count + 1, Default::default());
        let mut intern = |key: VertexKey| -> NetworkResult<VertexId> {
            if let Some(&id) = vertex_index.get(&key) {
                return Ok(id);
            }
            let id = VertexId::try_from(vertices.len())
                .map_err(|_| NetworkError::Capacity("vertices"))?;
            vertices.push(key.coord());
            vertex_index.insert(key, id);
            Ok(id)
        };
        let from: Vec<VertexId> =
            self.raw_links.iter().map(|l| intern(l.first)).collect::<NetworkResult<_>>()?;
        let to: Vec<VertexId> =
            self.raw_links.iter().map(|l| intern(l.last)).collect::<NetworkResult<_>>()?;
        let vertex_count = vertices.len();

        // Approach entries: (target, source, link), in link order.
        let mut entries: Vec<(VertexId, VertexId, LinkId)> =
            Vec::with_capacity(if self.directed { link_count } else { link_count * 2 });
        for (i, (&f, &t)) in from.iter().zip(&to).enumerate() {
            let link = LinkId(i as u32);
            entries.push((t, f, link));
            if !self.directed {
                entries.push((f, t, link));
            }
        }
        // Stable sort keeps link order within each vertex's slice.
        entries.sort_by_key(|e| e.0);

        let mut approach_start = vec![0u32; vertex_count + 1];
        for e in &entries {
            approach_start[e.0.index() + 1] += 1;
        }
        for i in 1..=vertex_count {
            approach_start[i] += approach_start[i - 1];
        }
        debug_assert_eq!(approach_start[vertex_count] as usize, entries.len());

        let approach_from: Vec<VertexId> = entries.iter().map(|e| e.1).collect();
        let approach_link: Vec<LinkId>   = entries.iter().map(|e| e.2).collect();

        let mut link_weight   = Vec::with_capacity(link_count);
        let mut link_geometry = Vec::with_capacity(link_count);
        for l in self.raw_links {
            link_weight.push(l.weight);
            link_geometry.push(l.geometry);
        }

        let entries: Vec<VertexEntry> = vertices
            .iter()
            .enumerate()
            .map(|(i, c)| VertexEntry { point: [c.x, c.y], id: VertexId(i as u32) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        Ok(RoadNetwork {
            vertex_pos: vertices,
            vertex_index,
            link_from: from,
            link_to: to,
            link_weight,
            link_geometry,
            attributes,
            approach_start,
            approach_from,
            approach_link,
            directed: self.directed,
            crs,
            spatial_idx,
        })
    }
}
