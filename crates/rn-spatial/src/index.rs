//! R-tree nearest-node index.
//!
//! # Distance metric
//!
//! Nodes are projected once, at build time, onto a local equirectangular
//! plane centred on the mean latitude `φ0` of the node set:
//!
//! ```text
//! x = R · λ · cos φ0        y = R · φ        (metres, λ/φ in radians)
//! ```
//!
//! Queries use plain Euclidean distance in that plane.  For a city-sized
//! network the error against great-circle distance is far below the spacing
//! of road nodes, and because the R-tree is exact for Euclidean distance the
//! returned node is the true minimiser over the whole node set.  Networks
//! spanning the antimeridian are not supported.
//!
//! # Ties
//!
//! Equidistant nodes resolve to the lowest `NodeId`.  Nodes sharing a
//! coordinate are never merged; they stay distinct entries and the tie rule
//! picks between them.

use std::cmp::Ordering;

use log::debug;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use rn_core::{GeoPoint, NodeId, EARTH_RADIUS_M};
use rn_graph::GraphStore;

use crate::{SpatialError, SpatialResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree: projected `[x, y]` metres plus the `NodeId`.
#[derive(Clone, Debug)]
struct NodeEntry {
    point: [f64; 2],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in the projected plane (m²).
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── Projection ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug)]
struct Projection {
    cos_lat0: f64,
}

impl Projection {
    fn centred_on(lat0_deg: f64) -> Self {
        Self { cos_lat0: lat0_deg.to_radians().cos() }
    }

    #[inline]
    fn project(self, p: GeoPoint) -> [f64; 2] {
        [
            EARTH_RADIUS_M * p.lon.to_radians() * self.cos_lat0,
            EARTH_RADIUS_M * p.lat.to_radians(),
        ]
    }
}

// ── SpatialIndex ──────────────────────────────────────────────────────────────

/// Read-only nearest-node index, built once from a [`GraphStore`].
///
/// Expected query cost is O(log n).  `SpatialIndex` is `Send + Sync` and
/// holds no interior mutability, so concurrent queries need no locking.
pub struct SpatialIndex {
    tree: RTree<NodeEntry>,
    projection: Projection,
}

impl SpatialIndex {
    /// Index every node of `graph`.
    pub fn build(graph: &GraphStore) -> SpatialResult<Self> {
        Self::from_points(graph.positions())
    }

    /// Index an arbitrary set of `(NodeId, GeoPoint)` pairs.
    ///
    /// Fails with [`SpatialError::Empty`] if `points` is empty and with
    /// [`SpatialError::InvalidNode`] for a non-finite or out-of-range point.
    pub fn from_points(
        points: impl IntoIterator<Item = (NodeId, GeoPoint)>,
    ) -> SpatialResult<Self> {
        let points: Vec<(NodeId, GeoPoint)> = points.into_iter().collect();
        if points.is_empty() {
            return Err(SpatialError::Empty);
        }
        for &(node, pos) in &points {
            pos.validate()
                .map_err(|source| SpatialError::InvalidNode { node, source })?;
        }

        let lat0 = points.iter().map(|(_, p)| p.lat).sum::<f64>() / points.len() as f64;
        let projection = Projection::centred_on(lat0);

        // Bulk-load for O(N log N) construction (faster than N inserts).
        let entries: Vec<NodeEntry> = points
            .into_iter()
            .map(|(id, pos)| NodeEntry { point: projection.project(pos), id })
            .collect();
        let tree = RTree::bulk_load(entries);

        debug!("spatial index built: {} nodes, reference latitude {lat0:.6}", tree.size());

        Ok(Self { tree, projection })
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Node nearest to `(longitude, latitude)`.
    ///
    /// Every query rejects non-finite or out-of-range coordinates with
    /// [`SpatialError::InvalidCoordinate`] before touching the tree.
    pub fn nearest(&self, longitude: f64, latitude: f64) -> SpatialResult<NodeId> {
        self.nearest_point(GeoPoint::new(latitude, longitude))
    }

    /// Node nearest to `pos`.
    pub fn nearest_point(&self, pos: GeoPoint) -> SpatialResult<NodeId> {
        self.nearest_with_distance(pos).map(|(id, _)| id)
    }

    /// Node nearest to `pos` and its planar distance in metres.
    pub fn nearest_with_distance(&self, pos: GeoPoint) -> SpatialResult<(NodeId, f64)> {
        let query = self.query_point(pos)?;
        let mut iter = self.tree.nearest_neighbor_iter_with_distance_2(&query);
        let (first, best) = iter.next().ok_or(SpatialError::Empty)?;

        // Results arrive in ascending distance; scan the equidistant run.
        let mut winner = first.id;
        for (entry, d2) in iter {
            if d2 > best {
                break;
            }
            winner = winner.min(entry.id);
        }
        Ok((winner, best.sqrt()))
    }

    /// Up to `k` nearest nodes to `pos`, ascending by distance, equal
    /// distances ordered by `NodeId`.
    pub fn k_nearest(&self, pos: GeoPoint, k: usize) -> SpatialResult<Vec<NodeId>> {
        let query = self.query_point(pos)?;
        if k == 0 {
            return Ok(Vec::new());
        }
        let mut found: Vec<(f64, NodeId)> = Vec::with_capacity(k);
        for (entry, d2) in self.tree.nearest_neighbor_iter_with_distance_2(&query) {
            // Keep pulling past k while still tied with the k-th distance so
            // the id tie-break sees every candidate.
            if found.len() >= k && found.last().is_some_and(|&(last, _)| d2 > last) {
                break;
            }
            found.push((d2, entry.id));
        }
        found.sort_by(|a, b| compare_entry(*a, *b));
        found.truncate(k);
        Ok(found.into_iter().map(|(_, id)| id).collect())
    }

    /// Reference O(n) scan with the same metric and tie rule as
    /// [`nearest_with_distance`](Self::nearest_with_distance).
    pub fn nearest_linear(&self, pos: GeoPoint) -> SpatialResult<(NodeId, f64)> {
        let query = self.query_point(pos)?;
        self.tree
            .iter()
            .map(|entry| (entry.distance_2(&query), entry.id))
            .min_by(|a, b| compare_entry(*a, *b))
            .map(|(d2, id)| (id, d2.sqrt()))
            .ok_or(SpatialError::Empty)
    }

    /// Validate `pos` and project it.  rstar orders candidates with
    /// `partial_cmp().unwrap()`, so a NaN must never reach the tree.
    fn query_point(&self, pos: GeoPoint) -> SpatialResult<[f64; 2]> {
        pos.validate()?;
        Ok(self.projection.project(pos))
    }
}

impl std::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("len", &self.tree.size())
            .field("cos_lat0", &self.projection.cos_lat0)
            .finish()
    }
}

fn compare_entry(a: (f64, NodeId), b: (f64, NodeId)) -> Ordering {
    a.0.total_cmp(&b.0).then(a.1.cmp(&b.1))
}
