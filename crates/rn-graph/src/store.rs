//! Road network representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the `EdgeId` range:
//!
//! ```text
//! node_out_start[n] .. node_out_start[n+1]
//! ```
//!
//! All edge arrays (`edge_from`, `edge_to`, `edge_weight`) are sorted by
//! source node and indexed by `EdgeId`.  The sort is stable, so a node's
//! outgoing edges appear in the order they were added to the builder.  That
//! order is what path search relies on for reproducible tie-breaking.
//!
//! Parallel edges (same ordered endpoint pair) are kept as separate entries.

use log::{info, warn};
use rustc_hash::FxHashMap;

use rn_core::{BoundingBox, EdgeId, GeoPoint, NodeId};

use crate::{GraphLoadError, GraphResult};

// ── GraphStore ────────────────────────────────────────────────────────────────

/// Immutable directed road graph in CSR format.
///
/// Construct with [`GraphStoreBuilder`]; there is no way to modify a
/// `GraphStore` once built.
#[derive(Debug)]
pub struct GraphStore {
    // ── Node data (indexed by NodeId) ─────────────────────────────────────
    node_pos: Vec<GeoPoint>,
    node_ext: Vec<i64>,
    ext_to_node: FxHashMap<i64, NodeId>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// Length = `node_count + 1`.
    node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId = position in sorted order) ──────────
    edge_from: Vec<NodeId>,
    edge_to: Vec<NodeId>,
    edge_weight: Vec<f64>,
}

impl GraphStore {
    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    /// `true` if `node` names a node of this graph.
    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_pos.len()
    }

    /// All node ids, ascending.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = NodeId> + '_ {
        (0..self.node_pos.len() as u32).map(NodeId)
    }

    // ── Node lookups ──────────────────────────────────────────────────────

    /// Coordinates of `node`, or `None` if the id is not in the graph.
    #[inline]
    pub fn position(&self, node: NodeId) -> Option<GeoPoint> {
        self.node_pos.get(node.index()).copied()
    }

    /// Identifier the data source used for `node`.
    #[inline]
    pub fn external_id(&self, node: NodeId) -> Option<i64> {
        self.node_ext.get(node.index()).copied()
    }

    /// Resolve a data-source identifier to its dense `NodeId`.
    pub fn node_by_external(&self, external: i64) -> Option<NodeId> {
        self.ext_to_node.get(&external).copied()
    }

    /// Iterator over `(NodeId, GeoPoint)` for every node, ascending by id.
    pub fn positions(&self) -> impl ExactSizeIterator<Item = (NodeId, GeoPoint)> + '_ {
        self.node_pos
            .iter()
            .enumerate()
            .map(|(i, &pos)| (NodeId(i as u32), pos))
    }

    /// Smallest lat/lon box containing every node.
    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::enclosing(self.node_pos.iter().copied())
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`, in
    /// insertion order.  Empty for ids outside the graph.
    ///
    /// This is a contiguous index range — no heap allocation.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl ExactSizeIterator<Item = EdgeId> + use<> {
        let (start, end) = self.out_range(node);
        (start..end).map(EdgeId)
    }

    /// Out-degree of `node` (number of outgoing edges).
    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let (start, end) = self.out_range(node);
        (end - start) as usize
    }

    #[inline]
    fn out_range(&self, node: NodeId) -> (u32, u32) {
        if !self.contains(node) {
            return (0, 0);
        }
        (
            self.node_out_start[node.index()],
            self.node_out_start[node.index() + 1],
        )
    }

    // ── Edge lookups ──────────────────────────────────────────────────────
    //
    // EdgeIds handed out by `out_edges` are always valid, so these index
    // directly.

    #[inline]
    pub fn edge_source(&self, edge: EdgeId) -> NodeId {
        self.edge_from[edge.index()]
    }

    #[inline]
    pub fn edge_target(&self, edge: EdgeId) -> NodeId {
        self.edge_to[edge.index()]
    }

    #[inline]
    pub fn edge_weight(&self, edge: EdgeId) -> f64 {
        self.edge_weight[edge.index()]
    }

    /// Every edge running from `from` to `to`, in insertion order.
    pub fn edges_between(&self, from: NodeId, to: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.out_edges(from)
            .filter(move |&e| self.edge_to[e.index()] == to)
    }
}

/// Upper bound on the sum of all edge weights accepted by
/// [`GraphStoreBuilder::build`].
pub const MAX_TOTAL_WEIGHT: f64 = f64::MAX / 2.0;

// ── GraphStoreBuilder ─────────────────────────────────────────────────────────

/// Construct a [`GraphStore`] incrementally, then call [`build`](Self::build).
///
/// The builder accepts nodes and directed edges in any order; nothing is
/// validated until `build()`, which checks every edge, sorts edges by source
/// node and constructs the CSR arrays.
///
/// # Example
///
/// ```
/// use rn_core::GeoPoint;
/// use rn_graph::GraphStoreBuilder;
///
/// let mut b = GraphStoreBuilder::new();
/// let a = b.add_node(1, GeoPoint::new(12.9716, 77.5946));
/// let c = b.add_node(2, GeoPoint::new(12.9780, 77.5995));
/// b.add_road(a, c, 850.0);
/// let graph = b.build().unwrap();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 2); // bidirectional
/// ```
#[derive(Default)]
pub struct GraphStoreBuilder {
    nodes:     Vec<GeoPoint>,
    ext_ids:   Vec<i64>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:   NodeId,
    to:     NodeId,
    weight: f64,
}

impl GraphStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for the expected number of nodes and edges to reduce
    /// reallocations when bulk-loading.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            ext_ids:   Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a road node and return its `NodeId` (sequential from 0).
    ///
    /// `external_id` is the identifier the data source uses; it must be
    /// unique across the graph.
    pub fn add_node(&mut self, external_id: i64, pos: GeoPoint) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        self.ext_ids.push(external_id);
        id
    }

    /// Add a **directed** edge from `from` to `to` with traversal cost `weight`.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, weight: f64) {
        self.raw_edges.push(RawEdge { from, to, weight });
    }

    /// Convenience: add edges in **both directions** for an undirected road
    /// segment.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, weight: f64) {
        self.add_directed_edge(a, b, weight);
        self.add_directed_edge(b, a, weight);
    }

    /// Add an undirected road whose weight is the great-circle length in
    /// metres between its endpoints.  Unknown endpoints are reported by
    /// `build()`, not here.
    pub fn add_road_by_distance(&mut self, a: NodeId, b: NodeId) {
        let weight = self.length_m(a, b).unwrap_or(f64::NAN);
        self.add_road(a, b, weight);
    }

    /// Great-circle distance between two nodes added earlier.
    pub fn length_m(&self, a: NodeId, b: NodeId) -> Option<f64> {
        let pa = self.node_pos(a)?;
        let pb = self.node_pos(b)?;
        Some(pa.distance_m(pb))
    }

    /// Look up the position of a node added earlier.
    pub fn node_pos(&self, id: NodeId) -> Option<GeoPoint> {
        self.nodes.get(id.index()).copied()
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Validate and consume the builder, producing a [`GraphStore`].
    ///
    /// # Errors
    ///
    /// - [`GraphLoadError::Empty`] if no node was added.
    /// - [`GraphLoadError::UnknownNode`] if an edge endpoint was never added.
    /// - [`GraphLoadError::NegativeWeight`] / [`GraphLoadError::NonFiniteWeight`]
    ///   for invalid costs.  Weights are never clamped.
    /// - [`GraphLoadError::DuplicateNode`] if two nodes share an external id.
    /// - [`GraphLoadError::InvalidCoordinate`] for a non-finite or
    ///   out-of-range node position.
    /// - [`GraphLoadError::WeightOverflow`] if the weights of all edges
    ///   together exceed half of `f64::MAX`.  Any loopless path uses a subset of
    ///   the edges, so after this check no path weight can overflow to `inf`.
    ///
    /// Time complexity: O(N + E log E).
    pub fn build(self) -> GraphResult<GraphStore> {
        let node_count = self.nodes.len();
        if node_count == 0 {
            warn!("rejecting road network: no nodes");
            return Err(GraphLoadError::Empty);
        }
        if node_count >= u32::MAX as usize {
            return Err(GraphLoadError::TooLarge("node count"));
        }
        if self.raw_edges.len() >= u32::MAX as usize {
            return Err(GraphLoadError::TooLarge("edge count"));
        }

        for (&ext, pos) in self.ext_ids.iter().zip(&self.nodes) {
            if let Err(source) = pos.validate() {
                warn!("rejecting road network: node {ext} at {pos}: {source}");
                return Err(GraphLoadError::InvalidCoordinate { node: ext, source });
            }
        }

        let mut ext_to_node =
            FxHashMap::with_capacity_and_hasher(node_count, Default::default());
        for (i, &ext) in self.ext_ids.iter().enumerate() {
            if ext_to_node.insert(ext, NodeId(i as u32)).is_some() {
                warn!("rejecting road network: duplicate node id {ext}");
                return Err(GraphLoadError::DuplicateNode(ext));
            }
        }

        for (i, e) in self.raw_edges.iter().enumerate() {
            if let Err(err) = check_edge(i, e, node_count) {
                warn!("rejecting road network: {err}");
                return Err(err);
            }
        }

        // Half of f64::MAX leaves room for rounding differences when a
        // search sums a subset of the edges in another order.
        let total: f64 = self.raw_edges.iter().map(|e| e.weight).sum();
        if total > MAX_TOTAL_WEIGHT {
            warn!("rejecting road network: total edge weight {total} overflows");
            return Err(GraphLoadError::WeightOverflow { total });
        }

        // Stable sort: parallel edges and same-source edges keep insertion order.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_from:   Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to:     Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_weight: Vec<f64>    = raw.iter().map(|e| e.weight).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, raw.len());

        info!(
            "road network built: {} nodes, {} directed edges",
            node_count,
            edge_to.len()
        );

        Ok(GraphStore {
            node_pos: self.nodes,
            node_ext: self.ext_ids,
            ext_to_node,
            node_out_start,
            edge_from,
            edge_to,
            edge_weight,
        })
    }
}

fn check_edge(index: usize, e: &RawEdge, node_count: usize) -> GraphResult<()> {
    for node in [e.from, e.to] {
        if node.index() >= node_count {
            return Err(GraphLoadError::UnknownNode { edge: index, node: node.to_string() });
        }
    }
    if !e.weight.is_finite() {
        return Err(GraphLoadError::NonFiniteWeight { edge: index, weight: e.weight });
    }
    if e.weight < 0.0 {
        return Err(GraphLoadError::NegativeWeight { edge: index, weight: e.weight });
    }
    Ok(())
}
