//! Path values and per-search exclusion filters.

use rustc_hash::FxHashSet;

use rn_core::{EdgeId, NodeId};
use rn_graph::GraphStore;

// ── Path ──────────────────────────────────────────────────────────────────────

/// The result of a routing query: the visited nodes, the edge taken between
/// each consecutive pair, and the total weight.
///
/// Invariants: `nodes.len() == edges.len() + 1`, edge `i` runs from
/// `nodes[i]` to `nodes[i + 1]`, and `weight` is the left-to-right sum of the
/// edge weights.  Because the sum is always taken in path order, two paths
/// with the same edge sequence carry bit-identical weights.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    nodes: Vec<NodeId>,
    edges: Vec<EdgeId>,
    weight: f64,
}

impl Path {
    /// Zero-edge path that starts and ends at `node`.
    pub fn trivial(node: NodeId) -> Self {
        Self { nodes: vec![node], edges: Vec::new(), weight: 0.0 }
    }

    /// Build a path by walking `edges` from `source`.
    ///
    /// `edges` must be contiguous and start at `source`; every caller in this
    /// crate builds them from search results or prefixes of earlier paths.
    pub(crate) fn from_edges(graph: &GraphStore, source: NodeId, edges: Vec<EdgeId>) -> Self {
        let mut nodes = Vec::with_capacity(edges.len() + 1);
        nodes.push(source);
        let mut weight = 0.0;
        for &e in &edges {
            debug_assert_eq!(graph.edge_source(e), *nodes.last().unwrap_or(&source));
            weight += graph.edge_weight(e);
            nodes.push(graph.edge_target(e));
        }
        Self { nodes, edges, weight }
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Sum of edge weights, in the graph's weight unit.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn source(&self) -> NodeId {
        self.nodes[0]
    }

    pub fn target(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// `true` if the source and target are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    /// `true` if no node is visited twice.
    pub fn is_loopless(&self) -> bool {
        let mut seen = FxHashSet::default();
        self.nodes.iter().all(|n| seen.insert(*n))
    }
}

// ── Exclusions ────────────────────────────────────────────────────────────────

/// Nodes and edges a single search must not use.
///
/// An excluded node is never entered; an excluded edge is never relaxed.  The
/// shared graph is untouched: exclusions live only as long as the search
/// that receives them.
#[derive(Debug, Default, Clone)]
pub struct Exclusions {
    nodes: FxHashSet<NodeId>,
    edges: FxHashSet<EdgeId>,
}

impl Exclusions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exclude_node(&mut self, node: NodeId) -> &mut Self {
        self.nodes.insert(node);
        self
    }

    pub fn exclude_edge(&mut self, edge: EdgeId) -> &mut Self {
        self.edges.insert(edge);
        self
    }

    #[inline]
    pub fn excludes_node(&self, node: NodeId) -> bool {
        !self.nodes.is_empty() && self.nodes.contains(&node)
    }

    #[inline]
    pub fn excludes_edge(&self, edge: EdgeId) -> bool {
        !self.edges.is_empty() && self.edges.contains(&edge)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Drop every exclusion but keep the allocations for reuse.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }
}
