//! Shortest-path trait and the default Dijkstra implementation.
//!
//! # Pluggability
//!
//! [`YenKShortest`](crate::YenKShortest) calls its spur searches through the
//! [`ShortestPath`] trait, so a different single-pair engine (A*, a
//! bidirectional search) can be swapped in without touching the K-shortest
//! bookkeeping.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::trace;

use rn_core::{EdgeId, NodeId};
use rn_graph::GraphStore;

use crate::{Exclusions, Path, RoutingError, RoutingResult};

// ── ShortestPath trait ────────────────────────────────────────────────────────

/// Single-pair shortest-path engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so one engine can serve concurrent
/// requests against a shared graph.
pub trait ShortestPath: Send + Sync {
    /// Lowest-weight path from `source` to `target` that avoids every node
    /// and edge in `exclusions`.
    ///
    /// `source == target` yields [`Path::trivial`].
    fn shortest_path_excluding(
        &self,
        graph: &GraphStore,
        source: NodeId,
        target: NodeId,
        exclusions: &Exclusions,
    ) -> RoutingResult<Path>;

    /// Lowest-weight path from `source` to `target` over the whole graph.
    fn shortest_path(&self, graph: &GraphStore, source: NodeId, target: NodeId) -> RoutingResult<Path> {
        self.shortest_path_excluding(graph, source, target, &Exclusions::default())
    }
}

// ── Dijkstra ──────────────────────────────────────────────────────────────────

/// Dijkstra's algorithm over the CSR road graph, using edge weight as cost.
///
/// Correct because the graph store rejects negative weights at load time.
/// Costs cannot overflow to `inf` either: the store caps the sum of all edge
/// weights at [`rn_graph::MAX_TOTAL_WEIGHT`], and every tentative cost is a
/// sum over distinct edges.
/// Frontier entries with equal cost are popped in the order they were
/// pushed, and a node's recorded predecessor only changes on a strictly
/// cheaper relaxation, so the first-discovered of several equal-cost routes
/// wins.
#[derive(Debug, Default, Clone, Copy)]
pub struct Dijkstra;

impl ShortestPath for Dijkstra {
    fn shortest_path_excluding(
        &self,
        graph: &GraphStore,
        source: NodeId,
        target: NodeId,
        exclusions: &Exclusions,
    ) -> RoutingResult<Path> {
        dijkstra(graph, source, target, exclusions)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Min-heap entry ordered by `(cost, seq)`.
struct Frontier {
    cost: f64,
    seq: u64,
    node: NodeId,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    /// Reversed so `BinaryHeap` (a max-heap) pops the cheapest, earliest entry.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

fn dijkstra(
    graph: &GraphStore,
    source: NodeId,
    target: NodeId,
    exclusions: &Exclusions,
) -> RoutingResult<Path> {
    for node in [source, target] {
        if !graph.contains(node) {
            return Err(RoutingError::NodeNotFound(node));
        }
    }
    if exclusions.excludes_node(source) || exclusions.excludes_node(target) {
        return Err(RoutingError::NoPath { from: source, to: target });
    }
    if source == target {
        return Ok(Path::trivial(source));
    }

    let n = graph.node_count();
    // dist[v] = best known cost to reach v.
    let mut dist = vec![f64::INFINITY; n];
    // prev_edge[v] = EdgeId that reached v; EdgeId::INVALID for unreached nodes.
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[source.index()] = 0.0;

    let mut heap = BinaryHeap::new();
    let mut seq: u64 = 0;
    heap.push(Frontier { cost: 0.0, seq, node: source });

    let mut settled = 0usize;
    while let Some(Frontier { cost, node, .. }) = heap.pop() {
        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }
        settled += 1;

        if node == target {
            trace!("dijkstra {source}->{target}: settled {settled} nodes, cost {cost}");
            return Ok(reconstruct(graph, &prev_edge, source, target));
        }

        for edge in graph.out_edges(node) {
            if exclusions.excludes_edge(edge) {
                continue;
            }
            let neighbor = graph.edge_target(edge);
            if exclusions.excludes_node(neighbor) {
                continue;
            }

            let new_cost = cost + graph.edge_weight(edge);
            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                seq += 1;
                heap.push(Frontier { cost: new_cost, seq, node: neighbor });
            }
        }
    }

    trace!("dijkstra {source}->{target}: exhausted after {settled} nodes");
    Err(RoutingError::NoPath { from: source, to: target })
}

fn reconstruct(graph: &GraphStore, prev_edge: &[EdgeId], source: NodeId, target: NodeId) -> Path {
    let mut edges = Vec::new();
    let mut cur = target;
    while cur != source {
        let e = prev_edge[cur.index()];
        edges.push(e);
        cur = graph.edge_source(e);
    }
    edges.reverse();
    Path::from_edges(graph, source, edges)
}
