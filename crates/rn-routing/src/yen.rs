//! K shortest loopless paths (Yen's algorithm).
//!
//! # Outline
//!
//! `accepted` starts with the single shortest path.  For the most recently
//! accepted path `P`, every node `P[i]` except the target is tried as a
//! deviation (spur) node:
//!
//! 1. The root path is `P`'s edge prefix up to `P[i]`.
//! 2. For every accepted path with that exact edge prefix, its next edge is
//!    excluded, so the spur search cannot rebuild a known path.
//! 3. Every root-path node before `P[i]` is excluded, so the result is
//!    loopless.
//! 4. A spur search from `P[i]` to the target runs under those exclusions;
//!    root + spur becomes a candidate.
//!
//! The cheapest candidate is then moved to `accepted`.  Candidates are keyed
//! by edge sequence rather than node sequence, so parallel edges produce
//! distinct paths, and the same edge sequence reached from two different
//! deviation nodes is only ever queued or accepted once.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::debug;
use rustc_hash::FxHashSet;

use rn_core::{EdgeId, NodeId};
use rn_graph::GraphStore;

use crate::{Dijkstra, Exclusions, Path, RoutingError, RoutingResult, ShortestPath};

// ── Candidate heap entry ──────────────────────────────────────────────────────

struct Candidate {
    path: Path,
    seq: u64,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    /// Reversed: the max-heap pops the lightest, earliest-queued candidate.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .path
            .weight()
            .total_cmp(&self.path.weight())
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

// ── YenKShortest ──────────────────────────────────────────────────────────────

/// K-shortest-loopless-paths engine built on a [`ShortestPath`] spur search.
#[derive(Debug, Default, Clone)]
pub struct YenKShortest<S = Dijkstra> {
    spur: S,
}

impl<S: ShortestPath> YenKShortest<S> {
    pub fn new(spur: S) -> Self {
        Self { spur }
    }

    /// The single-pair engine used for the first path and every spur search.
    pub fn spur_engine(&self) -> &S {
        &self.spur
    }

    /// Up to `k` distinct loopless paths from `source` to `target`, sorted by
    /// non-decreasing weight.  The first is the engine's shortest path.
    ///
    /// Returns fewer than `k` paths, without error, when the graph has no
    /// more distinct loopless routes.
    ///
    /// # Errors
    ///
    /// - [`RoutingError::InvalidK`] if `k == 0`.
    /// - [`RoutingError::NodeNotFound`] for ids outside the graph.
    /// - [`RoutingError::NoPath`] if `target` is unreachable from `source`.
    pub fn k_shortest_paths(
        &self,
        graph: &GraphStore,
        source: NodeId,
        target: NodeId,
        k: usize,
    ) -> RoutingResult<Vec<Path>> {
        if k == 0 {
            return Err(RoutingError::InvalidK(k));
        }

        let first = self.spur.shortest_path(graph, source, target)?;

        let mut accepted_edges: FxHashSet<Vec<EdgeId>> = FxHashSet::default();
        accepted_edges.insert(first.edges().to_vec());
        let mut accepted = vec![first];

        let mut candidates: BinaryHeap<Candidate> = BinaryHeap::new();
        let mut queued_edges: FxHashSet<Vec<EdgeId>> = FxHashSet::default();
        let mut seq: u64 = 0;

        let mut exclusions = Exclusions::new();
        let mut spur_searches = 0usize;

        while accepted.len() < k {
            let prev = &accepted[accepted.len() - 1];

            for i in 0..prev.len() {
                let spur_node = prev.nodes()[i];
                let root_edges = &prev.edges()[..i];

                exclusions.clear();
                for p in &accepted {
                    if p.len() > i && p.edges()[..i] == *root_edges {
                        exclusions.exclude_edge(p.edges()[i]);
                    }
                }
                for &n in &prev.nodes()[..i] {
                    exclusions.exclude_node(n);
                }

                spur_searches += 1;
                let spur = match self.spur.shortest_path_excluding(graph, spur_node, target, &exclusions) {
                    Ok(spur) => spur,
                    Err(RoutingError::NoPath { .. }) => continue,
                    Err(e) => return Err(e),
                };

                let mut edges = Vec::with_capacity(i + spur.len());
                edges.extend_from_slice(root_edges);
                edges.extend_from_slice(spur.edges());

                if accepted_edges.contains(&edges) || queued_edges.contains(&edges) {
                    continue;
                }
                queued_edges.insert(edges.clone());
                seq += 1;
                candidates.push(Candidate { path: Path::from_edges(graph, source, edges), seq });
            }

            match pop_unseen(&mut candidates, &mut queued_edges, &mut accepted_edges) {
                Some(path) => accepted.push(path),
                None => break,
            }
        }

        debug!(
            "k-shortest {source}->{target}: {}/{k} paths, {spur_searches} spur searches, {} candidates left",
            accepted.len(),
            candidates.len()
        );
        Ok(accepted)
    }
}

/// Pop the lightest candidate whose edge sequence is not already accepted.
fn pop_unseen(
    candidates: &mut BinaryHeap<Candidate>,
    queued: &mut FxHashSet<Vec<EdgeId>>,
    accepted: &mut FxHashSet<Vec<EdgeId>>,
) -> Option<Path> {
    while let Some(Candidate { path, .. }) = candidates.pop() {
        queued.remove(path.edges());
        if accepted.insert(path.edges().to_vec()) {
            return Some(path);
        }
    }
    None
}
