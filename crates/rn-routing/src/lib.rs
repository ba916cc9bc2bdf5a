//! `rn-routing` — path search over an immutable [`rn_graph::GraphStore`].
//!
//! # Crate layout
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`path`]     | `Path`, `Exclusions`                                   |
//! | [`dijkstra`] | `ShortestPath` trait, `Dijkstra`                       |
//! | [`yen`]      | `YenKShortest` (K shortest loopless paths)             |
//! | [`error`]    | `RoutingError`, `RoutingResult<T>`                     |
//!
//! # Determinism
//!
//! Both engines are pure functions of the graph and their arguments.  Equal
//! frontier costs are broken by discovery order and adjacency is iterated in
//! the graph's stable edge order, so repeating a query returns the same node
//! sequence and bit-identical weights.
//!
//! # Thread safety
//!
//! Engines are zero-sized or hold only immutable configuration; every search
//! allocates its own frontier, distance table and exclusion sets.

pub mod dijkstra;
pub mod error;
pub mod path;
pub mod yen;


pub use dijkstra::{Dijkstra, ShortestPath};
pub use error::{RoutingError, RoutingResult};
pub use path::{Exclusions, Path};
pub use yen::YenKShortest;

use rn_core::NodeId;
use rn_graph::GraphStore;

/// Lowest-weight path from `source` to `target` using [`Dijkstra`].
pub fn shortest_path(graph: &GraphStore, source: NodeId, target: NodeId) -> RoutingResult<Path> {
    Dijkstra.shortest_path(graph, source, target)
}

/// Up to `k` loopless paths from `source` to `target`, ascending by weight,
/// using [`YenKShortest`] over [`Dijkstra`].
pub fn k_shortest_paths(
    graph: &GraphStore,
    source: NodeId,
    target: NodeId,
    k: usize,
) -> RoutingResult<Vec<Path>> {
    YenKShortest::new(Dijkstra).k_shortest_paths(graph, source, target, k)
}
