//! Coordinate-level routing facade.
//!
//! ```text
//! (lat, lon) ──SpatialIndex──▶ NodeId ──Dijkstra / Yen──▶ Path ──GraphStore──▶ [[lat, lon], …]
//! ```

use std::sync::Arc;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use rn_core::{GeoPoint, NodeId};
use rn_graph::GraphStore;
use rn_routing::{Dijkstra, Path, ShortestPath, YenKShortest};
use rn_spatial::SpatialIndex;

use crate::{RouteConfig, RouteError, RouteResult};

// ── Request / response types ──────────────────────────────────────────────────

/// One route as returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteGeometry {
    /// `[lat, lon]` pairs in travel order.
    pub coordinates: Vec<[f64; 2]>,
    /// Total path weight in the graph's weight unit.
    pub weight: f64,
    /// Data-source ids of the visited nodes.
    pub nodes: Vec<i64>,
}

/// A single request in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteQuery {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    /// Path count; `None` uses [`RouteConfig::default_k`].
    #[serde(default)]
    pub k: Option<usize>,
}

// ── RouteService ──────────────────────────────────────────────────────────────

/// Shared, read-only routing service.
///
/// Build once at startup and share behind an `Arc`; every method takes
/// `&self` and allocates only request-local state.
pub struct RouteService<S = Dijkstra> {
    graph:  Arc<GraphStore>,
    index:  SpatialIndex,
    engine: YenKShortest<S>,
    config: RouteConfig,
}

impl RouteService<Dijkstra> {
    /// Build the spatial index over `graph` and validate `config`.
    ///
    /// # Errors
    ///
    /// [`RouteError::EmptyIndex`] if the graph has no nodes and
    /// [`RouteError::Config`] for an inconsistent config.  Either must stop
    /// the process from accepting traffic.
    pub fn new(graph: Arc<GraphStore>, config: RouteConfig) -> RouteResult<Self> {
        Self::with_engine(graph, config, Dijkstra)
    }
}

impl<S: ShortestPath> RouteService<S> {
    /// Like [`RouteService::new`] with a custom single-pair engine, used both
    /// for shortest-path queries and as Yen's spur search.
    pub fn with_engine(graph: Arc<GraphStore>, config: RouteConfig, spur: S) -> RouteResult<Self> {
        config.validate()?;
        let index = SpatialIndex::build(&graph)?;
        info!(
            "route service ready: {} nodes, {} edges, default_k={}, max_k={}",
            graph.node_count(),
            graph.edge_count(),
            config.default_k,
            config.max_k
        );
        Ok(Self { graph, index, engine: YenKShortest::new(spur), config })
    }

    pub fn graph(&self) -> &GraphStore {
        &self.graph
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn config(&self) -> &RouteConfig {
        &self.config
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Validate `point` and snap it to its nearest road node.
    pub fn snap(&self, point: GeoPoint) -> RouteResult<NodeId> {
        point.validate()?;
        if let Some(bounds) = &self.config.bounds {
            if !bounds.contains(point) {
                return Err(RouteError::InvalidArgument(format!(
                    "{point} is outside the service area"
                )));
            }
        }
        let (node, dist_m) = self.index.nearest_with_distance(point)?;
        if let Some(limit) = self.config.max_snap_distance_m {
            if dist_m > limit {
                return Err(RouteError::InvalidArgument(format!(
                    "{point} is {dist_m:.0} m from the nearest road (limit {limit:.0} m)"
                )));
            }
        }
        Ok(node)
    }

    /// Lowest-weight route between two coordinates.
    pub fn shortest_route(&self, origin: GeoPoint, destination: GeoPoint) -> RouteResult<RouteGeometry> {
        let (from, to) = self.snap_pair(origin, destination)?;
        let path = self.engine.spur_engine().shortest_path(&self.graph, from, to)?;
        self.geometry(&path)
    }

    /// Up to `k` distinct loopless routes, ascending by weight.
    pub fn k_shortest_routes(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
        k: usize,
    ) -> RouteResult<Vec<RouteGeometry>> {
        if k == 0 || k > self.config.max_k {
            return Err(RouteError::InvalidArgument(format!(
                "path count {k} outside 1..={}",
                self.config.max_k
            )));
        }
        let (from, to) = self.snap_pair(origin, destination)?;
        let paths = self.engine.k_shortest_paths(&self.graph, from, to, k)?;
        debug!("{origin} -> {destination}: {} of {k} routes", paths.len());
        paths.iter().map(|p| self.geometry(p)).collect()
    }

    /// Main route first, then alternates.  `k = None` uses the configured
    /// default.
    pub fn routes(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
        k: Option<usize>,
    ) -> RouteResult<Vec<RouteGeometry>> {
        self.k_shortest_routes(origin, destination, k.unwrap_or(self.config.default_k))
    }

    /// Answer a batch of independent queries.  Results keep input order.
    #[cfg(feature = "parallel")]
    pub fn route_many(&self, queries: &[RouteQuery]) -> Vec<RouteResult<Vec<RouteGeometry>>> {
        use rayon::prelude::*;
        queries
            .par_iter()
            .map(|q| self.routes(q.origin, q.destination, q.k))
            .collect()
    }

    /// Answer a batch of independent queries.  Results keep input order.
    #[cfg(not(feature = "parallel"))]
    pub fn route_many(&self, queries: &[RouteQuery]) -> Vec<RouteResult<Vec<RouteGeometry>>> {
        queries
            .iter()
            .map(|q| self.routes(q.origin, q.destination, q.k))
            .collect()
    }

    // ── Output translation ────────────────────────────────────────────────

    /// `[lat, lon]` for every node of `path`, in path order.
    ///
    /// `path` must come from this service's graph; a node the graph does not
    /// contain fails the whole call rather than dropping a point.
    pub fn path_coordinates(&self, path: &Path) -> RouteResult<Vec<[f64; 2]>> {
        path.nodes()
            .iter()
            .map(|&n| self.graph.position(n).map(GeoPoint::lat_lon).ok_or_else(|| foreign_node(n)))
            .collect()
    }

    /// Full response record for `path`.  Same contract as
    /// [`path_coordinates`](Self::path_coordinates).
    pub fn geometry(&self, path: &Path) -> RouteResult<RouteGeometry> {
        let nodes = path
            .nodes()
            .iter()
            .map(|&n| self.graph.external_id(n).ok_or_else(|| foreign_node(n)))
            .collect::<RouteResult<Vec<i64>>>()?;
        Ok(RouteGeometry {
            coordinates: self.path_coordinates(path)?,
            weight: path.weight(),
            nodes,
        })
    }

    fn snap_pair(&self, origin: GeoPoint, destination: GeoPoint) -> RouteResult<(NodeId, NodeId)> {
        let from = self.snap(origin)?;
        let to = self.snap(destination)?;
        debug!("snapped {origin} -> {from}, {destination} -> {to}");
        Ok((from, to))
    }
}

fn foreign_node(node: NodeId) -> RouteError {
    RouteError::InvalidArgument(format!("path node {node} is not in the service graph"))
}
