//! Graph loading adapters.
//!
//! Fetching and parsing raw provider data happens outside this crate; an
//! external collaborator hands the core a [`GraphSource`] and receives a
//! validated [`GraphStore`] or a [`GraphLoadError`].
//!
//! # CSV format
//!
//! Two files (or any two `Read` streams).  Nodes:
//!
//! ```csv
//! id,lat,lon
//! 101,12.9716,77.5946
//! 102,12.9780,77.5995
//! ```
//!
//! Edges:
//!
//! ```csv
//! from,to,weight,oneway
//! 101,102,850.0,false
//! 102,101,,true
//! ```
//!
//! | Column   | Meaning                                                      |
//! |----------|--------------------------------------------------------------|
//! | `from`   | source node `id`                                             |
//! | `to`     | target node `id`                                             |
//! | `weight` | non-negative cost; empty or absent → haversine metres        |
//! | `oneway` | `true`/`1`/`yes` (default) or `false`/`0`/`no` (adds reverse) |
//!
//! Node rows are added in file order, so the first row becomes `NodeId(0)`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use rn_core::{GeoPoint, NodeId};

use crate::{GraphLoadError, GraphResult, GraphStore, GraphStoreBuilder};

// ── GraphSource ───────────────────────────────────────────────────────────────

/// Anything that can produce a validated road network.
pub trait GraphSource {
    fn load(self) -> GraphResult<GraphStore>;
}

/// A hand-assembled builder is the simplest source.
impl GraphSource for GraphStoreBuilder {
    fn load(self) -> GraphResult<GraphStore> {
        self.build()
    }
}

/// Load a graph from any [`GraphSource`].
pub fn load_graph(source: impl GraphSource) -> GraphResult<GraphStore> {
    source.load()
}

/// Load a graph from a node CSV file and an edge CSV file.
pub fn load_graph_csv(nodes: &Path, edges: &Path) -> GraphResult<GraphStore> {
    let nodes = File::open(nodes)?;
    let edges = File::open(edges)?;
    CsvGraphSource::new(nodes, edges).load()
}

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    id:  i64,
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct EdgeRecord {
    from:   i64,
    to:     i64,
    #[serde(default)]
    weight: Option<f64>,
    #[serde(default)]
    oneway: Option<String>,
}

// ── CsvGraphSource ────────────────────────────────────────────────────────────

/// [`GraphSource`] reading the two-table CSV layout described in the
/// module docs.  Accepts any `Read` source, e.g. a `std::io::Cursor` in tests.
pub struct CsvGraphSource<N, E> {
    nodes: N,
    edges: E,
}

impl<N: Read, E: Read> CsvGraphSource<N, E> {
    pub fn new(nodes: N, edges: E) -> Self {
        Self { nodes, edges }
    }
}

impl<N: Read, E: Read> GraphSource for CsvGraphSource<N, E> {
    fn load(self) -> GraphResult<GraphStore> {
        let mut builder = GraphStoreBuilder::new();
        let mut by_ext: FxHashMap<i64, NodeId> = FxHashMap::default();

        // ── Nodes ─────────────────────────────────────────────────────────
        let mut node_reader = csv::Reader::from_reader(self.nodes);
        for (row, result) in node_reader.deserialize::<NodeRecord>().enumerate() {
            let rec = result.map_err(|e| GraphLoadError::Parse(e.to_string()))?;
            let pos = GeoPoint::try_new(rec.lat, rec.lon)
                .map_err(|e| GraphLoadError::Parse(format!("node row {}: {e}", row + 1)))?;
            if by_ext.contains_key(&rec.id) {
                return Err(GraphLoadError::DuplicateNode(rec.id));
            }
            let id = builder.add_node(rec.id, pos);
            by_ext.insert(rec.id, id);
        }

        // ── Edges ─────────────────────────────────────────────────────────
        let mut edge_reader = csv::Reader::from_reader(self.edges);
        for (row, result) in edge_reader.deserialize::<EdgeRecord>().enumerate() {
            let rec = result.map_err(|e| GraphLoadError::Parse(e.to_string()))?;
            let resolve = |ext: i64| {
                by_ext.get(&ext).copied().ok_or_else(|| GraphLoadError::UnknownNode {
                    edge: row,
                    node: ext.to_string(),
                })
            };
            let from = resolve(rec.from)?;
            let to = resolve(rec.to)?;

            let weight = match rec.weight {
                Some(w) => w,
                None => builder.length_m(from, to).unwrap_or(f64::NAN),
            };

            if parse_oneway(rec.oneway.as_deref(), row)? {
                builder.add_directed_edge(from, to, weight);
            } else {
                builder.add_road(from, to, weight);
            }
        }

        builder.build()
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_oneway(s: Option<&str>, row: usize) -> GraphResult<bool> {
    match s.map(str::trim) {
        None | Some("") => Ok(true),
        Some(v) => match v.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(GraphLoadError::Parse(format!(
                "edge row {}: invalid oneway {v:?}: expected true/false, 1/0 or yes/no",
                row + 1
            ))),
        },
    }
}
