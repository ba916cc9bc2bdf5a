//! bengaluru — smallest end-to-end example for the rn routing core.
//!
//! Loads a synthetic 10-intersection road network laid over central
//! Bengaluru, builds a [`RouteService`] restricted to the metro area, and
//! prints the main route plus alternates for a few trips as JSON.
//!
//! Usage:
//!
//! ```text
//! bengaluru                                   # embedded network
//! bengaluru nodes.csv edges.csv [route.json]  # your own network
//! ```
//!
//! Set `RUST_LOG=debug` to see snapping and spur-search statistics.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use log::info;

use rn_core::{BoundingBox, GeoPoint};
use rn_graph::{CsvGraphSource, GraphStore, load_graph, load_graph_csv};
use rn_service::{RouteConfig, RouteQuery, RouteService};

// ── Embedded network ──────────────────────────────────────────────────────────

const NODES_CSV: &str = "\
id,lat,lon\n\
100,12.9767,77.5713\n\
101,12.9756,77.6050\n\
102,12.9763,77.5929\n\
103,12.9857,77.6057\n\
104,12.9784,77.6408\n\
105,12.9352,77.6245\n\
106,12.9250,77.5938\n\
107,12.9507,77.5848\n\
108,13.0358,77.5970\n\
109,13.0050,77.5800\n";

// Empty weight = great-circle length in metres; empty oneway = one-way.
const EDGES_CSV: &str = "\
from,to,weight,oneway\n\
100,102,,false\n\
102,101,,false\n\
101,103,,false\n\
102,103,,false\n\
101,104,,false\n\
103,104,,false\n\
101,105,,false\n\
104,105,,false\n\
100,107,,false\n\
107,106,,false\n\
106,105,,false\n\
107,102,,false\n\
100,109,,false\n\
109,108,,false\n\
103,108,,\n\
108,104,,\n";

// ── Trips ─────────────────────────────────────────────────────────────────────

const TRIPS: &[(&str, [f64; 2], [f64; 2])] = &[
    ("Majestic -> Koramangala",   [12.9770, 77.5720], [12.9350, 77.6240]),
    ("Hebbal -> Indiranagar",     [13.0355, 77.5972], [12.9786, 77.6400]),
    ("Jayanagar -> Shivajinagar", [12.9252, 77.5940], [12.9855, 77.6055]),
];

const K: usize = 3;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (graph, config) = match args.as_slice() {
        [] => (embedded_graph()?, bengaluru_config()),
        [nodes, edges] => (csv_graph(nodes, edges)?, RouteConfig::default()),
        [nodes, edges, config] => (
            csv_graph(nodes, edges)?,
            RouteConfig::from_json_file(Path::new(config))
                .with_context(|| format!("loading {config}"))?,
        ),
        _ => bail!("usage: bengaluru [nodes.csv edges.csv [route.json]]"),
    };

    let t0 = Instant::now();
    let service = RouteService::new(Arc::new(graph), config)?;
    info!("service built in {:.1} ms", t0.elapsed().as_secs_f64() * 1e3);

    let queries: Vec<RouteQuery> = TRIPS
        .iter()
        .map(|&(_, [olat, olon], [dlat, dlon])| RouteQuery {
            origin: GeoPoint::new(olat, olon),
            destination: GeoPoint::new(dlat, dlon),
            k: Some(K),
        })
        .collect();

    let t1 = Instant::now();
    let results = service.route_many(&queries);
    info!("{} queries in {:.2} ms", queries.len(), t1.elapsed().as_secs_f64() * 1e3);

    for ((label, ..), result) in TRIPS.iter().zip(results) {
        match result {
            Ok(routes) => {
                println!("# {label}: {} route(s)", routes.len());
                println!("{}", serde_json::to_string_pretty(&routes)?);
            }
            Err(e) => println!("# {label}: {} ({e})", e.kind()),
        }
    }

    Ok(())
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn embedded_graph() -> Result<GraphStore> {
    let source = CsvGraphSource::new(Cursor::new(NODES_CSV), Cursor::new(EDGES_CSV));
    load_graph(source).context("embedded network")
}

fn csv_graph(nodes: &str, edges: &str) -> Result<GraphStore> {
    load_graph_csv(Path::new(nodes), Path::new(edges))
        .with_context(|| format!("loading {nodes} / {edges}"))
}

/// Greater Bengaluru service area, 500 m snap radius.
fn bengaluru_config() -> RouteConfig {
    RouteConfig {
        bounds: Some(BoundingBox::from_corners(
            GeoPoint::new(12.6933, 77.0849),
            GeoPoint::new(13.2827, 78.1602),
        )),
        max_snap_distance_m: Some(500.0),
        ..RouteConfig::default()
    }
}
