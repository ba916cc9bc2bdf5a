//! `rn-graph` — the road-network graph store and its loading adapters.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`store`]  | `GraphStore` (CSR adjacency), `GraphStoreBuilder`          |
//! | [`loader`] | `GraphSource` trait, `CsvGraphSource`, `load_graph_csv`    |
//! | [`error`]  | `GraphLoadError`, `GraphResult<T>`                         |
//!
//! A `GraphStore` is built once and never mutated afterwards.  It is
//! `Send + Sync`, so one instance behind an `Arc` serves any number of
//! concurrent queries without locking.

pub mod error;
pub mod loader;
pub mod store;


pub use error::{GraphLoadError, GraphResult};
pub use loader::{load_graph, load_graph_csv, CsvGraphSource, GraphSource};
pub use store::{GraphStore, GraphStoreBuilder, MAX_TOTAL_WEIGHT};
