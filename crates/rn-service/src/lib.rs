//! `rn-service` — the thin layer a request handler calls.
//!
//! Translates coordinates to nodes through the [`SpatialIndex`], runs the
//! path engines, and translates node sequences back to `[lat, lon]` pairs.
//! HTTP, CORS and response status codes belong to the caller; this crate
//! only surfaces typed [`RouteError`]s so the caller can map each kind.
//!
//! # Crate layout
//!
//! | Module      | Contents                                           |
//! |-------------|----------------------------------------------------|
//! | [`service`] | `RouteService`, `RouteGeometry`, `RouteQuery`      |
//! | [`config`]  | `RouteConfig` (serde, JSON loading)                |
//! | [`error`]   | `RouteError`, `RouteResult<T>`                     |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                |
//! |------------|-------------------------------------------------------|
//! | `parallel` | `RouteService::route_many` fans out over Rayon.       |
//!
//! [`SpatialIndex`]: rn_spatial::SpatialIndex

pub mod config;
pub mod error;
pub mod service;

#[cfg(test)]
mod tests;

pub use config::RouteConfig;
pub use error::{RouteError, RouteResult};
pub use service::{RouteGeometry, RouteQuery, RouteService};
