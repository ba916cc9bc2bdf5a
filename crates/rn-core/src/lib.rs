//! `rn-core` — foundational types for the `rn` road-routing workspace.
//!
//! Every other `rn-*` crate depends on this one.  It has no `rn-*`
//! dependencies and only `thiserror` (plus optional `serde`) from outside.
//!
//! # What lives here
//!
//! | Module    | Contents                                        |
//! |-----------|-------------------------------------------------|
//! | [`ids`]   | `NodeId`, `EdgeId`                              |
//! | [`geo`]   | `GeoPoint`, `BoundingBox`, haversine distance   |
//! | [`error`] | `CoordError`                                    |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::CoordError;
pub use geo::{BoundingBox, GeoPoint, EARTH_RADIUS_M};
pub use ids::{EdgeId, NodeId};
