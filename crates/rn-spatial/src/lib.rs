//! `rn-spatial` — snap arbitrary coordinates to the nearest road node.
//!
//! # Crate layout
//!
//! | Module     | Contents                                               |
//! |------------|--------------------------------------------------------|
//! | [`index`]  | `SpatialIndex` (R-tree), local planar projection       |
//! | [`error`]  | `SpatialError`, `SpatialResult<T>`                     |

pub mod error;
pub mod index;

#[cfg(test)]
mod tests;

pub use error::{SpatialError, SpatialResult};
pub use index::SpatialIndex;
