//! Spatial-index error type.

use thiserror::Error;

use rn_core::{CoordError, NodeId};

/// Errors produced by `rn-spatial`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpatialError {
    #[error("spatial index has no nodes")]
    Empty,

    #[error("invalid query coordinate: {0}")]
    InvalidCoordinate(#[from] CoordError),

    #[error("node {node} has an invalid coordinate: {source}")]
    InvalidNode { node: NodeId, source: CoordError },
}

pub type SpatialResult<T> = Result<T, SpatialError>;
