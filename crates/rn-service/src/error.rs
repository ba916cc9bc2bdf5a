//! Service-level error type.
//!
//! Every lower-level error converts into [`RouteError`] without losing its
//! kind, so the boundary can tell "no route exists" apart from "bad request"
//! and from startup failures.

use thiserror::Error;

use rn_core::{CoordError, NodeId};
use rn_graph::GraphLoadError;
use rn_routing::RoutingError;
use rn_spatial::SpatialError;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("graph load error: {0}")]
    Graph(#[from] GraphLoadError),

    #[error("no nodes available for spatial lookup")]
    EmptyIndex,

    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl RouteError {
    /// Stable, machine-readable name for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Graph(_) => "graph_load",
            Self::EmptyIndex => "empty_index",
            Self::NoPath { .. } => "no_path",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::Config(_) => "config",
        }
    }

    /// `true` for failures the caller caused and can fix by changing the
    /// request.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

impl From<SpatialError> for RouteError {
    fn from(err: SpatialError) -> Self {
        match err {
            SpatialError::Empty => Self::EmptyIndex,
            other => Self::InvalidArgument(other.to_string()),
        }
    }
}

impl From<RoutingError> for RouteError {
    fn from(err: RoutingError) -> Self {
        match err {
            RoutingError::NoPath { from, to } => Self::NoPath { from, to },
            other => Self::InvalidArgument(other.to_string()),
        }
    }
}

impl From<CoordError> for RouteError {
    fn from(err: CoordError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

pub type RouteResult<T> = Result<T, RouteError>;
