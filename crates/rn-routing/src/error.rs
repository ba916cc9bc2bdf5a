//! Routing error type.

use thiserror::Error;

use rn_core::NodeId;

/// Per-request routing failures.
///
/// `NoPath` is an expected outcome (disconnected components); the other
/// variants are caller mistakes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("path count must be at least 1, got {0}")]
    InvalidK(usize),
}

impl RoutingError {
    /// `true` for errors caused by bad arguments rather than graph topology.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::NodeNotFound(_) | Self::InvalidK(_))
    }
}

pub type RoutingResult<T> = Result<T, RoutingError>;
