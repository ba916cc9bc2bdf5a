//! Graph construction error type.

use thiserror::Error;

use rn_core::CoordError;

/// Errors produced while loading or validating a road network.
///
/// All of these are fatal to startup: a routing service must not accept
/// traffic with a missing or inconsistent graph.
#[derive(Debug, Error)]
pub enum GraphLoadError {
    #[error("graph has no nodes")]
    Empty,

    #[error("edge {edge} references unknown node {node}")]
    UnknownNode { edge: usize, node: String },

    #[error("edge {edge} has negative weight {weight}")]
    NegativeWeight { edge: usize, weight: f64 },

    #[error("edge {edge} has non-finite weight {weight}")]
    NonFiniteWeight { edge: usize, weight: f64 },

    #[error("node {node} has an invalid coordinate: {source}")]
    InvalidCoordinate { node: i64, source: CoordError },

    #[error("sum of all edge weights ({total}) exceeds the supported maximum")]
    WeightOverflow { total: f64 },

    #[error("node id {0} appears more than once")]
    DuplicateNode(i64),

    #[error("graph too large: {0} exceeds the u32 id space")]
    TooLarge(&'static str),

    #[error("graph parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GraphResult<T> = Result<T, GraphLoadError>;
