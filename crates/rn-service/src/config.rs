//! Service configuration.
//!
//! Every field has a default, so an empty JSON object `{}` is a valid config.
//!
//! ```json
//! {
//!   "default_k": 3,
//!   "max_k": 10,
//!   "bounds": { "south": 12.6933, "west": 77.0849, "north": 13.2827, "east": 78.1602 },
//!   "max_snap_distance_m": 500.0
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use rn_core::BoundingBox;

use crate::{RouteError, RouteResult};

/// Tunables for [`RouteService`](crate::RouteService).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    /// Number of paths returned when a request does not name one.
    pub default_k: usize,

    /// Largest path count a single request may ask for.  Each extra path
    /// costs up to one spur search per node of the previous path.
    pub max_k: usize,

    /// Service area.  Origins and destinations outside it are rejected
    /// before snapping.
    pub bounds: Option<BoundingBox>,

    /// Reject points farther than this from every road node (metres).
    pub max_snap_distance_m: Option<f64>,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            default_k: 3,
            max_k: 10,
            bounds: None,
            max_snap_distance_m: None,
        }
    }
}

impl RouteConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(s: &str) -> RouteResult<Self> {
        let config: Self =
            serde_json::from_str(s).map_err(|e| RouteError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_json_file(path: &Path) -> RouteResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| RouteError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Check cross-field consistency.
    pub fn validate(&self) -> RouteResult<()> {
        if self.default_k == 0 {
            return Err(RouteError::Config("default_k must be at least 1".into()));
        }
        if self.max_k < self.default_k {
            return Err(RouteError::Config(format!(
                "max_k ({}) must not be below default_k ({})",
                self.max_k, self.default_k
            )));
        }
        if let Some(d) = self.max_snap_distance_m {
            if !(d.is_finite() && d > 0.0) {
                return Err(RouteError::Config(format!(
                    "max_snap_distance_m must be positive, got {d}"
                )));
            }
        }
        if let Some(b) = &self.bounds {
            if !(b.south <= b.north && b.west <= b.east) {
                return Err(RouteError::Config(format!("bounds are inverted: {b:?}")));
            }
        }
        Ok(())
    }
}
