//! Ring generation parameters.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Replicas generated per node of average weight.
pub const DEFAULT_REPLICAS_PER_NODE: u32 = 40;

/// Points taken from each replica digest.
///
/// An MD5 digest yields four points, but the established ring layout only
/// ever used the first three. Kept at 3 for interoperability.
pub const DEFAULT_POINTS_PER_REPLICA: usize = 3;

const MAX_POINTS_PER_REPLICA: usize = 4;

/// Parameters controlling how many virtual points each node gets.
///
/// The defaults reproduce the reference ring layout. Any other value yields
/// rings whose key placement differs from other clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    /// Replica count for a node whose weight equals the average weight.
    pub replicas_per_node: u32,
    /// Number of digest points inserted per replica (1 to 4).
    pub points_per_replica: usize,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            replicas_per_node: DEFAULT_REPLICAS_PER_NODE,
            points_per_replica: DEFAULT_POINTS_PER_REPLICA,
        }
    }
}

impl RingConfig {
    /// Checks that the parameters can produce a usable ring.
    pub fn validate(&self) -> Result<()> {
        if self.replicas_per_node == 0 {
            return Err(Error::invalid_config("replicas_per_node must be > 0"));
        }
        if !(1..=MAX_POINTS_PER_REPLICA).contains(&self.points_per_replica) {
            return Err(Error::invalid_config(format!(
                "points_per_replica must be within 1..={}, got {}",
                MAX_POINTS_PER_REPLICA, self.points_per_replica
            )));
        }
        Ok(())
    }
}
