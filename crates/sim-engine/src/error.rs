//! Engine error types.

use thiserror::Error;

use crate::entities::MinerBehavior;
use crate::topology::ScenarioError;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors that abort a simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    /// A run parameter failed validation.
    #[error("{0}")]
    InvalidParameter(String),

    /// The scenario (miners and links) failed validation.
    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    /// The mining-power weights could not form a discrete distribution.
    #[error("invalid mining power distribution: {0}")]
    PowerDistribution(#[from] rand::distributions::WeightedError),

    /// A miner was scheduled to mine but cannot fill a block.
    ///
    /// The driver writes a snapshot of every miner's mempool size to the
    /// progress sink before surfacing this.
    #[error("miner {miner_id} ({behavior}, {power_percent:.0}% mining power) ran out of transactions")]
    OutOfTransactions {
        miner_id: u32,
        behavior: MinerBehavior,
        power_percent: f64,
    },

    /// A picked mempool handle did not resolve to an entry.
    #[error("mempool views desynchronised for miner {miner_id}")]
    MempoolDesync { miner_id: u32 },

    /// An output sink failed.
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}
