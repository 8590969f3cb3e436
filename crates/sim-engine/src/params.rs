//! Run parameters.

use crate::error::SimError;

/// Scale applied to the unit exponential draw that prices a generated
/// transaction; the truncated product becomes the integer fee.
pub const FEE_GENERATION_LAMBDA: f64 = 150.0;

/// Everything a run needs besides the scenario itself.
///
/// Field defaults mirror the command-line defaults of the runner.
#[derive(Clone, Debug)]
pub struct SimParams {
    /// Seed for the shared random generator.
    pub seed: i64,
    /// Mempool capacity of every miner.
    pub mp_capacity: u32,
    /// Bounds for the per-invocation generated transaction count.
    pub max_tx_gen_count: u32,
    pub min_tx_gen_count: u32,
    /// Bounds (simulated seconds) for the generator's rescheduling delay.
    pub max_tx_gen_time: u32,
    pub min_tx_gen_time: u32,
    /// Number of transactions in every mined block.
    pub block_size: u32,
    /// Total number of blocks to simulate.
    pub blocks: u32,
    /// Mean block inter-arrival time in simulated seconds.
    pub lambda: u32,
    /// Transactions preloaded into every mempool before the calendar runs.
    pub init_tx_count: u32,
    /// Honest miners relieve mempool pressure by random eviction instead of
    /// lowest-fee eviction.
    pub honest_random_remove: bool,
    /// Emit per-miner mempool-size rows at every progress tick.
    pub mp_print_data: bool,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            seed: 0,
            mp_capacity: 5000,
            max_tx_gen_count: 150,
            min_tx_gen_count: 100,
            max_tx_gen_time: 20,
            min_tx_gen_time: 10,
            block_size: 100,
            blocks: 1000,
            lambda: 20,
            init_tx_count: 1000,
            honest_random_remove: false,
            mp_print_data: false,
        }
    }
}

impl SimParams {
    /// Rejects zero counts and inverted ranges. Runs before any simulation
    /// state is created.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.blocks == 0 {
            return Err(invalid("number of simulated blocks must be greater than 0"));
        }
        if self.block_size == 0 {
            return Err(invalid("block size must be greater than 0"));
        }
        if self.mp_capacity == 0 {
            return Err(invalid("mempool capacity must be greater than 0"));
        }
        if self.lambda == 0 {
            return Err(invalid("lambda must be greater than 0"));
        }
        if self.min_tx_gen_count > self.max_tx_gen_count {
            return Err(invalid(
                "transaction generation count: min must be less or equal than max",
            ));
        }
        if self.min_tx_gen_time > self.max_tx_gen_time {
            return Err(invalid(
                "transaction generation time: min must be less or equal than max",
            ));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> SimError {
    SimError::InvalidParameter(msg.to_string())
}
