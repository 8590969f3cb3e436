//! Command-line arguments.
//!
//! Long options keep their historical snake_case spellings
//! (`--mp_capacity`), with kebab-case accepted as aliases. Range and
//! positivity validation lives in [`SimParams::validate`], which the
//! binary runs before any output file is created.

use std::path::PathBuf;

use clap::Parser;
use sim_engine::SimParams;

/// Discrete-event simulator of a blockchain mining network comparing
/// mempool-management policies under capacity pressure.
#[derive(Parser, Debug)]
#[command(name = "mempool-sim", version, about)]
pub struct Args {
    /// Input configuration file
    #[arg(long)]
    pub config: PathBuf,

    /// Seed for the random number generator
    #[arg(long, default_value_t = 0)]
    pub seed: i64,

    /// Number of blocks to simulate
    #[arg(long, default_value_t = 1000)]
    pub blocks: u32,

    /// Number of transactions in a block
    #[arg(long = "block_size", alias = "block-size", default_value_t = 100)]
    pub block_size: u32,

    /// Mempool capacity for each miner
    #[arg(long = "mp_capacity", alias = "mp-capacity", default_value_t = 5000)]
    pub mp_capacity: u32,

    /// Initial transaction count to generate on start
    #[arg(long = "init_tx_count", alias = "init-tx-count", default_value_t = 1000)]
    pub init_tx_count: u32,

    /// Max number of transactions in a single generation
    #[arg(
        long = "max_tx_gen_count",
        alias = "max-tx-gen-count",
        default_value_t = 150
    )]
    pub max_tx_gen_count: u32,

    /// Min number of transactions in a single generation
    #[arg(
        long = "min_tx_gen_count",
        alias = "min-tx-gen-count",
        default_value_t = 100
    )]
    pub min_tx_gen_count: u32,

    /// Max seconds of simulated time until the next generation
    #[arg(
        long = "max_tx_gen_time",
        alias = "max-tx-gen-time",
        default_value_t = 20
    )]
    pub max_tx_gen_time: u32,

    /// Min seconds of simulated time until the next generation
    #[arg(
        long = "min_tx_gen_time",
        alias = "min-tx-gen-time",
        default_value_t = 10
    )]
    pub min_tx_gen_time: u32,

    /// Block creation rate in seconds
    #[arg(long, default_value_t = 20)]
    pub lambda: u32,

    /// Honest miners remove transactions randomly on full mempool
    #[arg(long = "honest_random_remove", alias = "honest-random-remove")]
    pub honest_random_remove: bool,

    /// Output mempool stats of all miners during simulation
    #[arg(long = "mp_print_data", alias = "mp-print-data")]
    pub mp_print_data: bool,
}

impl Args {
    pub fn to_params(&self) -> SimParams {
        SimParams {
            seed: self.seed,
            mp_capacity: self.mp_capacity,
            max_tx_gen_count: self.max_tx_gen_count,
            min_tx_gen_count: self.min_tx_gen_count,
            max_tx_gen_time: self.max_tx_gen_time,
            min_tx_gen_time: self.min_tx_gen_time,
            block_size: self.block_size,
            blocks: self.blocks,
            lambda: self.lambda,
            init_tx_count: self.init_tx_count,
            honest_random_remove: self.honest_random_remove,
            mp_print_data: self.mp_print_data,
        }
    }
}
