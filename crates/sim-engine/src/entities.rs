//! Core simulation entities.

use std::fmt;

/// An unconfirmed transaction: a process-wide monotonic id plus a fee drawn
/// at creation from the generation distribution, truncated to an integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub tx_id: u64,
    pub fee: u32,
}

/// A mined block.
///
/// The id is the globally pre-assigned sequence number (not a content
/// hash); the depth is the mining miner's local chain depth at the moment
/// of mining. The transaction list has exactly block-size elements once
/// mining completes.
#[derive(Clone, Debug)]
pub struct Block {
    pub id: u32,
    pub depth: u32,
    pub transactions: Vec<Transaction>,
}

impl Block {
    pub fn new(id: u32, depth: u32, block_size: usize) -> Self {
        Self {
            id,
            depth,
            transactions: Vec::with_capacity(block_size),
        }
    }
}

/// Mempool policy a miner follows when building blocks and evicting under
/// pressure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MinerBehavior {
    /// Picks block transactions approximately uniformly at random.
    Honest,
    /// Picks the highest-fee transactions first.
    Malicious,
}

impl fmt::Display for MinerBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Honest => write!(f, "Honest"),
            Self::Malicious => write!(f, "Malicious"),
        }
    }
}
