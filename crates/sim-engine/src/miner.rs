//! Per-miner state.

use rand::Rng;
use sim_mempool::Mempool;

use crate::entities::MinerBehavior;

/// Outbound edge to another miner.
///
/// Stores the neighbour's index into the driver's miner collection plus the
/// propagation latency of the edge; edges are created in symmetric pairs by
/// the topology builder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeerLink {
    pub neighbor: usize,
    pub latency: f64,
}

/// A mining node: mempool, peer list, local chain depth and per-block
/// dedup flags.
///
/// Operations that touch only this miner's state live here. Mining,
/// broadcasting and receiving are driver operations, because they reach
/// into the calendar, the shared generator and other miners.
pub struct Miner {
    id: u32,
    mining_power: f64,
    behavior: MinerBehavior,
    peers: Vec<PeerLink>,
    pub(crate) mempool: Mempool,
    pub(crate) depth: u32,
    pub(crate) seen_blocks: Vec<bool>,
}

impl Miner {
    /// `block_count` sizes the seen-blocks vector: one dedup flag per
    /// pre-assigned block id.
    pub fn new(
        id: u32,
        mining_power: f64,
        behavior: MinerBehavior,
        mempool_capacity: usize,
        block_count: usize,
    ) -> Self {
        Self {
            id,
            mining_power,
            behavior,
            peers: Vec::new(),
            mempool: Mempool::new(mempool_capacity),
            depth: 0,
            seen_blocks: vec![false; block_count],
        }
    }

    /// Appends an outbound edge. The caller creates the reciprocal edge.
    pub fn add_peer(&mut self, neighbor: usize, latency: f64) {
        self.peers.push(PeerLink { neighbor, latency });
    }

    /// Inserts into the mempool under this miner's own key space. Capacity
    /// is the caller's concern: the generator evicts before inserting.
    pub fn insert_transaction(&mut self, tx_id: u64, fee: u32) {
        self.mempool.insert(self.id, tx_id, fee);
    }

    /// Rational pressure relief: drop the `n` lowest-fee transactions.
    pub fn evict_rationally(&mut self, n: usize) {
        self.mempool.evict_lowest(n);
    }

    /// Indifferent pressure relief: drop `n` randomly picked transactions.
    pub fn evict_randomly<R: Rng + ?Sized>(&mut self, rng: &mut R, n: usize) {
        self.mempool.evict_random(rng, n);
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn mining_power(&self) -> f64 {
        self.mining_power
    }

    pub fn behavior(&self) -> MinerBehavior {
        self.behavior
    }

    pub fn peers(&self) -> &[PeerLink] {
        &self.peers
    }

    /// Current local chain depth.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Whether this miner has already processed the given block id.
    pub fn has_seen(&self, block_id: u32) -> bool {
        self.seen_blocks[block_id as usize]
    }

    /// Number of transactions currently in this miner's mempool.
    pub fn mempool_fullness(&self) -> usize {
        self.mempool.len()
    }

    /// Fees currently in the mempool, in unspecified order.
    pub fn mempool_fees(&self) -> Vec<u32> {
        self.mempool.iter().map(|(_, fee)| fee).collect()
    }
}
