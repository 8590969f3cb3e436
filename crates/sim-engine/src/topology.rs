//! Scenario description: the miner set and the latency-weighted peer graph.
//!
//! A scenario is built once at startup (parsed from the configuration file
//! by the runner), validated, and then turned into the driver's miner
//! collection. Peer edges are index-based: each [`PeerLink`] names the
//! neighbour's position in that collection, which keeps the cyclic graph
//! free of owning references.

use thiserror::Error;

use crate::entities::MinerBehavior;
use crate::miner::Miner;

/// Maximum deviation of the miners' total mining power from 1.0.
pub const POWER_SUM_TOLERANCE: f64 = 1e-6;

/// One `miner` directive: relative mining power plus behavior.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinerSpec {
    pub power: f64,
    pub behavior: MinerBehavior,
}

/// One `biconnect` directive: a symmetric edge between two miners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkSpec {
    pub a: usize,
    pub b: usize,
    pub latency: f64,
}

/// Scenario validation failures; all are fatal at load time.
#[derive(Debug, Error, PartialEq)]
pub enum ScenarioError {
    #[error("configuration defines no miners")]
    NoMiners,

    #[error("mining power {power} of miner {index} is outside [0, 1]")]
    PowerOutOfRange { index: usize, power: f64 },

    #[error("total mining power is {total}, must be within {POWER_SUM_TOLERANCE} of 1.0")]
    PowerSum { total: f64 },

    #[error("biconnect index {index} out of range for {miners} miners")]
    LinkIndexOutOfRange { index: usize, miners: usize },

    #[error("biconnect cannot link miner {index} to itself")]
    SelfLink { index: usize },

    #[error("negative latency {latency} on link {a} <-> {b}")]
    NegativeLatency { a: usize, b: usize, latency: f64 },
}

/// The validated shape of one simulation: miners and their links.
#[derive(Clone, Debug, Default)]
pub struct Scenario {
    pub description: Option<String>,
    pub miners: Vec<MinerSpec>,
    pub links: Vec<LinkSpec>,
}

impl Scenario {
    /// Checks every load-time constraint: a non-empty miner set whose
    /// powers are sane and sum to 1.0 within tolerance, and links that name
    /// two distinct in-range miners with non-negative latency.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.miners.is_empty() {
            return Err(ScenarioError::NoMiners);
        }

        for (index, spec) in self.miners.iter().enumerate() {
            if !(0.0..=1.0).contains(&spec.power) {
                return Err(ScenarioError::PowerOutOfRange {
                    index,
                    power: spec.power,
                });
            }
        }

        let total: f64 = self.miners.iter().map(|spec| spec.power).sum();
        if (total - 1.0).abs() > POWER_SUM_TOLERANCE {
            return Err(ScenarioError::PowerSum { total });
        }

        for link in &self.links {
            for index in [link.a, link.b] {
                if index >= self.miners.len() {
                    return Err(ScenarioError::LinkIndexOutOfRange {
                        index,
                        miners: self.miners.len(),
                    });
                }
            }
            if link.a == link.b {
                return Err(ScenarioError::SelfLink { index: link.a });
            }
            if link.latency < 0.0 {
                return Err(ScenarioError::NegativeLatency {
                    a: link.a,
                    b: link.b,
                    latency: link.latency,
                });
            }
        }

        Ok(())
    }

    /// Builds the driver's miner collection and wires both directions of
    /// every link. Miner ids are positional.
    pub(crate) fn build_miners(&self, mempool_capacity: usize, block_count: usize) -> Vec<Miner> {
        let mut miners: Vec<Miner> = self
            .miners
            .iter()
            .enumerate()
            .map(|(index, spec)| {
                Miner::new(
                    index as u32,
                    spec.power,
                    spec.behavior,
                    mempool_capacity,
                    block_count,
                )
            })
            .collect();

        for link in &self.links {
            miners[link.a].add_peer(link.b, link.latency);
            miners[link.b].add_peer(link.a, link.latency);
        }

        miners
    }

    pub fn honest_count(&self) -> usize {
        self.count_behavior(MinerBehavior::Honest)
    }

    pub fn malicious_count(&self) -> usize {
        self.count_behavior(MinerBehavior::Malicious)
    }

    pub fn honest_power(&self) -> f64 {
        self.power_of(MinerBehavior::Honest)
    }

    pub fn malicious_power(&self) -> f64 {
        self.power_of(MinerBehavior::Malicious)
    }

    /// Index of the first miner with the given behavior; progress lines
    /// report the mempool fullness of these representatives.
    pub fn first_with_behavior(&self, behavior: MinerBehavior) -> Option<usize> {
        self.miners.iter().position(|spec| spec.behavior == behavior)
    }

    fn count_behavior(&self, behavior: MinerBehavior) -> usize {
        self.miners
            .iter()
            .filter(|spec| spec.behavior == behavior)
            .count()
    }

    fn power_of(&self, behavior: MinerBehavior) -> f64 {
        self.miners
            .iter()
            .filter(|spec| spec.behavior == behavior)
            .map(|spec| spec.power)
            .sum()
    }
}
