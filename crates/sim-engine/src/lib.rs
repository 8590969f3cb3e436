//! # Mining Network Simulation Engine
//!
//! Discrete-event simulation of a blockchain mining network under mempool
//! capacity pressure. A configured set of miners — each with an independent
//! bounded mempool — mines blocks at Poisson-like intervals weighted by
//! relative mining power, propagates them over a latency-weighted peer
//! graph, and evicts transactions when the pressure of newly generated
//! traffic exceeds capacity.
//!
//! ## Execution Model
//!
//! Single-threaded and cooperatively scheduled on a virtual-time calendar.
//! The calendar holds tagged [`Event`] values rather than boxed closures,
//! so scheduled work is inspectable and every dispatch resolves miner
//! indexes against the driver's own state. Ordering between events at the
//! same virtual time is stable insertion order.
//!
//! Termination is cooperative: once every miner has processed the final
//! block, the transaction generator stops rescheduling itself and the
//! calendar drains to empty.
//!
//! ## Module Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`calendar`] | Virtual-time event queue |
//! | [`entities`] | `Transaction`, `Block`, `MinerBehavior` |
//! | [`events`] | Tagged calendar event variants |
//! | [`miner`] | Per-miner state: mempool, peers, depth, seen blocks |
//! | [`topology`] | Scenario description and validation, peer-graph wiring |
//! | [`params`] | Run parameters and their validation |
//! | [`output`] | Injected progress/data/mempool/metadata sinks |
//! | [`progress`] | Human-readable interval formatting for ETA lines |
//! | [`simulation`] | The driver: scheduling, generation, dispatch |

pub mod calendar;
pub mod entities;
pub mod error;
pub mod events;
pub mod miner;
pub mod output;
pub mod params;
pub mod progress;
pub mod simulation;
pub mod topology;

pub use calendar::EventCalendar;
pub use entities::{Block, MinerBehavior, Transaction};
pub use error::{Result, SimError};
pub use events::Event;
pub use miner::{Miner, PeerLink};
pub use output::{OutputSinks, SharedBuf};
pub use params::SimParams;
pub use simulation::{SimReport, Simulation};
pub use topology::{LinkSpec, MinerSpec, Scenario, ScenarioError};
