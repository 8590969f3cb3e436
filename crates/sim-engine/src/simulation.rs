//! The simulation driver.
//!
//! Owns the miner collection, the calendar, the shared generator state and
//! the output sinks. All cross-miner interaction happens here: scheduled
//! [`Event`]s carry miner indexes, and dispatch resolves them against the
//! driver's own miner vector, so the cyclic peer graph never holds an
//! owning reference.

use std::rc::Rc;

use chrono::{DateTime, Local};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use rand_distr::Exp1;
use sim_rng::Mt19937;
use tracing::{debug, info};

use crate::calendar::EventCalendar;
use crate::entities::{Block, MinerBehavior, Transaction};
use crate::error::{Result, SimError};
use crate::events::Event;
use crate::miner::Miner;
use crate::output::OutputSinks;
use crate::params::{SimParams, FEE_GENERATION_LAMBDA};
use crate::progress::format_interval;
use crate::topology::Scenario;

/// Timestamp format of progress lines.
const PROGRESS_TIME_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

/// Summary of a completed run.
#[derive(Clone, Debug)]
pub struct SimReport {
    /// Blocks actually mined; equals the configured count on success.
    pub mined_blocks: u32,
    /// Virtual time at which the calendar drained.
    pub sim_time: f64,
    /// Wall-clock duration of the run in whole seconds.
    pub wall_duration_secs: i64,
    /// Mempool size of every miner when the run finished.
    pub final_mempool_sizes: Vec<usize>,
}

/// A fully built simulation, ready to run once.
pub struct Simulation {
    params: SimParams,
    miners: Vec<Miner>,
    calendar: EventCalendar,
    rng: Mt19937,
    sinks: OutputSinks,

    next_tx_id: u64,
    mined_blocks: u32,
    progress_percent: u32,
    finished_miners: u32,
    stop_generation: bool,

    first_honest: Option<usize>,
    first_malicious: Option<usize>,

    wall_start: DateTime<Local>,
    last_tick: DateTime<Local>,
}

impl Simulation {
    /// Validates the parameters and the scenario, then builds the miner
    /// collection with its peer graph.
    pub fn new(params: SimParams, scenario: &Scenario, sinks: OutputSinks) -> Result<Self> {
        params.validate()?;
        scenario.validate()?;

        let miners = scenario.build_miners(params.mp_capacity as usize, params.blocks as usize);
        let rng = Mt19937::from_seed_i64(params.seed);
        let now = Local::now();

        Ok(Self {
            first_honest: scenario.first_with_behavior(MinerBehavior::Honest),
            first_malicious: scenario.first_with_behavior(MinerBehavior::Malicious),
            params,
            miners,
            calendar: EventCalendar::new(),
            rng,
            sinks,
            next_tx_id: 0,
            mined_blocks: 0,
            progress_percent: 0,
            finished_miners: 0,
            stop_generation: false,
            wall_start: now,
            last_tick: now,
        })
    }

    /// Runs the simulation to completion: pre-schedules every block
    /// discovery, preloads the mempools, starts the recurring generator and
    /// drains the calendar.
    pub fn run(&mut self) -> Result<SimReport> {
        info!(
            blocks = self.params.blocks,
            miners = self.miners.len(),
            seed = self.params.seed,
            "starting simulation"
        );

        self.sinks.data_header()?;
        if self.params.mp_print_data {
            self.sinks.mempool_header()?;
        }

        self.wall_start = Local::now();
        self.last_tick = self.wall_start;
        self.sinks.progress_line(&format!(
            "[{}]\t0%",
            self.wall_start.format(PROGRESS_TIME_FORMAT)
        ))?;

        self.schedule_block_discoveries()?;
        self.generate_initial_transactions();
        self.run_generator()?;

        while let Some(event) = self.calendar.pop_next() {
            self.dispatch(event)?;
        }

        let wall_duration_secs = (Local::now() - self.wall_start).num_seconds();
        self.sinks.progress_line(&format!(
            "Simulation finished. Duration: {}",
            format_interval(wall_duration_secs)
        ))?;
        self.sinks.flush_all()?;
        debug!(
            sim_time = self.calendar.sim_time(),
            mined = self.mined_blocks,
            "calendar drained"
        );

        Ok(SimReport {
            mined_blocks: self.mined_blocks,
            sim_time: self.calendar.sim_time(),
            wall_duration_secs,
            final_mempool_sizes: self.miners.iter().map(Miner::mempool_fullness).collect(),
        })
    }

    pub fn miners(&self) -> &[Miner] {
        &self.miners
    }

    pub fn mined_blocks(&self) -> u32 {
        self.mined_blocks
    }

    pub fn sim_time(&self) -> f64 {
        self.calendar.sim_time()
    }

    fn dispatch(&mut self, event: Event) -> Result<()> {
        match event {
            Event::MineBlock { miner, block_id } => self.mine_block(miner, block_id),
            Event::DeliverBlock { to, block } => self.deliver_block(to, block),
            Event::GenerateTransactions => self.run_generator(),
        }
    }

    /// Pre-draws the whole block-discovery schedule: each block id is
    /// assigned an owner from the mining-power discrete distribution and a
    /// cumulative `Exp(1) · lambda` arrival time.
    fn schedule_block_discoveries(&mut self) -> Result<()> {
        let weights: Vec<f64> = self.miners.iter().map(Miner::mining_power).collect();
        let owner_dist = WeightedIndex::new(&weights)?;

        let mut t = 0.0;
        for block_id in 0..self.params.blocks {
            let owner = owner_dist.sample(&mut self.rng);
            let dt: f64 = self.rng.sample::<f64, _>(Exp1) * self.params.lambda as f64;
            t += dt;
            self.calendar.schedule(
                t,
                Event::MineBlock {
                    miner: owner,
                    block_id,
                },
            );
        }
        Ok(())
    }

    /// Initial burst: preloads every miner's mempool with the same
    /// transactions, each under the receiving miner's own key space.
    fn generate_initial_transactions(&mut self) {
        for _ in 0..self.params.init_tx_count {
            let fee = (self.rng.sample::<f64, _>(Exp1) * FEE_GENERATION_LAMBDA) as u32;
            let tx_id = self.next_tx_id;
            self.next_tx_id += 1;
            for miner in self.miners.iter_mut() {
                miner.insert_transaction(tx_id, fee);
            }
        }
    }

    /// One invocation of the recurring generator.
    ///
    /// Draws the batch size and the rescheduling delay, then inserts the
    /// batch into every miner, evicting under pressure first so no mempool
    /// exceeds capacity when this returns. The stop flag is read at the
    /// end, so one invocation may still run after the flag is raised.
    fn run_generator(&mut self) -> Result<()> {
        let txs_now = self
            .rng
            .gen_range(self.params.min_tx_gen_count..=self.params.max_tx_gen_count)
            as usize;
        let wait = self
            .rng
            .gen_range(self.params.min_tx_gen_time..=self.params.max_tx_gen_time)
            as f64;

        let capacity = self.params.mp_capacity as usize;
        let honest_random_remove = self.params.honest_random_remove;

        for _ in 0..txs_now {
            let fee = (self.rng.sample::<f64, _>(Exp1) * FEE_GENERATION_LAMBDA) as u32;
            let tx_id = self.next_tx_id;
            self.next_tx_id += 1;

            for miner in self.miners.iter_mut() {
                if miner.mempool_fullness() + txs_now > capacity {
                    if honest_random_remove && miner.behavior() == MinerBehavior::Honest {
                        miner.evict_randomly(&mut self.rng, txs_now);
                    } else {
                        miner.evict_rationally(txs_now);
                    }
                }
                miner.insert_transaction(tx_id, fee);
            }
        }

        if !self.stop_generation {
            let next = self.calendar.sim_time() + wait;
            self.calendar.schedule(next, Event::GenerateTransactions);
        }
        Ok(())
    }

    /// Block discovery: fill a block from the owner's mempool according to
    /// its behavior, log every included transaction, then broadcast.
    fn mine_block(&mut self, miner_idx: usize, block_id: u32) -> Result<()> {
        let block_size = self.params.block_size as usize;

        {
            let miner = &mut self.miners[miner_idx];
            miner.depth += 1;
            miner.seen_blocks[block_id as usize] = true;
        }

        if self.miners[miner_idx].mempool_fullness() < block_size {
            return self.abort_out_of_transactions(miner_idx);
        }

        let depth = self.miners[miner_idx].depth();
        let mut block = Block::new(block_id, depth, block_size);
        {
            let miner = &mut self.miners[miner_idx];
            let miner_id = miner.id();
            for _ in 0..block_size {
                let handle = match miner.behavior() {
                    MinerBehavior::Honest => miner.mempool.random_pick(&mut self.rng),
                    MinerBehavior::Malicious => miner.mempool.highest_fee_pick(),
                };
                let Some((tx_id, fee)) = miner.mempool.get(handle) else {
                    return Err(SimError::MempoolDesync { miner_id });
                };

                block.transactions.push(Transaction { tx_id, fee });
                self.sinks.data_row(tx_id, fee, block_id, depth, miner_id)?;
                miner.mempool.erase(handle);
            }
        }

        self.mined_blocks += 1;
        if u64::from(self.mined_blocks) * 100 / u64::from(self.params.blocks)
            > u64::from(self.progress_percent)
        {
            self.progress_percent += 1;
            self.log_progress(block_id)?;
            if self.params.mp_print_data {
                self.log_mempool_sizes()?;
            }
        }

        if block_id == self.params.blocks - 1 {
            self.note_final_block_processed();
        }

        self.broadcast(miner_idx, miner_idx, Rc::new(block));
        Ok(())
    }

    /// Schedules delivery of `block` to every peer of `center` except
    /// `from`, at `now + latency ± latency/1000` jitter per edge.
    fn broadcast(&mut self, center: usize, from: usize, block: Rc<Block>) {
        let now = self.calendar.sim_time();
        for i in 0..self.miners[center].peers().len() {
            let link = self.miners[center].peers()[i];
            if link.neighbor == from {
                continue;
            }

            let jitter = if link.latency > 0.0 {
                self.rng
                    .gen_range(-link.latency / 1000.0..link.latency / 1000.0)
            } else {
                0.0
            };

            self.calendar.schedule(
                now + link.latency + jitter,
                Event::DeliverBlock {
                    to: link.neighbor,
                    block: Rc::clone(&block),
                },
            );
        }
    }

    /// Block arrival at a peer: adopt the deeper chain, deduplicate,
    /// reconcile the local mempool and relay onwards.
    fn deliver_block(&mut self, to: usize, block: Rc<Block>) -> Result<()> {
        {
            let miner = &mut self.miners[to];
            if block.depth > miner.depth {
                miner.depth = block.depth;
            }
            if miner.seen_blocks[block.id as usize] {
                return Ok(());
            }
            miner.seen_blocks[block.id as usize] = true;

            // Confirmed transactions leave this miner's mempool; a miss is
            // expected when eviction already dropped them.
            let miner_id = miner.id();
            for tx in &block.transactions {
                let found = miner.mempool.find(miner_id, tx.tx_id);
                miner.mempool.erase(found);
            }
        }

        if block.id == self.params.blocks - 1 {
            self.note_final_block_processed();
        }

        self.broadcast(to, to, block);
        Ok(())
    }

    /// A miner has processed the final block, by mining or receiving it.
    /// Once all of them have, transaction generation winds down.
    fn note_final_block_processed(&mut self) {
        self.finished_miners += 1;
        if self.finished_miners as usize == self.miners.len() {
            self.stop_generation = true;
            debug!("all miners processed the final block, stopping generation");
        }
    }

    fn log_progress(&mut self, block_id: u32) -> Result<()> {
        let now = Local::now();
        let eta_secs =
            (now - self.last_tick).num_seconds() * i64::from(100 - self.progress_percent.min(100));

        let mut line = format!(
            "[{}]\t{}%\tBlock {}\tETA: {}",
            now.format(PROGRESS_TIME_FORMAT),
            self.progress_percent,
            block_id,
            format_interval(eta_secs)
        );

        for (label, index) in [
            ("Honest", self.first_honest),
            ("Malicious", self.first_malicious),
        ] {
            if let Some(index) = index {
                let fullness = self.miners[index].mempool_fullness() as f64
                    / self.params.mp_capacity as f64
                    * 100.0;
                line.push_str(&format!("\t| {label} miner[{index}] - {fullness:.2}%"));
            }
        }

        self.sinks.progress_line(&line)?;
        self.last_tick = now;
        Ok(())
    }

    fn log_mempool_sizes(&mut self) -> Result<()> {
        for i in 0..self.miners.len() {
            let (id, size) = (self.miners[i].id(), self.miners[i].mempool_fullness());
            self.sinks.mempool_row(id, self.progress_percent, size)?;
        }
        Ok(())
    }

    /// Writes the mempool snapshot the operator needs to diagnose an
    /// under-provisioned run, then surfaces the fatal error.
    fn abort_out_of_transactions(&mut self, miner_idx: usize) -> Result<()> {
        let (miner_id, behavior, power) = {
            let miner = &self.miners[miner_idx];
            (miner.id(), miner.behavior(), miner.mining_power())
        };
        tracing::error!(miner_id, %behavior, "out of transactions");

        let mut snapshot = String::new();
        snapshot.push_str("========================================================\n");
        snapshot.push_str("Simulation error, taking snapshot of miners mempools:\n");
        snapshot.push_str("=========================== Start of snapshot ===========================\n");
        snapshot.push_str("MinerID\tMempoolFullness\n");
        for miner in &self.miners {
            snapshot.push_str(&format!("{}\t{}\n", miner.id(), miner.mempool_fullness()));
        }
        snapshot.push_str("============================ End of snapshot ============================\n");
        snapshot.push_str(&format!(
            "Miner[{miner_id}] was chosen to generate a block but has run out of transactions\n"
        ));
        snapshot.push_str(&format!(
            "Miner[{miner_id}] - {behavior} with {}% mining power",
            power * 100.0
        ));
        self.sinks.progress_line(&snapshot)?;
        self.sinks.flush_all()?;

        Err(SimError::OutOfTransactions {
            miner_id,
            behavior,
            power_percent: power * 100.0,
        })
    }
}
