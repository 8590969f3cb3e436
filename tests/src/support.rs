//! Shared fixtures for scenario tests.

use sim_engine::{
    MinerBehavior, MinerSpec, OutputSinks, Scenario, SharedBuf, SimParams, SimReport, Simulation,
};

pub fn honest(power: f64) -> MinerSpec {
    MinerSpec {
        power,
        behavior: MinerBehavior::Honest,
    }
}

pub fn malicious(power: f64) -> MinerSpec {
    MinerSpec {
        power,
        behavior: MinerBehavior::Malicious,
    }
}

/// A finished (or failed) run with every output channel captured.
pub struct CapturedRun {
    pub sim: Simulation,
    pub result: sim_engine::Result<SimReport>,
    pub progress: SharedBuf,
    pub data: SharedBuf,
    pub metadata: SharedBuf,
    pub mempool: SharedBuf,
}

impl CapturedRun {
    /// The report of a run that was expected to succeed.
    pub fn report(&self) -> &SimReport {
        self.result
            .as_ref()
            .expect("simulation was expected to succeed")
    }

    /// Parsed data-CSV rows: `(tx_id, fee, block_id, depth, miner_id)`.
    pub fn data_rows(&self) -> Vec<(u64, u32, u32, u32, u32)> {
        self.data
            .contents()
            .lines()
            .skip(1)
            .map(|line| {
                let cols: Vec<&str> = line.split(',').collect();
                (
                    cols[0].parse().unwrap(),
                    cols[1].parse().unwrap(),
                    cols[2].parse().unwrap(),
                    cols[3].parse().unwrap(),
                    cols[4].parse().unwrap(),
                )
            })
            .collect()
    }
}

/// Builds and runs a simulation with in-memory sinks.
pub fn run_scenario(params: SimParams, scenario: &Scenario) -> CapturedRun {
    let progress = SharedBuf::new();
    let data = SharedBuf::new();
    let metadata = SharedBuf::new();
    let mempool = SharedBuf::new();

    let sinks = OutputSinks::new(
        Box::new(progress.clone()),
        Box::new(data.clone()),
        Box::new(metadata.clone()),
        params
            .mp_print_data
            .then(|| Box::new(mempool.clone()) as Box<dyn std::io::Write>),
    );

    let mut sim = Simulation::new(params, scenario, sinks).expect("scenario must build");
    let result = sim.run();

    CapturedRun {
        sim,
        result,
        progress,
        data,
        metadata,
        mempool,
    }
}
