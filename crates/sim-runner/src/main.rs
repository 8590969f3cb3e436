//! Simulator entry point.
//!
//! Exit status is 0 on a completed run and non-zero on any validation or
//! simulation failure; argument and configuration errors are reported
//! before any simulation state or output file is created.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sim_engine::Simulation;
use sim_runner::{args::Args, outputs, scenario};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    let params = args.to_params();
    params.validate()?;

    let scenario = scenario::load_scenario(&args.config)?;

    let (mut sinks, context) = outputs::prepare_sinks(&args.config, params.mp_print_data)?;
    outputs::write_run_preamble(&mut sinks, &context, &params, &scenario)
        .context("cannot write run preamble")?;

    let mut simulation = Simulation::new(params, &scenario, sinks)?;
    let report = simulation.run()?;

    info!(
        mined_blocks = report.mined_blocks,
        sim_time = report.sim_time,
        wall_secs = report.wall_duration_secs,
        "run complete"
    );
    Ok(())
}
