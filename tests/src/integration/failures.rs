//! Fatal conditions: load-time validation and the out-of-transactions
//! abort.

#[cfg(test)]
mod tests {
    use crate::support::{honest, run_scenario};
    use sim_engine::{Scenario, ScenarioError, SimError, SimParams};
    use sim_runner::scenario::{load_scenario, ConfigError};

    #[test]
    fn test_power_sum_violation_fails_at_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("under_powered.cfg");
        std::fs::write(&path, "miner 0.5 honest\nminer 0.49 malicious\n").unwrap();

        let err = load_scenario(&path).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid(ScenarioError::PowerSum { .. })
        ));
    }

    #[test]
    fn test_config_file_round_trips_into_a_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pair.cfg");
        std::fs::write(
            &path,
            "description Two equal honest miners\n\
             miner 0.5 honest\n\
             miner 0.5 honest\n\
             biconnect 0 1 5\n",
        )
        .unwrap();

        let scenario = load_scenario(&path).unwrap();
        let params = SimParams {
            seed: 7,
            blocks: 4,
            block_size: 1,
            ..SimParams::default()
        };
        let run = run_scenario(params, &scenario);
        assert_eq!(run.report().mined_blocks, 4);
    }

    #[test]
    fn test_out_of_transactions_aborts_with_snapshot() {
        let params = SimParams {
            seed: 1,
            blocks: 1,
            block_size: 10,
            init_tx_count: 5,
            min_tx_gen_count: 0,
            max_tx_gen_count: 0,
            ..SimParams::default()
        };
        let scenario = Scenario {
            description: None,
            miners: vec![honest(1.0)],
            links: vec![],
        };
        let run = run_scenario(params, &scenario);

        assert!(matches!(
            run.result,
            Err(SimError::OutOfTransactions { miner_id: 0, .. })
        ));

        // The progress log carries the diagnostic snapshot.
        let progress = run.progress.contents();
        assert!(progress.contains("snapshot of miners mempools"));
        assert!(progress.contains("MinerID\tMempoolFullness"));
        assert!(progress.contains("0\t5"));
        assert!(progress.contains("Miner[0] - Honest"));
    }

    #[test]
    fn test_invalid_parameters_rejected_before_running() {
        let params = SimParams {
            blocks: 0,
            ..SimParams::default()
        };
        assert!(params.validate().is_err());
    }
}
