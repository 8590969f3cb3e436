//! Sustained eviction pressure: every generator tick forces evictions, yet
//! no mempool ever exceeds its capacity.

#[cfg(test)]
mod tests {
    use crate::support::{honest, malicious, run_scenario};
    use sim_engine::{LinkSpec, Scenario, SimParams};

    fn pressured_params(honest_random_remove: bool) -> SimParams {
        SimParams {
            seed: 9,
            blocks: 2,
            block_size: 1,
            mp_capacity: 50,
            init_tx_count: 50,
            min_tx_gen_count: 25,
            max_tx_gen_count: 25,
            min_tx_gen_time: 1,
            max_tx_gen_time: 1,
            honest_random_remove,
            mp_print_data: true,
            ..SimParams::default()
        }
    }

    fn mixed_scenario() -> Scenario {
        Scenario {
            description: None,
            miners: vec![honest(0.5), malicious(0.5)],
            links: vec![LinkSpec {
                a: 0,
                b: 1,
                latency: 1.0,
            }],
        }
    }

    #[test]
    fn test_capacity_invariant_holds_under_pressure() {
        let run = run_scenario(pressured_params(false), &mixed_scenario());

        assert_eq!(run.report().mined_blocks, 2);
        assert!(run.report().final_mempool_sizes.iter().all(|&s| s <= 50));

        // The per-tick mempool rows never report an over-capacity pool
        // either.
        for line in run.mempool.contents().lines().skip(1) {
            let size: usize = line.split(',').nth(2).unwrap().parse().unwrap();
            assert!(size <= 50, "over-capacity row: {line}");
        }
    }

    #[test]
    fn test_honest_random_remove_only_changes_honest_pools() {
        // The switch changes which transactions the honest miner throws
        // away; under identical seeds the runs must diverge.
        let rational = run_scenario(pressured_params(false), &mixed_scenario());
        let random = run_scenario(pressured_params(true), &mixed_scenario());

        assert_eq!(rational.report().mined_blocks, 2);
        assert_eq!(random.report().mined_blocks, 2);
        assert_ne!(rational.data.contents(), random.data.contents());
    }

    #[test]
    fn test_eviction_policies_leave_different_pools() {
        // Both miners receive identical inserts; with the switch on, the
        // honest miner evicts randomly while the malicious one keeps
        // evicting rationally, so the surviving fee sets diverge.
        let run = run_scenario(pressured_params(true), &mixed_scenario());

        let mut honest_fees = run.sim.miners()[0].mempool_fees();
        let mut malicious_fees = run.sim.miners()[1].mempool_fees();
        honest_fees.sort_unstable();
        malicious_fees.sort_unstable();

        assert!(!honest_fees.is_empty());
        assert!(!malicious_fees.is_empty());
        assert_ne!(honest_fees, malicious_fees);
    }
}
