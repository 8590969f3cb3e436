//! A lone honest miner with no peers: every block is its own, depths climb
//! monotonically and the data CSV mirrors the mining order exactly.

#[cfg(test)]
mod tests {
    use crate::support::{honest, run_scenario};
    use sim_engine::{Scenario, SimParams};

    fn params() -> SimParams {
        SimParams {
            seed: 1,
            blocks: 10,
            block_size: 2,
            mp_capacity: 100,
            init_tx_count: 50,
            min_tx_gen_count: 10,
            max_tx_gen_count: 20,
            ..SimParams::default()
        }
    }

    fn scenario() -> Scenario {
        Scenario {
            description: None,
            miners: vec![honest(1.0)],
            links: vec![],
        }
    }

    #[test]
    fn test_mines_exactly_the_configured_blocks() {
        let run = run_scenario(params(), &scenario());

        assert_eq!(run.report().mined_blocks, 10);
        assert_eq!(run.sim.miners()[0].depth(), 10);
        assert!((0..10).all(|id| run.sim.miners()[0].has_seen(id)));
    }

    #[test]
    fn test_data_csv_has_two_rows_per_block_in_depth_order() {
        let run = run_scenario(params(), &scenario());
        let rows = run.data_rows();

        assert_eq!(rows.len(), 20);
        for (i, &(_, _, block_id, depth, miner_id)) in rows.iter().enumerate() {
            assert_eq!(depth, i as u32 / 2 + 1);
            assert_eq!(block_id, i as u32 / 2);
            assert_eq!(miner_id, 0);
        }
    }

    #[test]
    fn test_final_mempool_within_capacity() {
        let run = run_scenario(params(), &scenario());
        let sizes = &run.report().final_mempool_sizes;
        assert_eq!(sizes.len(), 1);
        assert!(sizes[0] <= 100);
    }

    #[test]
    fn test_no_block_mined_twice() {
        let run = run_scenario(params(), &scenario());
        let mut block_ids: Vec<u32> = run.data_rows().iter().map(|row| row.2).collect();
        block_ids.dedup();
        assert_eq!(block_ids, (0..10).collect::<Vec<_>>());
    }
}
