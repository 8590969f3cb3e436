//! Honest vs malicious selection policies in a mixed network.

#[cfg(test)]
mod tests {
    use crate::support::{honest, malicious, run_scenario, CapturedRun};
    use sim_engine::{LinkSpec, Scenario, SimParams};

    fn mixed_run() -> CapturedRun {
        let params = SimParams {
            seed: 42,
            blocks: 100,
            block_size: 10,
            // Keep the pools comfortably fed and unpressured so the honest
            // sample stays unbiased.
            mp_capacity: 50_000,
            init_tx_count: 2000,
            min_tx_gen_count: 50,
            max_tx_gen_count: 100,
            ..SimParams::default()
        };
        let scenario = Scenario {
            description: None,
            miners: vec![honest(0.6), malicious(0.4)],
            links: vec![LinkSpec {
                a: 0,
                b: 1,
                latency: 2.0,
            }],
        };
        run_scenario(params, &scenario)
    }

    fn mean(fees: &[u32]) -> f64 {
        fees.iter().map(|&fee| fee as f64).sum::<f64>() / fees.len() as f64
    }

    #[test]
    fn test_all_blocks_mined_and_logged() {
        let run = mixed_run();
        assert_eq!(run.report().mined_blocks, 100);
        assert_eq!(run.data_rows().len(), 1000);
    }

    #[test]
    fn test_malicious_fees_dominate_honest_fees() {
        let run = mixed_run();
        let rows = run.data_rows();

        let honest_fees: Vec<u32> = rows.iter().filter(|r| r.4 == 0).map(|r| r.1).collect();
        let malicious_fees: Vec<u32> = rows.iter().filter(|r| r.4 == 1).map(|r| r.1).collect();
        assert!(!honest_fees.is_empty());
        assert!(!malicious_fees.is_empty());

        // Greedy highest-fee selection skims far above the random sample.
        assert!(
            mean(&malicious_fees) > mean(&honest_fees) + 100.0,
            "malicious mean {:.1} vs honest mean {:.1}",
            mean(&malicious_fees),
            mean(&honest_fees)
        );
    }

    #[test]
    fn test_honest_sample_tracks_the_generation_mean() {
        let run = mixed_run();
        let honest_fees: Vec<u32> = run
            .data_rows()
            .iter()
            .filter(|r| r.4 == 0)
            .map(|r| r.1)
            .collect();

        // Fees are drawn from Exp(1) * 150 truncated; an unbiased random
        // pick should land near that mean.
        let sample_mean = mean(&honest_fees);
        assert!(
            (110.0..190.0).contains(&sample_mean),
            "honest mean fee {sample_mean:.1} strays from the generation mean"
        );
    }

    #[test]
    fn test_malicious_blocks_skim_in_descending_order() {
        let run = mixed_run();
        let rows = run.data_rows();

        // Within a single malicious block, greedy selection emits rows in
        // non-increasing fee order.
        for block in rows.chunks(10).filter(|chunk| chunk[0].4 == 1) {
            let fees: Vec<u32> = block.iter().map(|r| r.1).collect();
            assert!(
                fees.windows(2).all(|pair| pair[0] >= pair[1]),
                "block {} not skimmed greedily: {fees:?}",
                block[0].2
            );
        }
    }
}
