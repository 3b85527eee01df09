//! End-to-end integration tests

use lookahead_bt::backtest::{Backtester, Side};
use lookahead_bt::config::Config;
use lookahead_bt::data::PriceSeries;
use lookahead_bt::strategy::{Aggregation, Decision, LookaheadStrategy, Strategy};

/// Deterministic wobbly quotes with a fixed spread
fn noisy_series(n: usize, seed: u64, spread: f64) -> PriceSeries {
    let mut state = seed;
    let mut price = 100.0;
    let mut bid = Vec::with_capacity(n);
    for _ in 0..n {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let step = ((state >> 33) % 200) as f64 / 100.0 - 1.0;
        price = f64::max(price + step, 1.0);
        bid.push(price);
    }
    let ask = bid.iter().map(|b| b + spread).collect();
    PriceSeries::new(bid, ask).unwrap()
}

#[test]
fn test_config_example_exists() {
    let config: Config = toml::from_str(include_str!("../../config.toml.example")).unwrap();
    assert_eq!(config.strategy, LookaheadStrategy::FixedOffset { offset: 5 });
    assert_eq!(config.backtest.initial_cash, 1.0);
}

#[test]
fn test_one_step_scenario() {
    let series =
        PriceSeries::new(vec![10.0, 11.0, 9.0, 12.0], vec![10.0, 11.0, 9.0, 12.0]).unwrap();
    let run = Backtester::new(100.0).run(&series, &LookaheadStrategy::OneStep);

    let sides: Vec<(usize, Side)> = run.trades.iter().map(|t| (t.index, t.side)).collect();
    assert_eq!(sides, vec![(0, Side::Buy), (1, Side::Sell), (2, Side::Buy)]);
    assert_eq!(run.decisions[3], Decision::Hold);
    assert_eq!(run.final_cash(), 92.0);
    assert_eq!(run.final_shares(), 1);
    assert_eq!(run.final_equity(), 104.0);
}

#[test]
fn test_equity_curve_length_matches_series() {
    for n in [1, 2, 50, 333] {
        let series = noisy_series(n, n as u64, 0.1);
        let run = Backtester::new(1_000.0).run(&series, &LookaheadStrategy::OneStep);
        assert_eq!(run.equity.len(), n);
    }
}

#[test]
fn test_positions_never_negative_and_consistent() {
    let strategies = [
        LookaheadStrategy::OneStep,
        LookaheadStrategy::FixedOffset { offset: 7 },
        LookaheadStrategy::WindowedAggregate {
            window: 4,
            aggregation: Aggregation::Min,
        },
    ];

    for seed in 1..6 {
        let series = noisy_series(400, seed, 0.25);
        for strategy in &strategies {
            let run = Backtester::new(300.0).run(&series, strategy);

            let mut shares: i64 = 0;
            for (i, decision) in run.decisions.iter().enumerate() {
                if run.trades.iter().any(|t| t.index == i) {
                    shares += match decision {
                        Decision::Buy => 1,
                        Decision::Sell => -1,
                        Decision::Hold => 0,
                    };
                }
                assert!(shares >= 0);
                assert_eq!(shares as u64, run.positions[i]);
                let expected = run.cash[i] + run.positions[i] as f64 * series.bid()[i];
                assert_eq!(run.equity[i], expected);
            }
        }
    }
}

#[test]
fn test_windowed_single_mean_matches_offset_one() {
    let series = noisy_series(250, 42, 0.05);
    let windowed = LookaheadStrategy::WindowedAggregate {
        window: 1,
        aggregation: Aggregation::Mean,
    };
    let fixed = LookaheadStrategy::FixedOffset { offset: 1 };
    let backtester = Backtester::new(500.0);

    assert_eq!(
        backtester.run(&series, &windowed),
        backtester.run(&series, &fixed)
    );
}

#[test]
fn test_last_index_clamps_to_self() {
    let series = noisy_series(20, 9, 0.1);
    let (bid, ask) = (series.bid(), series.ask());
    let last = series.len() - 1;

    for strategy in [
        LookaheadStrategy::OneStep,
        LookaheadStrategy::FixedOffset { offset: 1 },
        LookaheadStrategy::FixedOffset { offset: 5 },
    ] {
        assert_eq!(strategy.future_lookup(last, bid, ask), (bid[last], ask[last]));
    }
}

#[test]
fn test_precomputed_matches_sequential() {
    let series = noisy_series(1_000, 3, 0.2);
    let strategy = LookaheadStrategy::WindowedAggregate {
        window: 8,
        aggregation: Aggregation::Median,
    };
    let backtester = Backtester::new(2_000.0);

    assert_eq!(
        backtester.run(&series, &strategy),
        backtester.run_precomputed(&series, &strategy)
    );
}

#[test]
fn test_dyn_strategy() {
    let series = noisy_series(30, 5, 0.1);
    let strategy: Box<dyn Strategy> = Box::new(LookaheadStrategy::OneStep);
    let run = Backtester::new(100.0).run(&series, strategy.as_ref());
    assert_eq!(run.len(), 30);
}
