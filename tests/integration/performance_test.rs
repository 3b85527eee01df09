//! Integration tests for performance statistics

use chrono::{DateTime, Duration, TimeZone, Utc};
use lookahead_bt::backtest::{BacktestRun, Backtester, Side};
use lookahead_bt::data::PriceSeries;
use lookahead_bt::performance::{
    Annualization, Frequency, PerformanceCalculator, PerformanceConfig, SECONDS_PER_YEAR,
};
use lookahead_bt::strategy::{Aggregation, LookaheadStrategy};

fn sawtooth(n: usize) -> PriceSeries {
    let bid: Vec<f64> = (0..n)
        .map(|i| 50.0 + ((i * 7) % 11) as f64 - ((i * 3) % 5) as f64)
        .collect();
    let ask = bid.iter().map(|b| b + 0.5).collect();
    PriceSeries::new(bid, ask).unwrap()
}

fn run(strategy: &LookaheadStrategy) -> BacktestRun {
    Backtester::new(200.0).run(&sawtooth(300), strategy)
}

fn calculator(annualization: Annualization) -> PerformanceCalculator {
    PerformanceCalculator::new(PerformanceConfig {
        annualization,
        ..Default::default()
    })
}

#[test]
fn test_turnover_recomputed_from_trade_log() {
    let run = run(&LookaheadStrategy::FixedOffset { offset: 2 });
    let metrics = calculator(Annualization::Frequency(Frequency::Day))
        .compute(&run, None)
        .unwrap();

    let traded: u64 = run.trades.iter().map(|t| t.quantity).sum();
    assert!(traded > 0);
    assert_eq!(metrics.total_turnover, traded as f64);
    assert_eq!(
        metrics.annualized_turnover,
        traded as f64 / run.len() as f64 * 365.25
    );
}

#[test]
fn test_hit_rate_recomputed_from_trade_log() {
    let run = run(&LookaheadStrategy::WindowedAggregate {
        window: 3,
        aggregation: Aggregation::Mean,
    });
    let metrics = calculator(Annualization::Factor(252.0))
        .compute(&run, None)
        .unwrap();

    // Average-cost replay of the log
    let (mut shares, mut cost, mut wins, mut sells) = (0u64, 0.0f64, 0usize, 0usize);
    for trade in &run.trades {
        match trade.side {
            Side::Buy => {
                shares += trade.quantity;
                cost += trade.price * trade.quantity as f64;
            }
            Side::Sell => {
                let unit = cost / shares as f64;
                if trade.price - unit > 0.0 {
                    wins += 1;
                }
                sells += 1;
                shares -= trade.quantity;
                cost = if shares == 0 { 0.0 } else { cost - unit };
            }
        }
    }

    assert!(sells > 0);
    assert_eq!(metrics.hit_rate, wins as f64 / sells as f64);
}

#[test]
fn test_max_drawdown_bounds() {
    for strategy in [
        LookaheadStrategy::OneStep,
        LookaheadStrategy::FixedOffset { offset: 4 },
        LookaheadStrategy::WindowedAggregate {
            window: 6,
            aggregation: Aggregation::Max,
        },
    ] {
        let metrics = calculator(Annualization::default())
            .compute(&run(&strategy), None)
            .unwrap();
        assert!((0.0..=1.0).contains(&metrics.max_drawdown));
    }
}

#[test]
fn test_sharpe_and_sortino_finite_with_volatility() {
    let metrics = calculator(Annualization::Factor(252.0))
        .compute(&run(&LookaheadStrategy::OneStep), None)
        .unwrap();
    assert!(metrics.sharpe.is_finite());
    assert!(metrics.sortino.is_finite() || metrics.sortino.is_nan());
}

#[test]
fn test_timestamp_annualization() {
    let t0 = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let timestamps: Vec<DateTime<Utc>> = (0..300).map(|i| t0 + Duration::seconds(i)).collect();
    let series = sawtooth(300).with_timestamps(timestamps).unwrap();
    let run = Backtester::new(200.0).run(&series, &LookaheadStrategy::OneStep);

    let metrics = calculator(Annualization::Timestamps)
        .compute(&run, series.timestamps())
        .unwrap();
    assert!((metrics.annualization_factor - SECONDS_PER_YEAR).abs() < 1e-6);
}

#[test]
fn test_metrics_are_deterministic() {
    let strategy = LookaheadStrategy::FixedOffset { offset: 3 };
    let calc = calculator(Annualization::Factor(252.0));
    let a = calc.compute(&run(&strategy), None).unwrap();
    let b = calc.compute(&run(&strategy), None).unwrap();
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}
