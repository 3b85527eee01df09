//! Backtest simulation loop

use super::ledger::{Portfolio, TradeRecord};
use crate::data::PriceSeries;
use crate::strategy::{decide_on, Decision, Strategy, StrategyExt};
use crate::telemetry::{self, LatencyMetric};
use rayon::prelude::*;
use std::time::Instant;

/// Everything recorded during one simulation
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestRun {
    /// Mark-to-bid valuation per step
    pub equity: Vec<f64>,
    /// Cash per step, after that step's trade
    pub cash: Vec<f64>,
    /// Shares held per step, after that step's trade
    pub positions: Vec<u64>,
    /// Decision requested per step
    pub decisions: Vec<Decision>,
    /// Executed trades in order
    pub trades: Vec<TradeRecord>,
    /// Starting cash
    pub initial_cash: f64,
}

impl BacktestRun {
    fn with_capacity(n: usize, initial_cash: f64) -> Self {
        Self {
            equity: Vec::with_capacity(n),
            cash: Vec::with_capacity(n),
            positions: Vec::with_capacity(n),
            decisions: Vec::with_capacity(n),
            trades: Vec::new(),
            initial_cash,
        }
    }

    /// Number of simulated steps
    pub fn len(&self) -> usize {
        self.equity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equity.is_empty()
    }

    pub fn final_equity(&self) -> f64 {
        self.equity.last().copied().unwrap_or(self.initial_cash)
    }

    pub fn final_cash(&self) -> f64 {
        self.cash.last().copied().unwrap_or(self.initial_cash)
    }

    pub fn final_shares(&self) -> u64 {
        self.positions.last().copied().unwrap_or(0)
    }
}

/// Runs a strategy over a price series
#[derive(Debug, Clone)]
pub struct Backtester {
    initial_cash: f64,
}

impl Backtester {
    /// Create a backtester starting with `initial_cash` and no shares
    pub fn new(initial_cash: f64) -> Self {
        Self { initial_cash }
    }

    pub fn initial_cash(&self) -> f64 {
        self.initial_cash
    }

    /// Run the strategy left to right, one decision per step
    pub fn run<S>(&self, series: &PriceSeries, strategy: &S) -> BacktestRun
    where
        S: Strategy + ?Sized,
    {
        let (bid, ask) = (series.bid(), series.ask());
        self.simulate(series, |i, cash, shares| {
            strategy.decide(i, bid, ask, cash, shares)
        })
    }

    /// Compute every future lookup in parallel, then apply the ledger in order.
    ///
    /// Lookups never depend on portfolio state and decisions always go through
    /// [`decide_on`], so this matches [`Backtester::run`] for every strategy.
    pub fn run_precomputed<S>(&self, series: &PriceSeries, strategy: &S) -> BacktestRun
    where
        S: Strategy + ?Sized,
    {
        let (bid, ask) = (series.bid(), series.ask());
        let lookups: Vec<(f64, f64)> = (0..series.len())
            .into_par_iter()
            .map(|i| strategy.future_lookup(i, bid, ask))
            .collect();

        self.simulate(series, |i, cash, shares| {
            decide_on(lookups[i], bid[i], ask[i], cash, shares)
        })
    }

    fn simulate<F>(&self, series: &PriceSeries, mut decide: F) -> BacktestRun
    where
        F: FnMut(usize, f64, u64) -> Decision,
    {
        let started = Instant::now();
        let (bid, ask) = (series.bid(), series.ask());
        let mut portfolio = Portfolio::new(self.initial_cash);
        let mut run = BacktestRun::with_capacity(series.len(), self.initial_cash);

        tracing::info!(
            rows = series.len(),
            initial_cash = self.initial_cash,
            "Starting backtest"
        );

        for i in 0..series.len() {
            let decision = decide(i, portfolio.cash(), portfolio.shares());
            telemetry::record_decision(decision);

            if let Some(trade) = portfolio.apply(i, decision, bid[i], ask[i], series.timestamp(i)) {
                tracing::trace!(
                    index = i,
                    side = trade.side.as_str(),
                    price = trade.price,
                    cash = trade.cash_after,
                    shares = trade.shares_after,
                    "Trade executed"
                );
                telemetry::record_trade(trade.side);
                run.trades.push(trade);
            }

            run.decisions.push(decision);
            run.cash.push(portfolio.cash());
            run.positions.push(portfolio.shares());
            run.equity.push(portfolio.valuation(bid[i]));
        }

        telemetry::record_latency(LatencyMetric::Simulation, started.elapsed());
        tracing::info!(
            trades = run.trades.len(),
            final_cash = run.final_cash(),
            final_shares = run.final_shares(),
            final_equity = run.final_equity(),
            "Backtest complete"
        );

        run
    }
}
