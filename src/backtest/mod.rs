//! Backtesting module
//!
//! Sequential simulation of look-ahead strategies over a bid/ask series

mod analytics;
mod ledger;
mod simulator;

pub use analytics::BacktestReport;
pub use ledger::{Portfolio, Side, TradeRecord, LOT_SIZE, PNL_TOLERANCE};
pub use simulator::{BacktestRun, Backtester};

use serde::Deserialize;

/// Backtest configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BacktestConfig {
    /// Starting cash
    #[serde(default = "default_initial_cash")]
    pub initial_cash: f64,
    /// Compute future lookups in parallel before the ledger pass
    #[serde(default)]
    pub precompute_lookups: bool,
}

fn default_initial_cash() -> f64 {
    1.0
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_cash: default_initial_cash(),
            precompute_lookups: false,
        }
    }
}

impl BacktestConfig {
    /// Build the backtester described by this configuration
    pub fn backtester(&self) -> Backtester {
        Backtester::new(self.initial_cash)
    }
}
