//! Backtest analytics and reporting

use super::BacktestRun;
use crate::performance::MetricsResult;
use serde::Serialize;
use uuid::Uuid;

/// Summary of one backtest, ready for display or export
#[derive(Debug, Clone, Serialize)]
pub struct BacktestReport {
    /// Run identifier
    pub run_id: Uuid,
    /// Strategy label
    pub strategy: String,
    /// Number of simulated steps
    pub steps: usize,
    /// Starting cash
    pub initial_cash: f64,
    /// Cash at the end of the run
    pub final_cash: f64,
    /// Shares held at the end of the run
    pub final_shares: u64,
    /// Final mark-to-bid equity
    pub final_equity: f64,
    /// Executed buys
    pub buys: usize,
    /// Executed sells
    pub sells: usize,
    /// Performance statistics
    pub metrics: MetricsResult,
}

impl BacktestReport {
    /// Build a report from a finished run
    pub fn new(strategy: impl Into<String>, run: &BacktestRun, metrics: MetricsResult) -> Self {
        let buys = run
            .trades
            .iter()
            .filter(|t| t.side == super::Side::Buy)
            .count();

        Self {
            run_id: Uuid::new_v4(),
            strategy: strategy.into(),
            steps: run.len(),
            initial_cash: run.initial_cash,
            final_cash: run.final_cash(),
            final_shares: run.final_shares(),
            final_equity: run.final_equity(),
            buys,
            sells: run.trades.len() - buys,
            metrics,
        }
    }

    /// Total return over the whole run
    pub fn total_return(&self) -> f64 {
        if self.initial_cash == 0.0 {
            f64::NAN
        } else {
            self.final_equity / self.initial_cash - 1.0
        }
    }

    /// Format as table for CLI output
    pub fn format_table(&self) -> String {
        let m = &self.metrics;
        format!(
            r#"
══════════════════════════════════════════════════════
               BACKTEST RESULTS
══════════════════════════════════════════════════════
Strategy:         {}
Run ID:           {}

PERFORMANCE
───────────────────────────────────────────────────────
Final Equity:     {:.4} ({:+.2}%)
Ann. Return:      {:.4}
Sharpe Ratio:     {:.2}
Sortino Ratio:    {:.2}
Calmar Ratio:     {:.2}
Max Drawdown:     {:.2}%
Hit Rate:         {:.1}%
Efficiency:       {:.4}

ACTIVITY
───────────────────────────────────────────────────────
Steps:            {}
Trades:           {} buys / {} sells
Final Position:   {} shares, {:.4} cash
Ann. Turnover:    {:.2}
══════════════════════════════════════════════════════
"#,
            self.strategy,
            self.run_id,
            self.final_equity,
            self.total_return() * 100.0,
            m.annualized_return,
            m.sharpe,
            m.sortino,
            m.calmar,
            m.max_drawdown * 100.0,
            m.hit_rate * 100.0,
            m.efficiency,
            self.steps,
            self.buys,
            self.sells,
            self.final_shares,
            self.final_cash,
            m.annualized_turnover,
        )
    }
}
