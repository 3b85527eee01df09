//! Performance statistics
//!
//! Turns a finished backtest into annualized return, turnover, drawdown,
//! hit rate, efficiency and risk-adjusted ratios

mod annualization;
pub mod stats;

pub use annualization::{
    estimate_from_timestamps, Annualization, Frequency, PerformanceError, DAYS_PER_YEAR,
    SECONDS_PER_YEAR,
};

use crate::backtest::BacktestRun;
use crate::telemetry::{self, GaugeMetric};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Denominator used for portfolio efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EfficiencyBasis {
    /// Annualized return per unit of total turnover
    #[default]
    Turnover,
    /// Annualized return per unit of annualized volatility
    Risk,
}

/// Performance calculator configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PerformanceConfig {
    #[serde(default)]
    pub annualization: Annualization,
    #[serde(default)]
    pub risk_free_rate: f64,
    #[serde(default)]
    pub efficiency: EfficiencyBasis,
    /// Report the compounded annualized return instead of the linear one
    #[serde(default)]
    pub compound: bool,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            annualization: Annualization::default(),
            risk_free_rate: 0.0,
            efficiency: EfficiencyBasis::Turnover,
            compound: false,
        }
    }
}

/// Summary statistics of one backtest.
///
/// NaN marks a metric that is undefined for the run (no volatility, no
/// drawdown, no realized trade).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsResult {
    pub annualized_return: f64,
    pub annualized_turnover: f64,
    pub max_drawdown: f64,
    pub hit_rate: f64,
    pub efficiency: f64,
    pub sharpe: f64,
    pub sortino: f64,
    pub calmar: f64,
    /// Sum of absolute position changes
    pub total_turnover: f64,
    /// Number of simulated steps
    pub periods: usize,
    /// Periods per year used for annualization
    pub annualization_factor: f64,
}

impl MetricsResult {
    /// Metric name to value, for plotting and reporting
    pub fn to_map(&self) -> BTreeMap<&'static str, f64> {
        BTreeMap::from([
            ("annualized_return", self.annualized_return),
            ("annualized_turnover", self.annualized_turnover),
            ("max_drawdown", self.max_drawdown),
            ("hit_rate", self.hit_rate),
            ("efficiency", self.efficiency),
            ("sharpe", self.sharpe),
            ("sortino", self.sortino),
            ("calmar", self.calmar),
        ])
    }
}

/// Computes [`MetricsResult`] from a backtest run
#[derive(Debug, Clone, Default)]
pub struct PerformanceCalculator {
    config: PerformanceConfig,
}

impl PerformanceCalculator {
    pub fn new(config: PerformanceConfig) -> Self {
        Self { config }
    }

    /// Compute every metric for `run`.
    ///
    /// `timestamps` are only needed for [`Annualization::Timestamps`].
    pub fn compute(
        &self,
        run: &BacktestRun,
        timestamps: Option<&[DateTime<Utc>]>,
    ) -> Result<MetricsResult, PerformanceError> {
        let factor = self.config.annualization.resolve(timestamps)?;
        let periods = run.len();

        let returns = stats::pct_change(&run.equity);
        let linear_return = stats::annualized_return_linear(&returns, factor);
        let annualized_return = if self.config.compound {
            stats::annualized_return_compound(&returns, factor)
        } else {
            linear_return
        };

        let total_turnover = stats::total_turnover(&run.positions);
        let annualized_turnover = if periods == 0 {
            f64::NAN
        } else {
            total_turnover / periods as f64 * factor
        };

        let max_drawdown = stats::max_drawdown(&run.equity);
        let efficiency = match self.config.efficiency {
            EfficiencyBasis::Turnover => stats::ratio(annualized_return, total_turnover),
            EfficiencyBasis::Risk => {
                stats::ratio(annualized_return, stats::nan_std(&returns) * factor.sqrt())
            }
        };

        let metrics = MetricsResult {
            annualized_return,
            annualized_turnover,
            max_drawdown,
            hit_rate: stats::hit_rate(&run.trades),
            efficiency,
            sharpe: stats::sharpe_ratio(&returns, self.config.risk_free_rate, factor),
            sortino: stats::sortino_ratio(&returns, self.config.risk_free_rate, factor),
            calmar: stats::calmar_ratio(linear_return, max_drawdown),
            total_turnover,
            periods,
            annualization_factor: factor,
        };

        telemetry::set_gauge(GaugeMetric::MaxDrawdown, metrics.max_drawdown);
        telemetry::set_gauge(GaugeMetric::Sharpe, metrics.sharpe);
        tracing::debug!(
            factor,
            periods,
            annualized_return = metrics.annualized_return,
            sharpe = metrics.sharpe,
            max_drawdown = metrics.max_drawdown,
            "Computed performance metrics"
        );

        Ok(metrics)
    }
}
