//! Run counters and gauges
//!
//! Emitted through the `metrics` facade; a no-op unless the embedding
//! application installs a recorder.

use crate::backtest::Side;
use crate::strategy::Decision;
use std::time::Duration;

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// Full simulation loop
    Simulation,
    /// Loading the price series
    DataLoad,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Final mark-to-bid equity
    FinalEquity,
    /// Maximum drawdown fraction
    MaxDrawdown,
    /// Annualized Sharpe ratio
    Sharpe,
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    let metric_name = match metric {
        LatencyMetric::Simulation => "lookahead_bt_simulation_seconds",
        LatencyMetric::DataLoad => "lookahead_bt_data_load_seconds",
    };

    metrics::histogram!(metric_name).record(duration.as_secs_f64());
    tracing::debug!(
        metric = metric_name,
        value_ms = duration.as_millis(),
        "Recording latency"
    );
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    let metric_name = match metric {
        GaugeMetric::FinalEquity => "lookahead_bt_final_equity",
        GaugeMetric::MaxDrawdown => "lookahead_bt_max_drawdown",
        GaugeMetric::Sharpe => "lookahead_bt_sharpe",
    };

    metrics::gauge!(metric_name).set(value);
    tracing::debug!(metric = metric_name, value = value, "Setting gauge");
}

/// Count one strategy decision
pub fn record_decision(decision: Decision) {
    metrics::counter!("lookahead_bt_decisions_total", "decision" => decision.as_str())
        .increment(1);
}

/// Count one executed trade
pub fn record_trade(side: Side) {
    metrics::counter!("lookahead_bt_trades_total", "side" => side.as_str()).increment(1);
}
