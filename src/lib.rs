//! lookahead-bt: look-ahead backtester for bid/ask price series
//!
//! This library provides the core components for:
//! - Peek-then-decide strategies (one-step, fixed-offset, windowed aggregate)
//! - Sequential cash/shares simulation with a recorded equity curve
//! - Annualized return, turnover, drawdown, hit rate, efficiency,
//!   Sharpe, Sortino and Calmar statistics
//! - JSON and Parquet price loading, Parquet result export
//! - TOML configuration, structured logging and run metrics
//!
//! Strategies deliberately read future quotes; results are not achievable
//! in live trading.

pub mod backtest;
pub mod cli;
pub mod config;
pub mod data;
pub mod performance;
pub mod strategy;
pub mod telemetry;
