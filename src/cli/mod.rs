//! CLI interface for lookahead-bt
//!
//! Provides subcommands for:
//! - `backtest`: Run a look-ahead strategy over a price file
//! - `config`: Show the effective configuration

mod backtest;

pub use backtest::{AggregationArg, BacktestArgs, OutputFormat, StrategyKind};

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "lookahead-bt")]
#[command(about = "Look-ahead bid/ask backtester with performance statistics")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a backtest
    Backtest(BacktestArgs),
    /// Show configuration
    Config,
}
