//! Backtest command implementation

use crate::backtest::BacktestReport;
use crate::config::Config;
use crate::data::{self, ParquetWriter};
use crate::performance::PerformanceCalculator;
use crate::strategy::{Aggregation, LookaheadStrategy};
use crate::telemetry::{self, GaugeMetric};
use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// Strategy selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyKind {
    OneStep,
    FixedOffset,
    WindowedAggregate,
}

/// Window reducer selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AggregationArg {
    Mean,
    Median,
    Max,
    Min,
}

impl From<AggregationArg> for Aggregation {
    fn from(arg: AggregationArg) -> Self {
        match arg {
            AggregationArg::Mean => Aggregation::Mean,
            AggregationArg::Median => Aggregation::Median,
            AggregationArg::Max => Aggregation::Max,
            AggregationArg::Min => Aggregation::Min,
        }
    }
}

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Args, Debug)]
pub struct BacktestArgs {
    /// Price file (.json tick dump or .parquet); overrides [data].path
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Keep only the first N rows; overrides [data].top_n
    #[arg(long)]
    pub top_n: Option<usize>,

    /// Strategy; overrides [strategy] together with --offset/--window/--aggregation
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyKind>,

    /// Look-ahead offset for fixed-offset
    #[arg(long, default_value = "5")]
    pub offset: usize,

    /// Window size for windowed-aggregate
    #[arg(long, default_value = "5")]
    pub window: usize,

    /// Window reducer for windowed-aggregate
    #[arg(long, value_enum, default_value = "mean")]
    pub aggregation: AggregationArg,

    /// Initial cash; overrides [backtest].initial_cash
    #[arg(long)]
    pub capital: Option<f64>,

    /// Compute future lookups in parallel before the ledger pass
    #[arg(long)]
    pub precompute: bool,

    /// Report compounded annualized return; overrides [performance].compound
    #[arg(long)]
    pub compound: bool,

    /// Directory for equity curve and trade Parquet files
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Output format: json or table
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl BacktestArgs {
    /// Strategy from the command line, falling back to the configured one
    pub fn resolve_strategy(&self, configured: &LookaheadStrategy) -> LookaheadStrategy {
        match self.strategy {
            None => configured.clone(),
            Some(StrategyKind::OneStep) => LookaheadStrategy::OneStep,
            Some(StrategyKind::FixedOffset) => LookaheadStrategy::FixedOffset {
                offset: self.offset,
            },
            Some(StrategyKind::WindowedAggregate) => LookaheadStrategy::WindowedAggregate {
                window: self.window,
                aggregation: self.aggregation.into(),
            },
        }
    }

    /// Run the backtest and build its report
    pub fn run(&self, config: &Config) -> anyhow::Result<BacktestReport> {
        let strategy = self.resolve_strategy(&config.strategy);
        strategy.validate()?;

        let path = self.data.clone().unwrap_or_else(|| config.data.path.clone());
        let top_n = self.top_n.unwrap_or(config.data.top_n);
        let series = data::load_series(&path, top_n)?;

        let mut backtest_config = config.backtest.clone();
        if let Some(capital) = self.capital {
            backtest_config.initial_cash = capital;
        }
        let precompute = self.precompute || backtest_config.precompute_lookups;
        let backtester = backtest_config.backtester();

        tracing::info!(strategy = %strategy, precompute, "Running strategy");
        let run = if precompute {
            backtester.run_precomputed(&series, &strategy)
        } else {
            backtester.run(&series, &strategy)
        };

        let mut performance_config = config.performance.clone();
        performance_config.compound |= self.compound;
        let calculator = PerformanceCalculator::new(performance_config);
        let metrics = calculator.compute(&run, series.timestamps())?;
        telemetry::set_gauge(GaugeMetric::FinalEquity, run.final_equity());

        if let Some(dir) = &self.output {
            let writer = ParquetWriter::new(dir.clone());
            writer.write_equity_curve(&writer.file_path("equity_curve"), &series, &run)?;
            writer.write_trades(&writer.file_path("trades"), &run.trades)?;
            tracing::info!(output = ?dir, "Wrote backtest results");
        }

        Ok(BacktestReport::new(strategy.to_string(), &run, metrics))
    }

    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let report = self.run(config)?;
        match self.format {
            OutputFormat::Table => println!("{}", report.format_table()),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        }
        Ok(())
    }
}
