use clap::Parser;
use lookahead_bt::cli::{Cli, Commands};
use lookahead_bt::config::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using default configuration");
            Config::bundled()?
        }
    };

    // Initialize telemetry
    let _telemetry = lookahead_bt::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Backtest(args) => {
            tracing::info!("Starting backtest");
            args.execute(&config)?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!(
                "  Data: {} (top_n={})",
                config.data.path.display(),
                config.data.top_n
            );
            println!("  Strategy: {}", config.strategy);
            println!(
                "  Backtest: initial_cash={}, precompute_lookups={}",
                config.backtest.initial_cash, config.backtest.precompute_lookups
            );
            println!(
                "  Performance: annualization={:?}, risk_free_rate={}, efficiency={:?}",
                config.performance.annualization,
                config.performance.risk_free_rate,
                config.performance.efficiency
            );
            println!(
                "  Telemetry: level={}, format={:?}",
                config.telemetry.log_level, config.telemetry.log_format
            );
        }
    }

    Ok(())
}
