//! Integration tests for price loading and the backtest command

use clap::Parser;
use lookahead_bt::cli::{Cli, Commands};
use lookahead_bt::config::Config;
use lookahead_bt::data::{load_series, ParquetWriter};
use std::fs;
use tempfile::TempDir;

const TICKS: &str = r#"[
    {"ticks": [[1700000000000000, 10.0], [1700000001000000, 11.0],
               [1700000002000000, 9.0], [1700000003000000, 12.0]]},
    {"ticks": [[1700000000000000, 10.0], [1700000001000000, 11.0],
               [1700000002000000, 9.0], [1700000003000000, 12.0]]}
]"#;

#[test]
fn test_load_json_with_top_n() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.json");
    fs::write(&path, TICKS).unwrap();

    let series = load_series(&path, 0).unwrap();
    assert_eq!(series.len(), 4);
    assert_eq!(series.timestamps().unwrap().len(), 4);

    let series = load_series(&path, 2).unwrap();
    assert_eq!(series.bid(), &[10.0, 11.0]);
    assert_eq!(series.timestamps().unwrap().len(), 2);
}

#[test]
fn test_load_parquet_matches_json() {
    let dir = TempDir::new().unwrap();
    let json_path = dir.path().join("data.json");
    fs::write(&json_path, TICKS).unwrap();
    let from_json = load_series(&json_path, 0).unwrap();

    let writer = ParquetWriter::new(dir.path().to_path_buf());
    let parquet_path = writer.file_path("quotes");
    writer.write_series(&parquet_path, &from_json).unwrap();

    assert_eq!(load_series(&parquet_path, 0).unwrap(), from_json);
}

#[test]
fn test_load_rejects_mismatched_feeds() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(
        &path,
        r#"[{"ticks": [[1, 10.0], [2, 11.0]]}, {"ticks": [[1, 10.0]]}]"#,
    )
    .unwrap();

    assert!(load_series(&path, 0).is_err());
}

#[test]
fn test_backtest_command_end_to_end() {
    let dir = TempDir::new().unwrap();
    let data_path = dir.path().join("data.json");
    fs::write(&data_path, TICKS).unwrap();
    let output = dir.path().join("out");

    let cli = Cli::parse_from([
        "lookahead-bt",
        "backtest",
        "--data",
        data_path.to_str().unwrap(),
        "--strategy",
        "one-step",
        "--capital",
        "100",
        "--output",
        output.to_str().unwrap(),
    ]);
    let args = match cli.command {
        Commands::Backtest(args) => args,
        other => panic!("unexpected command: {:?}", other),
    };

    let report = args.run(&Config::default()).unwrap();
    assert_eq!(report.final_cash, 92.0);
    assert_eq!(report.final_shares, 1);
    assert_eq!(report.final_equity, 104.0);
    assert_eq!(report.metrics.total_turnover, 3.0);

    assert!(output.join("equity_curve.parquet").exists());
    assert!(output.join("trades.parquet").exists());
}
