//! Parquet input and result export

use super::PriceSeries;
use crate::backtest::{BacktestRun, TradeRecord};
use arrow::array::{
    Array, ArrayRef, Float64Array, StringArray, TimestampMicrosecondArray, UInt64Array,
};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Utc};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn timestamp_type() -> DataType {
    DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into()))
}

/// Quote schema accepted by [`ParquetReader::read_series`]
pub fn quote_schema() -> Schema {
    Schema::new(vec![
        Field::new("timestamp", timestamp_type(), true),
        Field::new("bid", DataType::Float64, false),
        Field::new("ask", DataType::Float64, false),
    ])
}

/// Equity curve schema
pub fn equity_schema() -> Schema {
    Schema::new(vec![
        Field::new("index", DataType::UInt64, false),
        Field::new("timestamp", timestamp_type(), true),
        Field::new("cash", DataType::Float64, false),
        Field::new("shares", DataType::UInt64, false),
        Field::new("equity", DataType::Float64, false),
    ])
}

/// Trade log schema
pub fn trade_schema() -> Schema {
    Schema::new(vec![
        Field::new("index", DataType::UInt64, false),
        Field::new("timestamp", timestamp_type(), true),
        Field::new("side", DataType::Utf8, false),
        Field::new("price", DataType::Float64, false),
        Field::new("quantity", DataType::UInt64, false),
        Field::new("realized_pnl", DataType::Float64, true),
    ])
}

/// Writes backtest results to Parquet files
pub struct ParquetWriter {
    output_dir: PathBuf,
}

impl ParquetWriter {
    /// Create a new Parquet writer
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// Ensure output directory exists
    pub fn ensure_dir(&self) -> anyhow::Result<()> {
        fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    /// Path for a result file with the given prefix
    pub fn file_path(&self, prefix: &str) -> PathBuf {
        self.output_dir.join(format!("{}.parquet", prefix))
    }

    fn write_batch(&self, path: &Path, batch: RecordBatch) -> anyhow::Result<()> {
        self.ensure_dir()?;
        let file = File::create(path)?;

        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();

        let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
        writer.write(&batch)?;
        writer.close()?;
        Ok(())
    }

    /// Write the per-step cash, shares and equity of a run
    pub fn write_equity_curve(
        &self,
        path: &Path,
        series: &PriceSeries,
        run: &BacktestRun,
    ) -> anyhow::Result<()> {
        let indices: Vec<u64> = (0..run.len() as u64).collect();
        let timestamps: Vec<Option<i64>> = (0..run.len())
            .map(|i| series.timestamp(i).map(|t| t.timestamp_micros()))
            .collect();

        let batch = RecordBatch::try_new(
            Arc::new(equity_schema()),
            vec![
                Arc::new(UInt64Array::from(indices)) as ArrayRef,
                Arc::new(TimestampMicrosecondArray::from(timestamps).with_timezone("UTC"))
                    as ArrayRef,
                Arc::new(Float64Array::from(run.cash.clone())) as ArrayRef,
                Arc::new(UInt64Array::from(run.positions.clone())) as ArrayRef,
                Arc::new(Float64Array::from(run.equity.clone())) as ArrayRef,
            ],
        )?;

        self.write_batch(path, batch)?;
        tracing::debug!(path = ?path, rows = run.len(), "Wrote equity curve to Parquet");
        Ok(())
    }

    /// Write the executed trades of a run.
    ///
    /// A run without trades still writes the file, with the schema and no rows.
    pub fn write_trades(&self, path: &Path, trades: &[TradeRecord]) -> anyhow::Result<()> {
        let indices: Vec<u64> = trades.iter().map(|t| t.index as u64).collect();
        let timestamps: Vec<Option<i64>> = trades
            .iter()
            .map(|t| t.timestamp.map(|ts| ts.timestamp_micros()))
            .collect();
        let sides: Vec<&str> = trades.iter().map(|t| t.side.as_str()).collect();
        let prices: Vec<f64> = trades.iter().map(|t| t.price).collect();
        let quantities: Vec<u64> = trades.iter().map(|t| t.quantity).collect();
        let pnl: Vec<Option<f64>> = trades.iter().map(|t| t.realized_pnl).collect();

        let batch = RecordBatch::try_new(
            Arc::new(trade_schema()),
            vec![
                Arc::new(UInt64Array::from(indices)) as ArrayRef,
                Arc::new(TimestampMicrosecondArray::from(timestamps).with_timezone("UTC"))
                    as ArrayRef,
                Arc::new(StringArray::from(sides)) as ArrayRef,
                Arc::new(Float64Array::from(prices)) as ArrayRef,
                Arc::new(UInt64Array::from(quantities)) as ArrayRef,
                Arc::new(Float64Array::from(pnl)) as ArrayRef,
            ],
        )?;

        self.write_batch(path, batch)?;
        tracing::debug!(path = ?path, count = trades.len(), "Wrote trades to Parquet");
        Ok(())
    }

    /// Write quotes in the layout [`ParquetReader::read_series`] expects
    pub fn write_series(&self, path: &Path, series: &PriceSeries) -> anyhow::Result<()> {
        let timestamps: Vec<Option<i64>> = (0..series.len())
            .map(|i| series.timestamp(i).map(|t| t.timestamp_micros()))
            .collect();

        let batch = RecordBatch::try_new(
            Arc::new(quote_schema()),
            vec![
                Arc::new(TimestampMicrosecondArray::from(timestamps).with_timezone("UTC"))
                    as ArrayRef,
                Arc::new(Float64Array::from(series.bid().to_vec())) as ArrayRef,
                Arc::new(Float64Array::from(series.ask().to_vec())) as ArrayRef,
            ],
        )?;

        self.write_batch(path, batch)?;
        tracing::debug!(path = ?path, rows = series.len(), "Wrote quotes to Parquet");
        Ok(())
    }
}

/// Reader for quote Parquet files
pub struct ParquetReader {
    path: PathBuf,
}

impl ParquetReader {
    /// Create a new reader for a Parquet file
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Read `bid`/`ask` columns and the optional `timestamp` column.
    ///
    /// Timestamps are kept only when every row has one.
    pub fn read_series(&self) -> anyhow::Result<PriceSeries> {
        let file = File::open(&self.path)?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

        let mut bid = Vec::new();
        let mut ask = Vec::new();
        let mut timestamps: Option<Vec<DateTime<Utc>>> = Some(Vec::new());

        for batch_result in reader {
            let batch = batch_result?;

            bid.extend(float_column(&batch, "bid")?.iter().flatten());
            ask.extend(float_column(&batch, "ask")?.iter().flatten());

            let ts_column = batch
                .column_by_name("timestamp")
                .and_then(|c| c.as_any().downcast_ref::<TimestampMicrosecondArray>())
                .filter(|c| c.null_count() == 0);
            match ts_column {
                Some(column) => {
                    if let Some(ts) = timestamps.as_mut() {
                        for &micros in column.values().iter() {
                            let t = DateTime::<Utc>::from_timestamp_micros(micros).ok_or_else(
                                || anyhow::anyhow!("Timestamp out of range: {}", micros),
                            )?;
                            ts.push(t);
                        }
                    }
                }
                None => timestamps = None,
            }
        }

        let series = PriceSeries::new(bid, ask)?;
        let series = match timestamps {
            Some(ts) => series.with_timestamps(ts)?,
            None => series,
        };

        tracing::debug!(path = ?self.path, rows = series.len(), "Loaded Parquet quotes");
        Ok(series)
    }

    /// Get the file path
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

fn float_column<'a>(batch: &'a RecordBatch, name: &str) -> anyhow::Result<&'a Float64Array> {
    let column = batch
        .column_by_name(name)
        .ok_or_else(|| anyhow::anyhow!("Missing {} column", name))?;
    if column.null_count() > 0 {
        anyhow::bail!("Null values in {} column", name);
    }
    column
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| anyhow::anyhow!("Invalid {} column", name))
}
