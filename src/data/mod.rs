//! Data module
//!
//! Price series, file loaders and Parquet result export

mod json;
mod parquet;
mod series;

pub use json::{parse_json_ticks, read_json_ticks};
pub use parquet::{equity_schema, quote_schema, trade_schema, ParquetReader, ParquetWriter};
pub use series::{PriceSeries, SeriesError};

use crate::telemetry::{self, LatencyMetric};
use std::path::Path;
use std::time::Instant;

/// Load a price series, picking the reader from the file extension.
///
/// `.parquet` files go through [`ParquetReader`]; anything else is read as a
/// JSON tick dump. `top_n > 0` keeps only the first rows.
pub fn load_series(path: impl AsRef<Path>, top_n: usize) -> anyhow::Result<PriceSeries> {
    let path = path.as_ref();
    let started = Instant::now();

    let mut series = match path.extension().and_then(|e| e.to_str()) {
        Some("parquet") => ParquetReader::new(path.to_path_buf()).read_series()?,
        _ => read_json_ticks(path)?,
    };
    series.truncate(top_n);

    telemetry::record_latency(LatencyMetric::DataLoad, started.elapsed());
    tracing::info!(path = ?path, rows = series.len(), "Loaded price series");
    Ok(series)
}
