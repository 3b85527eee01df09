//! Reader for raw JSON tick dumps
//!
//! The dump is an array of feeds, each holding `[timestamp_micros, price]`
//! pairs. The first feed carries bids, the second asks.

use super::PriceSeries;
use chrono::{DateTime, Utc};
use serde::de::{self, IgnoredAny, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::fs;
use std::path::Path;

/// One feed of the dump
#[derive(Debug, Deserialize)]
struct RawFeed {
    ticks: Vec<RawTick>,
}

/// `[timestamp_micros, price, ...]`; trailing fields are ignored
#[derive(Debug, Clone, Copy)]
struct RawTick {
    timestamp: f64,
    price: f64,
}

impl<'de> Deserialize<'de> for RawTick {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TickVisitor;

        impl<'de> Visitor<'de> for TickVisitor {
            type Value = RawTick;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a tick array of at least [timestamp, price]")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<RawTick, A::Error> {
                let timestamp = seq
                    .next_element()?
                    .ok_or_else(|| <A::Error as de::Error>::invalid_length(0, &self))?;
                let price = seq
                    .next_element()?
                    .ok_or_else(|| <A::Error as de::Error>::invalid_length(1, &self))?;
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(RawTick { timestamp, price })
            }
        }

        deserializer.deserialize_seq(TickVisitor)
    }
}

/// Parse a tick dump from a JSON string
pub fn parse_json_ticks(content: &str) -> anyhow::Result<PriceSeries> {
    let feeds: Vec<RawFeed> = serde_json::from_str(content)?;

    let [bids, asks] = match feeds.as_slice() {
        [bids, asks, ..] => [bids, asks],
        _ => anyhow::bail!("Tick dump needs a bid feed and an ask feed, got {}", feeds.len()),
    };

    let timestamps = bids
        .ticks
        .iter()
        .map(|tick| {
            DateTime::<Utc>::from_timestamp_micros(tick.timestamp.round() as i64)
                .ok_or_else(|| anyhow::anyhow!("Timestamp out of range: {}", tick.timestamp))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    let bid: Vec<f64> = bids.ticks.iter().map(|t| t.price).collect();
    let ask: Vec<f64> = asks.ticks.iter().map(|t| t.price).collect();

    let series = PriceSeries::new(bid, ask)?.with_timestamps(timestamps)?;
    Ok(series)
}

/// Read a tick dump from disk
pub fn read_json_ticks(path: impl AsRef<Path>) -> anyhow::Result<PriceSeries> {
    let content = fs::read_to_string(path.as_ref())?;
    let series = parse_json_ticks(&content)?;

    tracing::debug!(path = ?path.as_ref(), rows = series.len(), "Loaded JSON ticks");
    Ok(series)
}
