//! Aligned bid/ask price series

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Malformed price series
#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    /// No rows at all
    #[error("Price series is empty")]
    Empty,
    /// Bid and ask columns differ in length
    #[error("Bid/ask length mismatch: {bid} bids, {ask} asks")]
    LengthMismatch { bid: usize, ask: usize },
    /// Timestamp column differs in length from the prices
    #[error("Timestamp length mismatch: expected {expected}, got {actual}")]
    TimestampMismatch { expected: usize, actual: usize },
    /// NaN or infinite quote
    #[error("Non-finite {column} price at index {index}")]
    NonFinitePrice { column: &'static str, index: usize },
}

/// Two aligned quote columns plus optional timestamps.
///
/// Read-only once built. Strategies see the whole series, future rows included.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    bid: Vec<f64>,
    ask: Vec<f64>,
    timestamps: Option<Vec<DateTime<Utc>>>,
}

impl PriceSeries {
    /// Build a series from bid and ask columns
    pub fn new(bid: Vec<f64>, ask: Vec<f64>) -> Result<Self, SeriesError> {
        if bid.len() != ask.len() {
            return Err(SeriesError::LengthMismatch {
                bid: bid.len(),
                ask: ask.len(),
            });
        }
        if bid.is_empty() {
            return Err(SeriesError::Empty);
        }
        check_finite("bid", &bid)?;
        check_finite("ask", &ask)?;

        Ok(Self {
            bid,
            ask,
            timestamps: None,
        })
    }

    /// Attach one timestamp per row
    pub fn with_timestamps(mut self, timestamps: Vec<DateTime<Utc>>) -> Result<Self, SeriesError> {
        if timestamps.len() != self.bid.len() {
            return Err(SeriesError::TimestampMismatch {
                expected: self.bid.len(),
                actual: timestamps.len(),
            });
        }
        self.timestamps = Some(timestamps);
        Ok(self)
    }

    /// Keep only the first `top_n` rows; zero keeps everything
    pub fn truncate(&mut self, top_n: usize) {
        if top_n == 0 || top_n >= self.len() {
            return;
        }
        self.bid.truncate(top_n);
        self.ask.truncate(top_n);
        if let Some(ts) = self.timestamps.as_mut() {
            ts.truncate(top_n);
        }
    }

    pub fn bid(&self) -> &[f64] {
        &self.bid
    }

    pub fn ask(&self) -> &[f64] {
        &self.ask
    }

    pub fn timestamps(&self) -> Option<&[DateTime<Utc>]> {
        self.timestamps.as_deref()
    }

    /// Timestamp of row `i`, if the series carries them
    pub fn timestamp(&self, i: usize) -> Option<DateTime<Utc>> {
        self.timestamps.as_ref().and_then(|ts| ts.get(i).copied())
    }

    /// Number of rows (never zero)
    pub fn len(&self) -> usize {
        self.bid.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`
    pub fn is_empty(&self) -> bool {
        self.bid.is_empty()
    }
}

fn check_finite(column: &'static str, prices: &[f64]) -> Result<(), SeriesError> {
    match prices.iter().position(|p| !p.is_finite()) {
        Some(index) => Err(SeriesError::NonFinitePrice { column, index }),
        None => Ok(()),
    }
}
