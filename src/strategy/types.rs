//! Strategy types

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Action requested for a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// Buy one unit at the current ask
    Buy,
    /// Sell one unit at the current bid
    Sell,
    /// Leave the portfolio untouched
    Hold,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Buy => "buy",
            Decision::Sell => "sell",
            Decision::Hold => "hold",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reducer applied to a look-ahead window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    #[default]
    Mean,
    Median,
    Max,
    Min,
}

impl Aggregation {
    /// Reduce a non-empty window to one value.
    ///
    /// Returns NaN for an empty slice; callers handle the empty window first.
    pub fn apply(&self, window: &[f64]) -> f64 {
        if window.is_empty() {
            return f64::NAN;
        }
        match self {
            Aggregation::Mean => window.iter().sum::<f64>() / window.len() as f64,
            Aggregation::Median => median(window),
            Aggregation::Max => window.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Aggregation::Min => window.iter().copied().fold(f64::INFINITY, f64::min),
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Aggregation::Mean => "mean",
            Aggregation::Median => "median",
            Aggregation::Max => "max",
            Aggregation::Min => "min",
        };
        f.write_str(name)
    }
}

fn median(window: &[f64]) -> f64 {
    let mut sorted = window.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Strategy construction errors
#[derive(Debug, Error, PartialEq)]
pub enum StrategyError {
    /// Parameter outside its valid range
    #[error("Invalid strategy parameter: {0}")]
    InvalidParameter(String),
}
