//! Annualization factors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Days per year used by every calendar conversion
pub const DAYS_PER_YEAR: f64 = 365.25;
/// Seconds per year
pub const SECONDS_PER_YEAR: f64 = DAYS_PER_YEAR * 24.0 * 60.0 * 60.0;

/// Errors while computing performance statistics
#[derive(Debug, Error, PartialEq)]
pub enum PerformanceError {
    /// Timestamp annualization on a series without timestamps
    #[error("Annualization from timestamps requested but the series has none")]
    MissingTimestamps,
    /// Fewer than two timestamps
    #[error("Need at least 2 timestamps to estimate frequency, got {0}")]
    InsufficientTimestamps(usize),
    /// Last timestamp not after the first
    #[error("Timestamps must be increasing and span more than zero time")]
    NonIncreasingTimestamps,
    /// Explicit factor is not a positive finite number
    #[error("Invalid annualization factor: {0}")]
    InvalidFactor(f64),
}

/// Sampling frequency of the price series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Microsecond,
    Nanosecond,
}

impl Frequency {
    /// Periods of this frequency in one year
    pub fn periods_per_year(&self) -> f64 {
        match self {
            Frequency::Year => 1.0,
            Frequency::Month => 12.0,
            Frequency::Day => DAYS_PER_YEAR,
            Frequency::Hour => DAYS_PER_YEAR * 24.0,
            Frequency::Minute => DAYS_PER_YEAR * 24.0 * 60.0,
            Frequency::Second => SECONDS_PER_YEAR,
            Frequency::Microsecond => SECONDS_PER_YEAR * 1e6,
            Frequency::Nanosecond => SECONDS_PER_YEAR * 1e9,
        }
    }
}

/// How the periods-per-year factor is obtained
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Annualization {
    /// Fixed sampling frequency
    Frequency(Frequency),
    /// Explicit periods per year
    Factor(f64),
    /// Estimated from the series' timestamps
    Timestamps,
}

impl Default for Annualization {
    fn default() -> Self {
        Annualization::Frequency(Frequency::Second)
    }
}

impl Annualization {
    /// Resolve to a periods-per-year factor
    pub fn resolve(&self, timestamps: Option<&[DateTime<Utc>]>) -> Result<f64, PerformanceError> {
        match *self {
            Annualization::Frequency(freq) => Ok(freq.periods_per_year()),
            Annualization::Factor(factor) if factor.is_finite() && factor > 0.0 => Ok(factor),
            Annualization::Factor(factor) => Err(PerformanceError::InvalidFactor(factor)),
            Annualization::Timestamps => {
                let timestamps = timestamps.ok_or(PerformanceError::MissingTimestamps)?;
                estimate_from_timestamps(timestamps)
            }
        }
    }
}

/// Periods per year implied by evenly spreading the observed steps over their span
pub fn estimate_from_timestamps(timestamps: &[DateTime<Utc>]) -> Result<f64, PerformanceError> {
    let (first, last) = match timestamps {
        [first, .., last] => (first, last),
        _ => return Err(PerformanceError::InsufficientTimestamps(timestamps.len())),
    };

    let duration_secs = span_seconds(first, last);
    if duration_secs <= 0.0 {
        return Err(PerformanceError::NonIncreasingTimestamps);
    }

    let total_periods = (timestamps.len() - 1) as f64;
    Ok(total_periods / duration_secs * SECONDS_PER_YEAR)
}

fn span_seconds(first: &DateTime<Utc>, last: &DateTime<Utc>) -> f64 {
    let span = *last - *first;
    match span.num_microseconds() {
        Some(us) => us as f64 / 1e6,
        None => span.num_milliseconds() as f64 / 1e3,
    }
}
