//! Look-ahead strategy variants

use super::{Aggregation, Strategy, StrategyError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of look-ahead strategies, selected by configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LookaheadStrategy {
    /// Peek exactly one step ahead
    OneStep,
    /// Peek `offset` steps ahead
    FixedOffset {
        #[serde(default = "default_offset")]
        offset: usize,
    },
    /// Aggregate the next `window` steps
    WindowedAggregate {
        #[serde(default = "default_window")]
        window: usize,
        #[serde(default)]
        aggregation: Aggregation,
    },
}

fn default_offset() -> usize {
    5
}
fn default_window() -> usize {
    5
}

impl Default for LookaheadStrategy {
    fn default() -> Self {
        LookaheadStrategy::FixedOffset {
            offset: default_offset(),
        }
    }
}

impl LookaheadStrategy {
    /// Reject zero offsets and empty windows
    pub fn validate(&self) -> Result<(), StrategyError> {
        match self {
            LookaheadStrategy::OneStep => Ok(()),
            LookaheadStrategy::FixedOffset { offset: 0 } => Err(StrategyError::InvalidParameter(
                "offset must be at least 1".to_string(),
            )),
            LookaheadStrategy::WindowedAggregate { window: 0, .. } => Err(
                StrategyError::InvalidParameter("window must be at least 1".to_string()),
            ),
            _ => Ok(()),
        }
    }
}

impl Strategy for LookaheadStrategy {
    fn future_lookup(&self, i: usize, bid: &[f64], ask: &[f64]) -> (f64, f64) {
        match *self {
            LookaheadStrategy::OneStep => clamped_lookup(i, 1, bid, ask),
            LookaheadStrategy::FixedOffset { offset } => clamped_lookup(i, offset, bid, ask),
            LookaheadStrategy::WindowedAggregate {
                window,
                aggregation,
            } => windowed_lookup(i, window, aggregation, bid, ask),
        }
    }
}

impl fmt::Display for LookaheadStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookaheadStrategy::OneStep => write!(f, "one_step"),
            LookaheadStrategy::FixedOffset { offset } => write!(f, "fixed_offset(k={})", offset),
            LookaheadStrategy::WindowedAggregate {
                window,
                aggregation,
            } => write!(f, "windowed_{}(w={})", aggregation, window),
        }
    }
}

/// Quote `offset` steps ahead, clamped to the last row
fn clamped_lookup(i: usize, offset: usize, bid: &[f64], ask: &[f64]) -> (f64, f64) {
    let last = bid.len() - 1;
    let idx = i.saturating_add(offset).min(last);
    (bid[idx], ask[idx])
}

/// Aggregate of `[i+1, i+1+window)` clamped to the series end.
///
/// An empty window falls back to the last quote of the whole series.
fn windowed_lookup(
    i: usize,
    window: usize,
    aggregation: Aggregation,
    bid: &[f64],
    ask: &[f64],
) -> (f64, f64) {
    let n = bid.len();
    let start = i.saturating_add(1);
    if start >= n || window == 0 {
        return (bid[n - 1], ask[n - 1]);
    }
    let end = start.saturating_add(window).min(n);

    (
        aggregation.apply(&bid[start..end]),
        aggregation.apply(&ask[start..end]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{Decision, StrategyExt};

    const BID: [f64; 5] = [10.0, 11.0, 9.0, 12.0, 8.0];
    const ASK: [f64; 5] = [10.5, 11.5, 9.5, 12.5, 8.5];

    #[test]
    fn test_one_step_lookup() {
        let s = LookaheadStrategy::OneStep;
        assert_eq!(s.future_lookup(0, &BID, &ASK), (11.0, 11.5));
        assert_eq!(s.future_lookup(3, &BID, &ASK), (8.0, 8.5));
    }

    #[test]
    fn test_one_step_clamps_to_self_at_end() {
        let s = LookaheadStrategy::OneStep;
        assert_eq!(s.future_lookup(4, &BID, &ASK), (BID[4], ASK[4]));
    }

    #[test]
    fn test_fixed_offset_lookup() {
        let s = LookaheadStrategy::FixedOffset { offset: 2 };
        assert_eq!(s.future_lookup(0, &BID, &ASK), (9.0, 9.5));
        assert_eq!(s.future_lookup(2, &BID, &ASK), (8.0, 8.5));
        assert_eq!(s.future_lookup(3, &BID, &ASK), (8.0, 8.5));
        assert_eq!(s.future_lookup(4, &BID, &ASK), (8.0, 8.5));
    }

    #[test]
    fn test_fixed_offset_huge_offset() {
        let s = LookaheadStrategy::FixedOffset { offset: usize::MAX };
        assert_eq!(s.future_lookup(1, &BID, &ASK), (8.0, 8.5));
    }

    #[test]
    fn test_fixed_offset_one_matches_one_step() {
        let one = LookaheadStrategy::OneStep;
        let fixed = LookaheadStrategy::FixedOffset { offset: 1 };
        for i in 0..BID.len() {
            assert_eq!(
                one.future_lookup(i, &BID, &ASK),
                fixed.future_lookup(i, &BID, &ASK)
            );
        }
    }

    #[test]
    fn test_windowed_mean() {
        let s = LookaheadStrategy::WindowedAggregate {
            window: 2,
            aggregation: Aggregation::Mean,
        };
        assert_eq!(s.future_lookup(0, &BID, &ASK), (10.0, 10.5));
    }

    #[test]
    fn test_windowed_clamped_window() {
        let s = LookaheadStrategy::WindowedAggregate {
            window: 10,
            aggregation: Aggregation::Max,
        };
        assert_eq!(s.future_lookup(2, &BID, &ASK), (12.0, 12.5));
    }

    #[test]
    fn test_windowed_empty_window_falls_back_to_last() {
        let s = LookaheadStrategy::WindowedAggregate {
            window: 3,
            aggregation: Aggregation::Min,
        };
        assert_eq!(s.future_lookup(4, &BID, &ASK), (8.0, 8.5));
    }

    #[test]
    fn test_windowed_one_mean_matches_offset_one() {
        let windowed = LookaheadStrategy::WindowedAggregate {
            window: 1,
            aggregation: Aggregation::Mean,
        };
        let fixed = LookaheadStrategy::FixedOffset { offset: 1 };
        for i in 0..BID.len() {
            for cash in [0.0, 9.0, 100.0] {
                for shares in [0, 1] {
                    assert_eq!(
                        windowed.decide(i, &BID, &ASK, cash, shares),
                        fixed.decide(i, &BID, &ASK, cash, shares)
                    );
                }
            }
        }
    }

    #[test]
    fn test_validate() {
        assert!(LookaheadStrategy::OneStep.validate().is_ok());
        assert!(LookaheadStrategy::FixedOffset { offset: 3 }.validate().is_ok());
        assert!(LookaheadStrategy::FixedOffset { offset: 0 }.validate().is_err());
        assert!(LookaheadStrategy::WindowedAggregate {
            window: 0,
            aggregation: Aggregation::Mean
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_decide_at_last_index_holds_when_flat() {
        let s = LookaheadStrategy::OneStep;
        assert_eq!(s.decide(4, &BID, &ASK, 100.0, 0), Decision::Hold);
    }

    #[test]
    fn test_deserialize_tagged() {
        let s: LookaheadStrategy = toml::from_str("kind = \"one_step\"").unwrap();
        assert_eq!(s, LookaheadStrategy::OneStep);

        let s: LookaheadStrategy = toml::from_str("kind = \"fixed_offset\"").unwrap();
        assert_eq!(s, LookaheadStrategy::FixedOffset { offset: 5 });

        let s: LookaheadStrategy = toml::from_str(
            r#"
            kind = "windowed_aggregate"
            window = 3
            aggregation = "median"
            "#,
        )
        .unwrap();
        assert_eq!(
            s,
            LookaheadStrategy::WindowedAggregate {
                window: 3,
                aggregation: Aggregation::Median
            }
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(LookaheadStrategy::OneStep.to_string(), "one_step");
        assert_eq!(
            LookaheadStrategy::FixedOffset { offset: 5 }.to_string(),
            "fixed_offset(k=5)"
        );
        assert_eq!(
            LookaheadStrategy::WindowedAggregate {
                window: 3,
                aggregation: Aggregation::Median
            }
            .to_string(),
            "windowed_median(w=3)"
        );
    }
}
