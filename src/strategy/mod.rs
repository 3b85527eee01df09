//! Strategy module
//!
//! Peek-then-decide strategies that read future quotes to choose an action

mod lookahead;
mod types;

pub use lookahead::LookaheadStrategy;
pub use types::{Aggregation, Decision, StrategyError};

/// Trait for look-ahead strategies.
///
/// Implementors only supply the future quote. The action is always derived
/// from it by [`StrategyExt::decide`], so every strategy trades by the same rule.
pub trait Strategy: Send + Sync {
    /// Future `(bid, ask)` seen from step `i`
    fn future_lookup(&self, i: usize, bid: &[f64], ask: &[f64]) -> (f64, f64);
}

/// Decision step for every [`Strategy`].
///
/// Blanket-implemented, so it cannot be replaced per strategy.
pub trait StrategyExt: Strategy {
    /// Decide the action for step `i` given the current portfolio
    fn decide(&self, i: usize, bid: &[f64], ask: &[f64], cash: f64, shares: u64) -> Decision {
        let future = self.future_lookup(i, bid, ask);
        decide_on(future, bid[i], ask[i], cash, shares)
    }
}

impl<S: Strategy + ?Sized> StrategyExt for S {}

/// Decision rule shared by all strategies.
///
/// Buy when the future bid beats the current ask and one unit is affordable,
/// otherwise sell when holding and the future ask is below the current bid.
/// Ties never trade.
pub fn decide_on(future: (f64, f64), bid: f64, ask: f64, cash: f64, shares: u64) -> Decision {
    let (future_bid, future_ask) = future;
    if future_bid > ask && cash >= ask {
        Decision::Buy
    } else if shares > 0 && future_ask < bid {
        Decision::Sell
    } else {
        Decision::Hold
    }
}
