//! Cash/shares ledger and trade records

use crate::strategy::Decision;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Units moved per executed decision
pub const LOT_SIZE: u64 = 1;

/// Realized P&L within this fraction of the trade's notional counts as flat
pub const PNL_TOLERANCE: f64 = 1e-9;

/// Side of an executed trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

/// An executed trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Step index in the price series
    pub index: usize,
    /// Step timestamp, when the series has them
    pub timestamp: Option<DateTime<Utc>>,
    /// Trade side
    pub side: Side,
    /// Execution price (ask for buys, bid for sells)
    pub price: f64,
    /// Units traded
    pub quantity: u64,
    /// Cash after the trade
    pub cash_after: f64,
    /// Shares after the trade
    pub shares_after: u64,
    /// P&L against average cost, sells only
    pub realized_pnl: Option<f64>,
}

/// Portfolio state carried from step to step
#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    cash: f64,
    shares: u64,
    /// Total cost of the units currently held
    cost_basis: f64,
}

impl Portfolio {
    /// Start flat with the given cash
    pub fn new(initial_cash: f64) -> Self {
        Self {
            cash: initial_cash,
            shares: 0,
            cost_basis: 0.0,
        }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn shares(&self) -> u64 {
        self.shares
    }

    /// Average cost of held units, zero when flat
    pub fn average_cost(&self) -> f64 {
        if self.shares == 0 {
            0.0
        } else {
            self.cost_basis / self.shares as f64
        }
    }

    /// Mark-to-bid valuation
    pub fn valuation(&self, bid: f64) -> f64 {
        self.cash + self.shares as f64 * bid
    }

    /// Apply a decision at step `index`.
    ///
    /// Buys need `cash >= ask` and sells need a held unit; anything else is
    /// treated as hold and yields no trade.
    pub fn apply(
        &mut self,
        index: usize,
        decision: Decision,
        bid: f64,
        ask: f64,
        timestamp: Option<DateTime<Utc>>,
    ) -> Option<TradeRecord> {
        match decision {
            Decision::Buy => self.buy(index, ask, timestamp),
            Decision::Sell => self.sell(index, bid, timestamp),
            Decision::Hold => None,
        }
    }

    fn buy(
        &mut self,
        index: usize,
        ask: f64,
        timestamp: Option<DateTime<Utc>>,
    ) -> Option<TradeRecord> {
        let cost = ask * LOT_SIZE as f64;
        if self.cash < cost {
            tracing::debug!(index, cash = self.cash, ask, "Buy refused: insufficient cash");
            return None;
        }

        self.cash -= cost;
        self.shares += LOT_SIZE;
        self.cost_basis += cost;

        Some(TradeRecord {
            index,
            timestamp,
            side: Side::Buy,
            price: ask,
            quantity: LOT_SIZE,
            cash_after: self.cash,
            shares_after: self.shares,
            realized_pnl: None,
        })
    }

    fn sell(
        &mut self,
        index: usize,
        bid: f64,
        timestamp: Option<DateTime<Utc>>,
    ) -> Option<TradeRecord> {
        if self.shares < LOT_SIZE {
            tracing::debug!(index, shares = self.shares, "Sell refused: no shares held");
            return None;
        }

        let unit_cost = self.average_cost();
        let proceeds = bid * LOT_SIZE as f64;

        self.cash += proceeds;
        self.shares -= LOT_SIZE;
        self.cost_basis = if self.shares == 0 {
            0.0
        } else {
            self.cost_basis - unit_cost * LOT_SIZE as f64
        };

        Some(TradeRecord {
            index,
            timestamp,
            side: Side::Sell,
            price: bid,
            quantity: LOT_SIZE,
            cash_after: self.cash,
            shares_after: self.shares,
            realized_pnl: Some(realized_pnl(proceeds, unit_cost * LOT_SIZE as f64)),
        })
    }
}

/// Proceeds minus cost, snapped to zero when the difference is only rounding
/// left over from the average-cost division.
fn realized_pnl(proceeds: f64, cost: f64) -> f64 {
    let pnl = proceeds - cost;
    if pnl.abs() <= PNL_TOLERANCE * proceeds.abs().max(cost.abs()) {
        0.0
    } else {
        pnl
    }
}
