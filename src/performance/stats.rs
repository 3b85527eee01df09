//! Return and risk statistics over an equity curve
//!
//! All reductions skip NaN entries. Undefined results (empty input, zero
//! denominators) come back as NaN.

use crate::backtest::{Side, TradeRecord};

/// Per-step percent change, one element shorter than `values`.
///
/// A zero previous value yields NaN for that step.
pub fn pct_change(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|w| {
            if w[0] == 0.0 {
                f64::NAN
            } else {
                (w[1] - w[0]) / w[0]
            }
        })
        .collect()
}

/// Mean of the non-NaN entries
pub fn nan_mean(values: &[f64]) -> f64 {
    let (sum, count) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Population standard deviation of the non-NaN entries
pub fn nan_std(values: &[f64]) -> f64 {
    let mean = nan_mean(values);
    if mean.is_nan() {
        return f64::NAN;
    }
    let variance = nan_mean(
        &values
            .iter()
            .filter(|v| !v.is_nan())
            .map(|v| (v - mean).powi(2))
            .collect::<Vec<_>>(),
    );
    variance.sqrt()
}

/// `numerator / denominator`, NaN when the denominator is zero or not finite
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() {
        f64::NAN
    } else {
        numerator / denominator
    }
}

/// Largest peak-to-trough decline as a fraction of the peak, in `[0, 1]`
pub fn max_drawdown(equity: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst: f64 = 0.0;

    for &value in equity {
        if value > peak {
            peak = value;
        }
        if peak > 0.0 {
            worst = worst.max((peak - value) / peak);
        }
    }

    worst.clamp(0.0, 1.0)
}

/// Sum of absolute position changes, starting flat
pub fn total_turnover(positions: &[u64]) -> f64 {
    positions
        .iter()
        .fold((0u64, 0u64), |(prev, total), &pos| {
            (pos, total + prev.abs_diff(pos))
        })
        .1 as f64
}

/// Fraction of realized trades with positive P&L
pub fn hit_rate(trades: &[TradeRecord]) -> f64 {
    let realized: Vec<f64> = trades
        .iter()
        .filter(|t| t.side == Side::Sell)
        .filter_map(|t| t.realized_pnl)
        .collect();
    if realized.is_empty() {
        return f64::NAN;
    }
    realized.iter().filter(|&&pnl| pnl > 0.0).count() as f64 / realized.len() as f64
}

/// Returns in excess of the per-period risk-free rate
fn excess_returns(returns: &[f64], risk_free_rate: f64, factor: f64) -> Vec<f64> {
    let rf_per_period = risk_free_rate / factor;
    returns.iter().map(|r| r - rf_per_period).collect()
}

/// Annualized Sharpe ratio with population volatility
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64, factor: f64) -> f64 {
    let excess = excess_returns(returns, risk_free_rate, factor);
    ratio(nan_mean(&excess), nan_std(&excess)) * factor.sqrt()
}

/// Annualized Sortino ratio; the denominator only sees below-zero excess returns
pub fn sortino_ratio(returns: &[f64], risk_free_rate: f64, factor: f64) -> f64 {
    let excess = excess_returns(returns, risk_free_rate, factor);
    let downside: Vec<f64> = excess.iter().map(|&x| x.min(0.0)).collect();
    ratio(nan_mean(&excess), nan_std(&downside)) * factor.sqrt()
}

/// Linear annualized return: mean per-step return times periods per year
pub fn annualized_return_linear(returns: &[f64], factor: f64) -> f64 {
    nan_mean(returns) * factor
}

/// Compounded annualized return.
///
/// Total growth over the non-NaN steps is rescaled geometrically to a year:
/// `prod(1 + r) ^ (factor / n) - 1`.
pub fn annualized_return_compound(returns: &[f64], factor: f64) -> f64 {
    let (growth, count) = returns
        .iter()
        .filter(|r| !r.is_nan())
        .fold((1.0, 0usize), |(g, c), r| (g * (1.0 + r), c + 1));
    if count == 0 {
        f64::NAN
    } else {
        growth.powf(factor / count as f64) - 1.0
    }
}

/// Annualized return over max drawdown
pub fn calmar_ratio(annualized_return: f64, max_drawdown: f64) -> f64 {
    ratio(annualized_return, max_drawdown.abs())
}
