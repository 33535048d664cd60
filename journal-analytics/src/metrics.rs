//! Performance metrics — pure functions over a trade history.
//!
//! Every metric is a pure function: P&L series in, scalar out. The series is
//! built once from the records whose P&L qualifies (present and finite), in
//! the order given; records without a result never reach these functions.

use journal_core::TradeRecord;
use serde::{Deserialize, Serialize};

/// Subtracted from the mean P&L in the Sharpe approximation.
pub const SHARPE_RISK_FREE: f64 = 0.02;

/// Aggregate performance statistics for a set of trades.
///
/// Field names serialize in the dashboard's camelCase contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    #[serde(rename = "totalPnL")]
    pub total_pnl: f64,
    /// Percentage, 0–100.
    pub win_rate: f64,
    pub avg_win: f64,
    /// Magnitude of the mean losing P&L (non-negative).
    pub avg_loss: f64,
    pub profit_factor: f64,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub gross_profit: f64,
    /// Magnitude of summed losses (non-negative).
    pub gross_loss: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub expectancy: f64,
}

impl PerformanceMetrics {
    /// Compute all metrics from a trade list. Total: an empty or fully
    /// unqualified list yields all-zero metrics.
    pub fn compute(trades: &[TradeRecord]) -> Self {
        let pnls = qualifying_pnls(trades);
        if pnls.is_empty() {
            return Self::default();
        }

        let metrics = Self {
            total_pnl: total_pnl(&pnls),
            win_rate: win_rate(&pnls),
            avg_win: avg_win(&pnls),
            avg_loss: avg_loss(&pnls),
            profit_factor: profit_factor(&pnls),
            total_trades: pnls.len(),
            winning_trades: winning_count(&pnls),
            losing_trades: losing_count(&pnls),
            gross_profit: gross_profit(&pnls),
            gross_loss: gross_loss(&pnls),
            max_drawdown: max_drawdown(&pnls),
            sharpe_ratio: sharpe_ratio(&pnls),
            expectancy: expectancy(&pnls),
        };

        tracing::debug!(
            input = trades.len(),
            qualifying = metrics.total_trades,
            total_pnl = metrics.total_pnl,
            "computed performance metrics"
        );
        metrics
    }

    /// Trades with zero P&L: counted in the total, neither won nor lost.
    pub fn breakeven_trades(&self) -> usize {
        self.total_trades - self.winning_trades - self.losing_trades
    }

    pub fn is_empty(&self) -> bool {
        self.total_trades == 0
    }
}

/// Free-function form of [`PerformanceMetrics::compute`].
pub fn compute_metrics(trades: &[TradeRecord]) -> PerformanceMetrics {
    PerformanceMetrics::compute(trades)
}

/// P&L of every qualifying record, input order preserved.
pub fn qualifying_pnls(trades: &[TradeRecord]) -> Vec<f64> {
    trades.iter().filter_map(TradeRecord::qualifying_pnl).collect()
}

// ─── Individual metric functions ────────────────────────────────────

// Folds start from +0.0 so an empty sum never renders as "-0.00".

pub fn total_pnl(pnls: &[f64]) -> f64 {
    pnls.iter().fold(0.0, |acc, p| acc + p)
}

pub fn winning_count(pnls: &[f64]) -> usize {
    pnls.iter().filter(|&&p| p > 0.0).count()
}

pub fn losing_count(pnls: &[f64]) -> usize {
    pnls.iter().filter(|&&p| p < 0.0).count()
}

/// Winners as a percentage of all trades (breakevens included in the denominator).
pub fn win_rate(pnls: &[f64]) -> f64 {
    if pnls.is_empty() {
        return 0.0;
    }
    winning_count(pnls) as f64 / pnls.len() as f64 * 100.0
}

pub fn gross_profit(pnls: &[f64]) -> f64 {
    pnls.iter().filter(|&&p| p > 0.0).fold(0.0, |acc, p| acc + p)
}

/// Absolute value of the summed losses.
pub fn gross_loss(pnls: &[f64]) -> f64 {
    pnls.iter().filter(|&&p| p < 0.0).sum::<f64>().abs()
}

/// Mean winning P&L; 0.0 with no winners.
pub fn avg_win(pnls: &[f64]) -> f64 {
    let n = winning_count(pnls);
    if n == 0 {
        return 0.0;
    }
    gross_profit(pnls) / n as f64
}

/// Absolute mean losing P&L; 0.0 with no losers.
pub fn avg_loss(pnls: &[f64]) -> f64 {
    let n = losing_count(pnls);
    if n == 0 {
        return 0.0;
    }
    gross_loss(pnls) / n as f64
}

/// Gross profit / gross loss.
///
/// 0.0 when there are no losses, including the all-winners case. Callers
/// that need "infinite" must check `gross_loss` themselves.
pub fn profit_factor(pnls: &[f64]) -> f64 {
    let loss = gross_loss(pnls);
    if loss > 0.0 {
        gross_profit(pnls) / loss
    } else {
        0.0
    }
}

/// Largest drop of cumulative P&L below its running peak, in currency.
///
/// The peak starts at zero (flat before the first trade), so a losing first
/// trade is already a drawdown. Always non-negative.
pub fn max_drawdown(pnls: &[f64]) -> f64 {
    let mut peak = 0.0_f64;
    let mut running = 0.0_f64;
    let mut max_dd = 0.0_f64;

    for &pnl in pnls {
        running += pnl;
        if running > peak {
            peak = running;
        }
        let dd = peak - running;
        if dd > max_dd {
            max_dd = dd;
        }
    }
    max_dd
}

/// Mean P&L per trade.
pub fn expectancy(pnls: &[f64]) -> f64 {
    mean_f64(pnls)
}

/// Sharpe approximation over per-trade P&L.
///
/// (mean − 0.02) / sample std-dev. Not annualised, and the 0.02 is applied
/// to currency P&L as-is. 0.0 with fewer than 2 trades or zero spread.
pub fn sharpe_ratio(pnls: &[f64]) -> f64 {
    let std = std_dev(pnls);
    if std > 0.0 {
        (mean_f64(pnls) - SHARPE_RISK_FREE) / std
    } else {
        0.0
    }
}

// ─── Helpers ────────────────────────────────────────────────────────

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().fold(0.0, |acc, v| acc + v) / values.len() as f64
}

/// Sample standard deviation (n − 1).
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
