//! Extended trading analytics: Sharpe ratio, drawdown, streaks, duration and
//! risk/reward, computed per closed trade.

use serde::{Deserialize, Serialize};

use super::pnl::net_pnl;
use crate::models::Trade;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingReport {
    pub total_trades: u32,
    /// Percentage, 0-100.
    pub win_rate: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub profit_factor: f64,
    pub sharpe_ratio: f64,
    /// Percentage drop from the running peak of cumulative P&L.
    pub max_drawdown: f64,
    pub max_win_streak: u32,
    pub max_loss_streak: u32,
    /// Days.
    pub avg_trade_duration: f64,
    pub risk_reward_ratio: f64,
}

pub fn trading_report(trades: &[Trade], risk_free_rate: f64) -> TradingReport {
    let closed: Vec<&Trade> = trades.iter().filter(|t| t.exit_date.is_some()).collect();
    if closed.is_empty() {
        return TradingReport::default();
    }

    let returns: Vec<f64> = closed.iter().map(|t| net_pnl(t)).collect();
    let winning: Vec<f64> = returns.iter().copied().filter(|r| *r > 0.0).collect();
    let losing: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();

    let total_trades = closed.len() as u32;
    let gross_profit: f64 = winning.iter().sum();
    let gross_loss: f64 = losing.iter().map(|l| l.abs()).sum();

    let win_rate = winning.len() as f64 / total_trades as f64 * 100.0;
    let avg_win = if winning.is_empty() { 0.0 } else { gross_profit / winning.len() as f64 };
    let avg_loss = if losing.is_empty() { 0.0 } else { gross_loss / losing.len() as f64 };
    let profit_factor = if gross_loss > 0.0 { gross_profit / gross_loss } else { 0.0 };

    let mut running = 0.0;
    let equity: Vec<f64> = returns
        .iter()
        .map(|r| {
            running += r;
            running
        })
        .collect();

    let (max_win_streak, max_loss_streak) = streaks(&returns);

    TradingReport {
        total_trades,
        win_rate: round2(win_rate),
        avg_win: round2(avg_win),
        avg_loss: round2(avg_loss),
        profit_factor: round2(profit_factor),
        sharpe_ratio: round2(sharpe_ratio(&returns, risk_free_rate)),
        max_drawdown: round2(max_drawdown(&equity)),
        max_win_streak,
        max_loss_streak,
        avg_trade_duration: round2(avg_trade_duration(&closed)),
        risk_reward_ratio: round2(risk_reward_ratio(&closed)),
    }
}

/// `(mean - rf) / stddev` over the population of returns.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();
    if std_dev == 0.0 || !std_dev.is_finite() {
        return 0.0;
    }
    (mean - risk_free_rate) / std_dev
}

/// Largest peak-to-trough drop as a percentage of the peak.
///
/// Only measured while the peak is positive; a curve that never rises above
/// zero reports 0.
pub fn max_drawdown(equity_curve: &[f64]) -> f64 {
    let Some(&first) = equity_curve.first() else {
        return 0.0;
    };
    let mut peak = first;
    let mut max_dd: f64 = 0.0;
    for &value in &equity_curve[1..] {
        if value > peak {
            peak = value;
        } else if peak > 0.0 {
            max_dd = max_dd.max((peak - value) / peak);
        }
    }
    max_dd * 100.0
}

/// Longest runs of winning and losing trades. Break-even trades do not reset a run.
pub fn streaks(returns: &[f64]) -> (u32, u32) {
    let mut current_win = 0;
    let mut current_loss = 0;
    let mut max_win = 0;
    let mut max_loss = 0;
    for &pnl in returns {
        if pnl > 0.0 {
            current_win += 1;
            current_loss = 0;
            max_win = max_win.max(current_win);
        } else if pnl < 0.0 {
            current_loss += 1;
            current_win = 0;
            max_loss = max_loss.max(current_loss);
        }
    }
    (max_win, max_loss)
}

fn avg_trade_duration(closed: &[&Trade]) -> f64 {
    let days: Vec<i64> = closed
        .iter()
        .filter_map(|t| t.exit_date.map(|exit| (exit - t.entry_date).num_days()))
        .collect();
    if days.is_empty() {
        return 0.0;
    }
    days.iter().sum::<i64>() as f64 / days.len() as f64
}

fn risk_reward_ratio(closed: &[&Trade]) -> f64 {
    let mut reward = 0.0;
    let mut risk = 0.0;
    for trade in closed {
        let exit = trade.exit_price.unwrap_or(0.0);
        if trade.entry_price > 0.0 && exit > 0.0 && trade.quantity > 0.0 {
            let pnl = net_pnl(trade);
            if pnl > 0.0 {
                reward += pnl;
            } else {
                risk += pnl.abs();
            }
        }
    }
    if risk > 0.0 { reward / risk } else { 0.0 }
}

fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 100.0).round() / 100.0
}
