use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

use super::pnl::net_pnl;
use crate::models::{LedgerEntry, LedgerKind, Trade};

/// Dashboard summary over the trades that have an exit price and exit date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub net_pnl: f64,
    pub wins: u32,
    pub losses: u32,
    pub trade_count: u32,
    pub avg_win: f64,
    pub avg_loss: f64,
    /// `f64::INFINITY` when there are wins and no losses, written as `"Infinity"` in JSON.
    #[serde(with = "profit_factor_format")]
    pub profit_factor: f64,
    /// Fraction in [0, 1].
    pub win_rate: f64,
    pub account_value: Option<f64>,
}

impl Default for Summary {
    fn default() -> Self {
        Self {
            net_pnl: 0.0,
            wins: 0,
            losses: 0,
            trade_count: 0,
            avg_win: 0.0,
            avg_loss: 0.0,
            profit_factor: 0.0,
            win_rate: 0.0,
            account_value: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub net_account_value: f64,
    pub realized_pnl: f64,
    pub available_cash: f64,
    pub deployed_capital: f64,
    pub total_deposits: f64,
    pub total_withdrawn: f64,
    pub starting_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityCurvePoint {
    pub date: NaiveDate,
    pub cumulative_pnl: f64,
    pub daily_pnl: f64,
    pub trade_count: u32,
}

/// JSON has no infinity, so an unbounded profit factor travels as a label.
mod profit_factor_format {
    use serde::{Deserialize, Deserializer, Serializer, de};

    const INFINITY_LABEL: &str = "Infinity";

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Number(f64),
        Label(String),
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if *value == f64::INFINITY {
            serializer.serialize_str(INFINITY_LABEL)
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Wire::deserialize(deserializer)? {
            Wire::Number(n) => Ok(n),
            Wire::Label(label) if label == INFINITY_LABEL => Ok(f64::INFINITY),
            Wire::Label(label) => Err(de::Error::custom(format!(
                "invalid profit factor '{}'",
                label
            ))),
        }
    }
}

/// Look-back window for the equity curve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateRange {
    #[default]
    All,
    Today,
    Week,
    Month,
    ThreeMonths,
    SixMonths,
    Year,
}

impl DateRange {
    /// Unknown labels mean the whole history.
    pub fn from_label(label: &str) -> Self {
        match label {
            "today" => DateRange::Today,
            "week" => DateRange::Week,
            "month" => DateRange::Month,
            "3months" => DateRange::ThreeMonths,
            "6months" => DateRange::SixMonths,
            "year" => DateRange::Year,
            _ => DateRange::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DateRange::All => "all",
            DateRange::Today => "today",
            DateRange::Week => "week",
            DateRange::Month => "month",
            DateRange::ThreeMonths => "3months",
            DateRange::SixMonths => "6months",
            DateRange::Year => "year",
        }
    }

    /// Earliest date included, relative to `today`.
    pub fn threshold(&self, today: NaiveDate) -> Option<NaiveDate> {
        let days = match self {
            DateRange::All => return None,
            DateRange::Today => 0,
            DateRange::Week => 7,
            DateRange::Month => 30,
            DateRange::ThreeMonths => 90,
            DateRange::SixMonths => 180,
            DateRange::Year => 365,
        };
        today.checked_sub_signed(Duration::days(days))
    }
}

impl Serialize for DateRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DateRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(DateRange::from_label(&label))
    }
}

/// Fold trades and ledger entries into the dashboard summary.
///
/// Never fails: anything that cannot be computed becomes zero or `None`.
/// `fallback_account_value` is used only when the ledger is empty.
pub fn compute_summary(
    trades: &[Trade],
    ledger: &[LedgerEntry],
    fallback_account_value: Option<f64>,
) -> Summary {
    let mut net_total = 0.0;
    let mut gross_profit = 0.0;
    let mut gross_loss = 0.0;
    let mut wins = 0u32;
    let mut losses = 0u32;
    let mut trade_count = 0u32;

    for trade in trades.iter().filter(|t| t.has_exit()) {
        let net = net_pnl(trade);
        trade_count += 1;
        net_total += net;
        if net > 0.0 {
            wins += 1;
            gross_profit += net;
        } else if net < 0.0 {
            losses += 1;
            gross_loss += net.abs();
        }
    }

    let account_value = if !ledger.is_empty() {
        Some(ledger.iter().map(LedgerEntry::signed_amount).sum())
    } else {
        fallback_account_value.filter(|v| v.is_finite())
    };

    let summary = Summary {
        net_pnl: net_total,
        wins,
        losses,
        trade_count,
        avg_win: if wins > 0 { gross_profit / wins as f64 } else { 0.0 },
        avg_loss: if losses > 0 { gross_loss / losses as f64 } else { 0.0 },
        profit_factor: if gross_loss > 0.0 {
            gross_profit / gross_loss
        } else if gross_profit > 0.0 {
            f64::INFINITY
        } else {
            0.0
        },
        win_rate: if trade_count > 0 {
            wins as f64 / trade_count as f64
        } else {
            0.0
        },
        account_value,
    };

    if !summary.net_pnl.is_finite() || !summary.avg_win.is_finite() || !summary.avg_loss.is_finite() {
        log::warn!(
            "Dashboard summary overflowed over {} trades, falling back to defaults",
            trade_count
        );
        return Summary::default();
    }

    summary
}

/// Fund metrics for the account summary panel.
pub fn account_summary(trades: &[Trade], ledger: &[LedgerEntry]) -> AccountSummary {
    let amount_of = |entry: &LedgerEntry| {
        if entry.amount.is_finite() { entry.amount.abs() } else { 0.0 }
    };

    let total_deposits: f64 = ledger
        .iter()
        .filter(|l| l.kind == LedgerKind::Deposit)
        .map(amount_of)
        .sum();
    let total_withdrawn: f64 = ledger
        .iter()
        .filter(|l| l.kind == LedgerKind::Withdrawal)
        .map(amount_of)
        .sum();

    let realized_pnl: f64 = trades
        .iter()
        .filter(|t| t.has_exit())
        .map(net_pnl)
        .sum();

    let net_account_value = total_deposits - total_withdrawn + realized_pnl;

    let deployed_capital: f64 = trades
        .iter()
        .filter(|t| !t.has_exit())
        .map(|t| t.entry_price * t.quantity)
        .filter(|v| v.is_finite())
        .sum();

    let available_cash = (net_account_value - deployed_capital).max(0.0);

    let starting_balance = ledger
        .iter()
        .find(|l| l.kind == LedgerKind::Deposit)
        .map(amount_of)
        .unwrap_or(0.0);

    AccountSummary {
        net_account_value,
        realized_pnl,
        available_cash,
        deployed_capital,
        total_deposits,
        total_withdrawn,
        starting_balance,
    }
}

/// Cumulative realized P&L grouped by exit date.
pub fn equity_curve(trades: &[Trade], range: DateRange, today: NaiveDate) -> Vec<EquityCurvePoint> {
    let threshold = range.threshold(today);

    let mut daily_map: BTreeMap<NaiveDate, (f64, u32)> = BTreeMap::new();
    for trade in trades.iter().filter(|t| t.has_exit()) {
        let Some(exit_date) = trade.exit_date else {
            continue;
        };
        if threshold.is_some_and(|t| exit_date < t) {
            continue;
        }
        let entry = daily_map.entry(exit_date).or_insert((0.0, 0));
        entry.0 += net_pnl(trade);
        entry.1 += 1;
    }

    let mut cumulative_pnl = 0.0;
    daily_map
        .into_iter()
        .map(|(date, (daily_pnl, trade_count))| {
            cumulative_pnl += daily_pnl;
            EquityCurvePoint {
                date,
                cumulative_pnl,
                daily_pnl,
                trade_count,
            }
        })
        .collect()
}
