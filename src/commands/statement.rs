use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::pnl::{charges, net_pnl, net_pnl_percentage};
use crate::models::{Direction, LedgerEntry, LedgerKind, PartialExitMap, Trade, TradeStatus};

/// What a statement row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowType {
    Trade,
    Deposit,
    Withdrawal,
}

impl RowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowType::Trade => "Trade",
            RowType::Deposit => "Deposit",
            RowType::Withdrawal => "Withdrawal",
        }
    }
}

impl From<LedgerKind> for RowType {
    fn from(kind: LedgerKind) -> Self {
        match kind {
            LedgerKind::Deposit => RowType::Deposit,
            LedgerKind::Withdrawal => RowType::Withdrawal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinLoss {
    Win,
    Loss,
}

/// One line of the account statement, either a trade or a ledger entry.
///
/// Trade-only fields are `None` on ledger rows and `amount` is `None` on trade rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementRow {
    pub row_type: RowType,
    /// Exit date for fully closed trades, otherwise the entry or ledger date.
    pub date: NaiveDate,
    /// Entry date for trades, ledger date otherwise. Rows are ordered by this.
    pub sort_date: NaiveDate,
    pub status: Option<TradeStatus>,
    pub trade_id: Option<String>,
    pub symbol: String,
    pub strategy: Option<String>,
    pub segment: Option<String>,
    pub direction: Option<Direction>,
    pub entry_price: Option<f64>,
    pub entry_quantity: Option<f64>,
    pub entry_date: Option<NaiveDate>,
    pub stop_loss: Option<f64>,
    pub target: Option<f64>,
    pub exit_price: Option<f64>,
    pub exit_quantity: Option<f64>,
    pub exit_date: Option<NaiveDate>,
    pub gross: f64,
    pub charges: f64,
    pub net: f64,
    pub net_percentage: f64,
    /// `None` for open and break-even trades and for ledger rows.
    pub win_loss: Option<WinLoss>,
    pub amount: Option<f64>,
    pub outcome_summary: Option<String>,
    pub emotional_state: Option<String>,
    pub notes: Option<String>,
}

/// Statement filters. All present filters must match.
///
/// `transaction_type` and `strategy` of `None` pass everything; when
/// deserialized, the "All Types"/"All Strategies"/"all" sentinels map to `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementFilters {
    #[serde(default, deserialize_with = "deserialize_filter_value")]
    pub transaction_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_filter_value")]
    pub strategy: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

const ALL_SENTINELS: [&str; 4] = ["all", "all types", "all strategies", ""];

fn is_all_sentinel(value: &str) -> bool {
    ALL_SENTINELS.contains(&value.trim().to_lowercase().as_str())
}

fn deserialize_filter_value<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|v| !is_all_sentinel(v)))
}

impl StatementFilters {
    pub fn matches(&self, row: &StatementRow) -> bool {
        if let Some(kind) = self.transaction_type.as_deref() {
            if !is_all_sentinel(kind) && row.row_type.as_str() != kind {
                return false;
            }
        }
        if let Some(strategy) = self.strategy.as_deref() {
            if !is_all_sentinel(strategy) && row.strategy.as_deref() != Some(strategy) {
                return false;
            }
        }
        if self.start_date.is_some_and(|start| row.sort_date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| row.sort_date > end) {
            return false;
        }
        true
    }
}

fn trade_row(trade: &Trade, partial_exits: Option<&PartialExitMap>) -> StatementRow {
    let status = trade.status();
    let exits = partial_exits
        .and_then(|m| m.get(&trade.id))
        .map(|v| v.as_slice());

    let (net, row_charges) = if trade.has_exit() {
        (net_pnl(trade), charges(trade, exits))
    } else {
        (0.0, 0.0)
    };
    let net_percentage = if trade.has_exit() {
        net_pnl_percentage(trade, net)
    } else {
        0.0
    };

    let win_loss = if !trade.has_exit() {
        None
    } else if net > 0.0 {
        Some(WinLoss::Win)
    } else if net < 0.0 {
        Some(WinLoss::Loss)
    } else {
        None
    };

    let date = match (status, trade.exit_date) {
        (TradeStatus::Closed, Some(exit_date)) => exit_date,
        _ => trade.entry_date,
    };

    StatementRow {
        row_type: RowType::Trade,
        date,
        sort_date: trade.entry_date,
        status: Some(status),
        trade_id: Some(trade.id.clone()),
        symbol: trade.asset.clone(),
        strategy: trade.strategy.clone(),
        segment: trade.segment.clone(),
        direction: Some(trade.direction),
        entry_price: Some(trade.entry_price),
        entry_quantity: Some(trade.quantity),
        entry_date: Some(trade.entry_date),
        stop_loss: trade.stop_loss,
        target: trade.target,
        exit_price: trade.exit_price,
        exit_quantity: trade.exit_quantity,
        exit_date: trade.exit_date,
        gross: net + row_charges,
        charges: row_charges,
        net,
        net_percentage,
        win_loss,
        amount: None,
        outcome_summary: trade.outcome_summary.clone(),
        emotional_state: trade.emotional_state.clone(),
        notes: trade.notes.clone(),
    }
}

fn ledger_row(entry: &LedgerEntry) -> StatementRow {
    let row_type = RowType::from(entry.kind);
    StatementRow {
        row_type,
        date: entry.date,
        sort_date: entry.date,
        status: None,
        trade_id: None,
        symbol: row_type.as_str().to_string(),
        strategy: None,
        segment: None,
        direction: None,
        entry_price: None,
        entry_quantity: None,
        entry_date: None,
        stop_loss: None,
        target: None,
        exit_price: None,
        exit_quantity: None,
        exit_date: None,
        gross: 0.0,
        charges: 0.0,
        net: 0.0,
        net_percentage: 0.0,
        win_loss: None,
        amount: Some(entry.amount),
        outcome_summary: None,
        emotional_state: None,
        notes: (!entry.notes.is_empty()).then(|| entry.notes.clone()),
    }
}

/// Merge trades and ledger entries into one chronological, filtered statement.
///
/// Rows are sorted by `sort_date` with a stable sort, so rows sharing a date keep
/// insertion order: trade rows first, then ledger rows, each in input order.
pub fn build_statement(
    trades: &[Trade],
    ledger: &[LedgerEntry],
    partial_exits: Option<&PartialExitMap>,
    filters: &StatementFilters,
) -> Vec<StatementRow> {
    let mut rows: Vec<StatementRow> = trades
        .iter()
        .map(|t| trade_row(t, partial_exits))
        .chain(ledger.iter().map(ledger_row))
        .collect();

    rows.sort_by_key(|row| row.sort_date);
    rows.retain(|row| filters.matches(row));

    log::debug!(
        "Built statement: {} rows from {} trades and {} ledger entries",
        rows.len(),
        trades.len(),
        ledger.len()
    );
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PartialExit;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_trades() -> Vec<Trade> {
        vec![
            Trade::new("T1", "HDFC", Direction::Long, 100.0, 10.0, date(2024, 1, 5))
                .with_exit(120.0, None, date(2024, 1, 12))
                .with_charges(10.0, 5.0)
                .with_strategy("Breakout"),
            Trade::new("T2", "TCS", Direction::Short, 200.0, 5.0, date(2024, 1, 8))
                .with_strategy("Reversal"),
        ]
    }

    fn sample_ledger() -> Vec<LedgerEntry> {
        vec![
            LedgerEntry::deposit("L1", 10000.0, date(2024, 1, 3)),
            LedgerEntry::withdrawal("L2", 500.0, date(2024, 1, 10)),
        ]
    }

    #[test]
    fn test_deposit_sorts_before_later_trade() {
        let trades = vec![Trade::new("T1", "HDFC", Direction::Long, 100.0, 10.0, date(2024, 1, 5))];
        let ledger = vec![LedgerEntry::deposit("L1", 1000.0, date(2024, 1, 3))];
        let rows = build_statement(&trades, &ledger, None, &StatementFilters::default());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row_type, RowType::Deposit);
        assert_eq!(rows[1].row_type, RowType::Trade);
    }

    #[test]
    fn test_closed_trade_row() {
        let rows = build_statement(&sample_trades(), &[], None, &StatementFilters::default());
        let closed = &rows[0];
        assert_eq!(closed.status, Some(TradeStatus::Closed));
        assert_eq!(closed.date, date(2024, 1, 12));
        assert_eq!(closed.sort_date, date(2024, 1, 5));
        assert_eq!(closed.net, 200.0);
        assert_eq!(closed.charges, 15.0);
        assert_eq!(closed.gross, 215.0);
        assert_eq!(closed.net_percentage, 20.0);
        assert_eq!(closed.win_loss, Some(WinLoss::Win));
        assert_eq!(closed.amount, None);
    }

    #[test]
    fn test_open_trade_row_has_no_pnl() {
        let rows = build_statement(&sample_trades(), &[], None, &StatementFilters::default());
        let open = &rows[1];
        assert_eq!(open.status, Some(TradeStatus::Open));
        assert_eq!(open.date, date(2024, 1, 8));
        assert_eq!(open.net, 0.0);
        assert_eq!(open.charges, 0.0);
        assert_eq!(open.win_loss, None);
    }

    #[test]
    fn test_partial_trade_uses_entry_date_and_exit_charges() {
        let trade = Trade::new("T9", "WIPRO", Direction::Long, 50.0, 10.0, date(2024, 2, 1))
            .with_exit(40.0, Some(5.0), date(2024, 2, 5))
            .with_charges(1.0, 1.0);
        let mut exits = PartialExitMap::new();
        exits.insert("T9".to_string(), vec![PartialExit::new("T9", 3.0, 4.0)]);

        let rows = build_statement(&[trade], &[], Some(&exits), &StatementFilters::default());
        assert_eq!(rows[0].status, Some(TradeStatus::Partial));
        assert_eq!(rows[0].date, date(2024, 2, 1));
        assert_eq!(rows[0].charges, 7.0);
        assert_eq!(rows[0].net, -100.0);
        assert_eq!(rows[0].win_loss, Some(WinLoss::Loss));
    }

    #[test]
    fn test_ledger_row_fields() {
        let rows = build_statement(&[], &sample_ledger(), None, &StatementFilters::default());
        assert_eq!(rows[1].row_type, RowType::Withdrawal);
        assert_eq!(rows[1].symbol, "Withdrawal");
        assert_eq!(rows[1].amount, Some(500.0));
        assert_eq!(rows[1].status, None);
        assert_eq!(rows[1].net, 0.0);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let trades = vec![Trade::new("T1", "HDFC", Direction::Long, 100.0, 10.0, date(2024, 1, 3))];
        let ledger = vec![LedgerEntry::deposit("L1", 1000.0, date(2024, 1, 3))];
        let rows = build_statement(&trades, &ledger, None, &StatementFilters::default());
        assert_eq!(rows[0].row_type, RowType::Trade);
        assert_eq!(rows[1].row_type, RowType::Deposit);
    }

    #[test]
    fn test_type_filter() {
        let filters = StatementFilters {
            transaction_type: Some("Deposit".to_string()),
            ..Default::default()
        };
        let rows = build_statement(&sample_trades(), &sample_ledger(), None, &filters);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].row_type, RowType::Deposit);
    }

    #[test]
    fn test_strategy_filter_excludes_ledger_rows() {
        let filters = StatementFilters {
            strategy: Some("Reversal".to_string()),
            ..Default::default()
        };
        let rows = build_statement(&sample_trades(), &sample_ledger(), None, &filters);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].trade_id.as_deref(), Some("T2"));
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let filters = StatementFilters {
            start_date: Some(date(2024, 1, 5)),
            end_date: Some(date(2024, 1, 8)),
            ..Default::default()
        };
        let rows = build_statement(&sample_trades(), &sample_ledger(), None, &filters);
        let ids: Vec<_> = rows.iter().filter_map(|r| r.trade_id.clone()).collect();
        assert_eq!(ids, vec!["T1".to_string(), "T2".to_string()]);
        assert!(rows.iter().all(|r| r.row_type == RowType::Trade));
    }

    #[test]
    fn test_sentinels_deserialize_to_no_filter() {
        let filters: StatementFilters = serde_json::from_str(
            r#"{"transaction_type": "All Types", "strategy": "All Strategies", "start_date": "2024-01-01"}"#,
        )
        .unwrap();
        assert_eq!(filters.transaction_type, None);
        assert_eq!(filters.strategy, None);
        assert_eq!(filters.start_date, Some(date(2024, 1, 1)));

        let rows = build_statement(&sample_trades(), &sample_ledger(), None, &filters);
        assert_eq!(rows.len(), 4);
    }

    #[test]
    fn test_statement_is_idempotent() {
        let trades = sample_trades();
        let ledger = sample_ledger();
        let filters = StatementFilters::default();
        assert_eq!(
            build_statement(&trades, &ledger, None, &filters),
            build_statement(&trades, &ledger, None, &filters)
        );
    }
}
