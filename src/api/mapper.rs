use chrono::{NaiveDate, Utc};
use serde_json::Value;

use super::dates::parse_date;
use crate::error::JournalError;
use crate::models::{Direction, LedgerEntry, LedgerKind, PartialExit, PartialExitMap, Trade};

/// First field present (and not null) among `names`.
fn field<'a>(row: &'a Value, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| row.get(*name))
        .find(|v| !v.is_null())
}

/// Numbers arrive either as JSON numbers or as numeric strings.
fn number(row: &Value, names: &[&str]) -> Option<f64> {
    let value = field(row, names)?;
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

fn text(row: &Value, names: &[&str]) -> Option<String> {
    match field(row, names)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn date(row: &Value, names: &[&str]) -> Result<Option<NaiveDate>, JournalError> {
    match text(row, names) {
        Some(s) => parse_date(&s).map(Some),
        None => Ok(None),
    }
}

fn record_id(row: &Value, prefix: &str) -> String {
    text(row, &["id"]).unwrap_or_else(|| {
        format!(
            "{}-{}-{}",
            prefix,
            Utc::now().timestamp_millis(),
            uuid::Uuid::new_v4()
        )
    })
}

/// Map a backend trade row to a `Trade`, translating legacy field names once.
pub fn map_trade(row: &Value) -> Result<Trade, JournalError> {
    if !row.is_object() {
        return Err(JournalError::InvalidRecord(format!("trade row is not an object: {}", row)));
    }

    let id = record_id(row, "TRADE");

    let entry_date = date(row, &["entry_date", "entryDate"])?
        .ok_or_else(|| JournalError::InvalidRecord(format!("trade {}: missing entry date", id)))?;

    let quantity = number(row, &["quantity", "qty"])
        .ok_or_else(|| JournalError::InvalidRecord(format!("trade {}: missing quantity", id)))?;

    let direction = text(row, &["direction", "side"])
        .map(|d| Direction::from_label(&d))
        .unwrap_or_default();

    // A zero exit price means "not exited yet"
    let exit_price = number(row, &["exit_price", "exitPrice", "exit"]).filter(|p| *p != 0.0);

    let trade = Trade {
        asset: text(row, &["asset", "symbol"]).unwrap_or_default(),
        direction,
        segment: text(row, &["segment"]),
        strategy: text(row, &["strategy"]),
        entry_price: number(row, &["entry_price", "entryPrice", "entry"]).unwrap_or(0.0),
        quantity,
        entry_date,
        exit_price,
        exit_quantity: number(row, &["exit_quantity", "exitQuantity"]).filter(|q| *q != 0.0),
        exit_date: date(row, &["exit_date", "exitDate"])?,
        brokerage: number(row, &["brokerage"]),
        other_fees: number(row, &["other_fees", "otherFees"]),
        net_pnl: number(row, &["netPnl"]).or_else(|| number(row, &["pnl"])),
        stop_loss: number(row, &["stop_loss", "stopLoss"]),
        target: number(row, &["target"]),
        outcome_summary: text(row, &["outcomeSummary", "outcome_summary"]),
        emotional_state: text(row, &["emotionalState", "emotional_state"]),
        notes: text(row, &["reasons", "notes"]),
        id,
    };

    trade.validate()?;
    Ok(trade)
}

/// Map a backend ledger row. The amount is stored as its absolute value.
pub fn map_ledger_entry(row: &Value) -> Result<LedgerEntry, JournalError> {
    if !row.is_object() {
        return Err(JournalError::InvalidRecord(format!("ledger row is not an object: {}", row)));
    }

    let id = record_id(row, "LEDGER");

    let kind_label = text(row, &["type", "kind"]).unwrap_or_default();
    let kind = LedgerKind::from_label(&kind_label).ok_or_else(|| {
        JournalError::InvalidRecord(format!("ledger entry {}: unknown type '{}'", id, kind_label))
    })?;

    let date = date(row, &["date"])?
        .ok_or_else(|| JournalError::InvalidRecord(format!("ledger entry {}: missing date", id)))?;

    let entry = LedgerEntry {
        kind,
        amount: number(row, &["amount"]).unwrap_or(0.0).abs(),
        date,
        notes: text(row, &["notes"]).unwrap_or_default(),
        id,
    };

    entry.validate()?;
    Ok(entry)
}

pub fn map_partial_exit(row: &Value) -> Result<PartialExit, JournalError> {
    let trade_id = text(row, &["trade_id", "tradeId"])
        .ok_or_else(|| JournalError::InvalidRecord(format!("partial exit without trade id: {}", row)))?;

    Ok(PartialExit {
        trade_id,
        brokerage: number(row, &["brokerage"]).unwrap_or(0.0),
        charges: number(row, &["charges"]).unwrap_or(0.0),
        exit_price: number(row, &["exit_price", "exitPrice"]),
        quantity: number(row, &["quantity", "exit_quantity"]),
        exit_date: date(row, &["exit_date", "exitDate"])?,
    })
}

/// Group partial exits by trade id, keeping input order within each trade.
pub fn group_partial_exits(exits: Vec<PartialExit>) -> PartialExitMap {
    let mut map = PartialExitMap::new();
    for exit in exits {
        map.entry(exit.trade_id.clone()).or_default().push(exit);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_map_canonical_trade() {
        let row = json!({
            "id": "t-1",
            "asset": "NIFTY24JANFUT",
            "direction": "short",
            "segment": "F&O",
            "strategy": "Breakout",
            "entry_price": 21500.0,
            "quantity": 50,
            "entry_date": "2024-01-15T09:20:00",
            "exit_price": "21400",
            "exit_date": "2024-01-16",
            "brokerage": 40,
            "other_fees": 12.5,
            "reasons": "gap fill"
        });

        let trade = map_trade(&row).unwrap();
        assert_eq!(trade.id, "t-1");
        assert_eq!(trade.direction, Direction::Short);
        assert_eq!(trade.quantity, 50.0);
        assert_eq!(trade.exit_price, Some(21400.0));
        assert_eq!(trade.entry_date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(trade.own_charges(), 52.5);
        assert_eq!(trade.notes.as_deref(), Some("gap fill"));
        assert_eq!(trade.net_pnl, None);
    }

    #[test]
    fn test_map_legacy_names() {
        let row = json!({
            "entryPrice": 10,
            "exitPrice": 12,
            "qty": "3",
            "side": "sell",
            "entryDate": "05-01-2024",
            "exitDate": "06/01/2024",
            "pnl": 9.5
        });

        let trade = map_trade(&row).unwrap();
        assert!(trade.id.starts_with("TRADE-"));
        assert_eq!(trade.entry_price, 10.0);
        assert_eq!(trade.exit_price, Some(12.0));
        assert_eq!(trade.quantity, 3.0);
        assert_eq!(trade.direction, Direction::Short);
        assert_eq!(trade.exit_date, NaiveDate::from_ymd_opt(2024, 1, 6));
        assert_eq!(trade.net_pnl, Some(9.5));
    }

    #[test]
    fn test_net_pnl_takes_precedence_over_pnl() {
        let row = json!({
            "quantity": 1, "entry_date": "2024-01-01", "netPnl": "7", "pnl": 9
        });
        assert_eq!(map_trade(&row).unwrap().net_pnl, Some(7.0));
    }

    #[test]
    fn test_zero_exit_price_means_open() {
        let row = json!({
            "quantity": 1, "entry_price": 5, "entry_date": "2024-01-01",
            "exit_price": 0, "exit_date": "2024-01-02"
        });
        let trade = map_trade(&row).unwrap();
        assert_eq!(trade.exit_price, None);
        assert!(!trade.has_exit());
    }

    #[test]
    fn test_invalid_trades_are_rejected() {
        assert!(map_trade(&json!("nope")).is_err());
        assert!(map_trade(&json!({"quantity": 1})).is_err());
        assert!(map_trade(&json!({"entry_date": "2024-01-01"})).is_err());
        assert!(map_trade(&json!({"entry_date": "2024-01-01", "quantity": 0})).is_err());
        assert!(map_trade(&json!({"entry_date": "garbage", "quantity": 1})).is_err());
    }

    #[test]
    fn test_map_ledger_entry() {
        let entry = map_ledger_entry(&json!({
            "id": "l-1", "type": "withdrawal", "amount": "-250", "date": "2024-02-01", "notes": "rent"
        }))
        .unwrap();
        assert_eq!(entry.kind, LedgerKind::Withdrawal);
        assert_eq!(entry.amount, 250.0);
        assert_eq!(entry.signed_amount(), -250.0);
        assert_eq!(entry.notes, "rent");

        assert!(map_ledger_entry(&json!({"type": "Bonus", "amount": 1, "date": "2024-02-01"})).is_err());
        assert!(map_ledger_entry(&json!({"type": "Deposit", "amount": 1})).is_err());
    }

    #[test]
    fn test_group_partial_exits() {
        let exits = vec![
            map_partial_exit(&json!({"trade_id": "a", "brokerage": 1, "charges": 2})).unwrap(),
            map_partial_exit(&json!({"trade_id": "b", "brokerage": 3})).unwrap(),
            map_partial_exit(&json!({"trade_id": "a", "charges": "4"})).unwrap(),
        ];
        let map = group_partial_exits(exits);
        assert_eq!(map.len(), 2);
        assert_eq!(map["a"].len(), 2);
        assert_eq!(map["a"][1].charges, 4.0);
        assert_eq!(map["b"][0].total_charges(), 3.0);
        assert!(map_partial_exit(&json!({"brokerage": 1})).is_err());
    }
}
