use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::statement::StatementRow;
use crate::error::JournalError;
use crate::models::{JournalSettings, LedgerEntry, PartialExitMap, Trade};
use crate::session::JournalSession;

const BACKUP_VERSION: &str = "1.0.0";

#[derive(Debug, Serialize, Deserialize)]
pub struct BackupData {
    #[serde(default)]
    pub settings: JournalSettings,
    #[serde(default)]
    pub trades: Vec<Trade>,
    #[serde(default)]
    pub ledger: Vec<LedgerEntry>,
    #[serde(default)]
    pub partial_exits: PartialExitMap,
    pub export_date: String,
    pub version: String,
}

/// Flat CSV shape of a statement row.
#[derive(Debug, Serialize)]
struct CsvStatementRow<'a> {
    date: String,
    status: &'static str,
    #[serde(rename = "type")]
    row_type: &'static str,
    symbol: &'a str,
    strategy: &'a str,
    segment: &'a str,
    direction: &'static str,
    entry_price: Option<f64>,
    entry_quantity: Option<f64>,
    entry_date: String,
    stop_loss: Option<f64>,
    target: Option<f64>,
    exit_price: Option<f64>,
    exit_quantity: Option<f64>,
    exit_date: String,
    gross: f64,
    charges: f64,
    net: f64,
    net_percentage: f64,
    win_loss: &'static str,
    amount: Option<f64>,
    notes: &'a str,
}

impl<'a> From<&'a StatementRow> for CsvStatementRow<'a> {
    fn from(row: &'a StatementRow) -> Self {
        use super::statement::WinLoss;
        use crate::models::TradeStatus;

        let status = match row.status {
            Some(TradeStatus::Open) => "Open",
            Some(TradeStatus::Partial) => "Partial",
            Some(TradeStatus::Closed) => "Closed",
            None => "",
        };
        let win_loss = match row.win_loss {
            Some(WinLoss::Win) => "Win",
            Some(WinLoss::Loss) => "Loss",
            None => "",
        };

        Self {
            date: row.date.format("%Y-%m-%d").to_string(),
            status,
            row_type: row.row_type.as_str(),
            symbol: &row.symbol,
            strategy: row.strategy.as_deref().unwrap_or(""),
            segment: row.segment.as_deref().unwrap_or(""),
            direction: row.direction.map(|d| d.as_str()).unwrap_or(""),
            entry_price: row.entry_price,
            entry_quantity: row.entry_quantity,
            entry_date: row.entry_date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
            stop_loss: row.stop_loss,
            target: row.target,
            exit_price: row.exit_price,
            exit_quantity: row.exit_quantity,
            exit_date: row.exit_date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
            gross: row.gross,
            charges: row.charges,
            net: row.net,
            net_percentage: row.net_percentage,
            win_loss,
            amount: row.amount,
            notes: row.notes.as_deref().unwrap_or(""),
        }
    }
}

/// Render statement rows as CSV with a header line.
pub fn statement_to_csv(rows: &[StatementRow]) -> Result<String, JournalError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(CsvStatementRow::from(row))?;
    }
    let bytes = writer.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}

/// Snapshot the whole session as pretty-printed JSON.
pub fn export_backup(session: &JournalSession) -> Result<String, JournalError> {
    let backup = BackupData {
        settings: session.settings().clone(),
        trades: session.trades().to_vec(),
        ledger: session.ledger().to_vec(),
        partial_exits: session.partial_exits().clone(),
        export_date: Utc::now().to_rfc3339(),
        version: BACKUP_VERSION.to_string(),
    };
    Ok(serde_json::to_string_pretty(&backup)?)
}

/// Parse a backup and load it into the session, replacing its collections and settings.
///
/// Returns `(trades_imported, ledger_entries_imported)`.
pub fn import_backup(session: &mut JournalSession, json: &str) -> Result<(usize, usize), JournalError> {
    let backup: BackupData = serde_json::from_str(json)?;
    if backup.version != BACKUP_VERSION {
        log::warn!(
            "Backup version {} differs from {}, importing anyway",
            backup.version,
            BACKUP_VERSION
        );
    }

    let counts = (backup.trades.len(), backup.ledger.len());
    session.set_settings(backup.settings);
    session.replace_trades(backup.trades);
    session.replace_ledger(backup.ledger);
    session.replace_partial_exits(backup.partial_exits);
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::statement::{StatementFilters, build_statement};
    use crate::models::Direction;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_session() -> JournalSession {
        let mut session = JournalSession::new("user-1", JournalSettings::default());
        session.replace_trades(vec![
            Trade::new("T1", "ITC", Direction::Long, 400.0, 10.0, date(2024, 1, 5))
                .with_exit(420.0, None, date(2024, 1, 7)),
        ]);
        session.replace_ledger(vec![LedgerEntry::deposit("L1", 5000.0, date(2024, 1, 1))]);
        session
    }

    #[test]
    fn test_statement_csv() {
        let session = sample_session();
        let rows = build_statement(session.trades(), session.ledger(), None, &StatementFilters::default());
        let csv = statement_to_csv(&rows).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("date,status,type,symbol"));
        assert!(lines[1].starts_with("2024-01-01,,Deposit,Deposit"));
        assert!(lines[2].starts_with("2024-01-07,Closed,Trade,ITC"));
        assert!(lines[2].contains(",Win,"));
    }

    #[test]
    fn test_empty_statement_csv() {
        assert_eq!(statement_to_csv(&[]).unwrap(), "");
    }

    #[test]
    fn test_backup_round_trip() {
        let session = sample_session();
        let json = export_backup(&session).unwrap();

        let mut restored = JournalSession::new("user-1", JournalSettings::default());
        let (trades, ledger) = import_backup(&mut restored, &json).unwrap();
        assert_eq!((trades, ledger), (1, 1));
        assert_eq!(restored.trades(), session.trades());
        assert_eq!(restored.ledger(), session.ledger());
    }

    #[test]
    fn test_backup_without_ledger_field() {
        let json = r#"{"trades": [], "export_date": "2024-01-01T00:00:00Z", "version": "1.0.0"}"#;
        let mut session = sample_session();
        assert_eq!(import_backup(&mut session, json).unwrap(), (0, 0));
        assert!(session.ledger().is_empty());
    }
}
