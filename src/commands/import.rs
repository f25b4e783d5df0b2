use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::mapper::{group_partial_exits, map_ledger_entry, map_partial_exit, map_trade};
use crate::error::JournalError;
use crate::models::{LedgerEntry, PartialExit, PartialExitMap, Trade};

/// Outcome of an import: the records that mapped cleanly plus one message per skipped row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport<T> {
    pub records: Vec<T>,
    pub skipped: usize,
    pub errors: Vec<String>,
}

impl<T> Default for ImportReport<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            skipped: 0,
            errors: Vec::new(),
        }
    }
}

impl<T> ImportReport<T> {
    fn record(&mut self, line: usize, result: Result<T, JournalError>) {
        match result {
            Ok(record) => self.records.push(record),
            Err(e) => {
                log::warn!("Skipping row {}: {}", line, e);
                self.skipped += 1;
                self.errors.push(format!("row {}: {}", line, e));
            }
        }
    }
}

impl ImportReport<PartialExit> {
    /// Group the imported exits by trade id.
    pub fn into_grouped(self) -> PartialExitMap {
        group_partial_exits(self.records)
    }
}

fn map_rows<T>(
    label: &str,
    document: &Value,
    mapper: impl Fn(&Value) -> Result<T, JournalError>,
) -> ImportReport<T> {
    let mut report = ImportReport::default();
    let Some(rows) = document.as_array() else {
        log::warn!("Expected an array of {} rows, treating input as empty", label);
        return report;
    };
    for (index, row) in rows.iter().enumerate() {
        report.record(index + 1, mapper(row));
    }
    log::info!(
        "Imported {} {} rows ({} skipped)",
        report.records.len(),
        label,
        report.skipped
    );
    report
}

/// Import trades from a backend JSON document. A non-array document imports nothing.
pub fn import_trades_json(json: &str) -> Result<ImportReport<Trade>, JournalError> {
    let document: Value = serde_json::from_str(json)?;
    Ok(map_rows("trade", &document, map_trade))
}

pub fn import_ledger_json(json: &str) -> Result<ImportReport<LedgerEntry>, JournalError> {
    let document: Value = serde_json::from_str(json)?;
    Ok(map_rows("ledger", &document, map_ledger_entry))
}

/// Import partial-exit rows. `ImportReport::into_grouped` keys them by trade id.
pub fn import_partial_exits_json(json: &str) -> Result<ImportReport<PartialExit>, JournalError> {
    let document: Value = serde_json::from_str(json)?;
    Ok(map_rows("partial exit", &document, map_partial_exit))
}

/// Turn each CSV row into a JSON object keyed by header so it goes through the
/// same mapper as backend rows. Empty cells are left out.
fn csv_rows(content: &str) -> Result<Vec<Value>, JournalError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut object = Map::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            if !cell.is_empty() {
                object.insert(header.clone(), Value::String(cell.to_string()));
            }
        }
        rows.push(Value::Object(object));
    }
    Ok(rows)
}

/// Import trades from a CSV export with a header row.
pub fn import_trades_csv(content: &str) -> Result<ImportReport<Trade>, JournalError> {
    let rows = csv_rows(content)?;
    Ok(map_rows("trade", &Value::Array(rows), map_trade))
}

pub fn import_ledger_csv(content: &str) -> Result<ImportReport<LedgerEntry>, JournalError> {
    let rows = csv_rows(content)?;
    Ok(map_rows("ledger", &Value::Array(rows), map_ledger_entry))
}
