use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::JournalError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerKind {
    Deposit,
    Withdrawal,
}

impl LedgerKind {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "deposit" => Some(LedgerKind::Deposit),
            "withdrawal" => Some(LedgerKind::Withdrawal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerKind::Deposit => "Deposit",
            LedgerKind::Withdrawal => "Withdrawal",
        }
    }
}

/// A deposit or withdrawal. `amount` is stored non-negative; the kind carries the sign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: LedgerKind,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: String,
}

impl LedgerEntry {
    pub fn new(id: impl Into<String>, kind: LedgerKind, amount: f64, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            kind,
            amount,
            date,
            notes: String::new(),
        }
    }

    pub fn deposit(id: impl Into<String>, amount: f64, date: NaiveDate) -> Self {
        Self::new(id, LedgerKind::Deposit, amount, date)
    }

    pub fn withdrawal(id: impl Into<String>, amount: f64, date: NaiveDate) -> Self {
        Self::new(id, LedgerKind::Withdrawal, amount, date)
    }

    /// Contribution to account capital: deposits add, withdrawals subtract.
    pub fn signed_amount(&self) -> f64 {
        let amount = if self.amount.is_finite() { self.amount.abs() } else { 0.0 };
        match self.kind {
            LedgerKind::Deposit => amount,
            LedgerKind::Withdrawal => -amount,
        }
    }

    pub fn validate(&self) -> Result<(), JournalError> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(JournalError::InvalidRecord(format!(
                "ledger entry {}: amount must be a non-negative number, got {}",
                self.id, self.amount
            )));
        }
        Ok(())
    }
}
