use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::JournalError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Long,
    Short,
}

impl Direction {
    /// Parse a direction label. "short" and "sell" are short, anything else is long.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "short" | "sell" => Direction::Short,
            _ => Direction::Long,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "long",
            Direction::Short => "short",
        }
    }
}

/// Lifecycle of a trade as shown in the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeStatus {
    Open,
    Partial,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: String,
    pub asset: String,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub segment: Option<String>,
    #[serde(default)]
    pub strategy: Option<String>,

    pub entry_price: f64,
    pub quantity: f64,
    pub entry_date: NaiveDate,

    #[serde(default)]
    pub exit_price: Option<f64>,
    #[serde(default)]
    pub exit_quantity: Option<f64>,
    #[serde(default)]
    pub exit_date: Option<NaiveDate>,

    #[serde(default)]
    pub brokerage: Option<f64>,
    #[serde(default)]
    pub other_fees: Option<f64>,

    /// Realized P&L stored by the backend, when it already computed one.
    #[serde(default)]
    pub net_pnl: Option<f64>,

    #[serde(default)]
    pub stop_loss: Option<f64>,
    #[serde(default)]
    pub target: Option<f64>,
    #[serde(default)]
    pub outcome_summary: Option<String>,
    #[serde(default)]
    pub emotional_state: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Trade {
    pub fn new(
        id: impl Into<String>,
        asset: impl Into<String>,
        direction: Direction,
        entry_price: f64,
        quantity: f64,
        entry_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            asset: asset.into(),
            direction,
            segment: None,
            strategy: None,
            entry_price,
            quantity,
            entry_date,
            exit_price: None,
            exit_quantity: None,
            exit_date: None,
            brokerage: None,
            other_fees: None,
            net_pnl: None,
            stop_loss: None,
            target: None,
            outcome_summary: None,
            emotional_state: None,
            notes: None,
        }
    }

    /// Record an exit. `quantity` of `None` means the whole position.
    pub fn with_exit(mut self, price: f64, quantity: Option<f64>, date: NaiveDate) -> Self {
        self.exit_price = Some(price);
        self.exit_quantity = quantity;
        self.exit_date = Some(date);
        self
    }

    pub fn with_charges(mut self, brokerage: f64, other_fees: f64) -> Self {
        self.brokerage = Some(brokerage);
        self.other_fees = Some(other_fees);
        self
    }

    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }

    /// Both an exit price and an exit date are set.
    ///
    /// This is the dashboard's notion of "closed" and includes partial exits.
    pub fn has_exit(&self) -> bool {
        self.exit_price.is_some_and(|p| p != 0.0) && self.exit_date.is_some()
    }

    pub fn is_partial_exit(&self) -> bool {
        self.has_exit()
            && self
                .exit_quantity
                .is_some_and(|q| q > 0.0 && q < self.quantity)
    }

    pub fn status(&self) -> TradeStatus {
        if !self.has_exit() {
            TradeStatus::Open
        } else if self.is_partial_exit() {
            TradeStatus::Partial
        } else {
            TradeStatus::Closed
        }
    }

    /// Brokerage plus other fees recorded on the trade itself.
    pub fn own_charges(&self) -> f64 {
        finite_or_zero(self.brokerage.unwrap_or(0.0)) + finite_or_zero(self.other_fees.unwrap_or(0.0))
    }

    pub fn validate(&self) -> Result<(), JournalError> {
        if !(self.quantity.is_finite() && self.quantity > 0.0) {
            return Err(JournalError::InvalidRecord(format!(
                "trade {}: quantity must be positive, got {}",
                self.id, self.quantity
            )));
        }
        if let Some(exit_qty) = self.exit_quantity {
            if !(exit_qty > 0.0 && exit_qty <= self.quantity) {
                return Err(JournalError::InvalidRecord(format!(
                    "trade {}: exit quantity {} outside (0, {}]",
                    self.id, exit_qty, self.quantity
                )));
            }
        }
        if let Some(exit_date) = self.exit_date {
            if exit_date < self.entry_date {
                return Err(JournalError::InvalidRecord(format!(
                    "trade {}: exit date {} before entry date {}",
                    self.id, exit_date, self.entry_date
                )));
            }
        }
        Ok(())
    }
}

pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
