use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One exit transaction of a trade that was closed in several steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialExit {
    pub trade_id: String,
    #[serde(default)]
    pub brokerage: f64,
    #[serde(default)]
    pub charges: f64,
    #[serde(default)]
    pub exit_price: Option<f64>,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub exit_date: Option<NaiveDate>,
}

impl PartialExit {
    pub fn new(trade_id: impl Into<String>, brokerage: f64, charges: f64) -> Self {
        Self {
            trade_id: trade_id.into(),
            brokerage,
            charges,
            exit_price: None,
            quantity: None,
            exit_date: None,
        }
    }

    pub fn total_charges(&self) -> f64 {
        let brokerage = if self.brokerage.is_finite() { self.brokerage } else { 0.0 };
        let charges = if self.charges.is_finite() { self.charges } else { 0.0 };
        brokerage + charges
    }
}

/// Partial exits keyed by trade id, each list in the order the backend returned it.
pub type PartialExitMap = HashMap<String, Vec<PartialExit>>;
