use crate::models::trade::finite_or_zero;
use crate::models::{Direction, PartialExit, Trade};

/// Realized net P&L of a single trade.
///
/// A P&L stored on the record wins. Otherwise `(exit - entry) * quantity`,
/// negated for shorts. Missing or zero pricing data gives 0.
pub fn net_pnl(trade: &Trade) -> f64 {
    if let Some(stored) = trade.net_pnl {
        return finite_or_zero(stored);
    }

    let entry = trade.entry_price;
    let exit = trade.exit_price.unwrap_or(0.0);
    let qty = trade.quantity;
    if !usable(entry) || !usable(exit) || !usable(qty) {
        return 0.0;
    }

    let raw = (exit - entry) * qty;
    let pnl = match trade.direction {
        Direction::Long => raw,
        Direction::Short => -raw,
    };
    finite_or_zero(pnl)
}

fn usable(value: f64) -> bool {
    value.is_finite() && value != 0.0
}

/// Charges attributed to a trade.
///
/// Partial exits sum `brokerage + charges` over their exit records when any are
/// supplied; everything else uses the trade's own brokerage and fees.
pub fn charges(trade: &Trade, partial_exits: Option<&[PartialExit]>) -> f64 {
    if trade.is_partial_exit() {
        if let Some(exits) = partial_exits.filter(|e| !e.is_empty()) {
            return exits.iter().map(PartialExit::total_charges).sum();
        }
    }
    trade.own_charges()
}

/// Gross P&L for display: net plus charges.
pub fn gross_pnl(trade: &Trade, partial_exits: Option<&[PartialExit]>) -> f64 {
    net_pnl(trade) + charges(trade, partial_exits)
}

/// Net P&L as a percentage of the capital put into the trade.
pub fn net_pnl_percentage(trade: &Trade, net: f64) -> f64 {
    let invested = trade.entry_price * trade.quantity;
    if !usable(invested) {
        return 0.0;
    }
    finite_or_zero(net / invested * 100.0)
}
