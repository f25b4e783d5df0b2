//! Data core of a personal trading journal.
//!
//! Trades and ledger entries come in through the `api` adapters, live in a
//! caller-owned [`JournalSession`], and are folded into dashboard figures and
//! account statements by the pure functions in `commands`.

pub mod api;
pub mod commands;
pub mod error;
pub mod models;
pub mod session;

pub use commands::{
    AccountSummary, DashboardData, DateRange, EquityCurvePoint, ImportReport, RowType,
    StatementFilters, StatementRow, Summary, TradingReport, WinLoss,
};
pub use error::JournalError;
pub use models::{
    Direction, JournalSettings, LedgerEntry, LedgerKind, PartialExit, PartialExitMap, Trade,
    TradeStatus,
};
pub use session::JournalSession;
