use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::report::{TradingReport, trading_report};
use super::statement::{StatementFilters, StatementRow, build_statement};
use super::stats::{
    AccountSummary, DateRange, EquityCurvePoint, Summary, account_summary, compute_summary,
    equity_curve,
};
use crate::session::JournalSession;

/// Everything the dashboard renders in one pass. All nested fields serialize camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub summary: Summary,
    pub account: AccountSummary,
    pub report: TradingReport,
}

pub fn load_dashboard(session: &JournalSession) -> DashboardData {
    let summary = compute_summary(
        session.trades(),
        session.ledger(),
        session.settings().account_value,
    );
    let account = account_summary(session.trades(), session.ledger());
    let report = trading_report(session.trades(), session.settings().risk_free_rate);

    log::debug!(
        "Dashboard loaded: {} closed trades, net P&L {:.2}",
        summary.trade_count,
        summary.net_pnl
    );

    DashboardData {
        summary,
        account,
        report,
    }
}

pub fn load_statement(session: &JournalSession, filters: &StatementFilters) -> Vec<StatementRow> {
    build_statement(
        session.trades(),
        session.ledger(),
        Some(session.partial_exits()),
        filters,
    )
}

pub fn load_equity_curve(
    session: &JournalSession,
    range: DateRange,
    today: NaiveDate,
) -> Vec<EquityCurvePoint> {
    equity_curve(session.trades(), range, today)
}
