use crate::models::{JournalSettings, LedgerEntry, PartialExitMap, Trade};

/// Per-user journal state owned by the caller.
///
/// Created at sign-in, refreshed whenever the backend hands over new
/// snapshots, and cleared at sign-out. Nothing in the crate keeps state
/// outside of this struct.
#[derive(Debug, Clone, Default)]
pub struct JournalSession {
    user_id: Option<String>,
    trades: Vec<Trade>,
    ledger: Vec<LedgerEntry>,
    partial_exits: PartialExitMap,
    settings: JournalSettings,
}

impl JournalSession {
    pub fn new(user_id: impl Into<String>, settings: JournalSettings) -> Self {
        let user_id = user_id.into();
        log::info!("Journal session started for {}", user_id);
        Self {
            user_id: Some(user_id),
            settings,
            ..Default::default()
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.user_id.is_some()
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn ledger(&self) -> &[LedgerEntry] {
        &self.ledger
    }

    pub fn partial_exits(&self) -> &PartialExitMap {
        &self.partial_exits
    }

    pub fn settings(&self) -> &JournalSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: JournalSettings) {
        self.settings = settings;
    }

    pub fn replace_trades(&mut self, trades: Vec<Trade>) {
        log::debug!("Session trades replaced: {} records", trades.len());
        self.trades = trades;
    }

    pub fn replace_ledger(&mut self, ledger: Vec<LedgerEntry>) {
        log::debug!("Session ledger replaced: {} records", ledger.len());
        self.ledger = ledger;
    }

    pub fn replace_partial_exits(&mut self, partial_exits: PartialExitMap) {
        self.partial_exits = partial_exits;
    }

    /// Sign-out: drop the user and every collection, reset settings.
    pub fn clear(&mut self) {
        if let Some(user) = self.user_id.take() {
            log::info!("Journal session cleared for {}", user);
        }
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Direction;
    use chrono::NaiveDate;

    #[test]
    fn test_clear_resets_everything() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut session = JournalSession::new(
            "user-7",
            JournalSettings {
                account_value: Some(100.0),
                ..Default::default()
            },
        );
        session.replace_trades(vec![Trade::new("T1", "ITC", Direction::Long, 1.0, 1.0, date)]);
        session.replace_ledger(vec![LedgerEntry::deposit("L1", 10.0, date)]);
        assert!(session.is_active());
        assert_eq!(session.user_id(), Some("user-7"));

        session.clear();
        assert!(!session.is_active());
        assert!(session.trades().is_empty());
        assert!(session.ledger().is_empty());
        assert!(session.partial_exits().is_empty());
        assert_eq!(session.settings(), &JournalSettings::default());
    }
}
