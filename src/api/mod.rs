pub mod dates;
pub mod mapper;

pub use dates::parse_date;
pub use mapper::{group_partial_exits, map_ledger_entry, map_partial_exit, map_trade};
