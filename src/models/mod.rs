pub mod ledger;
pub mod partial_exit;
pub mod settings;
pub mod trade;

pub use ledger::*;
pub use partial_exit::*;
pub use settings::*;
pub use trade::*;
