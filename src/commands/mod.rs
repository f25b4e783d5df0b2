pub mod dashboard;
pub mod export;
pub mod import;
pub mod pnl;
pub mod report;
pub mod statement;
pub mod stats;

pub use dashboard::*;
pub use export::*;
pub use import::*;
pub use pnl::*;
pub use report::*;
pub use statement::*;
pub use stats::*;
