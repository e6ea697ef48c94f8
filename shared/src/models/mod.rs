//! Data models
//!
//! Records produced by the session data source and consumed by the
//! reconciliation engine. Money values are `f64` at this boundary.

pub mod cash_count;
pub mod cash_session;
pub mod cashier;
pub mod terminal_settlement;

// Re-exports
pub use cash_count::*;
pub use cash_session::*;
pub use cashier::*;
pub use terminal_settlement::*;
