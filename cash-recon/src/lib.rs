//! Cash-session reconciliation engine
//!
//! Reconciles what a cash session's channel totals declare against what was
//! physically verified (counted cash, terminal settlements) and against the
//! fiscal device report, then classifies, compares, aggregates and raises
//! alerts. Every computation is a pure function over loaded records;
//! [`service::ReconService`] adds the async loading boundary.

pub mod alerts;
pub mod classify;
pub mod compare;
pub mod config;
pub mod currency;
pub mod logger;
pub mod money;
pub mod service;
pub mod source;
pub mod stats;
pub mod summary;

// Re-exports
pub use alerts::{Alert, AlertKind, generate_alerts};
pub use classify::{
    AlertSeverity, FiscalSeverity, PhysicalBalance, classify_fiscal, classify_physical,
};
pub use compare::{Comparison, compare};
pub use config::ReconConfig;
pub use currency::to_local;
pub use service::ReconService;
pub use source::{InMemorySource, SessionQuery, SessionSource, SourceError, SourceResult};
pub use stats::{CashierStats, ClosingStats, SessionFilter, aggregate};
pub use summary::{ChannelBreakdown, ReconciliationSummary, summarize, summarize_session};
