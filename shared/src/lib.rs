//! Shared types for cash reconciliation
//!
//! Session records, cashier directory entries and the unified error system,
//! used by the engine and by whatever loads and renders its results.

pub mod error;
pub mod models;

// Re-exports
pub use error::{AppError, AppResult, ErrorCode};
pub use serde::{Deserialize, Serialize};
