//! Terminal Settlement Model (cierre de punto de venta)

use serde::{Deserialize, Serialize};

/// Batch settlement reported by a card terminal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalSettlement {
    pub id: String,
    /// Issuing bank reference
    pub bank_ref: String,
    /// Settled amount, local currency
    pub local_amount: f64,
    /// Settled amount, foreign currency (informational)
    #[serde(default)]
    pub foreign_amount: f64,
    /// Terminal batch number
    pub batch_id: Option<String>,
}
