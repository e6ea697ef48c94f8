//! Cash Count Model (arqueo)

use serde::{Deserialize, Serialize};

/// Physical cash count taken when a session closes
///
/// Independent of the declared channel totals; `fiscal_total` comes from the
/// certified fiscal device ("Z report").
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CashCountDetail {
    /// Counted cash in the primary foreign currency
    #[serde(default)]
    pub primary_foreign_cash: f64,
    /// Counted cash in the secondary foreign currency
    #[serde(default)]
    pub secondary_foreign_cash: f64,
    /// Counted cash in local currency
    #[serde(default)]
    pub local_cash: f64,
    /// Float kept in the drawer for the next day, local currency
    #[serde(default)]
    pub retained_local: f64,
    /// Float kept in the drawer for the next day, primary foreign currency
    #[serde(default)]
    pub retained_foreign: f64,
    /// Fiscal device total, absent when no reading was taken
    pub fiscal_total: Option<f64>,
    pub note: Option<String>,
}
