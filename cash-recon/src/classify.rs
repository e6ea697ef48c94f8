//! Discrepancy classification
//!
//! Two independent scales:
//! - physical scale: declared total vs. counted cash + terminal settlements,
//!   local currency, used to color session lists;
//! - fiscal scale: declared total vs. the fiscal device report, foreign
//!   currency equivalent, used for alerting.
//!
//! Both are total functions; odd input (NaN, negative magnitudes) lands in the
//! lowest bucket. Fiscal buckets are decided on the unrounded value; the 2 dp
//! figure is for display only.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::to_decimal;

/// Physical discrepancies below this are balanced (local currency)
pub const PHYSICAL_BALANCED_BELOW: Decimal = Decimal::ONE;
/// Physical discrepancies from this upward require review (local currency)
pub const PHYSICAL_REVIEW_FROM: Decimal = Decimal::from_parts(50, 0, 0, false, 0);
/// Upper edge (inclusive) of the mild fiscal bucket (foreign equivalent)
pub const FISCAL_MILD_MAX: Decimal = Decimal::from_parts(5, 0, 0, false, 0);
/// Upper edge (inclusive) of the moderate fiscal bucket (foreign equivalent)
pub const FISCAL_MODERATE_MAX: Decimal = Decimal::from_parts(15, 0, 0, false, 0);
/// Fiscal foreign-equivalent discrepancy from which a session counts as
/// "with discrepancy"
pub const HAS_DISCREPANCY_THRESHOLD: Decimal = Decimal::ONE;

/// Physical-scale bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhysicalBalance {
    /// `< 1`
    Balanced,
    /// `[1, 50)`
    Acceptable,
    /// `>= 50`
    RequiresReview,
}

impl PhysicalBalance {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::Acceptable => "acceptable",
            Self::RequiresReview => "requires_review",
        }
    }
}

/// Alert severity, ordered `Mild < Moderate < Severe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Mild,
    Moderate,
    Severe,
}

impl AlertSeverity {
    /// Sort rank, higher is more severe
    pub fn rank(&self) -> u8 {
        match self {
            Self::Mild => 1,
            Self::Moderate => 2,
            Self::Severe => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
        }
    }
}

/// Fiscal-scale bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FiscalSeverity {
    /// `0`, no alert
    None,
    /// `(0, 5]`
    Mild,
    /// `(5, 15]`
    Moderate,
    /// `> 15`
    Severe,
}

impl FiscalSeverity {
    /// Severity of the alert this bucket raises, if any
    pub fn alert_severity(&self) -> Option<AlertSeverity> {
        match self {
            Self::None => None,
            Self::Mild => Some(AlertSeverity::Mild),
            Self::Moderate => Some(AlertSeverity::Moderate),
            Self::Severe => Some(AlertSeverity::Severe),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
        }
    }
}

/// Classify a physical discrepancy (signed, local currency) by magnitude
pub fn classify_physical(discrepancy: f64) -> PhysicalBalance {
    let magnitude = to_decimal(discrepancy).abs();
    if magnitude < PHYSICAL_BALANCED_BELOW {
        PhysicalBalance::Balanced
    } else if magnitude < PHYSICAL_REVIEW_FROM {
        PhysicalBalance::Acceptable
    } else {
        PhysicalBalance::RequiresReview
    }
}

/// Classify a fiscal discrepancy expressed as foreign-currency equivalent
pub fn classify_fiscal(foreign_equivalent: f64) -> FiscalSeverity {
    fiscal_severity(to_decimal(foreign_equivalent))
}

/// [`classify_fiscal`] on an exact (unrounded) foreign equivalent
pub fn fiscal_severity(value: Decimal) -> FiscalSeverity {
    if value <= Decimal::ZERO {
        FiscalSeverity::None
    } else if value <= FISCAL_MILD_MAX {
        FiscalSeverity::Mild
    } else if value <= FISCAL_MODERATE_MAX {
        FiscalSeverity::Moderate
    } else {
        FiscalSeverity::Severe
    }
}

/// Whether an exact fiscal foreign equivalent reaches [`HAS_DISCREPANCY_THRESHOLD`]
pub fn exceeds_discrepancy_threshold(value: Decimal) -> bool {
    value >= HAS_DISCREPANCY_THRESHOLD
}
