//! Session comparator

use serde::{Deserialize, Serialize};

use crate::money::{sub_money, to_decimal, to_f64};
use crate::summary::ReconciliationSummary;

/// Deltas between two summaries, each computed as `a - b`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub session_a: String,
    pub session_b: String,
    pub declared_delta: f64,
    pub cash_counted_delta: f64,
    pub terminal_delta: f64,
    pub physical_discrepancy_delta: f64,
    /// Session with the smaller absolute physical discrepancy; `b` on ties
    pub more_precise: String,
}

pub fn compare(a: &ReconciliationSummary, b: &ReconciliationSummary) -> Comparison {
    let delta = |x: f64, y: f64| to_f64(sub_money(to_decimal(x), to_decimal(y)));

    let a_physical = to_decimal(a.discrepancy_vs_physical_total).abs();
    let b_physical = to_decimal(b.discrepancy_vs_physical_total).abs();
    let more_precise = if a_physical < b_physical {
        &a.session_id
    } else {
        &b.session_id
    };

    Comparison {
        session_a: a.session_id.clone(),
        session_b: b.session_id.clone(),
        declared_delta: delta(a.total_declared, b.total_declared),
        cash_counted_delta: delta(a.total_cash_counted, b.total_cash_counted),
        terminal_delta: delta(a.total_terminal_settlements, b.total_terminal_settlements),
        physical_discrepancy_delta: delta(
            a.discrepancy_vs_physical_total,
            b.discrepancy_vs_physical_total,
        ),
        more_precise: more_precise.clone(),
    }
}
