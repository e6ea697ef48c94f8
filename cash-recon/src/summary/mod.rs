//! Reconciliation calculator
//!
//! Derives a [`ReconciliationSummary`] from one session, its optional cash
//! count and its terminal settlements. Nothing is cached; callers recompute on
//! every query.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{CashCountDetail, CashSession, PaymentChannel, TerminalSettlement};

use crate::classify::{
    FiscalSeverity, PhysicalBalance, classify_physical, exceeds_discrepancy_threshold,
    fiscal_severity,
};
use crate::currency::{channel_to_local, to_foreign, to_local};
use crate::money::{add_money, round_money, sub_money, sum_amounts, to_decimal, to_f64};

/// Declared amount of one channel, local currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelBreakdown {
    pub channel: PaymentChannel,
    pub amount: f64,
    pub count: i64,
}

/// Reconciliation figures of one session
///
/// Positive discrepancies mean the declared total exceeds what was verified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    pub session_id: String,
    pub cashier_id: Option<String>,
    /// Session still open; figures may change
    pub provisional: bool,
    pub has_cash_count: bool,
    /// Counted cash, local-currency equivalent
    pub total_cash_counted: f64,
    pub total_terminal_settlements: f64,
    /// Sum of the four channel totals, local currency
    pub total_declared: f64,
    /// `total_declared - fiscal_total`, zero without a positive fiscal total
    pub discrepancy_vs_fiscal_report: f64,
    /// `|discrepancy_vs_fiscal_report| / daily_rate`, rounded for display
    pub discrepancy_vs_fiscal_report_foreign: f64,
    /// Unrounded foreign equivalent reaches the has-discrepancy threshold
    pub has_discrepancy: bool,
    /// `total_declared - (total_cash_counted + total_terminal_settlements)`
    pub discrepancy_vs_physical_total: f64,
    pub physical_balance: PhysicalBalance,
    /// Bucket of the unrounded foreign equivalent
    pub fiscal_severity: FiscalSeverity,
    /// One entry per channel, in [`PaymentChannel::ALL`] order
    pub channels: Vec<ChannelBreakdown>,
}

/// Summarize a session with explicitly supplied detail records
pub fn summarize(
    session: &CashSession,
    cash_count: Option<&CashCountDetail>,
    settlements: &[TerminalSettlement],
) -> ReconciliationSummary {
    let rate = session.daily_rate;

    let cash_counted = cash_count
        .map(|c| {
            round_money(to_local(
                c.primary_foreign_cash,
                c.secondary_foreign_cash,
                c.local_cash,
                rate,
            ))
        })
        .unwrap_or(Decimal::ZERO);

    let terminal = round_money(sum_amounts(settlements.iter().map(|s| s.local_amount)));

    let mut channels = Vec::with_capacity(PaymentChannel::ALL.len());
    let mut declared = Decimal::ZERO;
    for channel in PaymentChannel::ALL {
        let total = session.channel(channel);
        let amount = round_money(channel_to_local(total, rate));
        declared = add_money(declared, amount);
        channels.push(ChannelBreakdown {
            channel,
            amount: to_f64(amount),
            count: total.count,
        });
    }

    let fiscal = fiscal_discrepancy(declared, cash_count);
    // buckets and the threshold see the exact quotient, never the 2 dp figure
    let fiscal_foreign = to_foreign(fiscal.abs(), rate);
    let physical = sub_money(declared, add_money(cash_counted, terminal));

    let discrepancy_vs_physical_total = to_f64(physical);

    ReconciliationSummary {
        session_id: session.id.clone(),
        cashier_id: session.cashier_id.clone(),
        provisional: !session.is_closed(),
        has_cash_count: cash_count.is_some(),
        total_cash_counted: to_f64(cash_counted),
        total_terminal_settlements: to_f64(terminal),
        total_declared: to_f64(declared),
        discrepancy_vs_fiscal_report: to_f64(fiscal),
        discrepancy_vs_fiscal_report_foreign: to_f64(fiscal_foreign),
        has_discrepancy: exceeds_discrepancy_threshold(fiscal_foreign),
        discrepancy_vs_physical_total,
        physical_balance: classify_physical(discrepancy_vs_physical_total),
        fiscal_severity: fiscal_severity(fiscal_foreign),
        channels,
    }
}

/// Summarize a session using its nested cash count and settlements
pub fn summarize_session(session: &CashSession) -> ReconciliationSummary {
    summarize(session, session.cash_count.as_ref(), &session.settlements)
}

/// Declared minus fiscal total, or zero when no positive fiscal reading exists
///
/// Sessions that never received a fiscal reading must not show a discrepancy
/// equal to their whole declared total.
fn fiscal_discrepancy(declared: Decimal, cash_count: Option<&CashCountDetail>) -> Decimal {
    match cash_count.and_then(|c| c.fiscal_total) {
        Some(fiscal) if to_decimal(fiscal) > Decimal::ZERO => {
            sub_money(declared, round_money(to_decimal(fiscal)))
        }
        _ => Decimal::ZERO,
    }
}
