//! Alert generation
//!
//! A session raises at most two alerts: one for a fiscal-report discrepancy
//! (severity from the fiscal scale) and one for a missing cash count (always
//! mild). The combined list is ordered most severe first; equal severities
//! keep session order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::models::CashSession;

use crate::classify::AlertSeverity;
use crate::summary::{ReconciliationSummary, summarize_session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    HighDiscrepancyVsFiscal,
    MissingCashCount,
}

impl AlertKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::HighDiscrepancyVsFiscal => "high_discrepancy_vs_fiscal",
            Self::MissingCashCount => "missing_cash_count",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub session_id: String,
    pub cashier_id: Option<String>,
    pub business_date: NaiveDate,
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub message: String,
}

impl Alert {
    fn for_session(
        session: &CashSession,
        kind: AlertKind,
        severity: AlertSeverity,
        message: String,
    ) -> Self {
        Self {
            session_id: session.id.clone(),
            cashier_id: session.cashier_id.clone(),
            business_date: session.business_date,
            kind,
            severity,
            message,
        }
    }
}

/// Alerts of one session, given its already computed summary
pub fn session_alerts(session: &CashSession, summary: &ReconciliationSummary) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if let Some(severity) = summary.fiscal_severity.alert_severity() {
        alerts.push(Alert::for_session(
            session,
            AlertKind::HighDiscrepancyVsFiscal,
            severity,
            format!(
                "Cashier {}: declared total differs from the fiscal report by {:.2} (foreign currency) on {}",
                session.cashier_label(),
                summary.discrepancy_vs_fiscal_report_foreign,
                session.business_date
            ),
        ));
    }

    if session.cash_count.is_none() {
        alerts.push(Alert::for_session(
            session,
            AlertKind::MissingCashCount,
            AlertSeverity::Mild,
            format!(
                "Cashier {}: session {} on {} has no cash count",
                session.cashier_label(),
                session.id,
                session.business_date
            ),
        ));
    }

    alerts
}

/// Order alerts most severe first, keeping relative order on ties
pub fn sort_alerts(alerts: &mut [Alert]) {
    // sort_by is stable
    alerts.sort_by(|a, b| b.severity.rank().cmp(&a.severity.rank()));
}

/// Scan sessions and return their alerts, most severe first
pub fn generate_alerts(sessions: &[CashSession]) -> Vec<Alert> {
    let mut alerts: Vec<Alert> = sessions
        .iter()
        .flat_map(|session| session_alerts(session, &summarize_session(session)))
        .collect();
    sort_alerts(&mut alerts);
    alerts
}
