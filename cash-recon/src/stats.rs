//! Closing statistics over a window of sessions
//!
//! Filters are applied first; rollups and the per-cashier leaderboard are
//! computed over the matched sessions only.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};
use shared::models::{CashSession, Cashier, SessionStatus};

use crate::money::{add_money, round_money, to_decimal, to_f64};
use crate::summary::{ReconciliationSummary, summarize_session};

/// Default length of the per-cashier leaderboard
pub const TOP_CASHIERS: usize = 5;

pub use crate::classify::HAS_DISCREPANCY_THRESHOLD;

/// Session selection for statistics and listings
///
/// Date bounds are inclusive business dates; amount bounds apply to the
/// declared total.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionFilter {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub company_id: Option<String>,
    pub cashier_id: Option<String>,
    pub status: Option<SessionStatus>,
    /// Keep only sessions at or above [`HAS_DISCREPANCY_THRESHOLD`]
    #[serde(default)]
    pub only_with_discrepancy: bool,
    pub min_declared: Option<f64>,
    pub max_declared: Option<f64>,
}

impl SessionFilter {
    pub fn for_company(company_id: impl Into<String>) -> Self {
        Self {
            company_id: Some(company_id.into()),
            ..Default::default()
        }
    }

    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.date_from = Some(from);
        self.date_to = Some(to);
        self
    }

    /// Reject malformed filters before any query is issued
    pub fn validate(&self) -> AppResult<()> {
        for (field, value) in [
            ("company_id", &self.company_id),
            ("cashier_id", &self.cashier_id),
        ] {
            if let Some(id) = value
                && id.trim().is_empty()
            {
                return Err(
                    AppError::validation(format!("{field} must not be empty"))
                        .with_detail("field", field),
                );
            }
        }

        if let (Some(from), Some(to)) = (self.date_from, self.date_to)
            && from > to
        {
            return Err(AppError::validation(format!(
                "date_from {from} is after date_to {to}"
            )));
        }

        for (field, value) in [
            ("min_declared", self.min_declared),
            ("max_declared", self.max_declared),
        ] {
            if let Some(v) = value
                && (!v.is_finite() || v < 0.0)
            {
                return Err(AppError::validation(format!(
                    "{field} must be a non-negative number, got {v}"
                ))
                .with_detail("field", field));
            }
        }

        if let (Some(min), Some(max)) = (self.min_declared, self.max_declared)
            && min > max
        {
            return Err(AppError::validation(format!(
                "min_declared {min} exceeds max_declared {max}"
            )));
        }

        Ok(())
    }

    /// Whether a session (with its summary) passes every filter
    pub fn matches(&self, session: &CashSession, summary: &ReconciliationSummary) -> bool {
        if let Some(from) = self.date_from
            && session.business_date < from
        {
            return false;
        }
        if let Some(to) = self.date_to
            && session.business_date > to
        {
            return false;
        }
        if let Some(company) = &self.company_id
            && &session.company_id != company
        {
            return false;
        }
        if let Some(cashier) = &self.cashier_id
            && session.cashier_id.as_ref() != Some(cashier)
        {
            return false;
        }
        if let Some(status) = self.status
            && session.status != status
        {
            return false;
        }
        if self.only_with_discrepancy && !has_discrepancy(summary) {
            return false;
        }
        let declared = to_decimal(summary.total_declared);
        if let Some(min) = self.min_declared
            && declared < to_decimal(min)
        {
            return false;
        }
        if let Some(max) = self.max_declared
            && declared > to_decimal(max)
        {
            return false;
        }
        true
    }
}

/// Fiscal-scale discrepancy of at least one foreign-currency unit, decided on
/// the unrounded foreign equivalent
pub fn has_discrepancy(summary: &ReconciliationSummary) -> bool {
    summary.has_discrepancy
}

/// Per-cashier leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashierStats {
    pub cashier_id: String,
    pub cashier_name: Option<String>,
    pub session_count: usize,
    /// Mean fiscal discrepancy, foreign-currency equivalent
    pub mean_discrepancy: f64,
}

/// Rollup of the matched sessions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClosingStats {
    pub session_count: usize,
    pub discrepancy_count: usize,
    /// Sessions without a cash count
    pub missing_cash_count: usize,
    /// Mean fiscal discrepancy, foreign-currency equivalent; zero when empty
    pub mean_discrepancy: f64,
    pub total_cash_counted: f64,
    pub total_declared: f64,
    pub total_terminal_settlements: f64,
    pub total_closing_cash: f64,
    /// Busiest cashiers first
    pub top_cashiers: Vec<CashierStats>,
}

impl ClosingStats {
    /// Replace cashier names with the directory's display names
    pub fn apply_cashier_names(&mut self, cashiers: &[Cashier]) {
        for entry in &mut self.top_cashiers {
            if let Some(cashier) = cashiers.iter().find(|c| c.id == entry.cashier_id) {
                entry.cashier_name = Some(cashier.display_name.clone());
            }
        }
    }
}

#[derive(Default)]
struct CashierAccumulator {
    cashier_id: String,
    cashier_name: Option<String>,
    session_count: usize,
    discrepancy_sum: Decimal,
}

/// Aggregate with the default leaderboard length
pub fn aggregate(sessions: &[CashSession], filter: &SessionFilter) -> ClosingStats {
    aggregate_top(sessions, filter, TOP_CASHIERS)
}

/// Aggregate keeping at most `top` cashiers in the leaderboard
pub fn aggregate_top(sessions: &[CashSession], filter: &SessionFilter, top: usize) -> ClosingStats {
    let matched: Vec<(&CashSession, ReconciliationSummary)> = sessions
        .iter()
        .map(|session| (session, summarize_session(session)))
        .filter(|(session, summary)| filter.matches(session, summary))
        .collect();

    let mut stats = ClosingStats {
        session_count: matched.len(),
        ..Default::default()
    };
    if matched.is_empty() {
        return stats;
    }

    let mut discrepancy_sum = Decimal::ZERO;
    let mut cash_counted = Decimal::ZERO;
    let mut declared = Decimal::ZERO;
    let mut terminal = Decimal::ZERO;
    let mut closing = Decimal::ZERO;

    // first-seen order, so equal counts keep a deterministic order
    let mut cashiers: Vec<CashierAccumulator> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for (session, summary) in &matched {
        let discrepancy = to_decimal(summary.discrepancy_vs_fiscal_report_foreign);
        discrepancy_sum = add_money(discrepancy_sum, discrepancy);
        cash_counted = add_money(cash_counted, to_decimal(summary.total_cash_counted));
        declared = add_money(declared, to_decimal(summary.total_declared));
        terminal = add_money(terminal, to_decimal(summary.total_terminal_settlements));
        closing = add_money(closing, to_decimal(session.closing_cash_local.unwrap_or(0.0)));

        if has_discrepancy(summary) {
            stats.discrepancy_count += 1;
        }
        if !summary.has_cash_count {
            stats.missing_cash_count += 1;
        }

        let Some(cashier_id) = session.cashier_id.as_deref() else {
            continue;
        };
        let slot = *index.entry(cashier_id).or_insert_with(|| {
            cashiers.push(CashierAccumulator {
                cashier_id: cashier_id.to_string(),
                cashier_name: session.cashier_name.clone(),
                ..Default::default()
            });
            cashiers.len() - 1
        });
        let acc = &mut cashiers[slot];
        acc.session_count += 1;
        acc.discrepancy_sum = add_money(acc.discrepancy_sum, discrepancy);
    }

    stats.mean_discrepancy = to_f64(mean(discrepancy_sum, matched.len()));
    stats.total_cash_counted = to_f64(cash_counted);
    stats.total_declared = to_f64(declared);
    stats.total_terminal_settlements = to_f64(terminal);
    stats.total_closing_cash = to_f64(closing);

    // stable: ties keep first-seen order
    cashiers.sort_by(|a, b| b.session_count.cmp(&a.session_count));
    stats.top_cashiers = cashiers
        .into_iter()
        .take(top)
        .map(|acc| CashierStats {
            mean_discrepancy: to_f64(mean(acc.discrepancy_sum, acc.session_count)),
            cashier_id: acc.cashier_id,
            cashier_name: acc.cashier_name,
            session_count: acc.session_count,
        })
        .collect();

    stats
}

fn mean(sum: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    round_money(sum / Decimal::from(count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{CashCountDetail, ChannelTotal};

    fn session(
        id: &str,
        cashier: Option<&str>,
        day: u32,
        declared: f64,
        fiscal_total: Option<f64>,
    ) -> CashSession {
        CashSession {
            id: id.to_string(),
            company_id: "C-1".to_string(),
            cashier_id: cashier.map(str::to_string),
            cashier_name: cashier.map(|c| format!("name-{c}")),
            business_date: NaiveDate::from_ymd_opt(2024, 7, day).unwrap(),
            open_time: 0,
            close_time: Some(1),
            opening_cash_local: 0.0,
            opening_cash_foreign: 0.0,
            daily_rate: 40.0,
            closing_cash_local: Some(declared),
            mobile_payments: ChannelTotal::local(declared, 1),
            foreign_settled: ChannelTotal::default(),
            credit_notes: ChannelTotal::default(),
            credit_sales: ChannelTotal::default(),
            status: SessionStatus::Closed,
            note: None,
            cash_count: Some(CashCountDetail {
                local_cash: declared,
                fiscal_total,
                ..Default::default()
            }),
            settlements: vec![],
        }
    }

    #[test]
    fn test_empty_window_has_zero_mean() {
        let stats = aggregate(&[], &SessionFilter::default());
        assert_eq!(stats.session_count, 0);
        assert_eq!(stats.mean_discrepancy, 0.0);
        assert!(stats.top_cashiers.is_empty());

        let sessions = vec![session("S-1", Some("A"), 1, 100.0, None)];
        let filter = SessionFilter::for_company("C-other");
        let stats = aggregate(&sessions, &filter);
        assert_eq!(stats.session_count, 0);
        assert_eq!(stats.mean_discrepancy, 0.0);
    }

    #[test]
    fn test_totals_and_mean() {
        let mut with_terminal = session("S-3", Some("B"), 3, 300.0, None);
        with_terminal.settlements.push(shared::models::TerminalSettlement {
            id: "T-1".to_string(),
            bank_ref: "B1".to_string(),
            local_amount: 25.5,
            foreign_amount: 0.0,
            batch_id: None,
        });
        let sessions = vec![
            session("S-1", Some("A"), 1, 1000.0, Some(960.0)), // 1.00
            session("S-2", Some("A"), 2, 1000.0, Some(880.0)), // 3.00
            with_terminal,                                     // 0
        ];
        let stats = aggregate(&sessions, &SessionFilter::default());

        assert_eq!(stats.session_count, 3);
        assert_eq!(stats.discrepancy_count, 2);
        assert_eq!(stats.missing_cash_count, 0);
        assert_eq!(stats.mean_discrepancy, 1.33);
        assert_eq!(stats.total_declared, 2300.0);
        assert_eq!(stats.total_cash_counted, 2300.0);
        assert_eq!(stats.total_terminal_settlements, 25.5);
        assert_eq!(stats.total_closing_cash, 2300.0);
    }

    #[test]
    fn test_has_discrepancy_threshold_is_inclusive() {
        let sessions = vec![
            session("S-1", Some("A"), 1, 1000.0, Some(960.0)), // exactly 1.00
            session("S-2", Some("A"), 1, 1000.0, Some(961.0)), // 0.98
        ];
        let filter = SessionFilter {
            only_with_discrepancy: true,
            ..Default::default()
        };
        let stats = aggregate(&sessions, &filter);
        assert_eq!(stats.session_count, 1);
        assert_eq!(stats.discrepancy_count, 1);
    }

    #[test]
    fn test_has_discrepancy_ignores_display_rounding() {
        let sessions = vec![
            session("S-1", Some("A"), 1, 1000.0, Some(960.16)), // 0.996, shown as 1.00
            session("S-2", Some("A"), 1, 1000.0, Some(959.96)), // 1.001
        ];
        let stats = aggregate(&sessions, &SessionFilter::default());
        assert_eq!(stats.discrepancy_count, 1);

        let filter = SessionFilter {
            only_with_discrepancy: true,
            ..Default::default()
        };
        let stats = aggregate(&sessions, &filter);
        assert_eq!(stats.session_count, 1);
        assert_eq!(stats.mean_discrepancy, 1.0);
    }

    #[test]
    fn test_filters_apply_before_aggregation() {
        let sessions = vec![
            session("S-1", Some("A"), 1, 100.0, None),
            session("S-2", Some("A"), 5, 200.0, None),
            session("S-3", Some("B"), 10, 300.0, None),
            session("S-4", Some("B"), 20, 400.0, None),
        ];

        let by_date = SessionFilter::default().between(
            NaiveDate::from_ymd_opt(2024, 7, 5).unwrap(),
            NaiveDate::from_ymd_opt(2024, 7, 10).unwrap(),
        );
        let stats = aggregate(&sessions, &by_date);
        assert_eq!(stats.session_count, 2);
        assert_eq!(stats.total_declared, 500.0);

        let by_cashier = SessionFilter {
            cashier_id: Some("B".to_string()),
            ..Default::default()
        };
        assert_eq!(aggregate(&sessions, &by_cashier).total_declared, 700.0);

        let by_amount = SessionFilter {
            min_declared: Some(200.0),
            max_declared: Some(300.0),
            ..Default::default()
        };
        assert_eq!(aggregate(&sessions, &by_amount).session_count, 2);

        let by_status = SessionFilter {
            status: Some(SessionStatus::Open),
            ..Default::default()
        };
        assert_eq!(aggregate(&sessions, &by_status).session_count, 0);
    }

    #[test]
    fn test_leaderboard_sorted_and_truncated() {
        let mut sessions = Vec::new();
        let plan = [("A", 1), ("B", 3), ("C", 2), ("D", 3), ("E", 1), ("F", 4)];
        for (cashier, n) in plan {
            for i in 0..n {
                sessions.push(session(&format!("{cashier}-{i}"), Some(cashier), 1, 10.0, None));
            }
        }
        let stats = aggregate(&sessions, &SessionFilter::default());

        let board: Vec<(&str, usize)> = stats
            .top_cashiers
            .iter()
            .map(|c| (c.cashier_id.as_str(), c.session_count))
            .collect();
        assert_eq!(board, vec![("F", 4), ("B", 3), ("D", 3), ("C", 2), ("A", 1)]);
        assert_eq!(stats.top_cashiers[0].cashier_name.as_deref(), Some("name-F"));

        let top2 = aggregate_top(&sessions, &SessionFilter::default(), 2);
        assert_eq!(top2.top_cashiers.len(), 2);
    }

    #[test]
    fn test_null_cashier_counted_but_not_ranked() {
        let sessions = vec![
            session("S-1", None, 1, 100.0, None),
            session("S-2", Some("A"), 1, 100.0, Some(60.0)), // 1.00
            session("S-3", Some("A"), 1, 100.0, Some(20.0)), // 2.00
        ];
        let stats = aggregate(&sessions, &SessionFilter::default());
        assert_eq!(stats.session_count, 3);
        assert_eq!(stats.total_declared, 300.0);
        assert_eq!(stats.top_cashiers.len(), 1);
        assert_eq!(stats.top_cashiers[0].session_count, 2);
        assert_eq!(stats.top_cashiers[0].mean_discrepancy, 1.5);
    }

    #[test]
    fn test_missing_cash_count_and_null_closing() {
        let mut s = session("S-1", Some("A"), 1, 100.0, None);
        s.cash_count = None;
        s.closing_cash_local = None;
        let stats = aggregate(&[s], &SessionFilter::default());
        assert_eq!(stats.missing_cash_count, 1);
        assert_eq!(stats.total_closing_cash, 0.0);
    }

    #[test]
    fn test_apply_cashier_names() {
        let sessions = vec![session("S-1", Some("A"), 1, 100.0, None)];
        let mut stats = aggregate(&sessions, &SessionFilter::default());
        stats.apply_cashier_names(&[Cashier {
            id: "A".to_string(),
            display_name: "Alicia".to_string(),
        }]);
        assert_eq!(stats.top_cashiers[0].cashier_name.as_deref(), Some("Alicia"));
    }

    #[test]
    fn test_filter_validation() {
        assert!(SessionFilter::default().validate().is_ok());
        assert!(SessionFilter::for_company("C-1").validate().is_ok());
        assert!(SessionFilter::for_company("  ").validate().is_err());

        let inverted_dates = SessionFilter::default().between(
            NaiveDate::from_ymd_opt(2024, 7, 10).unwrap(),
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
        );
        assert!(inverted_dates.validate().is_err());

        let inverted_amounts = SessionFilter {
            min_declared: Some(10.0),
            max_declared: Some(5.0),
            ..Default::default()
        };
        assert!(inverted_amounts.validate().is_err());

        let negative = SessionFilter {
            min_declared: Some(-1.0),
            ..Default::default()
        };
        let err = negative.validate().unwrap_err();
        assert_eq!(err.code, shared::ErrorCode::ValidationFailed);
    }
}
