//! Cash Session Model (caja diaria)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::cash_count::CashCountDetail;
use super::terminal_settlement::TerminalSettlement;
use crate::error::{AppError, AppResult};

/// Cash session status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionStatus {
    #[default]
    #[serde(rename = "OPEN")]
    Open,
    #[serde(rename = "CLOSED")]
    Closed,
}

/// Payment channels whose totals accrue on a session during the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentChannel {
    /// Mobile payments, always local currency
    Mobile,
    /// Channel settled in foreign currency (local + foreign parts)
    ForeignSettled,
    /// Credit notes issued
    CreditNote,
    /// Credit sales originated (local + foreign parts)
    CreditSale,
}

impl PaymentChannel {
    /// Fixed reporting order
    pub const ALL: [PaymentChannel; 4] = [
        PaymentChannel::Mobile,
        PaymentChannel::ForeignSettled,
        PaymentChannel::CreditNote,
        PaymentChannel::CreditSale,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::ForeignSettled => "foreign_settled",
            Self::CreditNote => "credit_note",
            Self::CreditSale => "credit_sale",
        }
    }
}

/// Declared total of one payment channel
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChannelTotal {
    /// Amount in local currency
    #[serde(default)]
    pub local: f64,
    /// Amount in primary foreign currency (converted with the session rate)
    #[serde(default)]
    pub foreign: f64,
    /// Number of transactions
    #[serde(default)]
    pub count: i64,
}

impl ChannelTotal {
    pub fn local(amount: f64, count: i64) -> Self {
        Self {
            local: amount,
            foreign: 0.0,
            count,
        }
    }

    pub fn mixed(local: f64, foreign: f64, count: i64) -> Self {
        Self {
            local,
            foreign,
            count,
        }
    }
}

/// Cash session - one cashier's register day for one company
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashSession {
    pub id: String,
    pub company_id: String,
    /// Cashier identity, null when the session was opened without one
    pub cashier_id: Option<String>,
    /// Cashier display name as recorded on the session
    pub cashier_name: Option<String>,
    /// Business date (YYYY-MM-DD)
    pub business_date: NaiveDate,
    /// Open time (Unix millis)
    pub open_time: i64,
    /// Close time (Unix millis), null while open
    pub close_time: Option<i64>,
    /// Opening float, local currency
    pub opening_cash_local: f64,
    /// Opening float, primary foreign currency
    #[serde(default)]
    pub opening_cash_foreign: f64,
    /// Fixed local-per-foreign rate for the day
    pub daily_rate: f64,
    /// Closing cash amount, set once at close
    pub closing_cash_local: Option<f64>,
    #[serde(default)]
    pub mobile_payments: ChannelTotal,
    #[serde(default)]
    pub foreign_settled: ChannelTotal,
    #[serde(default)]
    pub credit_notes: ChannelTotal,
    #[serde(default)]
    pub credit_sales: ChannelTotal,
    pub status: SessionStatus,
    pub note: Option<String>,

    // -- Relations (populated by the data source) --
    /// Cash count made at close, at most one
    #[serde(default)]
    pub cash_count: Option<CashCountDetail>,
    #[serde(default)]
    pub settlements: Vec<TerminalSettlement>,
}

impl CashSession {
    pub fn is_closed(&self) -> bool {
        self.status == SessionStatus::Closed
    }

    pub fn channel(&self, channel: PaymentChannel) -> &ChannelTotal {
        match channel {
            PaymentChannel::Mobile => &self.mobile_payments,
            PaymentChannel::ForeignSettled => &self.foreign_settled,
            PaymentChannel::CreditNote => &self.credit_notes,
            PaymentChannel::CreditSale => &self.credit_sales,
        }
    }

    /// Display name for messages: recorded name, then id, then a placeholder
    pub fn cashier_label(&self) -> &str {
        self.cashier_name
            .as_deref()
            .or(self.cashier_id.as_deref())
            .unwrap_or("unassigned")
    }

    /// Check the record invariants
    pub fn validate(&self) -> AppResult<()> {
        if self.id.trim().is_empty() {
            return Err(AppError::required_field("id"));
        }
        if self.company_id.trim().is_empty() {
            return Err(AppError::required_field("company_id"));
        }
        if self.daily_rate.is_nan() || self.daily_rate <= 0.0 {
            return Err(AppError::validation(format!(
                "daily_rate must be positive: {}",
                self.daily_rate
            ))
            .with_detail("session_id", self.id.as_str()));
        }
        for channel in PaymentChannel::ALL {
            let total = self.channel(channel);
            if total.local < 0.0 || total.foreign < 0.0 || total.count < 0 {
                return Err(AppError::validation(format!(
                    "{} total cannot be negative",
                    channel.label()
                ))
                .with_detail("session_id", self.id.as_str()));
            }
        }
        if self.is_closed() && self.close_time.is_none() {
            return Err(
                AppError::validation("Closed session has no close time")
                    .with_detail("session_id", self.id.as_str()),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> CashSession {
        CashSession {
            id: "S-1".into(),
            company_id: "C-1".into(),
            cashier_id: Some("U-1".into()),
            cashier_name: Some("Ana".into()),
            business_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            open_time: 1_709_280_000_000,
            close_time: Some(1_709_316_000_000),
            opening_cash_local: 100.0,
            opening_cash_foreign: 0.0,
            daily_rate: 36.5,
            closing_cash_local: Some(500.0),
            mobile_payments: ChannelTotal::local(200.0, 4),
            foreign_settled: ChannelTotal::mixed(0.0, 10.0, 1),
            credit_notes: ChannelTotal::default(),
            credit_sales: ChannelTotal::default(),
            status: SessionStatus::Closed,
            note: None,
            cash_count: None,
            settlements: vec![],
        }
    }

    #[test]
    fn test_valid_session() {
        assert!(session().validate().is_ok());
    }

    #[test]
    fn test_closed_without_close_time() {
        let mut s = session();
        s.close_time = None;
        assert!(s.validate().is_err());

        s.status = SessionStatus::Open;
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_negative_channel_total() {
        let mut s = session();
        s.credit_notes.local = -1.0;
        let err = s.validate().unwrap_err();
        assert_eq!(err.message, "credit_note total cannot be negative");
    }

    #[test]
    fn test_non_positive_rate() {
        let mut s = session();
        s.daily_rate = 0.0;
        assert!(s.validate().is_err());
        s.daily_rate = f64::NAN;
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_status_serde() {
        assert_eq!(
            serde_json::to_string(&SessionStatus::Closed).unwrap(),
            "\"CLOSED\""
        );
        assert_eq!(SessionStatus::default(), SessionStatus::Open);
    }

    #[test]
    fn test_deserialize_without_relations() {
        let json = r#"{
            "id": "S-2", "company_id": "C-1", "cashier_id": null, "cashier_name": null,
            "business_date": "2024-03-02", "open_time": 0, "close_time": null,
            "opening_cash_local": 50.0, "daily_rate": 40.0, "closing_cash_local": null,
            "mobile_payments": {"local": 12.5, "count": 1},
            "status": "OPEN", "note": null
        }"#;
        let s: CashSession = serde_json::from_str(json).unwrap();
        assert!(s.cash_count.is_none());
        assert!(s.settlements.is_empty());
        assert_eq!(s.mobile_payments.local, 12.5);
        assert_eq!(s.credit_sales, ChannelTotal::default());
        assert_eq!(s.cashier_label(), "unassigned");
    }
}
