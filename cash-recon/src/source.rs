//! Session data source
//!
//! The engine never loads records itself; a [`SessionSource`] supplies
//! sessions with their nested cash count and settlements. Retries and
//! timeouts belong to the source.

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::error::{AppError, ErrorCode};
use shared::models::{CashSession, Cashier};
use thiserror::Error;

use crate::stats::SessionFilter;

/// Data source error types
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Session source unavailable: {0}")]
    Unavailable(String),

    #[error("Session source timed out: {0}")]
    Timeout(String),

    #[error("Malformed session record: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Decode(err.to_string())
    }
}

impl From<SourceError> for AppError {
    fn from(err: SourceError) -> Self {
        let code = match err {
            SourceError::Timeout(_) => ErrorCode::TimeoutError,
            SourceError::Unavailable(_) | SourceError::Decode(_) => ErrorCode::UpstreamFailure,
        };
        AppError::with_message(code, err.to_string())
    }
}

/// Result type for data source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// Query pushed down to the data source
///
/// Only the predicates a store can evaluate on raw records; the rest of
/// [`SessionFilter`] needs a summary and runs in the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionQuery {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub company_id: Option<String>,
    pub cashier_id: Option<String>,
}

impl SessionQuery {
    pub fn matches(&self, session: &CashSession) -> bool {
        self.date_from.is_none_or(|from| session.business_date >= from)
            && self.date_to.is_none_or(|to| session.business_date <= to)
            && self
                .company_id
                .as_ref()
                .is_none_or(|c| &session.company_id == c)
            && self
                .cashier_id
                .as_ref()
                .is_none_or(|c| session.cashier_id.as_ref() == Some(c))
    }
}

impl From<&SessionFilter> for SessionQuery {
    fn from(filter: &SessionFilter) -> Self {
        Self {
            date_from: filter.date_from,
            date_to: filter.date_to,
            company_id: filter.company_id.clone(),
            cashier_id: filter.cashier_id.clone(),
        }
    }
}

/// Supplier of session records and the cashier directory
#[async_trait]
pub trait SessionSource: Send + Sync {
    /// Sessions matching the query, with nested cash count and settlements
    async fn fetch_sessions(&self, query: &SessionQuery) -> SourceResult<Vec<CashSession>>;

    /// One session by id
    async fn fetch_session(&self, id: &str) -> SourceResult<Option<CashSession>>;

    /// Cashiers of a company
    async fn fetch_cashiers(&self, company_id: &str) -> SourceResult<Vec<Cashier>>;
}

/// Company-scoped cashier entry for [`InMemorySource`]
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
struct CompanyCashier {
    company_id: String,
    #[serde(flatten)]
    cashier: Cashier,
}

/// In-memory source over already materialized records
///
/// Serves exported snapshots and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    sessions: Vec<CashSession>,
    cashiers: Vec<(String, Cashier)>,
}

impl InMemorySource {
    pub fn new(sessions: Vec<CashSession>) -> Self {
        Self {
            sessions,
            cashiers: Vec::new(),
        }
    }

    /// Register a cashier for a company
    pub fn with_cashier(mut self, company_id: impl Into<String>, cashier: Cashier) -> Self {
        self.cashiers.push((company_id.into(), cashier));
        self
    }

    /// Load sessions from a JSON array
    pub fn from_json(sessions_json: &str) -> SourceResult<Self> {
        let sessions: Vec<CashSession> = serde_json::from_str(sessions_json)?;
        Ok(Self::new(sessions))
    }

    /// Load the cashier directory from a JSON array of
    /// `{ "company_id", "id", "display_name" }` objects
    pub fn with_cashiers_json(mut self, cashiers_json: &str) -> SourceResult<Self> {
        let entries: Vec<CompanyCashier> = serde_json::from_str(cashiers_json)?;
        self.cashiers
            .extend(entries.into_iter().map(|e| (e.company_id, e.cashier)));
        Ok(self)
    }
}

#[async_trait]
impl SessionSource for InMemorySource {
    async fn fetch_sessions(&self, query: &SessionQuery) -> SourceResult<Vec<CashSession>> {
        Ok(self
            .sessions
            .iter()
            .filter(|s| query.matches(s))
            .cloned()
            .collect())
    }

    async fn fetch_session(&self, id: &str) -> SourceResult<Option<CashSession>> {
        Ok(self.sessions.iter().find(|s| s.id == id).cloned())
    }

    async fn fetch_cashiers(&self, company_id: &str) -> SourceResult<Vec<Cashier>> {
        Ok(self
            .cashiers
            .iter()
            .filter(|(company, _)| company == company_id)
            .map(|(_, cashier)| cashier.clone())
            .collect())
    }
}
