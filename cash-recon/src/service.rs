//! Reconciliation service
//!
//! Async facade over a [`SessionSource`]: validates the request, loads the
//! records, then runs the pure engine. Source failures propagate unchanged
//! (no retries here); reconciliation math itself never fails.

use shared::error::{AppError, AppResult};
use shared::models::CashSession;

use crate::alerts::{Alert, session_alerts, sort_alerts};
use crate::compare::{Comparison, compare};
use crate::config::ReconConfig;
use crate::source::{SessionQuery, SessionSource};
use crate::stats::{ClosingStats, SessionFilter, aggregate_top};
use crate::summary::{ReconciliationSummary, summarize_session};

pub struct ReconService<S> {
    source: S,
    config: ReconConfig,
}

impl<S: SessionSource> ReconService<S> {
    pub fn new(source: S, config: ReconConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &ReconConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Summaries of every session passing the filter, in source order
    pub async fn summaries(&self, filter: &SessionFilter) -> AppResult<Vec<ReconciliationSummary>> {
        let sessions = self.load(filter).await?;
        Ok(sessions
            .iter()
            .filter_map(|session| {
                let summary = summarize_session(session);
                filter.matches(session, &summary).then_some(summary)
            })
            .collect())
    }

    /// Alerts of the filtered sessions, most severe first
    pub async fn alerts(&self, filter: &SessionFilter) -> AppResult<Vec<Alert>> {
        let sessions = self.load(filter).await?;
        let mut alerts = Vec::new();
        for session in &sessions {
            let summary = summarize_session(session);
            if filter.matches(session, &summary) {
                alerts.extend(session_alerts(session, &summary));
            }
        }
        sort_alerts(&mut alerts);

        tracing::debug!(
            sessions = sessions.len(),
            alerts = alerts.len(),
            "Generated reconciliation alerts"
        );
        Ok(alerts)
    }

    /// Closing statistics of the filtered window
    ///
    /// With a company selected, leaderboard names come from its cashier
    /// directory.
    pub async fn stats(&self, filter: &SessionFilter) -> AppResult<ClosingStats> {
        let sessions = self.load(filter).await?;
        let mut stats = aggregate_top(&sessions, filter, self.config.top_cashiers);

        if let Some(company_id) = &filter.company_id {
            let cashiers = self.source.fetch_cashiers(company_id).await.map_err(|e| {
                tracing::error!(company_id = %company_id, "Failed to load cashiers: {e}");
                AppError::from(e)
            })?;
            stats.apply_cashier_names(&cashiers);
        }

        Ok(stats)
    }

    /// Compare two sessions by id
    pub async fn compare_sessions(&self, id_a: &str, id_b: &str) -> AppResult<Comparison> {
        let a = self.find(id_a).await?;
        let b = self.find(id_b).await?;
        Ok(compare(&summarize_session(&a), &summarize_session(&b)))
    }

    async fn find(&self, id: &str) -> AppResult<CashSession> {
        if id.trim().is_empty() {
            return Err(
                AppError::validation("session id must not be empty").with_detail("field", "id"),
            );
        }
        let session = self.source.fetch_session(id).await.map_err(|e| {
            tracing::error!(session_id = %id, "Failed to load session: {e}");
            AppError::from(e)
        })?;
        let session = session.ok_or_else(|| AppError::session_not_found(id))?;
        warn_if_invalid(&session);
        Ok(session)
    }

    async fn load(&self, filter: &SessionFilter) -> AppResult<Vec<CashSession>> {
        filter.validate()?;

        let query = SessionQuery::from(filter);
        let sessions = self.source.fetch_sessions(&query).await.map_err(|e| {
            tracing::error!("Failed to load sessions: {e}");
            AppError::from(e)
        })?;

        tracing::debug!(count = sessions.len(), "Loaded cash sessions");
        for session in &sessions {
            warn_if_invalid(session);
        }
        Ok(sessions)
    }
}

fn warn_if_invalid(session: &CashSession) {
    if let Err(e) = session.validate() {
        tracing::warn!(session_id = %session.id, "Cash session violates record invariants: {e}");
    }
}
