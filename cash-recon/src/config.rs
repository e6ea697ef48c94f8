use crate::stats::TOP_CASHIERS;

/// Engine configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | RECON_TOP_CASHIERS | 5 | length of the per-cashier leaderboard |
/// | LOG_LEVEL | info | tracing level |
/// | LOG_DIR | (unset) | directory for daily rolling log files |
/// | ENVIRONMENT | development | development / staging / production |
///
/// Discrepancy thresholds are constants in [`crate::classify`], not settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconConfig {
    /// Cashiers kept in the statistics leaderboard
    pub top_cashiers: usize,
    pub log_level: String,
    /// Log directory, stdout when unset
    pub log_dir: Option<String>,
    /// Runtime environment: development | staging | production
    pub environment: String,
}

impl ReconConfig {
    /// Load configuration from environment variables
    ///
    /// Unset or unparsable variables fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            top_cashiers: std::env::var("RECON_TOP_CASHIERS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.top_cashiers),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Override the leaderboard length
    pub fn with_top_cashiers(mut self, top_cashiers: usize) -> Self {
        self.top_cashiers = top_cashiers;
        self
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            top_cashiers: TOP_CASHIERS,
            log_level: "info".into(),
            log_dir: None,
            environment: "development".into(),
        }
    }
}
