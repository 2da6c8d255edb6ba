//! Runtime configuration loaded via OrthoConfig.
//!
//! Every value may come from the command line, a configuration file, or a
//! `PAIRSPACE_*` environment variable. Unset values fall back to the defaults
//! exposed by the accessor methods.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{
    ActionWindow, DEFAULT_NOTICE_COOLDOWN_MINUTES, LedgerPolicy, NoticeRules, UnknownActionWindow,
};
use crate::inbound::http::state::CronSecret;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_VAPID_SUBJECT: &str = "mailto:admin@pairspace.invalid";
const DEFAULT_PUSH_TTL_SECONDS: u32 = 3600;
const DEFAULT_PUSH_TIMEOUT_SECONDS: u64 = 10;
const DEFAULT_DISPATCH_CONCURRENCY: usize = 16;

/// Errors raised when a configured value cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// `bind_addr` is not a socket address.
    #[error("invalid bind address '{value}'")]
    InvalidBindAddr {
        /// Value found.
        value: String,
    },
    /// A ledger window name is not recognised.
    #[error(transparent)]
    InvalidWindow(#[from] UnknownActionWindow),
}

/// Service configuration.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PAIRSPACE")]
pub struct Settings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string. In-memory adapters are used when unset.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Base64url VAPID private key. Push delivery is disabled when unset.
    pub vapid_private_key: Option<String>,
    /// VAPID `sub` claim, usually a `mailto:` address.
    pub vapid_subject: Option<String>,
    /// Push message time-to-live in seconds.
    pub push_ttl_seconds: Option<u32>,
    /// Per-request push delivery timeout in seconds.
    pub push_timeout_seconds: Option<u64>,
    /// Minutes a partner waits after an unanswered seen notice.
    pub notice_cooldown_minutes: Option<u32>,
    /// Frustration clicks allowed per window; uncapped when unset.
    pub frustration_daily_cap: Option<u32>,
    /// Counting window for sutta clicks (`rolling-24h` or `calendar-day`).
    pub sutta_window: Option<String>,
    /// Counting window for frustration clicks.
    pub frustration_window: Option<String>,
    /// Bearer secret for the scheduled mood prompt.
    pub cron_secret: Option<String>,
    /// Fixed seed for notification text selection.
    pub composer_seed: Option<u64>,
    /// Push deliveries processed concurrently by the background worker.
    pub dispatch_concurrency: Option<usize>,
}

impl Settings {
    /// Parsed bind address.
    ///
    /// # Errors
    /// Returns [`SettingsError::InvalidBindAddr`] for malformed addresses.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SettingsError::InvalidBindAddr {
            value: raw.to_owned(),
        })
    }

    /// Configured database URL, ignoring blank values.
    #[must_use]
    pub fn database_url(&self) -> Option<&str> {
        non_blank(self.database_url.as_deref())
    }

    /// Pool size.
    #[must_use]
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// VAPID key, ignoring blank values.
    #[must_use]
    pub fn vapid_private_key(&self) -> Option<&str> {
        non_blank(self.vapid_private_key.as_deref())
    }

    /// VAPID subject claim.
    #[must_use]
    pub fn vapid_subject(&self) -> &str {
        self.vapid_subject.as_deref().unwrap_or(DEFAULT_VAPID_SUBJECT)
    }

    /// Push time-to-live.
    #[must_use]
    pub fn push_ttl_seconds(&self) -> u32 {
        self.push_ttl_seconds.unwrap_or(DEFAULT_PUSH_TTL_SECONDS)
    }

    /// Push request timeout.
    #[must_use]
    pub fn push_timeout(&self) -> Duration {
        Duration::from_secs(
            self.push_timeout_seconds
                .unwrap_or(DEFAULT_PUSH_TIMEOUT_SECONDS),
        )
    }

    /// Notice turn-taking rules.
    #[must_use]
    pub fn notice_rules(&self) -> NoticeRules {
        NoticeRules::from_minutes(
            self.notice_cooldown_minutes
                .unwrap_or(DEFAULT_NOTICE_COOLDOWN_MINUTES),
        )
    }

    /// Daily-click ledger policy.
    ///
    /// # Errors
    /// Returns [`SettingsError::InvalidWindow`] when a window name is unknown.
    pub fn ledger_policy(&self) -> Result<LedgerPolicy, SettingsError> {
        let sutta = parse_window(self.sutta_window.as_deref())?;
        let frustration = parse_window(self.frustration_window.as_deref())?;
        Ok(LedgerPolicy::new(
            sutta,
            frustration,
            self.frustration_daily_cap,
        ))
    }

    /// Cron bearer secret; blank values disable the trigger.
    #[must_use]
    pub fn cron_secret(&self) -> Option<CronSecret> {
        self.cron_secret.clone().and_then(CronSecret::new)
    }

    /// Worker concurrency, never below one.
    #[must_use]
    pub fn dispatch_concurrency(&self) -> usize {
        self.dispatch_concurrency
            .unwrap_or(DEFAULT_DISPATCH_CONCURRENCY)
            .max(1)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|raw| !raw.trim().is_empty())
}

fn parse_window(raw: Option<&str>) -> Result<ActionWindow, SettingsError> {
    raw.map_or(Ok(ActionWindow::default()), |name| {
        name.trim().parse().map_err(SettingsError::from)
    })
}
