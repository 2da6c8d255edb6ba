//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use pairspace::domain::{LedgerPolicy, NoticeRules};
use pairspace::inbound::http::session_config::SessionSettings;
use pairspace::inbound::http::state::CronSecret;
use pairspace::outbound::persistence::DbPool;
use pairspace::outbound::push::WebPushConfig;

/// Tunables for the interaction services and the notification pipeline.
#[derive(Clone, Debug, Default)]
pub struct InteractionOptions {
    pub(crate) notice_rules: NoticeRules,
    pub(crate) ledger_policy: LedgerPolicy,
    pub(crate) push: Option<WebPushConfig>,
    pub(crate) cron_secret: Option<CronSecret>,
    pub(crate) composer_seed: Option<u64>,
    pub(crate) dispatch_concurrency: usize,
}

impl InteractionOptions {
    /// Start from default rules with push delivery disabled.
    #[must_use]
    pub fn new(notice_rules: NoticeRules, ledger_policy: LedgerPolicy) -> Self {
        Self {
            notice_rules,
            ledger_policy,
            dispatch_concurrency: 1,
            ..Self::default()
        }
    }

    /// Enable web push delivery.
    #[must_use]
    pub fn with_push(mut self, push: Option<WebPushConfig>) -> Self {
        self.push = push;
        self
    }

    /// Accept scheduler calls bearing `secret`.
    #[must_use]
    pub fn with_cron_secret(mut self, secret: Option<CronSecret>) -> Self {
        self.cron_secret = secret;
        self
    }

    /// Pin notification text selection to a seed.
    #[must_use]
    pub const fn with_composer_seed(mut self, seed: Option<u64>) -> Self {
        self.composer_seed = seed;
        self
    }

    /// Bound concurrent push deliveries.
    #[must_use]
    pub fn with_dispatch_concurrency(mut self, concurrency: usize) -> Self {
        self.dispatch_concurrency = concurrency.max(1);
        self
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) interactions: InteractionOptions,
}

impl ServerConfig {
    /// Construct a server configuration from validated session settings.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr, interactions: InteractionOptions) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            interactions,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// Without a pool every port is served by the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
