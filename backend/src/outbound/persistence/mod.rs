//! PostgreSQL persistence adapters built on Diesel.
//!
//! Repositories are thin translators between row structs and domain values;
//! no interaction rules live here. Rows (`models.rs`) and table definitions
//! (`schema.rs`) stay private to this module.
//!
//! ```no_run
//! use pairspace::outbound::persistence::{DbPool, DieselNoticeRepository, PoolConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/pairspace")).await?;
//! let notices = DieselNoticeRepository::new(pool);
//! # drop(notices);
//! # Ok(())
//! # }
//! ```

mod diesel_gossip_repository;
mod diesel_helpers;
mod diesel_ledger_repository;
mod diesel_mood_repository;
mod diesel_notice_repository;
mod diesel_notification_repository;
mod diesel_pair_directory;
mod diesel_subscription_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_gossip_repository::DieselGossipRepository;
pub use diesel_ledger_repository::DieselLedgerRepository;
pub use diesel_mood_repository::DieselMoodRepository;
pub use diesel_notice_repository::DieselNoticeRepository;
pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_pair_directory::DieselPairDirectory;
pub use diesel_subscription_repository::DieselSubscriptionRepository;
pub use migrations::{
    MIGRATIONS, MigrationError, run_pending_migrations, run_pending_migrations_async,
};
pub use pool::{DbPool, PoolConfig, PoolError};
