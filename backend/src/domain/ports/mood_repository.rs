//! Port for mood check-ins.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{MoodEntry, PairId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by mood repository adapters.
    pub enum MoodRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "mood repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "mood repository query failed: {message}",
    }
}

/// Mood persistence. Entries are append-only.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MoodRepository: Send + Sync {
    /// Append an entry.
    async fn insert(&self, entry: &MoodEntry) -> Result<(), MoodRepositoryError>;

    /// Newest entry for `(pair, user)` created at or after `since`.
    async fn latest_since(
        &self,
        pair_id: &PairId,
        user_id: &UserId,
        since: DateTime<Utc>,
    ) -> Result<Option<MoodEntry>, MoodRepositoryError>;
}
