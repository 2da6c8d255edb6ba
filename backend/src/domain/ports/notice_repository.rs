//! Port for notice storage.
//!
//! Every mutation is conditional so the adapter can enforce per-pair
//! linearizability without the domain holding locks:
//!
//! - inserts only land if the pair's latest notice is still the one the
//!   caller evaluated the turn rules against;
//! - edits only land while `is_edited` is false and `editable_until` has not
//!   passed;
//! - seen marks only land while `seen_at` is null.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{MessageContent, Notice, NoticeId, PairId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by notice repository adapters.
    pub enum NoticeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "notice repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "notice repository query failed: {message}",
    }
}

/// Notice persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NoticeRepository: Send + Sync {
    /// Most recently created notice for the pair.
    async fn latest_for_pair(&self, pair_id: &PairId)
    -> Result<Option<Notice>, NoticeRepositoryError>;

    /// Insert `notice` if the pair's latest notice id still equals
    /// `expected_latest`. Returns `false` when another writer got there first.
    async fn insert_if_latest(
        &self,
        notice: &Notice,
        expected_latest: Option<NoticeId>,
    ) -> Result<bool, NoticeRepositoryError>;

    /// Replace the content and set the edit latch. Returns `false` if the
    /// notice was already edited or its edit window closed before `now`.
    async fn apply_edit(
        &self,
        notice_id: &NoticeId,
        content: &MessageContent,
        now: DateTime<Utc>,
    ) -> Result<bool, NoticeRepositoryError>;

    /// Record the seen timestamp. Returns `false` if it was already set.
    async fn mark_seen(
        &self,
        notice_id: &NoticeId,
        seen_at: DateTime<Utc>,
    ) -> Result<bool, NoticeRepositoryError>;
}
