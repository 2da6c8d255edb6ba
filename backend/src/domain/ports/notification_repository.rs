//! Port for the in-app notification history.

use async_trait::async_trait;

use crate::domain::{NotificationId, NotificationQueueEntry, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification history adapters.
    pub enum NotificationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "notification repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "notification repository query failed: {message}",
    }
}

/// Notification history persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Append an entry.
    async fn append(&self, entry: &NotificationQueueEntry)
    -> Result<(), NotificationRepositoryError>;

    /// Entries for `recipient_id`, newest first, at most `limit`.
    async fn list_for_recipient(
        &self,
        recipient_id: &UserId,
        unread_only: bool,
        limit: u32,
    ) -> Result<Vec<NotificationQueueEntry>, NotificationRepositoryError>;

    /// Flip `read` on an entry owned by `recipient_id`. Returns `false` when
    /// no such entry exists for that recipient.
    async fn mark_read(
        &self,
        recipient_id: &UserId,
        notification_id: &NotificationId,
    ) -> Result<bool, NotificationRepositoryError>;
}

/// Fixture implementation that stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationRepository;

#[async_trait]
impl NotificationRepository for FixtureNotificationRepository {
    async fn append(
        &self,
        _entry: &NotificationQueueEntry,
    ) -> Result<(), NotificationRepositoryError> {
        Ok(())
    }

    async fn list_for_recipient(
        &self,
        _recipient_id: &UserId,
        _unread_only: bool,
        _limit: u32,
    ) -> Result<Vec<NotificationQueueEntry>, NotificationRepositoryError> {
        Ok(Vec::new())
    }

    async fn mark_read(
        &self,
        _recipient_id: &UserId,
        _notification_id: &NotificationId,
    ) -> Result<bool, NotificationRepositoryError> {
        Ok(false)
    }
}
