//! Driving port for the in-app notification list.

use async_trait::async_trait;

use crate::domain::{Error, NotificationId, NotificationQueueEntry, UserId};

/// Most entries returned by one listing.
pub const NOTIFICATION_LIST_LIMIT: u32 = 100;

/// Read and acknowledge notification history.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationInbox: Send + Sync {
    /// The user's entries, newest first, capped at
    /// [`NOTIFICATION_LIST_LIMIT`].
    async fn list(
        &self,
        user_id: UserId,
        unread_only: bool,
    ) -> Result<Vec<NotificationQueueEntry>, Error>;

    /// Mark one of the user's entries read. Unknown or foreign ids are
    /// `not_found`.
    async fn mark_read(&self, user_id: UserId, notification_id: NotificationId)
    -> Result<(), Error>;
}
