//! In-app notification list.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    NOTIFICATION_LIST_LIMIT, NotificationInbox, NotificationRepository,
    NotificationRepositoryError,
};
use crate::domain::{Error, NotificationId, NotificationQueueEntry, UserId};

fn map_notification_error(error: NotificationRepositoryError) -> Error {
    match error {
        NotificationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("notification repository unavailable: {message}"))
        }
        NotificationRepositoryError::Query { message } => {
            Error::internal(format!("notification repository error: {message}"))
        }
    }
}

/// Lists and acknowledges a user's notification history.
#[derive(Clone)]
pub struct NotificationInboxService {
    notifications: Arc<dyn NotificationRepository>,
}

impl NotificationInboxService {
    /// Create the service.
    pub fn new(notifications: Arc<dyn NotificationRepository>) -> Self {
        Self { notifications }
    }
}

#[async_trait]
impl NotificationInbox for NotificationInboxService {
    async fn list(
        &self,
        user_id: UserId,
        unread_only: bool,
    ) -> Result<Vec<NotificationQueueEntry>, Error> {
        self.notifications
            .list_for_recipient(&user_id, unread_only, NOTIFICATION_LIST_LIMIT)
            .await
            .map_err(map_notification_error)
    }

    async fn mark_read(
        &self,
        user_id: UserId,
        notification_id: NotificationId,
    ) -> Result<(), Error> {
        let found = self
            .notifications
            .mark_read(&user_id, &notification_id)
            .await
            .map_err(map_notification_error)?;
        if found {
            Ok(())
        } else {
            Err(Error::not_found(format!(
                "notification {notification_id} not found"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockNotificationRepository;

    #[rstest]
    #[case(true)]
    #[case(false)]
    #[tokio::test]
    async fn list_is_capped_and_filtered(#[case] unread_only: bool) {
        let mut repo = MockNotificationRepository::new();
        repo.expect_list_for_recipient()
            .withf(move |_, unread, limit| *unread == unread_only && *limit == 100)
            .times(1)
            .return_once(|_, _, _| Ok(Vec::new()));
        let service = NotificationInboxService::new(Arc::new(repo));

        let entries = service
            .list(UserId::random(), unread_only)
            .await
            .expect("list succeeds");

        assert!(entries.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn marking_someone_elses_notification_is_not_found() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_mark_read().return_once(|_, _| Ok(false));
        let service = NotificationInboxService::new(Arc::new(repo));

        let error = service
            .mark_read(UserId::random(), NotificationId::random())
            .await
            .expect_err("not the recipient");

        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn connection_loss_is_service_unavailable() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_list_for_recipient()
            .return_once(|_, _, _| Err(NotificationRepositoryError::connection("refused")));
        let service = NotificationInboxService::new(Arc::new(repo));

        let error = service
            .list(UserId::random(), false)
            .await
            .expect_err("outage");

        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}
