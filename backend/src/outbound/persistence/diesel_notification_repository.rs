//! PostgreSQL-backed `NotificationRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{NotificationRepository, NotificationRepositoryError};
use crate::domain::{
    NotificationId, NotificationKind, NotificationPayload, NotificationQueueEntry, PairId, UserId,
};

use super::error_mapping::port_error_mappers;
use super::models::NotificationRow;
use super::pool::DbPool;
use super::schema::notification_queue;

port_error_mappers!(NotificationRepositoryError);

/// Diesel-backed notification history.
#[derive(Clone)]
pub struct DieselNotificationRepository {
    pool: DbPool,
}

impl DieselNotificationRepository {
    /// Create a repository over `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn entry_to_row(entry: &NotificationQueueEntry) -> Result<NotificationRow, NotificationRepositoryError> {
    let payload = serde_json::to_value(&entry.payload)
        .map_err(|error| NotificationRepositoryError::query(format!("encode payload: {error}")))?;
    Ok(NotificationRow {
        id: *entry.id.as_uuid(),
        recipient_id: *entry.recipient_id.as_uuid(),
        pair_id: *entry.pair_id.as_uuid(),
        kind: entry.kind.as_str().to_owned(),
        payload,
        read: entry.read,
        created_at: entry.created_at,
    })
}

fn row_to_entry(row: NotificationRow) -> Result<NotificationQueueEntry, NotificationRepositoryError> {
    let kind: NotificationKind = row.kind.parse().map_err(|error| {
        warn!(notification_id = %row.id, %error, "stored notification kind is not recognised");
        NotificationRepositoryError::query("stored notification kind is invalid")
    })?;
    let payload: NotificationPayload = serde_json::from_value(row.payload).map_err(|error| {
        warn!(notification_id = %row.id, %error, "stored notification payload is malformed");
        NotificationRepositoryError::query("stored notification payload is invalid")
    })?;
    Ok(NotificationQueueEntry {
        id: NotificationId::from_uuid(row.id),
        recipient_id: UserId::from_uuid(row.recipient_id),
        pair_id: PairId::from_uuid(row.pair_id),
        kind,
        payload,
        read: row.read,
        created_at: row.created_at,
    })
}

#[async_trait]
impl NotificationRepository for DieselNotificationRepository {
    async fn append(
        &self,
        entry: &NotificationQueueEntry,
    ) -> Result<(), NotificationRepositoryError> {
        let row = entry_to_row(entry)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(notification_queue::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_for_recipient(
        &self,
        recipient_id: &UserId,
        unread_only: bool,
        limit: u32,
    ) -> Result<Vec<NotificationQueueEntry>, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = notification_queue::table
            .filter(notification_queue::recipient_id.eq(recipient_id.as_uuid()))
            .order((notification_queue::created_at.desc(), notification_queue::id.desc()))
            .limit(i64::from(limit))
            .select(NotificationRow::as_select())
            .into_boxed();
        if unread_only {
            query = query.filter(notification_queue::read.eq(false));
        }
        let rows: Vec<NotificationRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_entry).collect()
    }

    async fn mark_read(
        &self,
        recipient_id: &UserId,
        notification_id: &NotificationId,
    ) -> Result<bool, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(
            notification_queue::table
                .filter(notification_queue::id.eq(notification_id.as_uuid()))
                .filter(notification_queue::recipient_id.eq(recipient_id.as_uuid())),
        )
        .set(notification_queue::read.eq(true))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }
}
