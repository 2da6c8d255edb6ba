//! PostgreSQL-backed `GossipRepository`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{GossipRepository, GossipRepositoryError};
use crate::domain::{GossipId, GossipMessage, MessageContent, PairId, UserId};

use super::error_mapping::port_error_mappers;
use super::models::GossipRow;
use super::pool::DbPool;
use super::schema::gossip_messages;

port_error_mappers!(GossipRepositoryError);

/// Diesel-backed gossip store.
#[derive(Clone)]
pub struct DieselGossipRepository {
    pool: DbPool,
}

impl DieselGossipRepository {
    /// Create a repository over `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_message(row: GossipRow) -> Result<GossipMessage, GossipRepositoryError> {
    let content = MessageContent::new(&row.content).map_err(|error| {
        warn!(gossip_id = %row.id, %error, "stored gossip content failed validation");
        GossipRepositoryError::query("stored gossip content is invalid")
    })?;
    Ok(GossipMessage {
        id: GossipId::from_uuid(row.id),
        pair_id: PairId::from_uuid(row.pair_id),
        author_id: UserId::from_uuid(row.author_id),
        content,
        created_at: row.created_at,
        seen: row.seen,
        acknowledged_at: row.acknowledged_at,
    })
}

#[async_trait]
impl GossipRepository for DieselGossipRepository {
    async fn insert(&self, message: &GossipMessage) -> Result<(), GossipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = GossipRow {
            id: *message.id.as_uuid(),
            pair_id: *message.pair_id.as_uuid(),
            author_id: *message.author_id.as_uuid(),
            content: message.content.as_str().to_owned(),
            created_at: message.created_at,
            seen: message.seen,
            acknowledged_at: message.acknowledged_at,
        };
        diesel::insert_into(gossip_messages::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn take_active(
        &self,
        pair_id: &PairId,
        author_id: &UserId,
    ) -> Result<Vec<GossipMessage>, GossipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut rows: Vec<GossipRow> = diesel::update(
            gossip_messages::table
                .filter(gossip_messages::pair_id.eq(pair_id.as_uuid()))
                .filter(gossip_messages::author_id.eq(author_id.as_uuid()))
                .filter(gossip_messages::acknowledged_at.is_null()),
        )
        .set(gossip_messages::seen.eq(true))
        .returning(GossipRow::as_returning())
        .get_results(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        rows.sort_by_key(|row| (row.created_at, row.id));
        rows.into_iter().map(row_to_message).collect()
    }

    async fn find(
        &self,
        pair_id: &PairId,
        message_id: &GossipId,
    ) -> Result<Option<GossipMessage>, GossipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        gossip_messages::table
            .filter(gossip_messages::id.eq(message_id.as_uuid()))
            .filter(gossip_messages::pair_id.eq(pair_id.as_uuid()))
            .select(GossipRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_message)
            .transpose()
    }

    async fn acknowledge(
        &self,
        message_id: &GossipId,
        at: DateTime<Utc>,
    ) -> Result<bool, GossipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(
            gossip_messages::table
                .filter(gossip_messages::id.eq(message_id.as_uuid()))
                .filter(gossip_messages::acknowledged_at.is_null()),
        )
        .set(gossip_messages::acknowledged_at.eq(at))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }
}
