//! PostgreSQL-backed `SubscriptionRepository`.
//!
//! The browser descriptor is stored as JSON; the endpoint is duplicated into
//! its own column to back the `(user_id, endpoint)` unique key.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{SubscriptionRepository, SubscriptionRepositoryError};
use crate::domain::{PushSubscription, SubscriptionDescriptor, SubscriptionId, UserId};

use super::error_mapping::port_error_mappers;
use super::models::PushSubscriptionRow;
use super::pool::DbPool;
use super::schema::push_subscriptions;

port_error_mappers!(SubscriptionRepositoryError);

/// Diesel-backed push subscription registry.
#[derive(Clone)]
pub struct DieselSubscriptionRepository {
    pool: DbPool,
}

impl DieselSubscriptionRepository {
    /// Create a repository over `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_subscription(
    row: PushSubscriptionRow,
) -> Result<PushSubscription, SubscriptionRepositoryError> {
    let mut descriptor: SubscriptionDescriptor =
        serde_json::from_value(row.descriptor).map_err(|error| {
            warn!(subscription_id = %row.id, %error, "stored push descriptor is malformed");
            SubscriptionRepositoryError::query("stored push descriptor is invalid")
        })?;
    descriptor.endpoint = row.endpoint;
    Ok(PushSubscription {
        id: SubscriptionId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        descriptor,
        created_at: row.created_at,
    })
}

#[async_trait]
impl SubscriptionRepository for DieselSubscriptionRepository {
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<PushSubscription>, SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PushSubscriptionRow> = push_subscriptions::table
            .filter(push_subscriptions::user_id.eq(user_id.as_uuid()))
            .order(push_subscriptions::created_at.asc())
            .select(PushSubscriptionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_subscription).collect()
    }

    async fn upsert(
        &self,
        user_id: &UserId,
        descriptor: &SubscriptionDescriptor,
        at: DateTime<Utc>,
    ) -> Result<PushSubscription, SubscriptionRepositoryError> {
        let encoded = serde_json::to_value(descriptor).map_err(|error| {
            SubscriptionRepositoryError::query(format!("encode descriptor: {error}"))
        })?;
        let row = PushSubscriptionRow {
            id: *SubscriptionId::random().as_uuid(),
            user_id: *user_id.as_uuid(),
            endpoint: descriptor.endpoint.clone(),
            descriptor: encoded,
            created_at: at,
            updated_at: at,
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stored: PushSubscriptionRow = diesel::insert_into(push_subscriptions::table)
            .values(&row)
            .on_conflict((push_subscriptions::user_id, push_subscriptions::endpoint))
            .do_update()
            .set((
                push_subscriptions::descriptor.eq(excluded(push_subscriptions::descriptor)),
                push_subscriptions::updated_at.eq(excluded(push_subscriptions::updated_at)),
            ))
            .returning(PushSubscriptionRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_subscription(stored)
    }

    async fn delete(&self, id: &SubscriptionId) -> Result<bool, SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(push_subscriptions::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn delete_by_endpoint(
        &self,
        user_id: &UserId,
        endpoint: &str,
    ) -> Result<u64, SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(
            push_subscriptions::table
                .filter(push_subscriptions::user_id.eq(user_id.as_uuid()))
                .filter(push_subscriptions::endpoint.eq(endpoint)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(u64::try_from(removed).unwrap_or(u64::MAX))
    }
}
