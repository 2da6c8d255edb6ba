//! PostgreSQL-backed `MoodRepository`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{MoodRepository, MoodRepositoryError};
use crate::domain::{Mood, MoodEntry, PairId, UserId};

use super::error_mapping::port_error_mappers;
use super::models::{MoodRow, NewMoodRow};
use super::pool::DbPool;
use super::schema::moods;

port_error_mappers!(MoodRepositoryError);

/// Diesel-backed mood log.
#[derive(Clone)]
pub struct DieselMoodRepository {
    pool: DbPool,
}

impl DieselMoodRepository {
    /// Create a repository over `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_entry(row: MoodRow) -> Result<MoodEntry, MoodRepositoryError> {
    let mood: Mood = row.mood.parse().map_err(|error| {
        warn!(%error, "stored mood is not recognised");
        MoodRepositoryError::query("stored mood is invalid")
    })?;
    Ok(MoodEntry {
        pair_id: PairId::from_uuid(row.pair_id),
        user_id: UserId::from_uuid(row.user_id),
        mood,
        created_at: row.created_at,
    })
}

#[async_trait]
impl MoodRepository for DieselMoodRepository {
    async fn insert(&self, entry: &MoodEntry) -> Result<(), MoodRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(moods::table)
            .values(&NewMoodRow {
                pair_id: *entry.pair_id.as_uuid(),
                user_id: *entry.user_id.as_uuid(),
                mood: entry.mood.as_str(),
                created_at: entry.created_at,
            })
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn latest_since(
        &self,
        pair_id: &PairId,
        user_id: &UserId,
        since: DateTime<Utc>,
    ) -> Result<Option<MoodEntry>, MoodRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        moods::table
            .filter(moods::pair_id.eq(pair_id.as_uuid()))
            .filter(moods::user_id.eq(user_id.as_uuid()))
            .filter(moods::created_at.ge(since))
            .order((moods::created_at.desc(), moods::id.desc()))
            .select(MoodRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_entry)
            .transpose()
    }
}
