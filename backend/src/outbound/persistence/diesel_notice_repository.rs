//! PostgreSQL-backed `NoticeRepository`.
//!
//! Posting locks the pair row and re-reads the latest notice before inserting,
//! so a post only lands against the state its turn check saw. Edits and seen
//! marks are single guarded updates.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{NoticeRepository, NoticeRepositoryError};
use crate::domain::{MessageContent, Notice, NoticeId, PairId, UserId};

use super::diesel_helpers::lock_pair;
use super::error_mapping::port_error_mappers;
use super::models::NoticeRow;
use super::pool::DbPool;
use super::schema::notices;

port_error_mappers!(NoticeRepositoryError);

/// Diesel-backed notice board.
#[derive(Clone)]
pub struct DieselNoticeRepository {
    pool: DbPool,
}

impl DieselNoticeRepository {
    /// Create a repository over `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_notice(row: NoticeRow) -> Result<Notice, NoticeRepositoryError> {
    let content = MessageContent::new(&row.content).map_err(|error| {
        warn!(notice_id = %row.id, %error, "stored notice content failed validation");
        NoticeRepositoryError::query("stored notice content is invalid")
    })?;
    Ok(Notice {
        id: NoticeId::from_uuid(row.id),
        pair_id: PairId::from_uuid(row.pair_id),
        author_id: UserId::from_uuid(row.author_id),
        content,
        created_at: row.created_at,
        seen_at: row.seen_at,
        is_edited: row.is_edited,
        editable_until: row.editable_until,
    })
}

fn notice_to_row(notice: &Notice) -> NoticeRow {
    NoticeRow {
        id: *notice.id.as_uuid(),
        pair_id: *notice.pair_id.as_uuid(),
        author_id: *notice.author_id.as_uuid(),
        content: notice.content.as_str().to_owned(),
        created_at: notice.created_at,
        seen_at: notice.seen_at,
        is_edited: notice.is_edited,
        editable_until: notice.editable_until,
    }
}

async fn latest_row(
    conn: &mut AsyncPgConnection,
    pair_id: Uuid,
) -> Result<Option<NoticeRow>, diesel::result::Error> {
    notices::table
        .filter(notices::pair_id.eq(pair_id))
        .order((notices::created_at.desc(), notices::id.desc()))
        .select(NoticeRow::as_select())
        .first(conn)
        .await
        .optional()
}

#[async_trait]
impl NoticeRepository for DieselNoticeRepository {
    async fn latest_for_pair(
        &self,
        pair_id: &PairId,
    ) -> Result<Option<Notice>, NoticeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        latest_row(&mut conn, *pair_id.as_uuid())
            .await
            .map_err(map_diesel_error)?
            .map(row_to_notice)
            .transpose()
    }

    async fn insert_if_latest(
        &self,
        notice: &Notice,
        expected_latest: Option<NoticeId>,
    ) -> Result<bool, NoticeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = notice_to_row(notice);
        let expected = expected_latest.map(|id| *id.as_uuid());

        conn.transaction(|conn| {
            async move {
                lock_pair(conn, row.pair_id).await?;
                let current = latest_row(conn, row.pair_id).await?.map(|latest| latest.id);
                if current != expected {
                    return Ok(false);
                }
                diesel::insert_into(notices::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                Ok(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn apply_edit(
        &self,
        notice_id: &NoticeId,
        content: &MessageContent,
        now: DateTime<Utc>,
    ) -> Result<bool, NoticeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(
            notices::table
                .filter(notices::id.eq(notice_id.as_uuid()))
                .filter(notices::is_edited.eq(false))
                .filter(notices::editable_until.ge(now)),
        )
        .set((
            notices::content.eq(content.as_str()),
            notices::is_edited.eq(true),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn mark_seen(
        &self,
        notice_id: &NoticeId,
        seen_at: DateTime<Utc>,
    ) -> Result<bool, NoticeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(
            notices::table
                .filter(notices::id.eq(notice_id.as_uuid()))
                .filter(notices::seen_at.is_null()),
        )
        .set(notices::seen_at.eq(seen_at))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn row(content: &str) -> NoticeRow {
        let created_at = Utc
            .with_ymd_and_hms(2026, 6, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp");
        NoticeRow {
            id: Uuid::new_v4(),
            pair_id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            content: content.to_owned(),
            created_at,
            seen_at: None,
            is_edited: false,
            editable_until: created_at + chrono::TimeDelta::minutes(180),
        }
    }

    #[rstest]
    fn rows_convert_both_ways() {
        let original = row("hi");

        let notice = row_to_notice(original.clone()).expect("valid row");
        let back = notice_to_row(&notice);

        assert_eq!(back.id, original.id);
        assert_eq!(back.content, "hi");
        assert_eq!(back.editable_until, original.editable_until);
    }

    #[rstest]
    fn blank_stored_content_is_a_query_error() {
        let error = row_to_notice(row("   ")).expect_err("blank content");

        assert!(matches!(error, NoticeRepositoryError::Query { .. }));
    }
}
