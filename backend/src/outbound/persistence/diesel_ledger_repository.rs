//! PostgreSQL-backed `LedgerRepository`.
//!
//! The window count and the conditional append share one transaction that
//! starts by locking the pair row, so two concurrent presses cannot both see
//! room under a cap.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{LedgerRepository, LedgerRepositoryError};
use crate::domain::{ActionKind, LedgerAppend, LedgerAppendOutcome, PairId, UserId, WindowSummary};

use super::diesel_helpers::{count_to_u32, lock_pair};
use super::error_mapping::port_error_mappers;
use super::models::NewLedgerActionRow;
use super::pool::DbPool;
use super::schema::ledger_actions;

port_error_mappers!(LedgerRepositoryError);

/// Diesel-backed action ledger.
#[derive(Clone)]
pub struct DieselLedgerRepository {
    pool: DbPool,
}

impl DieselLedgerRepository {
    /// Create a ledger over `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

async fn summarise(
    conn: &mut AsyncPgConnection,
    pair_id: Uuid,
    actor_id: Uuid,
    kind: ActionKind,
    since: DateTime<Utc>,
) -> Result<WindowSummary, diesel::result::Error> {
    let (count, oldest): (i64, Option<DateTime<Utc>>) = ledger_actions::table
        .filter(ledger_actions::pair_id.eq(pair_id))
        .filter(ledger_actions::actor_id.eq(actor_id))
        .filter(ledger_actions::kind.eq(kind.as_str()))
        .filter(ledger_actions::occurred_at.ge(since))
        .select((count_star(), diesel::dsl::min(ledger_actions::occurred_at)))
        .first(conn)
        .await?;
    Ok(WindowSummary {
        count: count_to_u32(count),
        oldest,
    })
}

#[async_trait]
impl LedgerRepository for DieselLedgerRepository {
    async fn append_if_allowed(
        &self,
        append: &LedgerAppend,
    ) -> Result<LedgerAppendOutcome, LedgerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let pair_id = *append.pair_id.as_uuid();
        let actor_id = *append.actor_id.as_uuid();

        conn.transaction(|conn| {
            async move {
                lock_pair(conn, pair_id).await?;
                let summary =
                    summarise(conn, pair_id, actor_id, append.kind, append.window_start).await?;
                let accepted = append.cap.is_none_or(|cap| summary.count < cap);
                if accepted {
                    diesel::insert_into(ledger_actions::table)
                        .values(&NewLedgerActionRow {
                            pair_id,
                            actor_id,
                            kind: append.kind.as_str(),
                            occurred_at: append.occurred_at,
                        })
                        .execute(conn)
                        .await?;
                }
                Ok(LedgerAppendOutcome {
                    accepted,
                    prior_count: summary.count,
                    oldest_in_window: summary.oldest,
                })
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn window_summary(
        &self,
        pair_id: &PairId,
        actor_id: &UserId,
        kind: ActionKind,
        since: DateTime<Utc>,
    ) -> Result<WindowSummary, LedgerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        summarise(&mut conn, *pair_id.as_uuid(), *actor_id.as_uuid(), kind, since)
            .await
            .map_err(map_diesel_error)
    }
}
