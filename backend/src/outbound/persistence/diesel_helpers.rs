//! Query helpers shared by the pair-scoped repositories.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use super::schema::pairs;

/// Take a row lock on the pair for the rest of the transaction.
///
/// Writers that must observe the pair's latest state before inserting call
/// this first, which serialises them per pair. A missing pair takes no lock;
/// callers have already resolved membership.
pub(crate) async fn lock_pair(
    conn: &mut AsyncPgConnection,
    pair_id: Uuid,
) -> Result<(), diesel::result::Error> {
    pairs::table
        .find(pair_id)
        .select(pairs::id)
        .for_update()
        .first::<Uuid>(conn)
        .await
        .optional()
        .map(|_| ())
}

/// Clamp a row count reported by PostgreSQL into a `u32`.
pub(crate) fn count_to_u32(count: i64) -> u32 {
    u32::try_from(count.max(0)).unwrap_or(u32::MAX)
}
