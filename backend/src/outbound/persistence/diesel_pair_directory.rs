//! PostgreSQL-backed `PairDirectory`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{PairDirectory, PairDirectoryError};
use crate::domain::{Member, PairId, PairMembership, PairedUser, UserId};

use super::error_mapping::port_error_mappers;
use super::models::{PairRow, UserRow};
use super::pool::DbPool;
use super::schema::{pairs, users};

port_error_mappers!(PairDirectoryError);

/// Diesel-backed pair directory reading `pairs` and `users`.
#[derive(Clone)]
pub struct DieselPairDirectory {
    pool: DbPool,
}

impl DieselPairDirectory {
    /// Create a directory over `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Orient a complete pair around `user_id`, returning `(member, partner)`.
fn orient(row: &PairRow, user_id: Uuid) -> Result<(Uuid, Uuid), PairDirectoryError> {
    let second = row
        .second_user_id
        .ok_or_else(PairDirectoryError::pair_incomplete)?;
    if row.first_user_id == user_id {
        Ok((row.first_user_id, second))
    } else if second == user_id {
        Ok((second, row.first_user_id))
    } else {
        Err(PairDirectoryError::not_member())
    }
}

fn member(rows: &[UserRow], id: Uuid) -> Result<Member, PairDirectoryError> {
    rows.iter()
        .find(|row| row.id == id)
        .map(|row| Member {
            id: UserId::from_uuid(row.id),
            display_name: row.display_name.clone(),
        })
        .ok_or_else(|| PairDirectoryError::query("pair member has no user record"))
}

/// First complete pair per user, in pair creation order.
fn first_pair_per_user(rows: &[PairRow]) -> Vec<PairedUser> {
    let mut users: Vec<PairedUser> = Vec::new();
    for row in rows {
        let Some(second) = row.second_user_id else {
            continue;
        };
        for id in [row.first_user_id, second] {
            let user_id = UserId::from_uuid(id);
            if users.iter().all(|user| user.user_id != user_id) {
                users.push(PairedUser {
                    user_id,
                    pair_id: PairId::from_uuid(row.id),
                });
            }
        }
    }
    users
}

#[async_trait]
impl PairDirectory for DieselPairDirectory {
    async fn membership(
        &self,
        pair_id: &PairId,
        user_id: &UserId,
    ) -> Result<PairMembership, PairDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: PairRow = pairs::table
            .find(*pair_id.as_uuid())
            .select(PairRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .ok_or_else(PairDirectoryError::pair_not_found)?;
        let (member_id, partner_id) = orient(&row, *user_id.as_uuid())?;

        let people: Vec<UserRow> = users::table
            .filter(users::id.eq_any([member_id, partner_id]))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(PairMembership {
            pair_id: *pair_id,
            member: member(&people, member_id)?,
            partner: member(&people, partner_id)?,
        })
    }

    async fn paired_users(&self) -> Result<Vec<PairedUser>, PairDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PairRow> = pairs::table
            .filter(pairs::second_user_id.is_not_null())
            .order((pairs::created_at.asc(), pairs::id.asc()))
            .select(PairRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(first_pair_per_user(&rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn row(first: Uuid, second: Option<Uuid>) -> PairRow {
        PairRow {
            id: Uuid::new_v4(),
            first_user_id: first,
            second_user_id: second,
        }
    }

    #[rstest]
    fn orient_puts_the_requester_first() {
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let pair = row(alice, Some(bob));

        assert_eq!(orient(&pair, bob), Ok((bob, alice)));
        assert_eq!(orient(&pair, alice), Ok((alice, bob)));
    }

    #[rstest]
    fn orient_rejects_incomplete_and_foreign() {
        let alice = Uuid::new_v4();

        assert_eq!(
            orient(&row(alice, None), alice),
            Err(PairDirectoryError::pair_incomplete())
        );
        assert_eq!(
            orient(&row(alice, Some(Uuid::new_v4())), Uuid::new_v4()),
            Err(PairDirectoryError::not_member())
        );
    }

    #[rstest]
    fn users_in_two_pairs_keep_their_first() {
        let (alice, bob, carol) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let first = row(alice, Some(bob));
        let second = row(carol, Some(alice));
        let pending = row(Uuid::new_v4(), None);

        let users = first_pair_per_user(&[first.clone(), second.clone(), pending]);

        assert_eq!(users.len(), 3);
        let alice_pair = users
            .iter()
            .find(|user| *user.user_id.as_uuid() == alice)
            .map(|user| *user.pair_id.as_uuid());
        assert_eq!(alice_pair, Some(first.id));
        assert!(
            users
                .iter()
                .any(|user| *user.user_id.as_uuid() == carol
                    && *user.pair_id.as_uuid() == second.id)
        );
    }
}
