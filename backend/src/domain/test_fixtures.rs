//! Fixtures shared by the domain service tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::ports::{MockPairDirectory, PairDirectoryError};
use crate::test_support::clock::MutableClock;
use crate::test_support::pairs::AliceAndBob;

/// Directory mock that knows exactly one pair.
pub fn directory_for(pair: &AliceAndBob) -> MockPairDirectory {
    let pair = pair.clone();
    let mut directory = MockPairDirectory::new();
    directory
        .expect_membership()
        .returning(move |pair_id, user_id| {
            if *pair_id != pair.pair_id {
                return Err(PairDirectoryError::pair_not_found());
            }
            pair.membership_for(user_id)
                .ok_or_else(PairDirectoryError::not_member)
        });
    directory
}

/// A fixed starting instant.
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Clock frozen at [`start_time`].
pub fn clock() -> Arc<MutableClock> {
    Arc::new(MutableClock::new(start_time()))
}
