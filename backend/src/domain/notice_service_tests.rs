//! Tests for the notice board service.

use std::sync::Arc;

use chrono::TimeDelta;
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::ports::MockNoticeRepository;
use crate::domain::test_fixtures::{directory_for, start_time};
use crate::domain::{ErrorCode, NoticeTurnState, NotificationKind, UserId};
use crate::test_support::clock::MutableClock;
use crate::test_support::notifications::RecordingNotificationSink;
use crate::test_support::pairs::AliceAndBob;

struct Harness {
    pair: AliceAndBob,
    sink: Arc<RecordingNotificationSink>,
    clock: Arc<MutableClock>,
}

impl Harness {
    fn service(&self, notices: MockNoticeRepository) -> NoticeService {
        NoticeService::new(
            Arc::new(directory_for(&self.pair)),
            Arc::new(notices),
            self.sink.clone(),
            self.clock.clone(),
            NoticeRules::default(),
        )
    }

    fn notice_by(&self, author: UserId, seen: bool) -> Notice {
        let mut notice = NoticeRules::default().draft(
            self.pair.pair_id,
            author,
            content("morning"),
            start_time(),
        );
        if seen {
            notice.seen_at = Some(start_time() + TimeDelta::minutes(1));
        }
        notice
    }
}

#[fixture]
fn harness() -> Harness {
    Harness {
        pair: AliceAndBob::new(),
        sink: Arc::new(RecordingNotificationSink::default()),
        clock: Arc::new(MutableClock::new(start_time())),
    }
}

fn content(text: &str) -> MessageContent {
    MessageContent::new(text).expect("valid content")
}

fn repo_with_latest(latest: Option<Notice>) -> MockNoticeRepository {
    let mut notices = MockNoticeRepository::new();
    notices
        .expect_latest_for_pair()
        .returning(move |_| Ok(latest.clone()));
    notices
}

#[rstest]
#[tokio::test]
async fn first_post_lands_on_an_empty_board(harness: Harness) {
    let mut notices = repo_with_latest(None);
    notices
        .expect_insert_if_latest()
        .withf(|notice, expected| expected.is_none() && notice.content.as_str() == "hello")
        .times(1)
        .return_once(|_, _| Ok(true));
    let service = harness.service(notices);

    let notice = service
        .post(harness.pair.alice_actor(), content("hello"))
        .await
        .expect("post accepted");

    assert_eq!(notice.author_id, harness.pair.alice.id);
    assert_eq!(notice.editable_until, start_time() + TimeDelta::minutes(180));
    assert!(harness.sink.requests().is_empty());
}

#[rstest]
#[tokio::test]
async fn post_while_unseen_is_rejected_for_both_members(harness: Harness) {
    let latest = harness.notice_by(harness.pair.alice.id, false);
    let mut notices = repo_with_latest(Some(latest));
    notices.expect_insert_if_latest().never();
    let service = harness.service(notices);

    for actor in [harness.pair.alice_actor(), harness.pair.bob_actor()] {
        let error = service
            .post(actor, content("again"))
            .await
            .expect_err("board is waiting");
        assert_eq!(error.details(), Some(&json!({ "error": "PENDING_UNSEEN" })));
    }
}

#[rstest]
#[tokio::test]
async fn author_cooldown_reports_remaining_minutes(harness: Harness) {
    let latest = harness.notice_by(harness.pair.alice.id, true);
    let service = harness.service(repo_with_latest(Some(latest)));
    harness.clock.advance_minutes(60);

    let error = service
        .post(harness.pair.alice_actor(), content("again"))
        .await
        .expect_err("cooldown active");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        error.details(),
        Some(&json!({ "error": "COOLDOWN_ACTIVE", "remainingMinutes": 120 }))
    );
}

#[rstest]
#[tokio::test]
async fn lost_race_retries_then_succeeds(harness: Harness) {
    let mut notices = repo_with_latest(None);
    let mut attempts = 0;
    notices
        .expect_insert_if_latest()
        .times(2)
        .returning(move |_, _| {
            attempts += 1;
            Ok(attempts > 1)
        });
    let service = harness.service(notices);

    service
        .post(harness.pair.bob_actor(), content("hi"))
        .await
        .expect("second attempt lands");
}

#[rstest]
#[tokio::test]
async fn persistent_contention_is_a_conflict(harness: Harness) {
    let mut notices = repo_with_latest(None);
    notices
        .expect_insert_if_latest()
        .times(MAX_POST_ATTEMPTS)
        .returning(|_, _| Ok(false));
    let service = harness.service(notices);

    let error = service
        .post(harness.pair.bob_actor(), content("hi"))
        .await
        .expect_err("never wins the race");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn edit_replaces_content_once(harness: Harness) {
    let latest = harness.notice_by(harness.pair.alice.id, false);
    let notice_id = latest.id;
    let mut notices = repo_with_latest(Some(latest));
    notices
        .expect_apply_edit()
        .withf(move |id, body, now| {
            *id == notice_id && body.as_str() == "edited" && *now == start_time()
        })
        .times(1)
        .return_once(|_, _, _| Ok(true));
    let service = harness.service(notices);

    let edited = service
        .edit(harness.pair.alice_actor(), content("edited"))
        .await
        .expect("edit accepted");

    assert!(edited.is_edited);
    assert_eq!(edited.content.as_str(), "edited");
}

#[rstest]
#[tokio::test]
async fn concurrent_second_edit_is_already_edited(harness: Harness) {
    let latest = harness.notice_by(harness.pair.alice.id, false);
    let mut notices = repo_with_latest(Some(latest));
    notices.expect_apply_edit().return_once(|_, _, _| Ok(false));
    let service = harness.service(notices);

    let error = service
        .edit(harness.pair.alice_actor(), content("edited"))
        .await
        .expect_err("latch already set");

    assert_eq!(error.details(), Some(&json!({ "error": "ALREADY_EDITED" })));
}

#[rstest]
#[tokio::test]
async fn partner_cannot_edit(harness: Harness) {
    let latest = harness.notice_by(harness.pair.alice.id, false);
    let mut notices = repo_with_latest(Some(latest));
    notices.expect_apply_edit().never();
    let service = harness.service(notices);

    let error = service
        .edit(harness.pair.bob_actor(), content("mine now"))
        .await
        .expect_err("not the author");

    assert_eq!(
        error.details(),
        Some(&json!({ "error": "NO_EDITABLE_NOTICE" }))
    );
}

#[rstest]
#[tokio::test]
async fn mark_seen_notifies_the_author(harness: Harness) {
    let latest = harness.notice_by(harness.pair.alice.id, false);
    let mut notices = repo_with_latest(Some(latest));
    notices
        .expect_mark_seen()
        .times(1)
        .return_once(|_, _| Ok(true));
    let service = harness.service(notices);
    harness.clock.advance_minutes(10);

    let seen = service
        .mark_seen(harness.pair.bob_actor())
        .await
        .expect("partner marks seen");

    assert_eq!(seen.seen_at, Some(start_time() + TimeDelta::minutes(10)));
    let requests = harness.sink.requests();
    assert_eq!(harness.sink.kinds(), vec![NotificationKind::NoticeSeen]);
    assert_eq!(
        requests.first().map(|request| request.recipient_id),
        Some(harness.pair.alice.id)
    );
}

#[rstest]
#[tokio::test]
async fn mark_seen_twice_is_silent(harness: Harness) {
    let latest = harness.notice_by(harness.pair.alice.id, true);
    let expected = latest.seen_at;
    let mut notices = repo_with_latest(Some(latest));
    notices.expect_mark_seen().never();
    let service = harness.service(notices);

    let seen = service
        .mark_seen(harness.pair.bob_actor())
        .await
        .expect("idempotent");

    assert_eq!(seen.seen_at, expected);
    assert!(harness.sink.requests().is_empty());
}

#[rstest]
#[tokio::test]
async fn author_cannot_mark_own_notice(harness: Harness) {
    let latest = harness.notice_by(harness.pair.alice.id, false);
    let service = harness.service(repo_with_latest(Some(latest)));

    let error = service
        .mark_seen(harness.pair.alice_actor())
        .await
        .expect_err("own notice");

    assert_eq!(error.details(), Some(&json!({ "error": "OWN_NOTICE" })));
}

#[rstest]
#[tokio::test]
async fn mark_seen_on_empty_board_is_not_found(harness: Harness) {
    let service = harness.service(repo_with_latest(None));

    let error = service
        .mark_seen(harness.pair.bob_actor())
        .await
        .expect_err("nothing to see");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn status_explains_why_author_must_wait(harness: Harness) {
    let latest = harness.notice_by(harness.pair.alice.id, true);
    let service = harness.service(repo_with_latest(Some(latest)));
    harness.clock.advance_minutes(30);

    let alice = service
        .status(harness.pair.alice_actor())
        .await
        .expect("status");
    let bob = service
        .status(harness.pair.bob_actor())
        .await
        .expect("status");

    assert_eq!(
        alice.state,
        NoticeTurnState::PostedSeenCooldown {
            remaining_minutes: 150
        }
    );
    assert!(!alice.can_post);
    assert_eq!(
        alice.reason,
        Some(InteractionRejection::CooldownActive {
            remaining_minutes: 150
        })
    );
    assert!(bob.can_post);
    assert_eq!(bob.reason, None);
}

#[rstest]
#[tokio::test]
async fn repository_outage_is_service_unavailable(harness: Harness) {
    let mut notices = MockNoticeRepository::new();
    notices
        .expect_latest_for_pair()
        .return_once(|_| Err(NoticeRepositoryError::connection("db down")));
    let service = harness.service(notices);

    let error = service
        .status(harness.pair.alice_actor())
        .await
        .expect_err("outage");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
