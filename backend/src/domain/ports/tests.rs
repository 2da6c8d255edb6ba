//! Behaviour of the fixture port implementations and detached submission.

use rstest::rstest;

use super::*;
use crate::domain::{DispatchRequest, NotificationEvent, NotificationId, PairId, UserId};

fn prompt_request() -> DispatchRequest {
    DispatchRequest::new(UserId::random(), PairId::random(), NotificationEvent::MoodPrompt)
}

#[rstest]
fn fixture_sink_accepts_everything() {
    assert_eq!(FixtureNotificationSink.submit(prompt_request()), Ok(()));
}

#[rstest]
fn detached_submission_swallows_a_closed_sink() {
    let mut sink = MockNotificationSink::new();
    sink.expect_submit()
        .times(1)
        .return_once(|_| Err(NotificationSinkError::closed()));

    submit_detached(&sink, prompt_request());
}

#[rstest]
fn detached_submission_forwards_the_request() {
    let request = prompt_request();
    let expected = request.clone();
    let mut sink = MockNotificationSink::new();
    sink.expect_submit()
        .withf(move |submitted| *submitted == expected)
        .times(1)
        .return_once(|_| Ok(()));

    submit_detached(&sink, request);
}

#[tokio::test]
async fn fixture_repository_stores_nothing() {
    let repository = FixtureNotificationRepository;
    let recipient = UserId::random();

    let listed = repository
        .list_for_recipient(&recipient, false, NOTIFICATION_LIST_LIMIT)
        .await
        .expect("fixture listing succeeds");
    let marked = repository
        .mark_read(&recipient, &NotificationId::random())
        .await
        .expect("fixture mark succeeds");

    assert!(listed.is_empty());
    assert!(!marked);
}
