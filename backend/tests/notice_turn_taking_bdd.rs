//! Behaviour tests for notice board turn-taking.
//!
//! The notice service runs against the in-memory store with a clock the
//! scenarios move forward, so cooldown arithmetic is exact.

use std::cell::RefCell;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use pairspace::domain::ports::NoticeBoardCommand;
use pairspace::domain::{
    Error, MessageContent, Notice, NoticeRules, NoticeService, NotificationKind, PairActor,
};
use pairspace::outbound::memory::InMemoryStore;
use pairspace::test_support::clock::MutableClock;
use pairspace::test_support::notifications::RecordingNotificationSink;
use pairspace::test_support::pairs::AliceAndBob;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::Value;
use tokio::runtime::Runtime;

struct NoticeWorld {
    runtime: Runtime,
    pair: AliceAndBob,
    store: Arc<InMemoryStore>,
    clock: Arc<MutableClock>,
    sink: Arc<RecordingNotificationSink>,
    service: NoticeService,
    outcome: RefCell<Option<Result<Notice, Error>>>,
}

impl NoticeWorld {
    fn new() -> Self {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("create runtime");
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(MutableClock::new(
            Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0)
                .single()
                .expect("valid timestamp"),
        ));
        let sink = Arc::new(RecordingNotificationSink::default());
        let service = NoticeService::new(
            store.clone(),
            store.clone(),
            sink.clone(),
            clock.clone(),
            NoticeRules::default(),
        );
        Self {
            runtime,
            pair: AliceAndBob::new(),
            store,
            clock,
            sink,
            service,
            outcome: RefCell::new(None),
        }
    }

    fn actor(&self, who: &str) -> PairActor {
        match who {
            "Alice" => self.pair.alice_actor(),
            "Bob" => self.pair.bob_actor(),
            other => panic!("unknown member {other}"),
        }
    }

    fn record(&self, outcome: Result<Notice, Error>) {
        *self.outcome.borrow_mut() = Some(outcome);
    }

    fn post(&self, who: &str) {
        let content = MessageContent::new(format!("a note from {who}")).expect("valid content");
        let outcome = self
            .runtime
            .block_on(self.service.post(self.actor(who), content));
        self.record(outcome);
    }

    fn edit(&self, who: &str) {
        let content = MessageContent::new("on second thought").expect("valid content");
        let outcome = self
            .runtime
            .block_on(self.service.edit(self.actor(who), content));
        self.record(outcome);
    }

    fn mark_seen(&self, who: &str) {
        let outcome = self
            .runtime
            .block_on(self.service.mark_seen(self.actor(who)));
        self.record(outcome);
    }

    fn rejection_details(&self) -> Value {
        let outcome = self.outcome.borrow();
        match outcome.as_ref().expect("an action was taken") {
            Ok(notice) => panic!("expected a rejection, got {notice:?}"),
            Err(error) => error.details().cloned().expect("rejection details"),
        }
    }
}

#[fixture]
fn world() -> NoticeWorld {
    NoticeWorld::new()
}

#[given("Alice and Bob share a pair")]
fn alice_and_bob_share_a_pair(world: &NoticeWorld) {
    world.store.add_pair(
        world.pair.pair_id,
        [world.pair.alice.clone(), world.pair.bob.clone()],
    );
}

#[given("{who} posts a notice")]
fn member_has_posted_a_notice(world: &NoticeWorld, who: String) {
    world.post(&who);
}

#[when("{who} posts a notice")]
fn member_posts_a_notice(world: &NoticeWorld, who: String) {
    world.post(&who);
}

#[given("{who} marks the notice as seen")]
fn member_has_marked_the_notice_as_seen(world: &NoticeWorld, who: String) {
    world.mark_seen(&who);
}

#[when("{who} marks the notice as seen")]
fn member_marks_the_notice_as_seen(world: &NoticeWorld, who: String) {
    world.mark_seen(&who);
}

#[when("{who} edits the notice")]
fn member_edits_the_notice(world: &NoticeWorld, who: String) {
    world.edit(&who);
}

#[when("{minutes} minutes pass")]
fn minutes_pass(world: &NoticeWorld, minutes: i64) {
    world.clock.advance_minutes(minutes);
}

#[then("the last action succeeds")]
fn the_last_action_succeeds(world: &NoticeWorld) {
    let outcome = world.outcome.borrow();
    let result = outcome.as_ref().expect("an action was taken");
    assert!(result.is_ok(), "expected success, got {result:?}");
}

#[then("the last action is rejected with {reason}")]
fn the_last_action_is_rejected_with(world: &NoticeWorld, reason: String) {
    let details = world.rejection_details();
    assert_eq!(
        details.get("error").and_then(Value::as_str),
        Some(reason.as_str())
    );
}

#[then("the rejection reports {minutes} remaining minutes")]
fn the_rejection_reports_remaining_minutes(world: &NoticeWorld, minutes: u64) {
    let details = world.rejection_details();
    assert_eq!(
        details.get("remainingMinutes").and_then(Value::as_u64),
        Some(minutes)
    );
}

#[then("Alice was notified that the notice was seen")]
fn alice_was_notified_that_the_notice_was_seen(world: &NoticeWorld) {
    let requests = world.sink.requests();
    let seen = requests
        .iter()
        .find(|request| request.event.kind() == NotificationKind::NoticeSeen)
        .expect("notice seen notification");
    assert_eq!(seen.recipient_id, world.pair.alice.id);
    assert_eq!(seen.pair_id, world.pair.pair_id);
}

#[scenario(
    path = "tests/features/notice_turn_taking.feature",
    name = "The partner replies as soon as the notice is seen"
)]
fn the_partner_replies_as_soon_as_the_notice_is_seen(world: NoticeWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/notice_turn_taking.feature",
    name = "Nobody posts over an unseen notice"
)]
fn nobody_posts_over_an_unseen_notice(world: NoticeWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/notice_turn_taking.feature",
    name = "The author waits out the cooldown"
)]
fn the_author_waits_out_the_cooldown(world: NoticeWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/notice_turn_taking.feature",
    name = "The author posts again after the cooldown"
)]
fn the_author_posts_again_after_the_cooldown(world: NoticeWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/notice_turn_taking.feature",
    name = "A notice is edited at most once"
)]
fn a_notice_is_edited_at_most_once(world: NoticeWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/notice_turn_taking.feature",
    name = "Authors cannot acknowledge their own notice"
)]
fn authors_cannot_acknowledge_their_own_notice(world: NoticeWorld) {
    let _ = world;
}
