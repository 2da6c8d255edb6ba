//! Tests for notice board HTTP handlers.

use super::*;
use crate::domain::ports::{MockNoticeBoardCommand, MockNoticeBoardQuery};
use crate::domain::{
    Error, InteractionRejection, MessageContent, NoticeId, NoticeTurnState, PairActor,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::test_utils::{alice, bob, login_as, mock_ports, pair, test_app};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};
use std::sync::Arc;

fn notice_by(author: crate::domain::UserId, content: &str) -> Notice {
    let created_at = Utc
        .with_ymd_and_hms(2026, 6, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    Notice {
        id: NoticeId::random(),
        pair_id: pair(),
        author_id: author,
        content: MessageContent::new(content).expect("valid content"),
        created_at,
        seen_at: None,
        is_edited: false,
        editable_until: created_at + chrono::TimeDelta::minutes(180),
    }
}

fn state_with_command(command: MockNoticeBoardCommand) -> HttpState {
    let mut ports = mock_ports();
    ports.notices = Arc::new(command);
    HttpState::new(ports, None)
}

fn notice_uri(suffix: &str) -> String {
    format!("/api/v1/pairs/{}/notice{suffix}", pair())
}

#[actix_web::test]
async fn post_returns_the_new_notice() {
    let mut command = MockNoticeBoardCommand::new();
    command
        .expect_post()
        .withf(|actor: &PairActor, content: &MessageContent| {
            actor.user_id == alice() && actor.pair_id == pair() && content.as_str() == "hi"
        })
        .times(1)
        .returning(|_, _| Ok(notice_by(alice(), "hi")));
    let app = actix_test::init_service(test_app(state_with_command(command))).await;
    let cookie = login_as(&app, &alice()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&notice_uri(""))
            .cookie(cookie)
            .set_json(json!({ "content": "  hi  " }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["content"], "hi");
    assert_eq!(body["authorId"], alice().to_string());
    assert_eq!(body["seenAt"], Value::Null);
    assert_eq!(body["isEdited"], false);
}

#[actix_web::test]
async fn message_is_accepted_as_content_alias() {
    let mut command = MockNoticeBoardCommand::new();
    command
        .expect_post()
        .withf(|_, content: &MessageContent| content.as_str() == "from alias")
        .times(1)
        .returning(|_, _| Ok(notice_by(alice(), "from alias")));
    let app = actix_test::init_service(test_app(state_with_command(command))).await;
    let cookie = login_as(&app, &alice()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&notice_uri(""))
            .cookie(cookie)
            .set_json(json!({ "message": "from alias" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn cooldown_rejection_carries_reason_and_minutes() {
    let mut command = MockNoticeBoardCommand::new();
    command.expect_post().times(1).returning(|_, _| {
        Err(Error::from(InteractionRejection::CooldownActive {
            remaining_minutes: 180,
        }))
    });
    let app = actix_test::init_service(test_app(state_with_command(command))).await;
    let cookie = login_as(&app, &alice()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&notice_uri(""))
            .cookie(cookie)
            .set_json(json!({ "content": "again" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["error"], "COOLDOWN_ACTIVE");
    assert_eq!(body["remainingMinutes"], 180);
    assert_eq!(
        body["details"],
        json!({ "error": "COOLDOWN_ACTIVE", "remainingMinutes": 180 })
    );
}

#[actix_web::test]
async fn blank_content_is_rejected_before_the_service() {
    let app = actix_test::init_service(test_app(state_with_command(
        MockNoticeBoardCommand::new(),
    )))
    .await;
    let cookie = login_as(&app, &alice()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&notice_uri(""))
            .cookie(cookie)
            .set_json(json!({ "content": "   " }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["code"], "empty_content");
}

#[actix_web::test]
async fn malformed_json_uses_the_error_envelope() {
    let app = actix_test::init_service(test_app(state_with_command(
        MockNoticeBoardCommand::new(),
    )))
    .await;
    let cookie = login_as(&app, &alice()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&notice_uri(""))
            .cookie(cookie)
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
}

#[actix_web::test]
async fn edit_returns_the_latched_notice() {
    let mut command = MockNoticeBoardCommand::new();
    command.expect_edit().times(1).returning(|_, content| {
        let mut notice = notice_by(alice(), content.as_str());
        notice.is_edited = true;
        Ok(notice)
    });
    let app = actix_test::init_service(test_app(state_with_command(command))).await;
    let cookie = login_as(&app, &alice()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&notice_uri(""))
            .cookie(cookie)
            .set_json(json!({ "content": "fixed typo" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["isEdited"], true);
    assert_eq!(body["content"], "fixed typo");
}

#[actix_web::test]
async fn mark_seen_acts_as_the_session_user() {
    let mut command = MockNoticeBoardCommand::new();
    command
        .expect_mark_seen()
        .withf(|actor: &PairActor| actor.user_id == bob())
        .times(1)
        .returning(|_| {
            let mut notice = notice_by(alice(), "hi");
            notice.seen_at = Some(notice.created_at + chrono::TimeDelta::minutes(5));
            Ok(notice)
        });
    let app = actix_test::init_service(test_app(state_with_command(command))).await;
    let cookie = login_as(&app, &bob()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&notice_uri("/seen"))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["seenAt"], "2026-06-01T09:05:00+00:00");
}

#[actix_web::test]
async fn status_reports_state_and_reason() {
    let mut query = MockNoticeBoardQuery::new();
    query.expect_status().times(1).returning(|_| {
        let mut notice = notice_by(alice(), "hi");
        notice.seen_at = Some(notice.created_at);
        Ok(NoticeStatus {
            notice: Some(notice),
            state: NoticeTurnState::PostedSeenCooldown {
                remaining_minutes: 150,
            },
            can_post: false,
            reason: Some(InteractionRejection::CooldownActive {
                remaining_minutes: 150,
            }),
        })
    });
    let mut ports = mock_ports();
    ports.notices_query = Arc::new(query);
    let app = actix_test::init_service(test_app(HttpState::new(ports, None))).await;
    let cookie = login_as(&app, &alice()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&notice_uri(""))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["state"], "POSTED_SEEN_COOLDOWN");
    assert_eq!(body["canPost"], false);
    assert_eq!(body["reason"], "COOLDOWN_ACTIVE");
    assert_eq!(body["remainingMinutes"], 150);
}

#[actix_web::test]
async fn empty_board_omits_reason() {
    let mut query = MockNoticeBoardQuery::new();
    query.expect_status().times(1).returning(|_| {
        Ok(NoticeStatus {
            notice: None,
            state: NoticeTurnState::Empty,
            can_post: true,
            reason: None,
        })
    });
    let mut ports = mock_ports();
    ports.notices_query = Arc::new(query);
    let app = actix_test::init_service(test_app(HttpState::new(ports, None))).await;
    let cookie = login_as(&app, &alice()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&notice_uri(""))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(
        body,
        json!({ "notice": null, "state": "EMPTY", "canPost": true })
    );
}

#[actix_web::test]
async fn requests_without_a_session_are_unauthorised() {
    let app = actix_test::init_service(test_app(state_with_command(
        MockNoticeBoardCommand::new(),
    )))
    .await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&notice_uri("/seen"))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn malformed_pair_id_is_rejected() {
    let app = actix_test::init_service(test_app(state_with_command(
        MockNoticeBoardCommand::new(),
    )))
    .await;
    let cookie = login_as(&app, &alice()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/pairs/not-a-pair/notice/seen")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], "pairId");
}
