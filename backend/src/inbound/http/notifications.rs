//! In-app notification history.
//!
//! ```text
//! GET  /api/v1/notifications?unreadOnly=true
//! POST /api/v1/notifications/{notification_id}/read
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{NotificationId, NotificationPayload, NotificationQueueEntry};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_identifier};

/// Listing filter.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct NotificationListQuery {
    /// Only return entries not yet marked read.
    #[serde(default)]
    pub unread_only: bool,
}

/// Event details carried by a notification.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayloadBody {
    /// Display name of the sender.
    pub name: String,
    /// Mood for `mood` notifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    /// Button for `frustration` and `vent` notifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frustration: Option<String>,
    /// Free text for `vent` notifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vent_text: Option<String>,
}

impl From<NotificationPayload> for NotificationPayloadBody {
    fn from(value: NotificationPayload) -> Self {
        Self {
            name: value.name,
            mood: value.mood.map(|mood| mood.as_str().to_owned()),
            frustration: value.frustration.map(|kind| kind.as_str().to_owned()),
            vent_text: value.vent_text,
        }
    }
}

/// A notification history entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationBody {
    /// Entry identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// Pair the event happened in.
    #[schema(format = "uuid")]
    pub pair_id: String,
    /// Notification kind, for example `notice_seen`.
    #[schema(example = "gossip")]
    pub kind: String,
    /// Event details.
    pub payload: NotificationPayloadBody,
    /// Whether the recipient marked it read.
    pub read: bool,
    /// When the event was recorded.
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<NotificationQueueEntry> for NotificationBody {
    fn from(value: NotificationQueueEntry) -> Self {
        Self {
            id: value.id.to_string(),
            pair_id: value.pair_id.to_string(),
            kind: value.kind.as_str().to_owned(),
            payload: NotificationPayloadBody::from(value.payload),
            read: value.read,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// The caller's notifications, newest first, capped at 100.
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    params(NotificationListQuery),
    responses(
        (status = 200, description = "Notification history", body = [NotificationBody]),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "listNotifications",
    security(("SessionCookie" = []))
)]
#[get("/notifications")]
pub async fn list_notifications(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<NotificationListQuery>,
) -> ApiResult<web::Json<Vec<NotificationBody>>> {
    let user_id = session.require_user_id()?;
    let entries = state.inbox.list(user_id, query.unread_only).await?;
    Ok(web::Json(
        entries.into_iter().map(NotificationBody::from).collect(),
    ))
}

/// Mark one of the caller's notifications read.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/{notification_id}/read",
    params(("notification_id" = String, Path, description = "Notification identifier")),
    responses(
        (status = 204, description = "Marked read"),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Unknown or foreign notification", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "markNotificationRead",
    security(("SessionCookie" = []))
)]
#[post("/notifications/{notification_id}/read")]
pub async fn mark_notification_read(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let notification_id: NotificationId =
        parse_identifier(&path, FieldName::new("notificationId"))?;
    state.inbox.mark_read(user_id, notification_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockNotificationInbox;
    use crate::domain::{Error, Mood, NotificationKind, UserId};
    use crate::inbound::http::test_utils::{alice, bob, login_as, mock_ports, pair, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn mood_entry(recipient: UserId) -> NotificationQueueEntry {
        NotificationQueueEntry {
            id: NotificationId::random(),
            recipient_id: recipient,
            pair_id: pair(),
            kind: NotificationKind::Mood,
            payload: NotificationPayload {
                name: "Alice".to_owned(),
                mood: Some(Mood::Tired),
                frustration: None,
                vent_text: None,
            },
            read: false,
            created_at: Utc
                .with_ymd_and_hms(2026, 6, 1, 9, 0, 0)
                .single()
                .expect("valid timestamp"),
        }
    }

    fn app_state(inbox: MockNotificationInbox) -> HttpState {
        let mut ports = mock_ports();
        ports.inbox = Arc::new(inbox);
        HttpState::new(ports, None)
    }

    #[rstest]
    #[case("/api/v1/notifications", false)]
    #[case("/api/v1/notifications?unreadOnly=false", false)]
    #[case("/api/v1/notifications?unreadOnly=true", true)]
    #[actix_web::test]
    async fn listing_honours_unread_filter(#[case] uri: &str, #[case] expected: bool) {
        let mut inbox = MockNotificationInbox::new();
        inbox
            .expect_list()
            .withf(move |user: &UserId, unread_only: &bool| {
                *user == bob() && *unread_only == expected
            })
            .times(1)
            .returning(|user, _| Ok(vec![mood_entry(user)]));
        let app = actix_test::init_service(test_app(app_state(inbox))).await;
        let cookie = login_as(&app, &bob()).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri(uri).cookie(cookie).to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body[0]["kind"], "mood");
        assert_eq!(
            body[0]["payload"],
            json!({ "name": "Alice", "mood": "Tired" })
        );
        assert_eq!(body[0]["read"], false);
    }

    #[actix_web::test]
    async fn mark_read_returns_no_content() {
        let mut inbox = MockNotificationInbox::new();
        inbox
            .expect_mark_read()
            .withf(|user: &UserId, _: &NotificationId| *user == alice())
            .times(1)
            .returning(|_, _| Ok(()));
        let app = actix_test::init_service(test_app(app_state(inbox))).await;
        let cookie = login_as(&app, &alice()).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/notifications/{}/read", NotificationId::random()))
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn foreign_notification_is_not_found() {
        let mut inbox = MockNotificationInbox::new();
        inbox
            .expect_mark_read()
            .times(1)
            .returning(|_, _| Err(Error::not_found("notification not found")));
        let app = actix_test::init_service(test_app(app_state(inbox))).await;
        let cookie = login_as(&app, &alice()).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/notifications/{}/read", NotificationId::random()))
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn listing_requires_a_session() {
        let app = actix_test::init_service(test_app(app_state(MockNotificationInbox::new()))).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/notifications")
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
