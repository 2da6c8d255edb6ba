//! Mood check-in HTTP handlers.
//!
//! ```text
//! POST /api/v1/pairs/{pair_id}/mood
//! GET  /api/v1/pairs/{pair_id}/mood
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Mood, MoodEntry};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error, parse_choice};

const MOOD_FIELD: FieldName = FieldName::new("mood");

/// Request payload for recording a mood.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoodRequestBody {
    /// One of `Happy`, `Frustrated`, `Lost`, `Okay`, `Tired`, `Excited`,
    /// `Anxious` or `Calm`. Case-sensitive.
    #[schema(example = "Calm")]
    pub mood: Option<String>,
}

/// A recorded mood.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoodBody {
    /// Reporting member.
    #[schema(format = "uuid")]
    pub user_id: String,
    /// Reported mood.
    pub mood: String,
    /// When it was reported.
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<MoodEntry> for MoodBody {
    fn from(value: MoodEntry) -> Self {
        Self {
            user_id: value.user_id.to_string(),
            mood: value.mood.as_str().to_owned(),
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// Record the requester's mood and notify the partner.
#[utoipa::path(
    post,
    path = "/api/v1/pairs/{pair_id}/mood",
    params(("pair_id" = String, Path, description = "Pair identifier")),
    request_body = MoodRequestBody,
    responses(
        (status = 200, description = "Mood recorded", body = MoodBody),
        (status = 400, description = "Unknown mood", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Not a member of the pair", body = ErrorSchema),
        (status = 404, description = "Pair not found or incomplete", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["mood"],
    operation_id = "recordMood",
    security(("SessionCookie" = []))
)]
#[post("/pairs/{pair_id}/mood")]
pub async fn record_mood(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<MoodRequestBody>,
) -> ApiResult<web::Json<MoodBody>> {
    let actor = session.require_pair_actor(&path)?;
    let raw = payload
        .into_inner()
        .mood
        .ok_or_else(|| missing_field_error(MOOD_FIELD))?;
    let allowed = Mood::ALL.map(Mood::as_str);
    let mood: Mood = parse_choice(&raw, MOOD_FIELD, &allowed)?;
    let entry = state.moods.record(actor, mood).await?;
    Ok(web::Json(MoodBody::from(entry)))
}

/// The partner's mood from the last 24 hours, or `null`.
#[utoipa::path(
    get,
    path = "/api/v1/pairs/{pair_id}/mood",
    params(("pair_id" = String, Path, description = "Pair identifier")),
    responses(
        (status = 200, description = "Partner mood, or null when none is current", body = Option<MoodBody>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Not a member of the pair", body = ErrorSchema),
        (status = 404, description = "Pair not found or incomplete", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["mood"],
    operation_id = "partnerMood",
    security(("SessionCookie" = []))
)]
#[get("/pairs/{pair_id}/mood")]
pub async fn partner_mood(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Option<MoodBody>>> {
    let actor = session.require_pair_actor(&path)?;
    let entry = state.moods_query.partner_mood(actor).await?;
    Ok(web::Json(entry.map(MoodBody::from)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PairActor;
    use crate::domain::ports::{MockMoodCommand, MockMoodQuery};
    use crate::inbound::http::test_utils::{alice, bob, login_as, mock_ports, pair, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use chrono::{TimeZone, Utc};
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn mood_uri() -> String {
        format!("/api/v1/pairs/{}/mood", pair())
    }

    fn entry(mood: Mood) -> MoodEntry {
        MoodEntry {
            pair_id: pair(),
            user_id: alice(),
            mood,
            created_at: Utc
                .with_ymd_and_hms(2026, 6, 1, 9, 0, 0)
                .single()
                .expect("valid timestamp"),
        }
    }

    #[actix_web::test]
    async fn records_a_known_mood() {
        let mut command = MockMoodCommand::new();
        command
            .expect_record()
            .withf(|actor: &PairActor, mood: &Mood| actor.user_id == alice() && *mood == Mood::Calm)
            .times(1)
            .returning(|_, mood| Ok(entry(mood)));
        let mut ports = mock_ports();
        ports.moods = Arc::new(command);
        let app = actix_test::init_service(test_app(HttpState::new(ports, None))).await;
        let cookie = login_as(&app, &alice()).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&mood_uri())
                .cookie(cookie)
                .set_json(json!({ "mood": "Calm" }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["mood"], "Calm");
    }

    #[actix_web::test]
    async fn mood_spelling_is_case_sensitive() {
        let app = actix_test::init_service(test_app(HttpState::new(mock_ports(), None))).await;
        let cookie = login_as(&app, &alice()).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&mood_uri())
                .cookie(cookie)
                .set_json(json!({ "mood": "calm" }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["details"]["value"], "calm");
        assert_eq!(body["details"]["allowed"][0], "Happy");
    }

    #[actix_web::test]
    async fn absent_partner_mood_is_null() {
        let mut query = MockMoodQuery::new();
        query
            .expect_partner_mood()
            .withf(|actor: &PairActor| actor.user_id == bob())
            .times(1)
            .returning(|_| Ok(None));
        let mut ports = mock_ports();
        ports.moods_query = Arc::new(query);
        let app = actix_test::init_service(test_app(HttpState::new(ports, None))).await;
        let cookie = login_as(&app, &bob()).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&mood_uri())
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body, Value::Null);
    }
}
