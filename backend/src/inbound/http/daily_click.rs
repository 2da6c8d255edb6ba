//! Daily button HTTP handlers.
//!
//! ```text
//! POST /api/v1/pairs/{pair_id}/daily-click
//! GET  /api/v1/pairs/{pair_id}/daily-click?type=sutta
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{ClickOutcome, ClickStatus, DailyClickRequest};
use crate::domain::{ActionKind, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error, parse_choice};

const TYPE_FIELD: FieldName = FieldName::new("type");

/// Request payload for a button press.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyClickBody {
    /// `sutta`, `project`, `junior` or `resign`. `buttonType` is accepted as
    /// an alias.
    #[serde(rename = "type", alias = "buttonType")]
    #[schema(example = "sutta")]
    pub kind: Option<String>,
    /// Optional free text sent to the partner with a frustration press.
    pub vent_text: Option<String>,
}

/// Response for an accepted press.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyClickResponseBody {
    /// Always `true`; refusals use the error envelope.
    pub success: bool,
    /// Escalation flag, only present for sutta presses.
    #[serde(rename = "isSOS", skip_serializing_if = "Option::is_none")]
    pub is_sos: Option<bool>,
    /// Accepted presses in the window including this one.
    pub click_count: u32,
}

impl From<ClickOutcome> for DailyClickResponseBody {
    fn from(value: ClickOutcome) -> Self {
        Self {
            success: true,
            is_sos: value.is_sos,
            click_count: value.click_count,
        }
    }
}

/// Query for a button's counters.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DailyClickStatusQuery {
    /// Button to report on.
    #[serde(rename = "type")]
    #[param(rename = "type", example = "project")]
    pub kind: Option<String>,
}

/// Counters for one button.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyClickStatusBody {
    /// Button reported on.
    pub kind: String,
    /// Accepted presses in the current window.
    pub count_today: u32,
    /// Whether another press would be accepted now.
    pub can_click: bool,
    /// Minutes until the next press is accepted, when capped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_minutes: Option<u64>,
}

impl From<ClickStatus> for DailyClickStatusBody {
    fn from(value: ClickStatus) -> Self {
        Self {
            kind: value.kind.as_str().to_owned(),
            count_today: value.count_today,
            can_click: value.can_click,
            remaining_minutes: value.remaining_minutes,
        }
    }
}

fn parse_kind(raw: Option<String>) -> Result<ActionKind, Error> {
    let raw = raw.ok_or_else(|| missing_field_error(TYPE_FIELD))?;
    let allowed = ActionKind::ALL.map(ActionKind::as_str);
    parse_choice(&raw, TYPE_FIELD, &allowed)
}

/// Record a button press and notify the partner.
#[utoipa::path(
    post,
    path = "/api/v1/pairs/{pair_id}/daily-click",
    params(("pair_id" = String, Path, description = "Pair identifier")),
    request_body = DailyClickBody,
    responses(
        (status = 200, description = "Press recorded", body = DailyClickResponseBody),
        (status = 400, description = "Invalid type or DAILY_LIMIT_REACHED", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Not a member of the pair", body = ErrorSchema),
        (status = 404, description = "Pair not found or incomplete", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["daily-click"],
    operation_id = "dailyClick",
    security(("SessionCookie" = []))
)]
#[post("/pairs/{pair_id}/daily-click")]
pub async fn daily_click(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<DailyClickBody>,
) -> ApiResult<web::Json<DailyClickResponseBody>> {
    let actor = session.require_pair_actor(&path)?;
    let DailyClickBody { kind, vent_text } = payload.into_inner();
    let kind = parse_kind(kind)?;
    let outcome = state
        .daily_click
        .click(DailyClickRequest {
            actor,
            kind,
            vent_text,
        })
        .await?;
    Ok(web::Json(DailyClickResponseBody::from(outcome)))
}

/// Counters for one button in the current window.
#[utoipa::path(
    get,
    path = "/api/v1/pairs/{pair_id}/daily-click",
    params(
        ("pair_id" = String, Path, description = "Pair identifier"),
        DailyClickStatusQuery
    ),
    responses(
        (status = 200, description = "Button counters", body = DailyClickStatusBody),
        (status = 400, description = "Invalid type", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Not a member of the pair", body = ErrorSchema),
        (status = 404, description = "Pair not found or incomplete", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["daily-click"],
    operation_id = "dailyClickStatus",
    security(("SessionCookie" = []))
)]
#[get("/pairs/{pair_id}/daily-click")]
pub async fn daily_click_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<DailyClickStatusQuery>,
) -> ApiResult<web::Json<DailyClickStatusBody>> {
    let actor = session.require_pair_actor(&path)?;
    let kind = parse_kind(query.into_inner().kind)?;
    let status = state.daily_click_query.status(actor, kind).await?;
    Ok(web::Json(DailyClickStatusBody::from(status)))
}
