//! Push endpoint registration.
//!
//! ```text
//! POST /api/v1/push/subscribe
//! POST /api/v1/push/unsubscribe
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{PushSubscription, SubscriptionDescriptor, SubscriptionKeys};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error};

/// Browser-supplied encryption keys.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SubscriptionKeysBody {
    /// Client public key, URL-safe base64.
    pub p256dh: String,
    /// Client auth secret, URL-safe base64.
    pub auth: String,
}

/// Endpoint descriptor as produced by `PushSubscription.toJSON()`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequestBody {
    /// Push service URL.
    #[schema(example = "https://push.example.com/send/abc123")]
    pub endpoint: String,
    /// Encryption keys.
    pub keys: SubscriptionKeysBody,
    /// Expiry in epoch milliseconds, when the browser advertises one.
    pub expiration_time: Option<i64>,
}

impl From<SubscribeRequestBody> for SubscriptionDescriptor {
    fn from(value: SubscribeRequestBody) -> Self {
        Self {
            endpoint: value.endpoint,
            keys: SubscriptionKeys {
                p256dh: value.keys.p256dh,
                auth: value.keys.auth,
            },
            expiration_time: value.expiration_time,
        }
    }
}

/// A stored registration.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionBody {
    /// Registration identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// Registered push service URL.
    pub endpoint: String,
    /// When the registration was first stored.
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<PushSubscription> for SubscriptionBody {
    fn from(value: PushSubscription) -> Self {
        Self {
            id: value.id.to_string(),
            endpoint: value.descriptor.endpoint,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// Request payload naming the endpoint to remove.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnsubscribeRequestBody {
    /// Push service URL to forget.
    pub endpoint: Option<String>,
}

/// Outcome of an unsubscribe.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnsubscribeResponseBody {
    /// Always `true`; removing an unknown endpoint is not an error.
    pub success: bool,
    /// Registrations removed.
    pub removed: u64,
}

/// Register or refresh a push endpoint for the caller.
#[utoipa::path(
    post,
    path = "/api/v1/push/subscribe",
    request_body = SubscribeRequestBody,
    responses(
        (status = 200, description = "Endpoint registered", body = SubscriptionBody),
        (status = 400, description = "Invalid descriptor", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["push"],
    operation_id = "pushSubscribe",
    security(("SessionCookie" = []))
)]
#[post("/push/subscribe")]
pub async fn subscribe(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SubscribeRequestBody>,
) -> ApiResult<web::Json<SubscriptionBody>> {
    let user_id = session.require_user_id()?;
    let descriptor = SubscriptionDescriptor::from(payload.into_inner());
    let subscription = state.push.subscribe(user_id, descriptor).await?;
    Ok(web::Json(SubscriptionBody::from(subscription)))
}

/// Remove the caller's registrations for an endpoint.
#[utoipa::path(
    post,
    path = "/api/v1/push/unsubscribe",
    request_body = UnsubscribeRequestBody,
    responses(
        (status = 200, description = "Endpoint removed", body = UnsubscribeResponseBody),
        (status = 400, description = "Missing endpoint", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["push"],
    operation_id = "pushUnsubscribe",
    security(("SessionCookie" = []))
)]
#[post("/push/unsubscribe")]
pub async fn unsubscribe(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UnsubscribeRequestBody>,
) -> ApiResult<web::Json<UnsubscribeResponseBody>> {
    let user_id = session.require_user_id()?;
    let endpoint = payload
        .into_inner()
        .endpoint
        .ok_or_else(|| missing_field_error(FieldName::new("endpoint")))?;
    let removed = state.push.unsubscribe(user_id, endpoint).await?;
    Ok(web::Json(UnsubscribeResponseBody {
        success: true,
        removed,
    }))
}
