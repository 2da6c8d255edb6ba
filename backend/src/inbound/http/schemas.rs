//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic and do not derive `ToSchema`. The
//! wrappers here mirror their wire shape for documentation only.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or refused by an interaction rule.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not a member of the pair.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// A concurrent writer won the race.
    #[schema(rename = "conflict")]
    Conflict,
    /// A dependency is temporarily unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// Interaction rejections add `error` (a stable uppercase reason) and, when
/// time-bound, `remainingMinutes` at the top level. `details` mirrors them.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message.
    #[schema(example = "you can post again in 42 minutes")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Structured details such as the rejection reason.
    #[schema(example = json!({ "error": "COOLDOWN_ACTIVE", "remainingMinutes": 42 }))]
    details: Option<serde_json::Value>,
    /// Rejection reason such as `PENDING_UNSEEN` or `COOLDOWN_ACTIVE`.
    #[schema(example = "COOLDOWN_ACTIVE")]
    error: Option<String>,
    /// Minutes until a time-bound rejection lifts.
    #[schema(example = 42)]
    remaining_minutes: Option<u64>,
    /// Accepted actions in the window, for `DAILY_LIMIT_REACHED`.
    click_count: Option<u32>,
}
