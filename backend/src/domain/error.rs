//! Domain-level error type.
//!
//! Errors are transport agnostic. Inbound adapters map them to HTTP responses
//! and the dispatch worker only ever logs them. An error created while a
//! request trace id is in scope records that id automatically.
//!
//! Interaction rejections serialise their reason at the top level
//! (`error`, `remainingMinutes`, `clickCount`) next to the usual envelope, so
//! clients can branch on `body.error` without digging into `details`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{InteractionRejection, TraceId};

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed, fails validation, or is rejected by an
    /// interaction rule.
    InvalidRequest,
    /// Authentication failed or is missing.
    Unauthorized,
    /// Authenticated but not a member of the addressed pair.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// A concurrent writer won the race for the same pair.
    Conflict,
    /// A dependency such as the database is temporarily unavailable.
    ServiceUnavailable,
    /// An unexpected error occurred inside the service.
    InternalError,
}

impl ErrorCode {
    const fn fallback_message(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid request",
            Self::Unauthorized => "unauthorised",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not found",
            Self::Conflict => "conflict",
            Self::ServiceUnavailable => "service unavailable",
            Self::InternalError => "internal error",
        }
    }
}

/// Validation failures reported by [`Error::try_new`] and
/// [`Error::try_with_trace_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    /// The message was blank.
    #[error("error message must not be empty")]
    EmptyMessage,
    /// The trace identifier was blank.
    #[error("trace id must not be empty")]
    EmptyTraceId,
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` is never blank.
///
/// # Examples
/// ```
/// use pairspace::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("pair not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.message(), "pair not found");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
pub struct Error {
    code: ErrorCode,
    message: String,
    trace_id: Option<String>,
    details: Option<Value>,
    rejection: Option<InteractionRejection>,
}

impl Error {
    /// Create an error, substituting a generic message when `message` is blank.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            code.fallback_message().to_owned()
        } else {
            message
        };
        Self {
            code,
            message,
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
            rejection: None,
        }
    }

    /// Fallible constructor that rejects blank messages.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self::new(code, message))
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Correlation identifier, when one was in scope.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Structured details for clients.
    #[must_use]
    pub const fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// The interaction rule that refused the request, if any.
    #[must_use]
    pub const fn rejection(&self) -> Option<InteractionRejection> {
        self.rejection
    }

    /// Record `rejection` and mirror it into [`Self::details`].
    #[must_use]
    pub fn with_rejection(mut self, rejection: InteractionRejection) -> Self {
        self.details = Some(rejection.details());
        self.rejection = Some(rejection);
        self
    }

    /// Attach a trace identifier.
    #[must_use]
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Attach a trace identifier, rejecting blank values.
    pub fn try_with_trace_id(self, id: impl Into<String>) -> Result<Self, ErrorValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ErrorValidationError::EmptyTraceId);
        }
        Ok(self.with_trace_id(id))
    }

    /// Attach structured details.
    ///
    /// # Examples
    /// ```
    /// use pairspace::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_request("bad").with_details(json!({ "field": "mood" }));
    /// assert!(err.details().is_some());
    /// ```
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ErrorDto {
    code: ErrorCode,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    remaining_minutes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    click_count: Option<u32>,
}

impl From<Error> for ErrorDto {
    fn from(value: Error) -> Self {
        let rejection = value.rejection;
        Self {
            code: value.code,
            message: value.message,
            trace_id: value.trace_id,
            details: value.details,
            error: rejection.map(|reason| reason.reason().to_owned()),
            remaining_minutes: rejection.and_then(|reason| reason.remaining_minutes()),
            click_count: rejection.and_then(|reason| reason.click_count()),
        }
    }
}

impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(value: ErrorDto) -> Result<Self, Self::Error> {
        let ErrorDto {
            code,
            message,
            trace_id,
            details,
            error,
            remaining_minutes,
            click_count,
        } = value;
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        let rejection = error.as_deref().and_then(|reason| {
            InteractionRejection::from_wire(reason, remaining_minutes, click_count)
        });
        Ok(Self {
            code,
            message,
            trace_id,
            details,
            rejection,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn try_new_rejects_blank_messages() {
        let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
        assert_eq!(result, Err(ErrorValidationError::EmptyMessage));
    }

    #[rstest]
    fn new_substitutes_fallback_for_blank_messages() {
        let err = Error::new(ErrorCode::Conflict, "");
        assert_eq!(err.message(), "conflict");
    }

    #[rstest]
    fn try_with_trace_id_rejects_blank_values() {
        let result = Error::internal("boom").try_with_trace_id(" ");
        assert_eq!(result, Err(ErrorValidationError::EmptyTraceId));
    }

    #[tokio::test]
    async fn captures_trace_id_in_scope() {
        let trace_id: TraceId = "00000000-0000-0000-0000-000000000007"
            .parse()
            .expect("valid uuid");
        let err = TraceId::scope(trace_id, async { Error::forbidden("not a member") }).await;
        assert_eq!(err.trace_id(), Some("00000000-0000-0000-0000-000000000007"));
    }

    #[rstest]
    fn serialises_camel_case_and_omits_empty_fields() {
        let err = Error::invalid_request("bad")
            .with_details(json!({ "error": "PENDING_UNSEEN" }));
        let value = serde_json::to_value(&err).expect("serialise");
        assert_eq!(
            value,
            json!({
                "code": "invalid_request",
                "message": "bad",
                "details": { "error": "PENDING_UNSEEN" }
            })
        );
    }

    #[rstest]
    fn rejections_surface_their_reason_at_the_top_level() {
        let err = Error::from(InteractionRejection::CooldownActive {
            remaining_minutes: 42,
        });
        let value = serde_json::to_value(&err).expect("serialise");
        assert_eq!(
            value,
            json!({
                "code": "invalid_request",
                "message": "you can post again in 42 minutes",
                "error": "COOLDOWN_ACTIVE",
                "remainingMinutes": 42,
                "details": { "error": "COOLDOWN_ACTIVE", "remainingMinutes": 42 }
            })
        );
    }

    #[rstest]
    fn rejections_survive_a_wire_round_trip() {
        let err = Error::from(InteractionRejection::DailyLimitReached {
            remaining_minutes: 30,
            click_count: 1,
        });
        let value = serde_json::to_value(&err).expect("serialise");
        let back: Error = serde_json::from_value(value).expect("deserialise");
        assert_eq!(back, err);
    }

    #[rstest]
    fn deserialising_blank_message_fails() {
        let result = serde_json::from_value::<Error>(json!({
            "code": "not_found",
            "message": "  "
        }));
        assert!(result.is_err());
    }
}
