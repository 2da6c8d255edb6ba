//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every failure becomes an `invalid_request` error whose details name the
//! offending field and a stable `code`, so clients can highlight the input.

use std::str::FromStr;

use serde_json::json;

use crate::domain::{ContentError, Error, MessageContent};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    InvalidUuid,
    InvalidValue,
    EmptyContent,
    ContentTooLong,
}

impl ValidationCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidValue => "invalid_value",
            Self::EmptyContent => "empty_content",
            Self::ContentTooLong => "content_too_long",
        }
    }
}

/// Newtype for wire field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    const fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ValidationCode, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        ValidationCode::MissingField,
        format!("missing required field: {}", field.as_str()),
    )
}

/// Parse a path or body identifier such as `PairId` or `GossipId`.
pub(crate) fn parse_identifier<T: FromStr>(raw: &str, field: FieldName) -> Result<T, Error> {
    raw.parse().map_err(|_| {
        Error::invalid_request(format!("{} must be a valid UUID", field.as_str())).with_details(
            json!({
                "field": field.as_str(),
                "value": raw,
                "code": ValidationCode::InvalidUuid.as_str(),
            }),
        )
    })
}

/// Parse one of a fixed set of values, listing the accepted spellings on
/// failure.
pub(crate) fn parse_choice<T: FromStr>(
    raw: &str,
    field: FieldName,
    allowed: &[&str],
) -> Result<T, Error> {
    raw.parse().map_err(|_| {
        Error::invalid_request(format!(
            "{} must be one of: {}",
            field.as_str(),
            allowed.join(", ")
        ))
        .with_details(json!({
            "field": field.as_str(),
            "value": raw,
            "allowed": allowed,
            "code": ValidationCode::InvalidValue.as_str(),
        }))
    })
}

/// Require and validate a free-text body.
pub(crate) fn parse_content(
    raw: Option<String>,
    field: FieldName,
) -> Result<MessageContent, Error> {
    let raw = raw.ok_or_else(|| missing_field_error(field))?;
    MessageContent::new(raw).map_err(|error| {
        let code = match error {
            ContentError::Empty => ValidationCode::EmptyContent,
            ContentError::TooLong { .. } => ValidationCode::ContentTooLong,
        };
        field_error(field, code, error.to_string())
    })
}
