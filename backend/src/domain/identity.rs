//! Strongly typed identifiers for users, pairs, and interaction records.
//!
//! Every identifier wraps a UUID and serialises as its hyphenated string form.
//! Parsing rejects empty input, surrounding whitespace, and non-UUID text so a
//! malformed path segment never reaches a repository.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors raised when parsing an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    /// The input was empty.
    #[error("identifier must not be empty")]
    Empty,
    /// The input was not a canonical UUID.
    #[error("identifier must be a valid UUID")]
    Invalid,
}

fn parse_uuid(raw: &str) -> Result<Uuid, IdentifierError> {
    if raw.is_empty() {
        return Err(IdentifierError::Empty);
    }
    if raw.trim() != raw {
        return Err(IdentifierError::Invalid);
    }
    Uuid::parse_str(raw).map_err(|_| IdentifierError::Invalid)
}

macro_rules! define_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(Uuid);

        impl $name {
            /// Parse an identifier from its string form.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, IdentifierError> {
                parse_uuid(raw.as_ref()).map(Self)
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Generate a fresh random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdentifierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdentifierError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0.to_string()
            }
        }
    };
}

define_identifier!(
    /// Stable identity of an authenticated user.
    UserId
);
define_identifier!(
    /// Identity of the two-user relation that scopes all interaction data.
    PairId
);
define_identifier!(
    /// Identity of a notice board entry.
    NoticeId
);
define_identifier!(
    /// Identity of a gossip message.
    GossipId
);
define_identifier!(
    /// Identity of an in-app notification history entry.
    NotificationId
);
define_identifier!(
    /// Identity of a registered push endpoint.
    SubscriptionId
);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", IdentifierError::Empty)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", IdentifierError::Invalid)]
    #[case("not-a-uuid", IdentifierError::Invalid)]
    fn rejects_malformed_identifiers(#[case] raw: &str, #[case] expected: IdentifierError) {
        assert_eq!(PairId::new(raw), Err(expected));
    }

    #[rstest]
    fn round_trips_through_serde() {
        let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
        let json = serde_json::to_string(&id).expect("serialise");
        assert_eq!(json, "\"3fa85f64-5717-4562-b3fc-2c963f66afa6\"");
        let back: UserId = serde_json::from_str(&json).expect("deserialise");
        assert_eq!(back, id);
    }

    #[rstest]
    fn deserialising_invalid_text_fails() {
        let result = serde_json::from_str::<NoticeId>("\"nope\"");
        assert!(result.is_err());
    }
}
