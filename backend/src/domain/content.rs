//! Validated free-text content shared by notices and gossip messages, plus
//! the shorter vent text attached to frustration presses.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum length of a notice or gossip body, in characters.
pub const MAX_CONTENT_CHARS: usize = 2000;

/// Maximum length of vent text, in characters.
///
/// Vent text is echoed verbatim into the partner's push payload, which must
/// stay under the push service's record size even for four-byte characters.
pub const MAX_VENT_CHARS: usize = 500;

/// Validation errors for [`MessageContent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    /// Nothing but whitespace was supplied.
    #[error("content is required")]
    Empty,
    /// The trimmed content exceeds its length limit.
    #[error("content must be at most {max} characters")]
    TooLong {
        /// Permitted maximum.
        max: usize,
    },
}

/// Trimmed, non-empty message text.
///
/// # Examples
/// ```
/// use pairspace::domain::MessageContent;
///
/// let content = MessageContent::new("  hi there \n").expect("valid");
/// assert_eq!(content.as_str(), "hi there");
/// assert!(MessageContent::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageContent(String);

impl MessageContent {
    /// Trim and validate raw input.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ContentError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ContentError::Empty);
        }
        if trimmed.chars().count() > MAX_CONTENT_CHARS {
            return Err(ContentError::TooLong {
                max: MAX_CONTENT_CHARS,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for MessageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for MessageContent {
    type Error = ContentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MessageContent> for String {
    fn from(value: MessageContent) -> Self {
        value.0
    }
}

/// Optional free text sent with a frustration press.
///
/// Blank input means "no vent" rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VentText(String);

impl VentText {
    /// Trim `raw`, returning `None` when nothing is left.
    pub fn parse(raw: &str) -> Result<Option<Self>, ContentError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed.chars().count() > MAX_VENT_CHARS {
            return Err(ContentError::TooLong {
                max: MAX_VENT_CHARS,
            });
        }
        Ok(Some(Self(trimmed.to_owned())))
    }

    /// Borrow the text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<VentText> for String {
    fn from(value: VentText) -> Self {
        value.0
    }
}
