//! Validated identifier types
//!
//! Both identifiers follow the parse-don't-validate pattern: construction
//! goes through `parse()` and returns a `Result`, so a held value is always
//! well-formed. Task ids are opaque to callers; the store assigns them at
//! creation and they are never reused.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum accepted identifier length.
const MAX_ID_LENGTH: usize = 128;

/// Errors produced when parsing an identifier from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdValidationError {
    /// Identifier was empty.
    Empty,
    /// Identifier exceeded [`MAX_ID_LENGTH`] characters.
    TooLong { length: usize },
    /// Identifier contained a character outside `[A-Za-z0-9_-]`.
    InvalidCharacter { character: char },
}

impl fmt::Display for IdValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "identifier cannot be empty"),
            Self::TooLong { length } => {
                write!(
                    f,
                    "identifier too long: {} characters (max {})",
                    length, MAX_ID_LENGTH
                )
            }
            Self::InvalidCharacter { character } => {
                write!(f, "identifier contains invalid character '{}'", character)
            }
        }
    }
}

impl std::error::Error for IdValidationError {}

fn validate(id: &str) -> Result<(), IdValidationError> {
    if id.is_empty() {
        return Err(IdValidationError::Empty);
    }
    if id.len() > MAX_ID_LENGTH {
        return Err(IdValidationError::TooLong { length: id.len() });
    }
    if let Some(character) = id
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && *c != '-' && *c != '_')
    {
        return Err(IdValidationError::InvalidCharacter { character });
    }
    Ok(())
}

/// Unique identifier of a task record.
///
/// Assigned by the store on creation (UUID v4), immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId(String);

impl TaskId {
    /// Parse and validate a task ID from a string.
    pub fn parse(id: impl AsRef<str>) -> Result<Self, IdValidationError> {
        validate(id.as_ref()).map(|()| Self(id.as_ref().to_string()))
    }

    /// Generate a new random task ID using UUID v4.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the task ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = IdValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.0
    }
}

impl TryFrom<String> for TaskId {
    type Error = IdValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

/// Unique identifier for a request, used to correlate logs and error
/// responses across a single round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RequestId(String);

impl RequestId {
    /// Parse and validate a request ID from a string.
    pub fn parse(id: impl AsRef<str>) -> Result<Self, IdValidationError> {
        validate(id.as_ref()).map(|()| Self(id.as_ref().to_string()))
    }

    /// Get the request ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create a request ID without validation (middleware-internal).
    #[doc(hidden)]
    pub fn new_unchecked(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new random request ID using UUID v4.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<RequestId> for String {
    fn from(id: RequestId) -> Self {
        id.0
    }
}

impl TryFrom<String> for RequestId {
    type Error = IdValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}
