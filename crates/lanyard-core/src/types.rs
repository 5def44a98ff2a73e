use crate::{
    Result,
    constants::{MAX_BADGE_ID_LENGTH, MAX_TAG_NAME_LENGTH},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

/// Badge identifier decoded from tag memory.
///
/// Opaque and immutable once decoded; equality is exact match against the
/// service-side user id.
///
/// # Security
/// The identifier doubles as the credential presented at a checkpoint, so
/// this type implements constant-time comparison to prevent timing attacks
/// when identifiers are compared.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct BadgeId(String);

impl BadgeId {
    /// Create a new badge identifier with validation.
    ///
    /// The value is trimmed before validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidParameters` if:
    /// - The identifier is empty after trimming
    /// - The identifier is longer than 128 characters
    /// - The identifier contains control characters
    pub fn new(id: &str) -> Result<Self> {
        let id = id.trim();

        if id.is_empty() {
            return Err(Error::invalid_parameters(
                "badge identifier must not be empty",
            ));
        }
        if id.len() > MAX_BADGE_ID_LENGTH {
            return Err(Error::invalid_parameters(format!(
                "badge identifier must be at most {MAX_BADGE_ID_LENGTH} chars, got {}",
                id.len()
            )));
        }
        if id.chars().any(char::is_control) {
            return Err(Error::invalid_parameters(
                "badge identifier must not contain control characters",
            ));
        }

        Ok(BadgeId(id.to_owned()))
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BadgeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for BadgeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        BadgeId::new(s)
    }
}

/// Constant-time comparison implementation for BadgeId
///
/// This prevents timing attacks by ensuring comparison takes the same time
/// regardless of where the strings differ.
impl PartialEq for BadgeId {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

/// Hash implementation for BadgeId
///
/// Implements standard hashing for use in hash-based collections.
impl std::hash::Hash for BadgeId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

/// Named check-in checkpoint on the service side ("venue-entrance").
///
/// Distinct from the NFC tag hardware: the service uses "tag" for a
/// checkpoint a user can be checked in to or out of.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagName(String);

impl TagName {
    /// Create a new tag name with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidParameters` if the name is empty after trimming
    /// or longer than 64 characters.
    pub fn new(name: &str) -> Result<Self> {
        let name = name.trim();

        if name.is_empty() {
            return Err(Error::invalid_parameters("tag name must not be empty"));
        }
        if name.len() > MAX_TAG_NAME_LENGTH {
            return Err(Error::invalid_parameters(format!(
                "tag name must be at most {MAX_TAG_NAME_LENGTH} chars, got {}",
                name.len()
            )));
        }

        Ok(TagName(name.to_owned()))
    }

    /// Get the tag name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TagName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        TagName::new(s)
    }
}

/// Direction of a check-in mutation.
///
/// The wire format is a boolean (`true` = check in), but callers work with
/// an explicit direction so scan-handling code cannot mix it up with the
/// service's `checked_in` status booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckDirection {
    /// Check the user in to the tag.
    In,
    /// Check the user out of the tag.
    Out,
}

impl CheckDirection {
    /// Convert to the wire boolean (`true` = check in).
    #[inline]
    #[must_use]
    pub fn as_bool(self) -> bool {
        matches!(self, CheckDirection::In)
    }

    /// Create a direction from the wire boolean.
    #[inline]
    #[must_use]
    pub fn from_bool(checkin: bool) -> Self {
        if checkin {
            CheckDirection::In
        } else {
            CheckDirection::Out
        }
    }

    /// Returns `true` if this is a check-in.
    #[inline]
    #[must_use]
    pub fn is_in(self) -> bool {
        matches!(self, CheckDirection::In)
    }

    /// Returns `true` if this is a check-out.
    #[inline]
    #[must_use]
    pub fn is_out(self) -> bool {
        matches!(self, CheckDirection::Out)
    }
}

impl fmt::Display for CheckDirection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CheckDirection::In => write!(f, "check-in"),
            CheckDirection::Out => write!(f, "check-out"),
        }
    }
}

/// A single check-in mutation, created per scan event and consumed once.
///
/// # Invariant
/// A `CheckInRequest` is only constructed after the badge identifier has been
/// decoded and validated as non-empty, so a partially-read tag can never
/// reach the transport. The request is never retried automatically across
/// network failures; retry is a caller policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInRequest {
    user: BadgeId,
    tag: TagName,
    direction: CheckDirection,
}

impl CheckInRequest {
    /// Create a new check-in request.
    #[must_use]
    pub fn new(user: BadgeId, tag: TagName, direction: CheckDirection) -> Self {
        Self {
            user,
            tag,
            direction,
        }
    }

    /// The resolved user id the badge decoded to.
    #[must_use]
    pub fn user(&self) -> &BadgeId {
        &self.user
    }

    /// The checkpoint this request targets.
    #[must_use]
    pub fn tag(&self) -> &TagName {
        &self.tag
    }

    /// The requested direction.
    #[must_use]
    pub fn direction(&self) -> CheckDirection {
        self.direction
    }
}
