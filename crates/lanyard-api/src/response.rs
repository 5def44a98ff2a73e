//! Typed response shapes and decoders for the four service operations.
//!
//! The client holds read-only snapshots of service-owned data: decoding
//! never mutates anything, and each decoder checks the GraphQL envelope
//! (`data` / `errors`) before touching the payload. Service-reported errors
//! surface as protocol-level transport failures.

use chrono::{DateTime, Utc};
use lanyard_core::{Error, Result, TagName};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Read-only snapshot of a service-side attendee record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub applied: bool,
    pub accepted: bool,
    pub confirmed: bool,
    #[serde(rename = "confirmationBranch")]
    pub confirmation_branch: Option<String>,
    pub application: Option<BranchInfo>,
    pub confirmation: Option<BranchInfo>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl UserRecord {
    /// Answer to a named application question, if the user provided one.
    #[must_use]
    pub fn question(&self, name: &str) -> Option<&str> {
        self.questions
            .iter()
            .find(|question| question.name == name)
            .and_then(|question| question.answer.as_deref())
    }

    /// Whether the user may be checked in at all: the service only admits
    /// attendees who are both accepted and confirmed.
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.accepted && self.confirmed
    }
}

/// Application or confirmation branch descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchInfo {
    #[serde(rename = "type")]
    pub branch_type: String,
}

/// A named application question and its answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub name: String,
    pub answer: Option<String>,
}

/// Reference to a named check-in tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagRef {
    pub name: String,
}

/// The last successful check-in against a tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckinEvent {
    pub checked_in_date: DateTime<Utc>,
    pub checked_in_by: String,
}

/// Per-(user, tag) check-in status.
///
/// Updated service-side only by successful check-in mutations; the client
/// holds a snapshot per query and never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagState {
    pub tag: TagRef,
    pub checked_in: bool,
    pub checkin_success: bool,
    pub last_successful_checkin: Option<CheckinEvent>,
}

/// A user snapshot together with their per-tag states (`UserGet` response).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserWithTags {
    #[serde(flatten)]
    pub user: UserRecord,
    #[serde(default)]
    pub tags: Vec<TagState>,
}

impl UserWithTags {
    /// The user's state for a specific tag, if the service reported one.
    #[must_use]
    pub fn tag_state(&self, tag: &TagName) -> Option<&TagState> {
        self.tags.iter().find(|state| state.tag.name == tag.as_str())
    }
}

/// Refreshed user + tag states returned by the `check_in` mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInPayload {
    pub user: UserRecord,
    #[serde(default)]
    pub tags: Vec<TagState>,
}

impl CheckInPayload {
    /// The refreshed state for a specific tag.
    #[must_use]
    pub fn tag_state(&self, tag: &TagName) -> Option<&TagState> {
        self.tags.iter().find(|state| state.tag.name == tag.as_str())
    }
}

/// Typed response for any of the four operations, paired exhaustively with
/// [`ApiOperation`](crate::ApiOperation).
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    UserSearch(Vec<UserRecord>),
    /// `None` when the id resolved to no user.
    UserGet(Option<UserWithTags>),
    TagsGet(Vec<String>),
    /// `None` when the id resolved to no user.
    CheckInTag(Option<CheckInPayload>),
}

/// GraphQL response envelope.
#[derive(Debug, Deserialize)]
struct Envelope {
    data: Option<Value>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// Unwrap the GraphQL envelope, surfacing service-reported errors.
fn unwrap_data(response: Value) -> Result<Value> {
    let envelope: Envelope = serde_json::from_value(response)
        .map_err(|err| Error::transport(format!("malformed response envelope: {err}")))?;

    if let Some(errors) = envelope.errors
        && !errors.is_empty()
    {
        let messages: Vec<String> = errors.into_iter().map(|error| error.message).collect();
        return Err(Error::transport(format!(
            "service returned errors: {}",
            messages.join("; ")
        )));
    }

    envelope
        .data
        .ok_or_else(|| Error::transport("response contained no data"))
}

/// Decode a `UserSearch` response into the matched user snapshots.
pub fn decode_user_search(response: Value) -> Result<Vec<UserRecord>> {
    #[derive(Deserialize)]
    struct Data {
        search_user_simple: Vec<UserRecord>,
    }

    let data: Data = serde_json::from_value(unwrap_data(response)?)
        .map_err(|err| Error::transport(format!("malformed user search response: {err}")))?;
    Ok(data.search_user_simple)
}

/// Decode a `UserGet` response. `None` means the id matched no user.
pub fn decode_user_get(response: Value) -> Result<Option<UserWithTags>> {
    #[derive(Deserialize)]
    struct Data {
        user: Option<UserWithTags>,
    }

    let data: Data = serde_json::from_value(unwrap_data(response)?)
        .map_err(|err| Error::transport(format!("malformed user response: {err}")))?;
    Ok(data.user)
}

/// Decode a `TagsGet` response into the tag name list.
pub fn decode_tags_get(response: Value) -> Result<Vec<String>> {
    #[derive(Deserialize)]
    struct Data {
        tags: Vec<TagRef>,
    }

    let data: Data = serde_json::from_value(unwrap_data(response)?)
        .map_err(|err| Error::transport(format!("malformed tags response: {err}")))?;
    Ok(data.tags.into_iter().map(|tag| tag.name).collect())
}

/// Decode a `CheckInTag` response. `None` means the id matched no user.
pub fn decode_check_in(response: Value) -> Result<Option<CheckInPayload>> {
    #[derive(Deserialize)]
    struct Data {
        check_in: Option<CheckInPayload>,
    }

    let data: Data = serde_json::from_value(unwrap_data(response)?)
        .map_err(|err| Error::transport(format!("malformed check-in response: {err}")))?;
    Ok(data.check_in)
}
