//! The four fixed service operations and their request form.

use crate::documents;
use crate::response::{
    ApiResponse, decode_check_in, decode_tags_get, decode_user_get, decode_user_search,
};
use lanyard_core::{CheckInRequest, Error, Result};
use serde_json::{Value, json};

/// One of the four operations the check-in service exposes to this client.
///
/// Modeled as a closed enum rather than free-form document strings so
/// request construction and response decoding stay paired exhaustively —
/// adding an operation without a decoder is a compile error, not a runtime
/// surprise.
///
/// # Examples
///
/// ```
/// use lanyard_api::ApiOperation;
///
/// let request = ApiOperation::UserSearch {
///     text: "jane".to_string(),
///     limit: 10,
/// }
/// .into_request()
/// .unwrap();
///
/// assert_eq!(request.operation_name, "UserSearch");
/// assert_eq!(request.variables["search"], "jane");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOperation {
    /// Search users by name or email fragment.
    UserSearch { text: String, limit: u32 },
    /// Fetch one user and their per-tag check-in state.
    UserGet { id: String },
    /// List check-in tag names.
    TagsGet { only_current: bool },
    /// Check a user in to or out of a tag.
    CheckInTag {
        id: String,
        tag: String,
        checkin: bool,
    },
}

impl ApiOperation {
    /// The GraphQL operation name, as it appears in the document.
    #[must_use]
    pub fn operation_name(&self) -> &'static str {
        match self {
            ApiOperation::UserSearch { .. } => "UserSearch",
            ApiOperation::UserGet { .. } => "UserGet",
            ApiOperation::TagsGet { .. } => "TagsGet",
            ApiOperation::CheckInTag { .. } => "CheckInTag",
        }
    }

    /// The fixed document text for this operation.
    #[must_use]
    pub fn document(&self) -> &'static str {
        match self {
            ApiOperation::UserSearch { .. } => documents::USER_SEARCH,
            ApiOperation::UserGet { .. } => documents::USER_GET,
            ApiOperation::TagsGet { .. } => documents::TAGS_GET,
            ApiOperation::CheckInTag { .. } => documents::CHECK_IN_TAG,
        }
    }

    /// Validate operation parameters locally, before any I/O.
    ///
    /// # Errors
    /// Returns `Error::InvalidParameters` if:
    /// - `UserSearch.text` is empty after trimming, or `limit` is zero
    /// - `UserGet.id` / `CheckInTag.id` is empty after trimming
    /// - `CheckInTag.tag` is empty after trimming
    pub fn validate(&self) -> Result<()> {
        match self {
            ApiOperation::UserSearch { text, limit } => {
                if text.trim().is_empty() {
                    return Err(Error::invalid_parameters("search text must not be empty"));
                }
                if *limit == 0 {
                    return Err(Error::invalid_parameters(
                        "search limit must be a positive integer",
                    ));
                }
            }
            ApiOperation::UserGet { id } => {
                if id.trim().is_empty() {
                    return Err(Error::invalid_parameters("user id must not be empty"));
                }
            }
            ApiOperation::TagsGet { .. } => {}
            ApiOperation::CheckInTag { id, tag, .. } => {
                if id.trim().is_empty() {
                    return Err(Error::invalid_parameters("user id must not be empty"));
                }
                if tag.trim().is_empty() {
                    return Err(Error::invalid_parameters("tag name must not be empty"));
                }
            }
        }
        Ok(())
    }

    /// Validate and build the executable request for this operation.
    ///
    /// # Errors
    /// Returns `Error::InvalidParameters` as described in [`validate`](Self::validate).
    pub fn into_request(self) -> Result<ApiRequest> {
        self.validate()?;

        let (operation_name, document) = (self.operation_name(), self.document());
        let variables = match self {
            ApiOperation::UserSearch { text, limit } => json!({
                "search": text,
                "offset": 0,
                "n": limit,
            }),
            ApiOperation::UserGet { id } => json!({ "id": id }),
            ApiOperation::TagsGet { only_current } => json!({ "only_current": only_current }),
            ApiOperation::CheckInTag { id, tag, checkin } => json!({
                "id": id,
                "tag": tag,
                "checkin": checkin,
            }),
        };

        Ok(ApiRequest {
            operation_name,
            document,
            variables,
        })
    }

    /// Decode a transport response for this operation into its typed shape.
    ///
    /// # Errors
    /// Returns `Error::Transport` if the envelope carries service errors or
    /// the payload does not match the operation's fixed response shape.
    pub fn decode_response(&self, response: Value) -> Result<ApiResponse> {
        match self {
            ApiOperation::UserSearch { .. } => {
                decode_user_search(response).map(ApiResponse::UserSearch)
            }
            ApiOperation::UserGet { .. } => decode_user_get(response).map(ApiResponse::UserGet),
            ApiOperation::TagsGet { .. } => decode_tags_get(response).map(ApiResponse::TagsGet),
            ApiOperation::CheckInTag { .. } => {
                decode_check_in(response).map(ApiResponse::CheckInTag)
            }
        }
    }
}

impl From<CheckInRequest> for ApiOperation {
    fn from(request: CheckInRequest) -> Self {
        ApiOperation::CheckInTag {
            id: request.user().as_str().to_owned(),
            tag: request.tag().as_str().to_owned(),
            checkin: request.direction().as_bool(),
        }
    }
}

/// A fully-parameterized, validated request ready for a [`Transport`].
///
/// Opaque to callers: the orchestrator hands it to the transport without
/// inspecting it.
///
/// [`Transport`]: crate::Transport
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// GraphQL operation name.
    pub operation_name: &'static str,
    /// Fixed document text.
    pub document: &'static str,
    /// JSON variables object.
    pub variables: Value,
}

impl ApiRequest {
    /// The complete POST body for a GraphQL endpoint.
    #[must_use]
    pub fn body(&self) -> Value {
        json!({
            "operationName": self.operation_name,
            "query": self.document,
            "variables": self.variables,
        })
    }
}
