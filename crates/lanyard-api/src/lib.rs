//! Query builder and response model for the check-in service API.
//!
//! The service exposes exactly four operations the client uses; this crate
//! models them as a closed enum ([`ApiOperation`]) so request/response
//! pairing is checked exhaustively, rather than passing free-form document
//! strings around. Each operation validates its parameters locally — an
//! invalid parameter never produces a network call — and pairs with a typed
//! decoder for its fixed response shape.
//!
//! Execution is delegated to the [`Transport`] capability trait; this crate
//! performs no I/O itself. A scripted [`mock::MockTransport`] ships for
//! testing orchestration logic without a live service.
//!
//! # Operations
//!
//! | Operation    | Wire name            | Response shape               |
//! |--------------|----------------------|------------------------------|
//! | `UserSearch` | `search_user_simple` | list of `UserData`           |
//! | `UserGet`    | `user`               | `UserData` + `TagData` list  |
//! | `TagsGet`    | `tags`               | list of tag names            |
//! | `CheckInTag` | `check_in`           | `UserData` + `TagData` list  |

#![allow(async_fn_in_trait)]

pub mod documents;
pub mod mock;
mod operations;
mod response;
mod transport;

pub use operations::{ApiOperation, ApiRequest};
pub use response::{
    ApiResponse, BranchInfo, CheckInPayload, CheckinEvent, Question, TagRef, TagState, UserRecord,
    UserWithTags, decode_check_in, decode_tags_get, decode_user_get, decode_user_search,
};
pub use transport::Transport;
