//! User-facing outcome of a completed scan.

use lanyard_api::{TagState, UserRecord};

/// The two ways a scan can succeed.
///
/// `AlreadyInState` is deliberately not an error: an attendee tapping twice
/// at the same checkpoint is the everyday case this library exists to detect,
/// and checkpoint UIs must render it differently from both a fresh check-in
/// and a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// The mutation was applied; the snapshots are the refreshed state.
    Completed { user: UserRecord, tag: TagState },

    /// The service refused the mutation because the tag was already in the
    /// requested state (checking in an already-checked-in tag, or checking
    /// out an already-checked-out one).
    AlreadyInState { user: UserRecord, tag: TagState },
}

impl ScanOutcome {
    /// The user the badge resolved to.
    #[must_use]
    pub fn user(&self) -> &UserRecord {
        match self {
            ScanOutcome::Completed { user, .. } | ScanOutcome::AlreadyInState { user, .. } => user,
        }
    }

    /// The refreshed state of the targeted tag.
    #[must_use]
    pub fn tag_state(&self) -> &TagState {
        match self {
            ScanOutcome::Completed { tag, .. } | ScanOutcome::AlreadyInState { tag, .. } => tag,
        }
    }

    /// Returns `true` if the mutation was applied.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, ScanOutcome::Completed { .. })
    }

    /// Returns `true` if the tag was already in the requested state.
    #[must_use]
    pub fn is_already_in_state(&self) -> bool {
        matches!(self, ScanOutcome::AlreadyInState { .. })
    }
}
