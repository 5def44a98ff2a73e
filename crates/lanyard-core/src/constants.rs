//! Shared constants for the badge check-in client.
//!
//! Timeout values bound the two suspension points of a scan (reader I/O and
//! transport I/O); length limits bound the identifiers the client will accept
//! before any of them reach the network.

// ============================================================================
// Timeout Configuration
// ============================================================================

/// Default timeout for reader session operations (milliseconds).
///
/// Covers both opening a session and reading the tag memory. Badge taps are
/// interactive, so the window is generous enough for a slow tap but short
/// enough that an abandoned scan does not hold the reader.
///
/// # Value: 5000ms (5 seconds)
pub const DEFAULT_READ_TIMEOUT: u64 = 5000;

/// Default timeout for a single transport exchange (milliseconds).
///
/// Applied independently to the resolve query and the check-in mutation.
///
/// # Value: 3000ms (3 seconds)
pub const DEFAULT_TRANSPORT_TIMEOUT: u64 = 3000;

/// Minimum allowed operation timeout (milliseconds).
///
/// Values below this threshold cause spurious timeouts from processing
/// overhead alone, even against an in-memory transport.
pub const MIN_OPERATION_TIMEOUT: u64 = 100;

/// Maximum allowed operation timeout (milliseconds).
///
/// Values above this threshold leave the reader held far longer than any
/// attendee will wait at a checkpoint.
pub const MAX_OPERATION_TIMEOUT: u64 = 30_000;

// ============================================================================
// Identifier Constraints
// ============================================================================

/// Maximum badge identifier length (characters).
///
/// Service user ids are UUID-sized; anything dramatically longer indicates a
/// corrupt or hostile tag payload and is rejected before any network call.
pub const MAX_BADGE_ID_LENGTH: usize = 128;

/// Maximum check-in tag name length (characters).
///
/// Tag names are short human-chosen checkpoint labels ("venue-entrance").
pub const MAX_TAG_NAME_LENGTH: usize = 64;
