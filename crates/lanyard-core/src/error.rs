//! Error taxonomy for the badge check-in client.
//!
//! One closed enum covers every failure a scan can produce, so callers can
//! match exhaustively when deciding how to present an outcome at the
//! checkpoint. Note that "already checked in" is deliberately NOT here: it is
//! a successful-but-notable outcome (`ScanOutcome::AlreadyInState` in
//! `lanyard-checkin`), not an error.
//!
//! Propagation policy: decoding and parameter errors fail fast, locally,
//! before any I/O. Nothing is retried automatically inside this library —
//! a check-in mutation is not safely idempotent to blindly retry without
//! knowing whether the first attempt was applied.

use thiserror::Error;

/// Result type alias for check-in client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during a scan-to-outcome cycle.
#[derive(Debug, Error)]
pub enum Error {
    /// The tag memory did not contain a decodable NDEF record.
    #[error("Malformed tag: {message}")]
    MalformedTag { message: String },

    /// Local validation rejected an operation parameter before any I/O.
    #[error("Invalid parameters: {message}")]
    InvalidParameters { message: String },

    /// The decoded identifier did not resolve to a service-side user.
    #[error("Unknown user: {id}")]
    UnknownUser { id: String },

    /// The service refused the check-in for a reason other than the tag
    /// already being in the requested state.
    #[error("Check-in rejected: {reason}")]
    CheckInRejected { reason: String },

    /// Network or protocol failure while talking to the check-in service.
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// A reader or transport operation exceeded its configured timeout.
    #[error("Operation timeout after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// The caller cancelled the scan. An in-flight mutation is not retracted,
    /// so callers must not assume it did not land.
    #[error("Scan cancelled")]
    Cancelled,

    /// Hardware-level failure from the badge reader.
    #[error("Reader error: {message}")]
    Reader { message: String },

    /// Attempted state machine transition that is not legal.
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },
}

impl Error {
    /// Create a new malformed tag error.
    pub fn malformed_tag(message: impl Into<String>) -> Self {
        Self::MalformedTag {
            message: message.into(),
        }
    }

    /// Create a new invalid parameters error.
    pub fn invalid_parameters(message: impl Into<String>) -> Self {
        Self::InvalidParameters {
            message: message.into(),
        }
    }

    /// Create a new unknown user error.
    pub fn unknown_user(id: impl Into<String>) -> Self {
        Self::UnknownUser { id: id.into() }
    }

    /// Create a new check-in rejection error.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::CheckInRejected {
            reason: reason.into(),
        }
    }

    /// Create a new transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout(duration_ms: u64) -> Self {
        Self::Timeout { duration_ms }
    }

    /// Create a new reader error.
    pub fn reader(message: impl Into<String>) -> Self {
        Self::Reader {
            message: message.into(),
        }
    }

    /// Returns `true` if this error was produced by local validation,
    /// guaranteed to have happened before any network call.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Error::MalformedTag { .. } | Error::InvalidParameters { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = Error::malformed_tag("buffer too short");
        assert_eq!(error.to_string(), "Malformed tag: buffer too short");

        let error = Error::timeout(3000);
        assert_eq!(error.to_string(), "Operation timeout after 3000ms");

        let error = Error::unknown_user("7dd00021");
        assert_eq!(error.to_string(), "Unknown user: 7dd00021");
    }

    #[test]
    fn test_is_local() {
        assert!(Error::malformed_tag("x").is_local());
        assert!(Error::invalid_parameters("x").is_local());
        assert!(!Error::transport("x").is_local());
        assert!(!Error::Cancelled.is_local());
        assert!(!Error::timeout(100).is_local());
    }
}
