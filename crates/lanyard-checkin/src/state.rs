//! Scan state machine.
//!
//! An explicit enumerated state plus a validated transition function, rather
//! than ad-hoc branching: illegal transitions are errors, and the recorded
//! history shows exactly how a scan reached its terminal state.

use lanyard_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Phases of one scan-to-outcome cycle.
///
/// Each scan event runs a fresh machine from `Idle`; no state is carried
/// across scans. `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanState {
    /// Waiting for a scan event.
    Idle,

    /// Holding the reader session, waiting for tag bytes.
    Reading,

    /// Extracting the badge identifier from the raw bytes.
    Decoding,

    /// Confirming the user exists and reading the prior tag state.
    Resolving,

    /// Check-in mutation in flight.
    Submitting,

    /// Scan produced an outcome (including "already in state").
    Completed,

    /// Scan ended in one of the closed error variants.
    Failed,
}

impl ScanState {
    /// Check if transition to target state is valid from this state.
    ///
    /// # Examples
    ///
    /// ```
    /// use lanyard_checkin::ScanState;
    ///
    /// assert!(ScanState::Idle.can_transition_to(ScanState::Reading));
    /// assert!(!ScanState::Idle.can_transition_to(ScanState::Submitting));
    /// ```
    #[must_use]
    pub fn can_transition_to(self, target: ScanState) -> bool {
        matches!(
            (self, target),
            // From Idle
            (ScanState::Idle, ScanState::Reading)
            // From Reading
            | (ScanState::Reading, ScanState::Decoding | ScanState::Failed)
            // From Decoding (Resolving is optional)
            | (
                ScanState::Decoding,
                ScanState::Resolving | ScanState::Submitting | ScanState::Failed
            )
            // From Resolving
            | (ScanState::Resolving, ScanState::Submitting | ScanState::Failed)
            // From Submitting
            | (ScanState::Submitting, ScanState::Completed | ScanState::Failed)
        )
    }

    /// Returns `true` for the terminal states that end a scan.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, ScanState::Completed | ScanState::Failed)
    }
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self {
            ScanState::Idle => "Idle",
            ScanState::Reading => "Reading",
            ScanState::Decoding => "Decoding",
            ScanState::Resolving => "Resolving",
            ScanState::Submitting => "Submitting",
            ScanState::Completed => "Completed",
            ScanState::Failed => "Failed",
        };
        write!(f, "{state}")
    }
}

/// A single recorded transition.
#[derive(Debug, Clone)]
pub struct StateTransition {
    /// The state transitioned from.
    pub from: ScanState,

    /// The state transitioned to.
    pub to: ScanState,

    /// When the transition occurred.
    pub timestamp: Instant,
}

impl StateTransition {
    fn new(from: ScanState, to: ScanState) -> Self {
        Self {
            from,
            to,
            timestamp: Instant::now(),
        }
    }

    /// Time elapsed since this transition occurred.
    #[must_use]
    pub fn elapsed(&self) -> std::time::Duration {
        self.timestamp.elapsed()
    }
}

/// State machine for one scan-to-outcome cycle.
///
/// Not thread-safe by design: one machine belongs to one scan on one task.
///
/// # Examples
///
/// ```
/// use lanyard_checkin::{ScanState, ScanStateMachine};
///
/// let mut machine = ScanStateMachine::new();
/// machine.transition_to(ScanState::Reading).unwrap();
/// machine.transition_to(ScanState::Decoding).unwrap();
///
/// assert_eq!(machine.current_state(), ScanState::Decoding);
/// assert_eq!(machine.history().len(), 2);
///
/// // Skipping ahead is rejected.
/// assert!(machine.transition_to(ScanState::Completed).is_err());
/// ```
#[derive(Debug)]
pub struct ScanStateMachine {
    current_state: ScanState,
    history: Vec<StateTransition>,
}

impl ScanStateMachine {
    /// Create a new machine in the `Idle` state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current_state: ScanState::Idle,
            history: Vec::new(),
        }
    }

    /// The current state.
    #[must_use]
    pub fn current_state(&self) -> ScanState {
        self.current_state
    }

    /// Recorded transitions, oldest first.
    #[must_use]
    pub fn history(&self) -> &[StateTransition] {
        &self.history
    }

    /// Transition to a new state, validating the transition.
    ///
    /// # Errors
    /// Returns `Error::InvalidStateTransition` if the requested transition
    /// is not legal from the current state.
    pub fn transition_to(&mut self, new_state: ScanState) -> Result<&StateTransition> {
        if !self.current_state.can_transition_to(new_state) {
            return Err(Error::InvalidStateTransition {
                from: self.current_state.to_string(),
                to: new_state.to_string(),
            });
        }

        let transition = StateTransition::new(self.current_state, new_state);
        self.current_state = new_state;
        self.history.push(transition);
        Ok(self.history.last().expect("transition just recorded"))
    }
}

impl Default for ScanStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
