//! Check-in orchestration for badge scans.
//!
//! This crate ties the pieces together: it drives one badge scan from reader
//! acquisition through NDEF decoding, user resolution, and the check-in
//! mutation, to a user-facing outcome. The flow is an explicit state machine
//! so the two suspension points (reader I/O, transport I/O) are the only
//! places control can yield, which makes timeout and cancellation injection
//! mechanical and testable against in-memory fakes.
//!
//! # States
//!
//! ```text
//! Idle → Reading → Decoding → Resolving → Submitting → Completed
//!           │          │          │           │
//!           └──────────┴──────────┴───────────┴──────→ Failed
//! ```
//!
//! `Resolving` is optional: flows that do not need the prior tag state skip
//! straight from `Decoding` to `Submitting`.
//!
//! # Guarantees
//!
//! - A badge is never double-counted: a refused mutation whose requested
//!   direction matches the pre-existing state reports
//!   [`ScanOutcome::AlreadyInState`], distinct from both success and failure.
//! - A badge is never silently dropped: every scan ends in an outcome or in
//!   one of the closed error variants; transport failures are surfaced, not
//!   retried, because a check-in mutation is not safely idempotent.
//! - The reader session is released on every exit path, timeouts and decode
//!   failures included.
//!
//! # Examples
//!
//! ```no_run
//! use lanyard_api::mock::MockTransport;
//! use lanyard_checkin::CheckInOrchestrator;
//! use lanyard_core::{CheckDirection, TagName};
//! use lanyard_reader::mock::MockReader;
//!
//! # async fn example() -> lanyard_core::Result<()> {
//! let (reader, _handle) = MockReader::new();
//! let transport = MockTransport::new();
//! let mut orchestrator = CheckInOrchestrator::new(reader, transport);
//!
//! let tag = TagName::new("venue-entrance")?;
//! let outcome = orchestrator.process_scan(&tag, CheckDirection::In).await?;
//! println!("checked in: {}", outcome.user().name);
//! # Ok(())
//! # }
//! ```

mod orchestrator;
mod outcome;
mod state;

pub use orchestrator::{CheckInOrchestrator, OrchestratorConfig};
pub use outcome::ScanOutcome;
pub use state::{ScanState, ScanStateMachine, StateTransition};
