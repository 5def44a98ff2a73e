//! Badge reader capability interfaces and mock device.
//!
//! The check-in orchestrator drives a physical NFC reader through the two
//! traits defined here: [`BadgeReader`] opens an exclusive session for one
//! scan, and [`ReaderSession`] reads the tag's NDEF memory area and releases
//! the device. Real hardware backends (PC/SC, USB) live behind feature
//! flags; the [`mock`] module provides a programmable in-memory reader so
//! orchestration logic is testable without hardware.
//!
//! Session discipline: a session is exclusively held for one scan-to-outcome
//! cycle and must be released on every exit path, including timeouts and
//! decode failures. The mock counts open sessions so tests can assert
//! leak-freedom.

#![allow(async_fn_in_trait)]

pub mod mock;
mod session;

pub use session::{BadgeReader, ReaderSession};
