//! Reader device trait definitions.
//!
//! These traits establish the contract between the check-in orchestrator and
//! the physical badge reader, enabling substitution between mock and real
//! hardware implementations.
//!
//! All traits use native `async fn` methods (Edition 2024 RPITIT),
//! eliminating the need for the `async_trait` macro.

use bytes::Bytes;
use lanyard_core::Result;

/// A badge reader device that hands out scan sessions.
///
/// One session exists at a time per reader: `open_session` takes `&mut self`
/// so overlapping scans cannot race on the same device handle.
///
/// # Object Safety and Dynamic Dispatch
///
/// **NOTE**: This trait is NOT object-safe because `async fn` methods return
/// `impl Future` (Edition 2024 RPITIT). Use generic type parameters:
///
/// ```no_run
/// use lanyard_reader::{BadgeReader, ReaderSession};
/// use lanyard_core::Result;
///
/// async fn scan_once<R: BadgeReader>(reader: &mut R) -> Result<Vec<u8>> {
///     let mut session = reader.open_session().await?;
///     let raw = session.read_tag_bytes().await;
///     session.close().await?;
///     Ok(raw?.to_vec())
/// }
/// ```
pub trait BadgeReader: Send + Sync {
    /// The session type this reader hands out.
    type Session: ReaderSession;

    /// Acquire an exclusive session with the reader for one scan.
    ///
    /// This method suspends until the device is available. Callers bound it
    /// with a timeout at the call site; the orchestrator does so with its
    /// configured read timeout.
    ///
    /// # Errors
    ///
    /// Returns `Error::Reader` if:
    /// - The device is disconnected or cannot be claimed
    /// - A communication error occurs
    async fn open_session(&mut self) -> Result<Self::Session>;
}

/// An exclusive scan session with a badge reader.
///
/// The session must be released via [`close`](Self::close) on every exit
/// path — including read timeouts and decode failures — so the device is
/// available for the next scan.
pub trait ReaderSession: Send {
    /// Read the full NDEF message area from the presented tag.
    ///
    /// Suspends until a tag is presented and read. A tag removed mid-read
    /// surfaces as `Error::Reader`; callers bound the wait with a timeout at
    /// the call site.
    ///
    /// # Errors
    ///
    /// Returns `Error::Reader` if:
    /// - The tag is removed before the read completes
    /// - The device is disconnected
    /// - A communication error occurs
    async fn read_tag_bytes(&mut self) -> Result<Bytes>;

    /// Release the session, making the reader available again.
    ///
    /// # Errors
    ///
    /// Returns `Error::Reader` if the device rejects the release; the
    /// session is considered released regardless.
    async fn close(self) -> Result<()>;
}
