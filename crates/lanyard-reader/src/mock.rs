//! Mock badge reader for testing and development.
//!
//! Simulates an NFC badge reader that can be controlled programmatically:
//! tests present raw tag bytes through a handle and assert on session
//! accounting without physical hardware.

use crate::{BadgeReader, ReaderSession};
use bytes::Bytes;
use lanyard_core::{Error, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::{Mutex, mpsc};

/// Mock badge reader.
///
/// Returns a `(reader, handle)` pair: the reader side implements
/// [`BadgeReader`] for the orchestrator, the handle side simulates badge
/// taps and inspects session accounting.
///
/// # Examples
///
/// ```
/// use lanyard_reader::mock::MockReader;
/// use lanyard_reader::{BadgeReader, ReaderSession};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> lanyard_core::Result<()> {
///     let (mut reader, handle) = MockReader::new();
///
///     handle.present_tag(vec![0xD1, 0x01, 0x06, 0x55, 0x04, b'a', b'1', b'b', b'2', b'c']).await?;
///
///     let mut session = reader.open_session().await?;
///     let raw = session.read_tag_bytes().await?;
///     session.close().await?;
///
///     assert_eq!(raw[0], 0xD1);
///     assert_eq!(handle.open_session_count(), 0);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockReader {
    /// Channel of presented tag byte buffers.
    events: Arc<Mutex<mpsc::Receiver<Bytes>>>,

    /// Number of sessions opened and not yet closed.
    open_sessions: Arc<AtomicUsize>,

    /// When set, the next `open_session` fails as a disconnected device.
    fail_next_open: Arc<AtomicBool>,
}

impl MockReader {
    /// Create a new mock reader and its control handle.
    pub fn new() -> (Self, MockReaderHandle) {
        let (event_tx, event_rx) = mpsc::channel(32);
        let open_sessions = Arc::new(AtomicUsize::new(0));
        let fail_next_open = Arc::new(AtomicBool::new(false));

        let reader = Self {
            events: Arc::new(Mutex::new(event_rx)),
            open_sessions: open_sessions.clone(),
            fail_next_open: fail_next_open.clone(),
        };

        let handle = MockReaderHandle {
            event_tx,
            open_sessions,
            fail_next_open,
        };

        (reader, handle)
    }
}

impl BadgeReader for MockReader {
    type Session = MockReaderSession;

    async fn open_session(&mut self) -> Result<Self::Session> {
        if self.fail_next_open.swap(false, Ordering::SeqCst) {
            return Err(Error::reader("reader disconnected"));
        }

        self.open_sessions.fetch_add(1, Ordering::SeqCst);
        Ok(MockReaderSession {
            events: self.events.clone(),
            open_sessions: self.open_sessions.clone(),
        })
    }
}

/// Session handed out by [`MockReader`].
#[derive(Debug)]
pub struct MockReaderSession {
    events: Arc<Mutex<mpsc::Receiver<Bytes>>>,
    open_sessions: Arc<AtomicUsize>,
}

impl ReaderSession for MockReaderSession {
    async fn read_tag_bytes(&mut self) -> Result<Bytes> {
        let mut events = self.events.lock().await;
        events
            .recv()
            .await
            .ok_or_else(|| Error::reader("tag event channel closed"))
    }

    async fn close(self) -> Result<()> {
        self.open_sessions.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Handle for controlling a mock reader.
#[derive(Debug, Clone)]
pub struct MockReaderHandle {
    event_tx: mpsc::Sender<Bytes>,
    open_sessions: Arc<AtomicUsize>,
    fail_next_open: Arc<AtomicBool>,
}

impl MockReaderHandle {
    /// Present a badge tap: the raw bytes become the next tag read.
    ///
    /// # Errors
    ///
    /// Returns `Error::Reader` if the reader has been dropped.
    pub async fn present_tag(&self, raw: impl Into<Bytes>) -> Result<()> {
        self.event_tx
            .send(raw.into())
            .await
            .map_err(|_| Error::reader("tag event channel closed"))
    }

    /// Make the next `open_session` fail as a disconnected device.
    pub fn fail_next_open(&self) {
        self.fail_next_open.store(true, Ordering::SeqCst);
    }

    /// Number of sessions currently open (opened and not yet closed).
    ///
    /// Used by resource-leak assertions: after any scan completes or fails,
    /// this must be back to zero.
    #[must_use]
    pub fn open_session_count(&self) -> usize {
        self.open_sessions.load(Ordering::SeqCst)
    }
}
