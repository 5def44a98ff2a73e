//! NDEF badge decoding for the check-in client.
//!
//! Event badges store the attendee's service-side user id as a single NDEF
//! record (NFC Data Exchange Format) in the tag's user memory. This crate
//! parses the raw bytes read from that memory area and extracts the badge
//! identifier, without touching hardware or network — decoding is a pure
//! function over the buffer.
//!
//! # Record Layout
//!
//! The one layout in use is a single short well-known record, optionally
//! wrapped in the tag's TLV framing:
//!
//! ```text
//! [00 ...] 03 LEN | HDR TLEN PLEN TYPE PAYLOAD... | FE
//!  padding  TLV   | record                        | terminator
//! ```
//!
//! Where:
//! - `HDR` - record header; MB, ME and SR flags set, TNF = Well Known (0x01)
//! - `TLEN` - type length, always 1 for the supported types
//! - `PLEN` - payload length in bytes
//! - `TYPE` - `0x54` ("T", Text) or `0x55` ("U", URI)
//!
//! A Text payload carries a status byte and language code before the
//! identifier; a URI payload carries a one-byte well-known prefix
//! abbreviation before the remainder.
//!
//! # Examples
//!
//! ```
//! use lanyard_ndef::decode;
//!
//! // URI record, abbreviation 0x04 ("https://"), payload "a1b2c"
//! let raw = [0xD1, 0x01, 0x06, 0x55, 0x04, b'a', b'1', b'b', b'2', b'c'];
//! let id = decode(&raw).unwrap();
//! assert_eq!(id.as_str(), "a1b2c");
//! ```

mod prefix;
mod record;

pub use record::{TagRecord, WellKnownType, decode};
