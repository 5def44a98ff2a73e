//! NDEF record parsing and badge identifier extraction.

use crate::prefix::uri_prefix;
use lanyard_core::{BadgeId, Error, Result};
use url::Url;

/// Record header flag: message begin.
const FLAG_MB: u8 = 0x80;
/// Record header flag: message end.
const FLAG_ME: u8 = 0x40;
/// Record header flag: short record (1-byte payload length).
const FLAG_SR: u8 = 0x10;
/// Record header flag: ID length field present.
const FLAG_IL: u8 = 0x08;
/// Record header mask: type name format.
const TNF_MASK: u8 = 0x07;
/// TNF value for NFC Well Known records.
const TNF_WELL_KNOWN: u8 = 0x01;

/// TLV block type for an NDEF message.
const TLV_NDEF_MESSAGE: u8 = 0x03;
/// TLV block type for NULL padding.
const TLV_NULL: u8 = 0x00;
/// NDEF message terminator.
const TERMINATOR: u8 = 0xFE;

/// Record type byte for a well-known Text record ("T").
const TYPE_TEXT: u8 = 0x54;
/// Record type byte for a well-known URI record ("U").
const TYPE_URI: u8 = 0x55;

/// Well-known record type of a badge tag payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WellKnownType {
    /// Text record: status byte + language code + content.
    Text,
    /// URI record: abbreviation prefix byte + remainder.
    Uri,
}

/// A decoded NDEF record from badge tag memory.
///
/// Transient: exists only between reading the tag and extracting the badge
/// identifier. Holds the payload bytes plus the raw length of the buffer the
/// record was parsed from.
#[derive(Debug, Clone)]
pub struct TagRecord {
    well_known: WellKnownType,
    payload: Vec<u8>,
    raw_len: usize,
}

impl TagRecord {
    /// Parse the byte sequence read from a badge's NDEF message area.
    ///
    /// Accepts either a bare record or a record wrapped in the tag's TLV
    /// framing (NULL padding, `0x03` message block with length byte, `0xFE`
    /// terminator). Capability-container bytes before the message block are
    /// skipped, as real tag dumps start with them.
    ///
    /// # Errors
    /// Returns `Error::MalformedTag` if:
    /// - The buffer is too short to hold a record header
    /// - No NDEF message is found in the buffer
    /// - The message holds anything but a single short well-known record
    /// - The record type is neither Text nor URI
    /// - The declared payload length exceeds the bytes actually present
    pub fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < 4 {
            return Err(Error::malformed_tag(format!(
                "buffer too short for a record header: {} bytes",
                buffer.len()
            )));
        }

        let area = locate_record(buffer)?;
        Self::parse_record(area, buffer.len())
    }

    /// Parse a record area that starts directly with the record header.
    fn parse_record(area: &[u8], raw_len: usize) -> Result<Self> {
        if area.len() < 4 {
            return Err(Error::malformed_tag("truncated record header"));
        }

        let header = area[0];
        if header & TNF_MASK != TNF_WELL_KNOWN {
            return Err(Error::malformed_tag(
                "only NFC Well Known records are supported",
            ));
        }
        if header & FLAG_SR == 0 {
            return Err(Error::malformed_tag("only short records are supported"));
        }
        if header & FLAG_MB == 0 || header & FLAG_ME == 0 {
            return Err(Error::malformed_tag(
                "expected a single-record message (MB and ME set)",
            ));
        }
        if header & FLAG_IL != 0 {
            return Err(Error::malformed_tag("record ID fields are not supported"));
        }

        let type_length = area[1] as usize;
        if type_length != 1 {
            return Err(Error::malformed_tag(format!(
                "unexpected record type length {type_length}"
            )));
        }

        let declared_len = area[2] as usize;
        let well_known = match area[3] {
            TYPE_TEXT => WellKnownType::Text,
            TYPE_URI => WellKnownType::Uri,
            other => {
                return Err(Error::malformed_tag(format!(
                    "unsupported record type 0x{other:02X}"
                )));
            }
        };

        // Payload runs from the type byte to the message terminator (or end
        // of the area). The declared length is validated as a lower bound:
        // some badge writers under-declare by the abbreviation prefix byte,
        // but a payload shorter than declared means a truncated read.
        let data = &area[4..];
        let end = data
            .iter()
            .position(|&b| b == TERMINATOR)
            .unwrap_or(data.len());
        let payload = &data[..end];

        if payload.len() < declared_len {
            return Err(Error::malformed_tag(format!(
                "declared payload length {declared_len} exceeds {} bytes present",
                payload.len()
            )));
        }

        Ok(TagRecord {
            well_known,
            payload: payload.to_vec(),
            raw_len,
        })
    }

    /// The well-known type of this record.
    #[must_use]
    pub fn well_known_type(&self) -> WellKnownType {
        self.well_known
    }

    /// The raw byte length of the buffer this record was parsed from.
    #[must_use]
    pub fn raw_len(&self) -> usize {
        self.raw_len
    }

    /// The record payload bytes, framing stripped.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Extract the badge identifier embedded in this record.
    ///
    /// For a Text record the content after the language code is the
    /// identifier. For a URI record the remainder after the abbreviation
    /// prefix byte is the identifier; when that remainder is itself a full
    /// URL carrying a `user` query parameter (production badges encode
    /// `https://…?user=<id>`), the parameter value is extracted instead.
    ///
    /// # Errors
    /// Returns `Error::MalformedTag` if the payload is truncated, not valid
    /// UTF-8, or the identifier is empty after trimming.
    pub fn identifier(&self) -> Result<BadgeId> {
        let content = match self.well_known {
            WellKnownType::Text => self.text_content()?,
            WellKnownType::Uri => self.uri_identifier()?,
        };

        BadgeId::new(&content)
            .map_err(|_| Error::malformed_tag("identifier is empty after trimming"))
    }

    /// Text record content: skip the status byte and language code.
    fn text_content(&self) -> Result<String> {
        let status = *self
            .payload
            .first()
            .ok_or_else(|| Error::malformed_tag("empty text payload"))?;
        // Low 6 bits of the status byte hold the language code length.
        let language_len = (status & 0x3F) as usize;
        let start = 1 + language_len;
        if start > self.payload.len() {
            return Err(Error::malformed_tag(
                "language code length exceeds text payload",
            ));
        }

        let content = std::str::from_utf8(&self.payload[start..])
            .map_err(|_| Error::malformed_tag("text payload is not valid UTF-8"))?;
        Ok(content.to_owned())
    }

    /// URI record identifier: strip the abbreviation prefix byte.
    fn uri_identifier(&self) -> Result<String> {
        if self.payload.len() < 2 {
            return Err(Error::malformed_tag("URI payload too short"));
        }

        let remainder = std::str::from_utf8(&self.payload[1..])
            .map_err(|_| Error::malformed_tag("URI payload is not valid UTF-8"))?;

        // Badges in the field embed the id as a `user` query parameter of a
        // full URL; bare identifiers are used verbatim.
        let full = format!("{}{}", uri_prefix(self.payload[0]), remainder);
        if let Ok(url) = Url::parse(&full) {
            for (key, value) in url.query_pairs() {
                if key == "user" {
                    return Ok(value.into_owned());
                }
            }
        }

        Ok(remainder.to_owned())
    }
}

/// Decode the badge identifier from a raw NDEF message buffer.
///
/// Pure function over the byte buffer: parses the single Text or URI record
/// and extracts the embedded identifier.
///
/// # Errors
/// Returns `Error::MalformedTag` for any structural problem; see
/// [`TagRecord::parse`] and [`TagRecord::identifier`].
pub fn decode(buffer: &[u8]) -> Result<BadgeId> {
    TagRecord::parse(buffer)?.identifier()
}

/// Locate the record area within a raw buffer.
///
/// Skips NULL-TLV padding and capability-container bytes, then returns
/// either the bare record (buffer starts with a record header) or the
/// contents of the NDEF message TLV.
fn locate_record(buffer: &[u8]) -> Result<&[u8]> {
    let mut i = 0;
    while i < buffer.len() {
        let byte = buffer[i];
        if byte == TLV_NULL {
            i += 1;
            continue;
        }
        if is_record_header(byte) {
            return Ok(&buffer[i..]);
        }
        if byte == TLV_NDEF_MESSAGE && i + 2 < buffer.len() && is_record_header(buffer[i + 2]) {
            let declared = buffer[i + 1] as usize;
            let start = i + 2;
            let end = start
                .checked_add(declared)
                .filter(|&end| end <= buffer.len())
                .ok_or_else(|| {
                    Error::malformed_tag(format!(
                        "declared message length {declared} exceeds buffer"
                    ))
                })?;
            return Ok(&buffer[start..end]);
        }
        i += 1;
    }

    Err(Error::malformed_tag("no NDEF message found in buffer"))
}

/// A plausible header byte for the single record layout in use:
/// well-known TNF in short-record form.
fn is_record_header(byte: u8) -> bool {
    byte & TNF_MASK == TNF_WELL_KNOWN && byte & FLAG_SR != 0
}
