//! Framing strategies: how packet boundaries are recovered from a stream.
//!
//! The stream itself carries no chunk boundaries, so the strategy is the
//! only source of truth for where one packet ends and the next begins.
//! Two strategies are supported: every packet is the same pre-configured
//! size ([`FramingStrategy::FixedSize`]), or every packet is a fixed-size
//! header followed by a payload whose length the header declares
//! ([`FramingStrategy::HeaderPayload`]).

use crate::error::{PacketizerError, Result};
use crate::length::LengthCodec;

/// Default packet size for fixed-size framing.
pub const DEFAULT_PACKET_SIZE: usize = 500;

/// Default header size for header+payload framing.
pub const DEFAULT_HEADER_SIZE: usize = 7;

/// Default offset of the length field within the header.
pub const DEFAULT_LENGTH_OFFSET: usize = 5;

/// Layout of a header-declared-length frame.
///
/// Each frame on the wire is `header_size` bytes of header followed by a
/// payload whose length the header declares at `length_offset`, decoded
/// by `length_codec`. `max_payload` caps the declared length; `None`
/// leaves it unbounded.
///
/// The length field must lie entirely inside the header:
/// `length_offset + length_codec.width() <= header_size`. Violations are
/// reported as configuration errors when a packetizer is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderFraming {
    /// Bytes of fixed header at the start of every frame.
    pub header_size: usize,
    /// Byte offset of the length field within the header.
    pub length_offset: usize,
    /// Codec for the length field.
    pub length_codec: LengthCodec,
    /// Reject frames declaring a payload larger than this.
    pub max_payload: Option<u64>,
}

impl HeaderFraming {
    /// Check the layout invariants.
    pub fn validate(&self) -> Result<()> {
        if self.header_size == 0 {
            return Err(PacketizerError::Configuration(
                "header size must be positive".to_string(),
            ));
        }
        if self.length_offset >= self.header_size {
            return Err(PacketizerError::Configuration(format!(
                "length offset {} is outside the {}-byte header",
                self.length_offset, self.header_size
            )));
        }
        let width = self.length_codec.width();
        if width == 0 {
            return Err(PacketizerError::Configuration(
                "length field width must be positive".to_string(),
            ));
        }
        match self.length_offset.checked_add(width) {
            Some(end) if end <= self.header_size => Ok(()),
            _ => Err(PacketizerError::Configuration(format!(
                "length field at offset {} with width {} exceeds the {}-byte header",
                self.length_offset, width, self.header_size
            ))),
        }
    }

    /// Encode `payload` as a wire frame: a zeroed header with the payload
    /// length written at the length offset, followed by the payload.
    ///
    /// # Errors
    ///
    /// Fails if the layout is invalid, the codec is parse-only, or the
    /// payload length does not fit the length field.
    pub fn encode_frame(&self, payload: &[u8]) -> Result<Vec<u8>> {
        self.validate()?;
        let mut frame = vec![0u8; self.header_size + payload.len()];
        self.length_codec
            .write(&mut frame, self.length_offset, payload.len() as u64)?;
        frame[self.header_size..].copy_from_slice(payload);
        Ok(frame)
    }

    /// Encode `payload` as a wire frame starting from caller-supplied
    /// header bytes. The length field is overwritten with the payload
    /// length; all other header bytes pass through untouched.
    ///
    /// # Errors
    ///
    /// Fails if `header` is not exactly `header_size` bytes, the layout
    /// is invalid, the codec is parse-only, or the payload length does
    /// not fit the length field.
    pub fn encode_frame_with_header(&self, header: &[u8], payload: &[u8]) -> Result<Vec<u8>> {
        self.validate()?;
        if header.len() != self.header_size {
            return Err(PacketizerError::Encode(format!(
                "header is {} bytes, layout expects {}",
                header.len(),
                self.header_size
            )));
        }
        let mut frame = Vec::with_capacity(self.header_size + payload.len());
        frame.extend_from_slice(header);
        frame.extend_from_slice(payload);
        self.length_codec
            .write(&mut frame, self.length_offset, payload.len() as u64)?;
        Ok(frame)
    }
}

impl Default for HeaderFraming {
    /// The conventional layout: a 7-byte header with a 16-bit
    /// little-endian length field at offset 5, no payload cap. The
    /// 16-bit field is the widest that fits the 7-byte header at that
    /// offset.
    fn default() -> Self {
        Self {
            header_size: DEFAULT_HEADER_SIZE,
            length_offset: DEFAULT_LENGTH_OFFSET,
            length_codec: LengthCodec::U16Le,
            max_payload: None,
        }
    }
}

/// How packet boundaries are recovered from the byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramingStrategy {
    /// Every packet is exactly `packet_size` bytes.
    FixedSize {
        /// Bytes per packet.
        packet_size: usize,
    },
    /// Each packet is a fixed-size header plus a payload whose length
    /// the header declares.
    HeaderPayload(HeaderFraming),
}

impl FramingStrategy {
    /// Fixed-size framing with the given packet size.
    pub fn fixed(packet_size: usize) -> Self {
        Self::FixedSize { packet_size }
    }

    /// Header-declared-length framing with the given layout.
    pub fn header(layout: HeaderFraming) -> Self {
        Self::HeaderPayload(layout)
    }

    /// Check the strategy invariants.
    ///
    /// Runs when a [`Packetizer`](crate::Packetizer) is built; all
    /// violations are configuration errors.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::FixedSize { packet_size } => {
                if *packet_size == 0 {
                    return Err(PacketizerError::Configuration(
                        "packet size must be positive".to_string(),
                    ));
                }
                Ok(())
            }
            Self::HeaderPayload(layout) => layout.validate(),
        }
    }
}

impl Default for FramingStrategy {
    /// Fixed-size framing with [`DEFAULT_PACKET_SIZE`].
    fn default() -> Self {
        Self::FixedSize {
            packet_size: DEFAULT_PACKET_SIZE,
        }
    }
}
