//! # packetizer
//!
//! Re-segments a byte stream that arrives in arbitrary-sized chunks (as
//! from a stream socket or pipe) back into discrete application-level
//! packets.
//!
//! A [`Packetizer`] owns a byte accumulator and a [`PacketSink`]. Every
//! [`append`](Packetizer::append) extracts as many complete packets as
//! the configured [`FramingStrategy`] allows (fixed-size packets, or a
//! fixed-size header carrying a declared payload length) and delivers
//! each one to the sink before returning. Partial trailing bytes stay
//! buffered for future chunks, so chunk boundaries never show through
//! in the emitted packets. Frames that violate the payload cap and
//! failing sinks are reported through the sink's error channel, never
//! as panics or return errors from `append`.
//!
//! ## Example
//!
//! ```
//! use packetizer::{FramingStrategy, HeaderFraming, LengthCodec, Packetizer, VecSink};
//!
//! // 4-byte header: two protocol bytes, then a 16-bit big-endian length.
//! let layout = HeaderFraming {
//!     header_size: 4,
//!     length_offset: 2,
//!     length_codec: LengthCodec::U16Be,
//!     max_payload: Some(1024),
//! };
//! let mut packetizer =
//!     Packetizer::new(FramingStrategy::header(layout), VecSink::new()).unwrap();
//!
//! // Frames survive arbitrary chunk boundaries.
//! packetizer.append(&[0xAA, 0xBB, 0x00]);
//! packetizer.append(&[0x05, b'h', b'e', b'l', b'l', b'o']);
//!
//! assert_eq!(packetizer.sink().packets().len(), 1);
//! assert_eq!(&packetizer.sink().packets()[0][..], b"\xAA\xBB\x00\x05hello");
//! ```
//!
//! Framing only: what the packets mean, and the transport producing the
//! bytes, belong to the caller. [`source::pump`] bridges any
//! `AsyncRead` into a packetizer.

pub mod config;
pub mod error;
pub mod length;
pub mod sink;
pub mod source;
pub mod strategy;

mod packetizer;

pub use config::{FramingMode, PacketizerConfig};
pub use error::{BoxError, PacketizerError, Result};
pub use length::LengthCodec;
pub use packetizer::{Packetizer, PacketizerBuilder, DEFAULT_BUF_CAPACITY};
pub use sink::{ChannelSink, FnSink, PacketSink, VecSink};
pub use strategy::{
    FramingStrategy, HeaderFraming, DEFAULT_HEADER_SIZE, DEFAULT_LENGTH_OFFSET,
    DEFAULT_PACKET_SIZE,
};
