//! Stream-to-packet re-segmentation.
//!
//! Uses `bytes::BytesMut` for the accumulator. Each append runs one
//! extraction pass:
//! - concatenate the chunk onto buffered bytes
//! - walk the buffer with a pair of cursors, delivering every complete
//!   packet to the sink as it is recognized
//! - drop consumed bytes in one `advance`, keeping the partial tail
//!
//! # Example
//!
//! ```
//! use packetizer::{FramingStrategy, Packetizer, VecSink};
//!
//! let mut packetizer = Packetizer::new(FramingStrategy::fixed(4), VecSink::new()).unwrap();
//!
//! // Chunks arrive from a socket in arbitrary sizes.
//! packetizer.append(b"abcdefgh!");
//! assert_eq!(packetizer.sink().packets().len(), 2);
//! assert_eq!(&packetizer.sink().packets()[0][..], b"abcd");
//! assert_eq!(packetizer.len(), 1);
//! ```

use bytes::{Buf, Bytes, BytesMut};

use crate::config::PacketizerConfig;
use crate::error::{PacketizerError, Result};
use crate::sink::PacketSink;
use crate::strategy::{FramingStrategy, HeaderFraming};

/// Default initial accumulator capacity.
pub const DEFAULT_BUF_CAPACITY: usize = 64 * 1024;

/// Stateful stream-to-packet framer.
///
/// Owns the byte accumulator and the [`PacketSink`] that receives
/// completed packets. One packetizer serves one logical stream (one
/// connection, one pipe); it is not meant for concurrent mutation.
///
/// Packets are delivered synchronously from [`append`](Self::append),
/// each as an owned copy of its byte range, so the accumulator can
/// reclaim consumed space immediately.
///
/// # Failure recovery
///
/// The two strategies recover differently when the sink's packet
/// handling fails mid-append. Fixed-size framing consumes the packet
/// whose handling failed and picks up right after it on the next
/// append. Header+payload framing rewinds the whole call: nothing is
/// consumed, and packets already delivered during that call will be
/// delivered again later. Consumers that cannot tolerate redelivery
/// should treat a sink failure on a header-framed stream as fatal and
/// [`flush`](Self::flush) or drop the packetizer.
#[derive(Debug)]
pub struct Packetizer<S> {
    /// Framing strategy, fixed at construction.
    strategy: FramingStrategy,
    /// Accumulated bytes not yet consumed by a completed packet.
    buf: BytesMut,
    /// Receiver of packets and errors.
    sink: S,
}

impl<S: PacketSink> Packetizer<S> {
    /// Create a packetizer with the default accumulator capacity.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the strategy invariants do not
    /// hold (zero packet size, length field outside the header).
    pub fn new(strategy: FramingStrategy, sink: S) -> Result<Self> {
        Self::with_capacity(strategy, DEFAULT_BUF_CAPACITY, sink)
    }

    /// Create a packetizer with a pre-sized accumulator.
    ///
    /// Capacity is a hint; the accumulator grows past it when a frame
    /// needs more.
    pub fn with_capacity(strategy: FramingStrategy, capacity: usize, sink: S) -> Result<Self> {
        strategy.validate()?;
        Ok(Self {
            strategy,
            buf: BytesMut::with_capacity(capacity),
            sink,
        })
    }

    /// Create a packetizer from an options table.
    pub fn from_config(config: &PacketizerConfig, sink: S) -> Result<Self> {
        Self::new(config.framing_strategy(), sink)
    }

    /// The configured framing strategy.
    #[inline]
    pub fn strategy(&self) -> FramingStrategy {
        self.strategy
    }

    /// Shared access to the sink.
    #[inline]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Exclusive access to the sink.
    #[inline]
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the packetizer, returning the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Append a chunk and extract every packet it completes.
    ///
    /// Packets and errors reach the sink before this returns. Partial
    /// trailing bytes stay buffered for future chunks. An empty chunk
    /// is legal and still runs extraction, so packets left complete in
    /// the accumulator by an earlier sink failure get delivered.
    ///
    /// Nothing about the stream's content makes this call fail: frames
    /// that violate the payload cap and sink failures are reported
    /// through the sink's error channel.
    pub fn append(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
        match self.strategy {
            FramingStrategy::FixedSize { packet_size } => self.extract_fixed(packet_size),
            FramingStrategy::HeaderPayload(layout) => self.extract_header(layout),
        }
    }

    /// Discard all buffered bytes unconditionally.
    ///
    /// No sink events are emitted, complete or not. Meant for stream
    /// resets (transport reconnect, protocol resync) where buffered
    /// partial data must not be misread as the prefix of the next
    /// stream's first packet.
    pub fn flush(&mut self) {
        if !self.buf.is_empty() {
            tracing::trace!(discarded = self.buf.len(), "flushing buffered bytes");
        }
        self.buf.clear();
    }

    /// Number of bytes received but not yet part of a delivered packet.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if the accumulator is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Fixed-size extraction: emit `packet_size`-byte packets while
    /// enough bytes remain.
    ///
    /// A sink failure stops the pass after the failed packet's bytes
    /// are consumed; later packets stay buffered for the next append.
    fn extract_fixed(&mut self, packet_size: usize) {
        let mut read_start = 0;
        let mut read_end = 0;

        while self.buf.len() - read_end >= packet_size {
            read_end += packet_size;
            let packet = Bytes::copy_from_slice(&self.buf[read_start..read_end]);
            let failed = self.emit(packet);
            read_start = read_end;
            if failed {
                break;
            }
        }

        if read_start != 0 {
            self.buf.advance(read_end);
        }
    }

    /// Header+payload extraction: parse the declared length out of each
    /// header and emit the frame once all its bytes arrived.
    ///
    /// An oversized declaration stops the pass with the offending
    /// header still buffered; frames consumed earlier in the pass are
    /// compacted away. A sink failure instead rewinds the entire pass,
    /// leaving every byte buffered.
    fn extract_header(&mut self, layout: HeaderFraming) {
        let mut read_start = 0;
        let mut read_end = 0;

        while self.buf.len() - read_end >= layout.header_size {
            let declared = layout
                .length_codec
                .read(&self.buf, read_end + layout.length_offset);

            if let Some(max) = layout.max_payload {
                if declared > max {
                    tracing::warn!(declared, max, "stopping extraction, declared payload too large");
                    self.sink
                        .on_error(PacketizerError::OversizedPayload { declared, max });
                    break;
                }
            }

            // A frame beyond the address space can never complete.
            let frame_len = match usize::try_from(declared)
                .ok()
                .and_then(|payload| layout.header_size.checked_add(payload))
            {
                Some(len) => len,
                None => break,
            };

            if self.buf.len() - read_end < frame_len {
                break;
            }

            read_end += frame_len;
            let packet = Bytes::copy_from_slice(&self.buf[read_start..read_end]);
            if self.emit(packet) {
                read_start = 0;
                break;
            }
            read_start = read_end;
        }

        if read_start != 0 {
            self.buf.advance(read_end);
        }
    }

    /// Hand one packet to the sink, converting a sink failure into an
    /// error-channel report. Returns whether the sink failed.
    fn emit(&mut self, packet: Bytes) -> bool {
        match self.sink.on_packet(packet) {
            Ok(()) => false,
            Err(source) => {
                tracing::debug!(error = %source, "packet sink failed");
                self.sink.on_error(PacketizerError::Sink { source });
                true
            }
        }
    }
}

/// Builder for a [`Packetizer`].
///
/// Exists for call sites that assemble configuration dynamically;
/// building without a strategy fails with a configuration error.
///
/// # Example
///
/// ```
/// use packetizer::{FramingStrategy, PacketizerBuilder, VecSink};
///
/// let packetizer = PacketizerBuilder::new()
///     .strategy(FramingStrategy::fixed(128))
///     .capacity(4096)
///     .build(VecSink::new())
///     .unwrap();
/// assert!(packetizer.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct PacketizerBuilder {
    strategy: Option<FramingStrategy>,
    capacity: Option<usize>,
}

impl PacketizerBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the framing strategy.
    pub fn strategy(mut self, strategy: FramingStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Set the framing strategy from an options table.
    pub fn config(mut self, config: &PacketizerConfig) -> Self {
        self.strategy = Some(config.framing_strategy());
        self
    }

    /// Set the initial accumulator capacity.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Build the packetizer around `sink`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no strategy was set or the
    /// strategy invariants do not hold.
    pub fn build<S: PacketSink>(self, sink: S) -> Result<Packetizer<S>> {
        let strategy = self.strategy.ok_or_else(|| {
            PacketizerError::Configuration("no framing strategy configured".to_string())
        })?;
        Packetizer::with_capacity(
            strategy,
            self.capacity.unwrap_or(DEFAULT_BUF_CAPACITY),
            sink,
        )
    }
}
