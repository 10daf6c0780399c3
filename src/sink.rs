//! Packet sinks: where completed packets and framing errors go.
//!
//! A [`Packetizer`](crate::Packetizer) drives exactly one registered
//! [`PacketSink`], synchronously, from inside
//! [`append`](crate::Packetizer::append). Three adapters cover the common
//! wirings: closures ([`FnSink`]), unbounded channels ([`ChannelSink`])
//! and in-memory collection ([`VecSink`]).

use bytes::Bytes;
use tokio::sync::mpsc;

use crate::error::{BoxError, PacketizerError};

/// Receiver of completed packets and framing errors.
///
/// `on_packet` is called once per completed packet with the exact byte
/// range of that packet (header included under header+payload framing).
/// The packet is an owned copy; the sink may keep it indefinitely.
/// Returning an error from `on_packet` does not propagate to the caller
/// of `append`: the failure is wrapped as [`PacketizerError::Sink`] and
/// reported back through `on_error`.
///
/// `on_error` receives everything that goes wrong while framing the
/// stream: oversized declared payloads and failed packet handling. It is
/// infallible; an error sink that itself misbehaves has nowhere further
/// to report.
pub trait PacketSink {
    /// Handle one completed packet.
    fn on_packet(&mut self, packet: Bytes) -> Result<(), BoxError>;

    /// Handle a framing or packet-handling error.
    fn on_error(&mut self, error: PacketizerError);
}

impl<T: PacketSink + ?Sized> PacketSink for Box<T> {
    fn on_packet(&mut self, packet: Bytes) -> Result<(), BoxError> {
        (**self).on_packet(packet)
    }

    fn on_error(&mut self, error: PacketizerError) {
        (**self).on_error(error);
    }
}

/// Sink built from two closures.
///
/// # Example
///
/// ```
/// use packetizer::{FnSink, FramingStrategy, Packetizer};
///
/// let sink = FnSink::new(
///     |packet| {
///         println!("{} byte packet", packet.len());
///         Ok(())
///     },
///     |error| eprintln!("framing error: {error}"),
/// );
/// let mut packetizer = Packetizer::new(FramingStrategy::fixed(4), sink).unwrap();
/// packetizer.append(b"eightby!");
/// ```
pub struct FnSink<P, E> {
    on_packet: P,
    on_error: E,
}

impl<P, E> FnSink<P, E>
where
    P: FnMut(Bytes) -> Result<(), BoxError>,
    E: FnMut(PacketizerError),
{
    /// Create a sink from a packet closure and an error closure.
    pub fn new(on_packet: P, on_error: E) -> Self {
        Self {
            on_packet,
            on_error,
        }
    }
}

impl<P, E> PacketSink for FnSink<P, E>
where
    P: FnMut(Bytes) -> Result<(), BoxError>,
    E: FnMut(PacketizerError),
{
    fn on_packet(&mut self, packet: Bytes) -> Result<(), BoxError> {
        (self.on_packet)(packet)
    }

    fn on_error(&mut self, error: PacketizerError) {
        (self.on_error)(error);
    }
}

/// Sink forwarding packets and errors into unbounded channels.
///
/// Decouples consumers from the append call stack: packets and errors
/// are received from separate receivers, typically in another task. A
/// dropped packet receiver turns every later delivery into a sink
/// failure; a dropped error receiver silently discards reports.
pub struct ChannelSink {
    packets: mpsc::UnboundedSender<Bytes>,
    errors: mpsc::UnboundedSender<PacketizerError>,
}

impl ChannelSink {
    /// Create a sink plus the receiving halves for packets and errors.
    pub fn channel() -> (
        Self,
        mpsc::UnboundedReceiver<Bytes>,
        mpsc::UnboundedReceiver<PacketizerError>,
    ) {
        let (packets, packet_rx) = mpsc::unbounded_channel();
        let (errors, error_rx) = mpsc::unbounded_channel();
        (Self { packets, errors }, packet_rx, error_rx)
    }
}

impl PacketSink for ChannelSink {
    fn on_packet(&mut self, packet: Bytes) -> Result<(), BoxError> {
        self.packets.send(packet).map_err(|e| Box::new(e) as BoxError)
    }

    fn on_error(&mut self, error: PacketizerError) {
        let _ = self.errors.send(error);
    }
}

/// Sink collecting packets and errors in memory.
///
/// Handy for tests and one-shot parses of a buffered stream.
#[derive(Debug, Default)]
pub struct VecSink {
    packets: Vec<Bytes>,
    errors: Vec<PacketizerError>,
}

impl VecSink {
    /// Create an empty collecting sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Packets collected so far, in delivery order.
    #[inline]
    pub fn packets(&self) -> &[Bytes] {
        &self.packets
    }

    /// Errors collected so far, in report order.
    #[inline]
    pub fn errors(&self) -> &[PacketizerError] {
        &self.errors
    }

    /// Consume the sink, returning collected packets and errors.
    pub fn into_parts(self) -> (Vec<Bytes>, Vec<PacketizerError>) {
        (self.packets, self.errors)
    }
}

impl PacketSink for VecSink {
    fn on_packet(&mut self, packet: Bytes) -> Result<(), BoxError> {
        self.packets.push(packet);
        Ok(())
    }

    fn on_error(&mut self, error: PacketizerError) {
        self.errors.push(error);
    }
}
