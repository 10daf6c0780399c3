//! Feeding a packetizer from an async byte source.
//!
//! [`pump`] is the glue between any `AsyncRead` (a socket read half, a
//! child-process pipe, an in-memory duplex) and a
//! [`Packetizer`](crate::Packetizer): read chunks as they arrive, append
//! each one, stop at EOF. Transport lifecycle (reconnects, deadlines,
//! shutdown) stays with the caller.

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::Result;
use crate::packetizer::Packetizer;
use crate::sink::PacketSink;

/// Default read-buffer size for [`pump`].
pub const DEFAULT_READ_BUF: usize = 64 * 1024;

/// Read `source` to EOF, appending every chunk to `packetizer`.
///
/// Packets flow to the packetizer's sink as each chunk lands. Returns
/// `Ok(())` when the source reports EOF; bytes of a final partial
/// packet remain buffered and can be inspected via
/// [`Packetizer::len`].
///
/// # Errors
///
/// Read errors are transport failures, not framing errors: they are
/// returned to the caller and never reported through the sink.
pub async fn pump<R, S>(source: R, packetizer: &mut Packetizer<S>) -> Result<()>
where
    R: AsyncRead + Unpin,
    S: PacketSink,
{
    pump_with_buf(source, packetizer, DEFAULT_READ_BUF).await
}

/// [`pump`] with a caller-chosen read-buffer size.
pub async fn pump_with_buf<R, S>(
    mut source: R,
    packetizer: &mut Packetizer<S>,
    read_buf: usize,
) -> Result<()>
where
    R: AsyncRead + Unpin,
    S: PacketSink,
{
    let mut buf = vec![0u8; read_buf];
    loop {
        let n = source.read(&mut buf).await?;
        if n == 0 {
            tracing::trace!(leftover = packetizer.len(), "byte source reached EOF");
            return Ok(());
        }
        packetizer.append(&buf[..n]);
    }
}
