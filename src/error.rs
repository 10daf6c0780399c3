//! Error types for packetizer.

use thiserror::Error;

/// Boxed error returned by a sink's packet handling.
///
/// Sinks surface their own failure types through this alias; the
/// packetizer wraps them into [`PacketizerError::Sink`] at the emission
/// boundary.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for all packetizer operations.
#[derive(Debug, Error)]
pub enum PacketizerError {
    /// Invalid or missing framing configuration at construction.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A header declared a payload larger than the configured maximum.
    #[error("Payload size {declared} exceeds maximum {max}")]
    OversizedPayload {
        /// Length the header declared.
        declared: u64,
        /// Configured maximum payload length.
        max: u64,
    },

    /// The sink's own packet handling failed.
    #[error("Packet sink failed: {source}")]
    Sink {
        /// The failure the sink reported.
        source: BoxError,
    },

    /// Frame encoding was given inconsistent arguments.
    #[error("Encode error: {0}")]
    Encode(String),

    /// I/O error while pumping bytes from a source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using PacketizerError.
pub type Result<T> = std::result::Result<T, PacketizerError>;
