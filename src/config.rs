//! Construction options for a [`Packetizer`](crate::Packetizer).
//!
//! [`PacketizerConfig`] is the serde face of the crate: the externally
//! recognized option names (camelCase on the wire) so framing can live
//! in application config files next to transport settings. Every field
//! has a default; an empty document deserializes to the default
//! fixed-size configuration.
//!
//! ```
//! use packetizer::{FramingMode, PacketizerConfig};
//!
//! let config: PacketizerConfig = serde_json::from_str(
//!     r#"{ "mode": "header-payload", "headerSize": 4, "payloadSizeIndex": 0,
//!          "readDataLength": "u32-be", "maxDataLength": 65536 }"#,
//! ).unwrap();
//! assert_eq!(config.mode, FramingMode::HeaderPayload);
//! ```

use serde::{Deserialize, Serialize};

use crate::length::LengthCodec;
use crate::strategy::{
    FramingStrategy, HeaderFraming, DEFAULT_HEADER_SIZE, DEFAULT_LENGTH_OFFSET,
    DEFAULT_PACKET_SIZE,
};

/// Which framing strategy a config selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FramingMode {
    /// Every packet is the same pre-configured size.
    #[default]
    FixedSize,
    /// Fixed-size header declaring the payload length.
    HeaderPayload,
}

/// Recognized construction options.
///
/// Options not relevant to the selected mode are carried but ignored:
/// a fixed-size config keeps its header fields, and switching `mode` is
/// enough to activate them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PacketizerConfig {
    /// Strategy selector.
    pub mode: FramingMode,
    /// Bytes per packet (fixed-size mode).
    pub packet_size: usize,
    /// Bytes of fixed header (header+payload mode).
    pub header_size: usize,
    /// Offset of the length field within the header.
    pub payload_size_index: usize,
    /// Reject frames declaring a payload larger than this.
    pub max_data_length: Option<u64>,
    /// Codec for the length field.
    pub read_data_length: LengthCodec,
}

impl Default for PacketizerConfig {
    fn default() -> Self {
        Self {
            mode: FramingMode::FixedSize,
            packet_size: DEFAULT_PACKET_SIZE,
            header_size: DEFAULT_HEADER_SIZE,
            payload_size_index: DEFAULT_LENGTH_OFFSET,
            max_data_length: None,
            read_data_length: LengthCodec::U16Le,
        }
    }
}

impl PacketizerConfig {
    /// Map the options to a framing strategy.
    ///
    /// Pure translation: invariants are checked when the packetizer is
    /// built, not here.
    pub fn framing_strategy(&self) -> FramingStrategy {
        match self.mode {
            FramingMode::FixedSize => FramingStrategy::FixedSize {
                packet_size: self.packet_size,
            },
            FramingMode::HeaderPayload => FramingStrategy::HeaderPayload(HeaderFraming {
                header_size: self.header_size,
                length_offset: self.payload_size_index,
                length_codec: self.read_data_length,
                max_payload: self.max_data_length,
            }),
        }
    }
}
