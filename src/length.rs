//! Length-field codecs for header-declared-length framing.
//!
//! A header-framed stream declares each payload's length inside the
//! header as a fixed-width unsigned integer. [`LengthCodec`] names the
//! field's width and byte order, decodes the declared length, and (for
//! the built-in widths) encodes it back. Declared lengths are always
//! handled as `u64`, whatever the field width on the wire.

use serde::{Deserialize, Serialize};

use crate::error::{PacketizerError, Result};

/// Codec for the payload-length field of a frame header.
///
/// Built-in variants cover unsigned 8/16/32/64-bit fields in both byte
/// orders. `Custom` plugs in an arbitrary reader for formats the
/// built-ins do not cover (a 24-bit field, a masked field); custom
/// codecs are parse-only.
///
/// # Example
///
/// ```
/// use packetizer::LengthCodec;
///
/// let header = [0x00, 0x00, 0x05, 0x00];
/// assert_eq!(LengthCodec::U16Le.read(&header, 2), 5);
/// assert_eq!(LengthCodec::U16Be.read(&header, 2), 0x0500);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LengthCodec {
    /// Single byte.
    U8,
    /// 16-bit little-endian.
    U16Le,
    /// 16-bit big-endian.
    U16Be,
    /// 32-bit little-endian.
    U32Le,
    /// 32-bit big-endian.
    U32Be,
    /// 64-bit little-endian.
    U64Le,
    /// 64-bit big-endian.
    U64Be,
    /// Arbitrary reader over a `width`-byte field.
    #[serde(skip)]
    Custom {
        /// Field width in bytes.
        width: usize,
        /// Decodes the length from exactly `width` bytes.
        read: fn(&[u8]) -> u64,
    },
}

impl LengthCodec {
    /// Width of the length field in bytes.
    pub const fn width(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16Le | Self::U16Be => 2,
            Self::U32Le | Self::U32Be => 4,
            Self::U64Le | Self::U64Be => 8,
            Self::Custom { width, .. } => width,
        }
    }

    /// Decode the declared length from `buf` at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `buf` holds fewer than `offset + width()` bytes.
    pub fn read(self, buf: &[u8], offset: usize) -> u64 {
        let field = &buf[offset..offset + self.width()];
        match self {
            Self::U8 => u64::from(field[0]),
            Self::U16Le => u64::from(u16::from_le_bytes([field[0], field[1]])),
            Self::U16Be => u64::from(u16::from_be_bytes([field[0], field[1]])),
            Self::U32Le => {
                u64::from(u32::from_le_bytes([field[0], field[1], field[2], field[3]]))
            }
            Self::U32Be => {
                u64::from(u32::from_be_bytes([field[0], field[1], field[2], field[3]]))
            }
            Self::U64Le => u64::from_le_bytes([
                field[0], field[1], field[2], field[3], field[4], field[5], field[6], field[7],
            ]),
            Self::U64Be => u64::from_be_bytes([
                field[0], field[1], field[2], field[3], field[4], field[5], field[6], field[7],
            ]),
            Self::Custom { read, .. } => read(field),
        }
    }

    /// Encode `value` into `buf` at `offset`.
    ///
    /// Fails for `Custom` codecs (parse-only) and for values that do not
    /// fit the field width.
    ///
    /// # Panics
    ///
    /// Panics if `buf` holds fewer than `offset + width()` bytes.
    pub fn write(self, buf: &mut [u8], offset: usize, value: u64) -> Result<()> {
        match self {
            Self::U8 => {
                buf[offset] = u8::try_from(value).map_err(|_| fit_error(value, 1))?;
            }
            Self::U16Le => {
                let v = u16::try_from(value).map_err(|_| fit_error(value, 2))?;
                buf[offset..offset + 2].copy_from_slice(&v.to_le_bytes());
            }
            Self::U16Be => {
                let v = u16::try_from(value).map_err(|_| fit_error(value, 2))?;
                buf[offset..offset + 2].copy_from_slice(&v.to_be_bytes());
            }
            Self::U32Le => {
                let v = u32::try_from(value).map_err(|_| fit_error(value, 4))?;
                buf[offset..offset + 4].copy_from_slice(&v.to_le_bytes());
            }
            Self::U32Be => {
                let v = u32::try_from(value).map_err(|_| fit_error(value, 4))?;
                buf[offset..offset + 4].copy_from_slice(&v.to_be_bytes());
            }
            Self::U64Le => {
                buf[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
            }
            Self::U64Be => {
                buf[offset..offset + 8].copy_from_slice(&value.to_be_bytes());
            }
            Self::Custom { .. } => {
                return Err(PacketizerError::Encode(
                    "custom length codecs are parse-only".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Equality compares the variant, and for `Custom` the field width.
/// Reader functions are never compared, so two `Custom` codecs of the
/// same width are equal even when their readers differ.
impl PartialEq for LengthCodec {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Custom { width: a, .. }, Self::Custom { width: b, .. }) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl Eq for LengthCodec {}

fn fit_error(value: u64, width: usize) -> PacketizerError {
    PacketizerError::Encode(format!("length {value} does not fit a {width}-byte field"))
}
