//! Supported EC point formats (RFC 4492 §5.1.2).
//!
//! ```text
//! enum { uncompressed (0), ansiX962_compressed_prime (1),
//!        ansiX962_compressed_char2 (2), reserved (248..255) } ECPointFormat;
//! struct {
//!     ECPointFormat ec_point_format_list<1..2^8-1>
//! } ECPointFormatList;
//! ```
//!
//! Only uncompressed points are used for key exchange, so every list this
//! crate accepts must contain format 0.

use crate::buffer::{HandshakeBuffer, HandshakeWriter};
use crate::core::{ExtensionError, MAX_POINT_FORMATS_LENGTH, POINT_FORMAT_UNCOMPRESSED};

use super::{DecodeExtension, ExtensionCodec, ExtensionType};

/// Ordered list of EC point format ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedPointFormats {
    formats: Vec<u8>,
}

impl SupportedPointFormats {
    /// Build from raw format ids.
    ///
    /// # Errors
    /// - `EmptyList` if `formats` is empty
    /// - `OversizedItem` if more than 255 formats are given
    /// - `UnsupportedPointFormat` if uncompressed (0) is missing
    pub fn new(formats: impl Into<Vec<u8>>) -> Result<Self, ExtensionError> {
        let formats = formats.into();
        let ext_type = ExtensionType::EC_POINT_FORMATS.id();

        if formats.is_empty() {
            return Err(ExtensionError::EmptyList { ext_type });
        }
        if formats.len() > MAX_POINT_FORMATS_LENGTH {
            return Err(ExtensionError::OversizedItem {
                ext_type,
                len: formats.len(),
                max: MAX_POINT_FORMATS_LENGTH,
            });
        }
        if !formats.contains(&POINT_FORMAT_UNCOMPRESSED) {
            return Err(ExtensionError::UnsupportedPointFormat);
        }
        Ok(Self { formats })
    }

    /// The `[uncompressed]` list sent alongside ECDHE suites.
    pub fn uncompressed_only() -> Self {
        Self {
            formats: vec![POINT_FORMAT_UNCOMPRESSED],
        }
    }

    /// Format ids in wire order.
    pub fn formats(&self) -> &[u8] {
        &self.formats
    }

    /// Check if a format id is listed.
    pub fn contains(&self, format: u8) -> bool {
        self.formats.contains(&format)
    }
}

impl Default for SupportedPointFormats {
    fn default() -> Self {
        Self::uncompressed_only()
    }
}

impl ExtensionCodec for SupportedPointFormats {
    fn ext_type(&self) -> ExtensionType {
        ExtensionType::EC_POINT_FORMATS
    }

    fn encoded_length(&self) -> u16 {
        (1 + self.formats.len()) as u16
    }

    fn encode(&self, w: &mut HandshakeWriter) -> Result<(), ExtensionError> {
        w.put_vector8(&self.formats)?;
        Ok(())
    }
}

impl DecodeExtension for SupportedPointFormats {
    const EXT_TYPE: ExtensionType = ExtensionType::EC_POINT_FORMATS;

    fn decode_data(
        buf: &mut HandshakeBuffer,
        declared_length: usize,
    ) -> Result<Self, ExtensionError> {
        let ext_type = Self::EXT_TYPE.id();
        if declared_length < 1 {
            return Err(ExtensionError::Malformed {
                ext_type,
                reason: "extension shorter than list length field",
            });
        }
        let list_len = buf.peek_u8()? as usize;
        if 1 + list_len != declared_length {
            return Err(ExtensionError::Malformed {
                ext_type,
                reason: "list length disagrees with extension length",
            });
        }

        let formats = buf.read_vector8()?.to_vec();
        if formats.is_empty() {
            return Err(ExtensionError::EmptyList { ext_type });
        }
        if !formats.contains(&POINT_FORMAT_UNCOMPRESSED) {
            return Err(ExtensionError::UnsupportedPointFormat);
        }
        Ok(Self { formats })
    }
}
