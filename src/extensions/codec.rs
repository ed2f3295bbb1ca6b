//! Extension codec contract.
//!
//! Wire format of one extension (RFC 5246 §7.4.1.4):
//! ```text
//! +0   Extension Type   (2 bytes BE16)
//! +2   Extension Length (2 bytes BE16)
//! +4   Extension Data   (Length bytes)
//! ```
//!
//! Variants only encode and decode the data part. The 4-byte header and the
//! check that `encoded_length()` matches what `encode()` wrote live here.

use crate::buffer::{HandshakeBuffer, HandshakeWriter};
use crate::core::{EXTENSION_HEADER_SIZE, ExtensionError, MAX_EXTENSION_LENGTH};

use super::ExtensionType;

/// Encoding contract shared by every hello extension.
pub trait ExtensionCodec {
    /// Wire type id.
    fn ext_type(&self) -> ExtensionType;

    /// Length of the extension data, excluding the 4-byte header.
    fn encoded_length(&self) -> u16;

    /// Write the extension data (no header).
    fn encode(&self, w: &mut HandshakeWriter) -> Result<(), ExtensionError>;
}

/// Decoding contract for extensions with a fixed type id.
pub trait DecodeExtension: ExtensionCodec + Sized {
    /// Type id this variant decodes.
    const EXT_TYPE: ExtensionType;

    /// Read the extension data from `buf`.
    ///
    /// `declared_length` is the length field from the extension header and
    /// MUST be consumed exactly. Implementations may leave the cursor
    /// anywhere on error; callers go through [`DecodeExtension::decode`].
    fn decode_data(
        buf: &mut HandshakeBuffer,
        declared_length: usize,
    ) -> Result<Self, ExtensionError>;

    /// Decode the extension data from `buf`.
    ///
    /// On error the cursor is left where it started.
    fn decode(buf: &mut HandshakeBuffer, declared_length: usize) -> Result<Self, ExtensionError> {
        buf.with_rollback(|b| Self::decode_data(b, declared_length))
    }
}

/// Write header and data for one extension.
///
/// # Errors
/// Returns `LengthMismatch` if the variant wrote a different number of bytes
/// than it reported.
pub fn write_extension<E: ExtensionCodec + ?Sized>(
    ext: &E,
    w: &mut HandshakeWriter,
) -> Result<(), ExtensionError> {
    let ext_type = ext.ext_type().id();
    let reported = ext.encoded_length() as usize;

    w.put_u16(ext_type);
    w.put_u16(reported as u16);
    let start = w.len();
    ext.encode(w)?;
    let written = w.len() - start;

    if written != reported {
        return Err(ExtensionError::LengthMismatch {
            ext_type,
            reported,
            written,
        });
    }
    Ok(())
}

/// Extension carried as raw bytes.
///
/// Holds any type this crate does not model, so unknown extensions pass
/// through decode and re-encode unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownExtension {
    ext_type: ExtensionType,
    data: Vec<u8>,
}

impl UnknownExtension {
    /// Create a raw extension.
    ///
    /// # Errors
    /// Returns `OversizedItem` if `data` does not fit a 16-bit length.
    pub fn new(ext_type: ExtensionType, data: Vec<u8>) -> Result<Self, ExtensionError> {
        if data.len() > MAX_EXTENSION_LENGTH {
            return Err(ExtensionError::OversizedItem {
                ext_type: ext_type.id(),
                len: data.len(),
                max: MAX_EXTENSION_LENGTH,
            });
        }
        Ok(Self { ext_type, data })
    }

    /// Create an empty extension (no data).
    pub fn empty(ext_type: ExtensionType) -> Self {
        Self {
            ext_type,
            data: Vec::new(),
        }
    }

    /// Raw extension data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Decode data of a given type.
    pub fn decode_as(
        ext_type: ExtensionType,
        buf: &mut HandshakeBuffer,
        declared_length: usize,
    ) -> Result<Self, ExtensionError> {
        let data = buf.read_slice(declared_length)?.to_vec();
        Ok(Self { ext_type, data })
    }
}

impl ExtensionCodec for UnknownExtension {
    fn ext_type(&self) -> ExtensionType {
        self.ext_type
    }

    fn encoded_length(&self) -> u16 {
        self.data.len() as u16
    }

    fn encode(&self, w: &mut HandshakeWriter) -> Result<(), ExtensionError> {
        w.put_bytes(&self.data);
        Ok(())
    }
}

/// Read a 16-bit-prefixed list of 8-bit-prefixed, non-empty opaque items.
///
/// ```text
/// opaque Item<1..2^8-1>;
/// Item   List<2..2^16-1>;
/// ```
///
/// The list must fill `declared_length` exactly, and no item may reach past
/// the end of the list.
pub(crate) fn read_opaque_list(
    buf: &mut HandshakeBuffer,
    declared_length: usize,
    ext_type: ExtensionType,
) -> Result<Vec<Vec<u8>>, ExtensionError> {
    let ext_type = ext_type.id();
    let malformed = |reason| ExtensionError::Malformed { ext_type, reason };

    if declared_length < 2 {
        return Err(malformed("extension shorter than list length field"));
    }
    let list_len = buf.read_u16()? as usize;
    if list_len < 2 {
        return Err(malformed("list length below minimum"));
    }
    if list_len + 2 != declared_length {
        return Err(malformed("list length disagrees with extension length"));
    }

    let mut items = Vec::new();
    let mut remaining = list_len;
    while remaining > 0 {
        let item_len = buf.peek_u8()? as usize;
        if item_len == 0 {
            return Err(ExtensionError::EmptyItem { ext_type });
        }
        if 1 + item_len > remaining {
            return Err(malformed("item overruns list"));
        }
        items.push(buf.read_vector8()?.to_vec());
        remaining -= 1 + item_len;
    }
    Ok(items)
}

/// Total wire size of an extension with `body_len` data bytes.
pub fn extension_wire_size(body_len: usize) -> usize {
    EXTENSION_HEADER_SIZE + body_len
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LyingExtension;

    impl ExtensionCodec for LyingExtension {
        fn ext_type(&self) -> ExtensionType {
            ExtensionType(0xFE00)
        }

        fn encoded_length(&self) -> u16 {
            3
        }

        fn encode(&self, w: &mut HandshakeWriter) -> Result<(), ExtensionError> {
            w.put_bytes(&[1, 2]);
            Ok(())
        }
    }

    fn list(bytes: &str) -> HandshakeBuffer {
        HandshakeBuffer::from_bytes(hex::decode(bytes).unwrap())
    }

    #[test]
    fn test_write_extension_header() {
        let ext = UnknownExtension::new(ExtensionType(0x1234), vec![1, 2, 3, 4]).unwrap();
        let mut w = HandshakeWriter::new();
        write_extension(&ext, &mut w).unwrap();

        assert_eq!(hex::encode(w.as_slice()), "1234000401020304");
        assert_eq!(w.len(), extension_wire_size(4));
    }

    #[test]
    fn test_length_mismatch_detected() {
        let mut w = HandshakeWriter::new();
        let result = write_extension(&LyingExtension, &mut w);
        assert_eq!(
            result,
            Err(ExtensionError::LengthMismatch {
                ext_type: 0xFE00,
                reported: 3,
                written: 2,
            })
        );
    }

    #[test]
    fn test_unknown_roundtrip_bytes() {
        let mut buf = list("aabbcc");
        let ext = UnknownExtension::decode_as(ExtensionType(77), &mut buf, 3).unwrap();
        assert_eq!(ext.data(), &[0xAA, 0xBB, 0xCC]);
        assert_eq!(ext.ext_type(), ExtensionType(77));
        assert_eq!(ext.encoded_length(), 3);
    }

    #[test]
    fn test_unknown_too_large() {
        let result = UnknownExtension::new(ExtensionType(1), vec![0u8; 65536]);
        assert!(matches!(result, Err(ExtensionError::OversizedItem { .. })));
    }

    #[test]
    fn test_opaque_list() {
        // ["h2", "abc"], followed by one byte of the next field
        let mut buf = list("00070268320361626300");
        let items = read_opaque_list(&mut buf, 9, ExtensionType::ALPN).unwrap();
        assert_eq!(items, vec![b"h2".to_vec(), b"abc".to_vec()]);
        assert_eq!(buf.available(), 1);
    }

    #[test]
    fn test_opaque_list_slack_rejected() {
        // Declared extension length leaves one byte after the list
        let mut buf = list("0003026832ff");
        let result = read_opaque_list(&mut buf, 6, ExtensionType::ALPN);
        assert!(matches!(result, Err(ExtensionError::Malformed { .. })));
    }

    #[test]
    fn test_opaque_list_item_overrun() {
        // list_len=3 but item claims 5 bytes
        let mut buf = list("000305683268");
        let result = read_opaque_list(&mut buf, 5, ExtensionType::ALPN);
        assert!(matches!(
            result,
            Err(ExtensionError::Malformed {
                reason: "item overruns list",
                ..
            })
        ));
    }

    #[test]
    fn test_opaque_list_empty_item() {
        let mut buf = list("0003000168");
        let result = read_opaque_list(&mut buf, 5, ExtensionType::ALPN);
        assert_eq!(result, Err(ExtensionError::EmptyItem { ext_type: 16 }));
    }

    #[test]
    fn test_opaque_list_too_short() {
        let mut buf = list("0001");
        assert!(matches!(
            read_opaque_list(&mut buf, 1, ExtensionType::ALPN),
            Err(ExtensionError::Malformed { .. })
        ));

        let mut buf = list("000100");
        assert!(matches!(
            read_opaque_list(&mut buf, 3, ExtensionType::ALPN),
            Err(ExtensionError::Malformed {
                reason: "list length below minimum",
                ..
            })
        ));
    }

    #[test]
    fn test_opaque_list_truncated_input() {
        // Lengths agree but the bytes never arrived
        let mut buf = list("0005046832");
        let result = read_opaque_list(&mut buf, 7, ExtensionType::ALPN);
        assert!(matches!(result, Err(ExtensionError::Decode(_))));
    }
}
