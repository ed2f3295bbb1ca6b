//! Supported groups (RFC 7919 §2, formerly "elliptic_curves" in RFC 4492).
//!
//! ```text
//! struct {
//!     NamedGroup named_group_list<2..2^16-1>;
//! } NamedGroupList;
//! ```

use crate::buffer::{HandshakeBuffer, HandshakeWriter};
use crate::core::{ExtensionError, MAX_EXTENSION_LENGTH};
use crate::groups::{NamedGroup, NamedGroupRegistry};

use super::{DecodeExtension, ExtensionCodec, ExtensionType};

const MAX_GROUPS: usize = (MAX_EXTENSION_LENGTH - 2) / 2;

/// Ordered list of named group ids, most preferred first.
///
/// Ids are kept as received. Ids this crate does not know are legal on the
/// wire and are skipped by [`SupportedGroups::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedGroups {
    groups: Vec<u16>,
}

impl SupportedGroups {
    /// Build from wire ids.
    ///
    /// # Errors
    /// `EmptyList` for no ids, `OversizedItem` if the list overflows 16 bits.
    pub fn new(groups: impl Into<Vec<u16>>) -> Result<Self, ExtensionError> {
        let groups = groups.into();
        let ext_type = ExtensionType::SUPPORTED_GROUPS.id();
        if groups.is_empty() {
            return Err(ExtensionError::EmptyList { ext_type });
        }
        if groups.len() > MAX_GROUPS {
            return Err(ExtensionError::OversizedItem {
                ext_type,
                len: groups.len(),
                max: MAX_GROUPS,
            });
        }
        Ok(Self { groups })
    }

    /// Advertise every group in `registry`, in table order.
    ///
    /// # Errors
    /// `EmptyList` if the registry is empty.
    pub fn from_registry(registry: &NamedGroupRegistry) -> Result<Self, ExtensionError> {
        Self::new(registry.iter().map(|g| g.id).collect::<Vec<_>>())
    }

    /// Wire ids in preference order.
    pub fn ids(&self) -> &[u16] {
        &self.groups
    }

    /// Map ids to registry entries, dropping ids the registry does not know.
    pub fn resolve(&self, registry: &NamedGroupRegistry) -> Vec<&'static NamedGroup> {
        self.groups.iter().filter_map(|&id| registry.by_id(id)).collect()
    }

    /// Check if any listed id is a known ECDHE group.
    ///
    /// Used to decide whether the point formats extension must accompany
    /// this one.
    pub fn has_ecdhe(&self, registry: &NamedGroupRegistry) -> bool {
        self.resolve(registry).iter().any(|g| g.is_ecdhe())
    }
}

impl ExtensionCodec for SupportedGroups {
    fn ext_type(&self) -> ExtensionType {
        ExtensionType::SUPPORTED_GROUPS
    }

    fn encoded_length(&self) -> u16 {
        (2 + 2 * self.groups.len()) as u16
    }

    fn encode(&self, w: &mut HandshakeWriter) -> Result<(), ExtensionError> {
        w.put_u16((2 * self.groups.len()) as u16);
        for &id in &self.groups {
            w.put_u16(id);
        }
        Ok(())
    }
}

impl DecodeExtension for SupportedGroups {
    const EXT_TYPE: ExtensionType = ExtensionType::SUPPORTED_GROUPS;

    fn decode_data(
        buf: &mut HandshakeBuffer,
        declared_length: usize,
    ) -> Result<Self, ExtensionError> {
        let ext_type = Self::EXT_TYPE.id();
        let malformed = |reason| ExtensionError::Malformed { ext_type, reason };

        if declared_length < 2 {
            return Err(malformed("extension shorter than list length field"));
        }
        let list_len = buf.read_u16()? as usize;
        if list_len + 2 != declared_length {
            return Err(malformed("list length disagrees with extension length"));
        }
        if list_len == 0 {
            return Err(ExtensionError::EmptyList { ext_type });
        }
        if list_len % 2 != 0 {
            return Err(malformed("odd group list length"));
        }

        let mut groups = Vec::with_capacity(list_len / 2);
        for _ in 0..list_len / 2 {
            groups.push(buf.read_u16()?);
        }
        Ok(Self { groups })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extensions::write_extension;

    fn decode_hex(body: &str) -> Result<SupportedGroups, ExtensionError> {
        let bytes = hex::decode(body).unwrap();
        let len = bytes.len();
        SupportedGroups::decode(&mut HandshakeBuffer::from_bytes(bytes), len)
    }

    #[test]
    fn test_wire_format() {
        let ext = SupportedGroups::new(vec![0x001D, 0x0017, 0x0100]).unwrap();
        let mut w = HandshakeWriter::new();
        write_extension(&ext, &mut w).unwrap();
        assert_eq!(hex::encode(w.as_slice()), "000a00080006001d00170100");
    }

    #[test]
    fn test_decode_keeps_unknown_ids() {
        let ext = decode_hex("0004001dfafa").unwrap();
        assert_eq!(ext.ids(), &[0x001D, 0xFAFA]);

        let registry = NamedGroupRegistry::standard();
        let resolved = ext.resolve(&registry);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].name, "x25519");
    }

    #[test]
    fn test_decode_rejects_bad_lengths() {
        assert_eq!(
            decode_hex("0000"),
            Err(ExtensionError::EmptyList { ext_type: 10 })
        );
        assert!(matches!(
            decode_hex("0003001d17"),
            Err(ExtensionError::Malformed {
                reason: "odd group list length",
                ..
            })
        ));
        assert!(matches!(
            decode_hex("0002001d0017"),
            Err(ExtensionError::Malformed { .. })
        ));
    }

    #[test]
    fn test_truncated_decode_restores_cursor() {
        // Two groups declared, only one arrived
        let mut buf = HandshakeBuffer::from_bytes(hex::decode("0004001d").unwrap());
        let result = SupportedGroups::decode(&mut buf, 6);
        assert!(matches!(result, Err(ExtensionError::Decode(_))));
        assert_eq!(buf.position(), 0);
        assert_eq!(buf.available(), 4);
    }

    #[test]
    fn test_has_ecdhe() {
        let registry = NamedGroupRegistry::standard();
        let ff_only = SupportedGroups::new(vec![0x0100, 0x0101]).unwrap();
        assert!(!ff_only.has_ecdhe(&registry));

        let mixed = SupportedGroups::new(vec![0x0100, 0x0017]).unwrap();
        assert!(mixed.has_ecdhe(&registry));
    }

    #[test]
    fn test_from_registry() {
        let registry = NamedGroupRegistry::fips();
        let ext = SupportedGroups::from_registry(&registry).unwrap();
        assert_eq!(ext.ids().len(), registry.len());
        assert!(!ext.ids().contains(&0x001D));
    }
}
