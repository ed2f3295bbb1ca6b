//! Hello extensions block.
//!
//! ```text
//! Extension extensions<0..2^16-1>;
//! ```
//!
//! Decoding is fail-fast: the first malformed extension rejects the whole
//! block and the buffer cursor is restored to where decoding started.

use tracing::{debug, trace};

use crate::buffer::{HandshakeBuffer, HandshakeWriter};
use crate::core::{EXTENSION_HEADER_SIZE, ExtensionError};

use super::codec::write_extension;
use super::{
    ApplicationProtocols, DecodeExtension, ExtensionCodec, ExtensionType, SupportedGroups,
    SupportedPointFormats, UnknownExtension,
};

/// One decoded hello extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelloExtension {
    /// `application_layer_protocol_negotiation` (16).
    ApplicationProtocols(ApplicationProtocols),
    /// `ec_point_formats` (11).
    PointFormats(SupportedPointFormats),
    /// `supported_groups` (10).
    SupportedGroups(SupportedGroups),
    /// Any other type, kept as raw bytes.
    Unknown(UnknownExtension),
}

impl HelloExtension {
    /// Decode the data of one extension, dispatching on its type.
    pub fn decode(
        ext_type: ExtensionType,
        buf: &mut HandshakeBuffer,
        declared_length: usize,
    ) -> Result<Self, ExtensionError> {
        Ok(match ext_type {
            ExtensionType::ALPN => {
                Self::ApplicationProtocols(ApplicationProtocols::decode(buf, declared_length)?)
            }
            ExtensionType::EC_POINT_FORMATS => {
                Self::PointFormats(SupportedPointFormats::decode(buf, declared_length)?)
            }
            ExtensionType::SUPPORTED_GROUPS => {
                Self::SupportedGroups(SupportedGroups::decode(buf, declared_length)?)
            }
            other => Self::Unknown(UnknownExtension::decode_as(other, buf, declared_length)?),
        })
    }

    fn as_codec(&self) -> &dyn ExtensionCodec {
        match self {
            Self::ApplicationProtocols(e) => e,
            Self::PointFormats(e) => e,
            Self::SupportedGroups(e) => e,
            Self::Unknown(e) => e,
        }
    }
}

impl ExtensionCodec for HelloExtension {
    fn ext_type(&self) -> ExtensionType {
        self.as_codec().ext_type()
    }

    fn encoded_length(&self) -> u16 {
        self.as_codec().encoded_length()
    }

    fn encode(&self, w: &mut HandshakeWriter) -> Result<(), ExtensionError> {
        self.as_codec().encode(w)
    }
}

impl From<ApplicationProtocols> for HelloExtension {
    fn from(ext: ApplicationProtocols) -> Self {
        Self::ApplicationProtocols(ext)
    }
}

impl From<SupportedPointFormats> for HelloExtension {
    fn from(ext: SupportedPointFormats) -> Self {
        Self::PointFormats(ext)
    }
}

impl From<SupportedGroups> for HelloExtension {
    fn from(ext: SupportedGroups) -> Self {
        Self::SupportedGroups(ext)
    }
}

impl From<UnknownExtension> for HelloExtension {
    fn from(ext: UnknownExtension) -> Self {
        Self::Unknown(ext)
    }
}

/// Ordered set of hello extensions, at most one per type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelloExtensions {
    extensions: Vec<HelloExtension>,
}

impl HelloExtensions {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an extension, replacing one of the same type in place.
    pub fn add(&mut self, ext: impl Into<HelloExtension>) {
        let ext = ext.into();
        let ext_type = ext.ext_type();
        if let Some(existing) = self.extensions.iter_mut().find(|e| e.ext_type() == ext_type) {
            *existing = ext;
        } else {
            self.extensions.push(ext);
        }
    }

    /// Get extension by type.
    pub fn get(&self, ext_type: ExtensionType) -> Option<&HelloExtension> {
        self.extensions.iter().find(|e| e.ext_type() == ext_type)
    }

    /// Check if an extension type is present.
    pub fn has(&self, ext_type: ExtensionType) -> bool {
        self.get(ext_type).is_some()
    }

    /// Remove an extension by type.
    pub fn remove(&mut self, ext_type: ExtensionType) -> Option<HelloExtension> {
        let pos = self.extensions.iter().position(|e| e.ext_type() == ext_type)?;
        Some(self.extensions.remove(pos))
    }

    /// The ALPN extension, if present.
    pub fn application_protocols(&self) -> Option<&ApplicationProtocols> {
        match self.get(ExtensionType::ALPN)? {
            HelloExtension::ApplicationProtocols(e) => Some(e),
            _ => None,
        }
    }

    /// The point formats extension, if present.
    pub fn point_formats(&self) -> Option<&SupportedPointFormats> {
        match self.get(ExtensionType::EC_POINT_FORMATS)? {
            HelloExtension::PointFormats(e) => Some(e),
            _ => None,
        }
    }

    /// The supported groups extension, if present.
    pub fn supported_groups(&self) -> Option<&SupportedGroups> {
        match self.get(ExtensionType::SUPPORTED_GROUPS)? {
            HelloExtension::SupportedGroups(e) => Some(e),
            _ => None,
        }
    }

    /// Client side: every extension in a server reply must answer one the
    /// client sent.
    ///
    /// # Errors
    /// `UnsolicitedExtension` naming the first type the client never offered.
    pub fn check_solicited(&self, sent: &HelloExtensions) -> Result<(), ExtensionError> {
        match self.iter().find(|e| !sent.has(e.ext_type())) {
            Some(e) => {
                debug!(ext = %e.ext_type(), "unsolicited extension in server hello");
                Err(ExtensionError::UnsolicitedExtension(e.ext_type().id()))
            }
            None => Ok(()),
        }
    }

    /// Extensions in wire order.
    pub fn iter(&self) -> impl Iterator<Item = &HelloExtension> {
        self.extensions.iter()
    }

    /// Number of extensions.
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Size of the block on the wire, including its 2-byte length.
    pub fn wire_size(&self) -> usize {
        2 + self
            .extensions
            .iter()
            .map(|e| EXTENSION_HEADER_SIZE + e.encoded_length() as usize)
            .sum::<usize>()
    }

    /// Write the block with its length prefix.
    pub fn encode(&self, w: &mut HandshakeWriter) -> Result<(), ExtensionError> {
        encode_extensions(&self.extensions, w)
    }
}

impl FromIterator<HelloExtension> for HelloExtensions {
    fn from_iter<T: IntoIterator<Item = HelloExtension>>(iter: T) -> Self {
        let mut set = Self::new();
        for ext in iter {
            set.add(ext);
        }
        set
    }
}

/// Write a 16-bit length-prefixed extensions block.
///
/// On error the writer holds a partial block and should be discarded.
pub fn encode_extensions(
    extensions: &[HelloExtension],
    w: &mut HandshakeWriter,
) -> Result<(), ExtensionError> {
    let slot = w.reserve_length16();
    for ext in extensions {
        write_extension(ext, w)?;
    }
    w.finish_length(slot)?;
    Ok(())
}

/// Decode `block_len` bytes of extensions (the block's length prefix has
/// already been read).
///
/// Unknown types are kept as [`HelloExtension::Unknown`]. A repeated type is
/// rejected. On any error the cursor is rewound to where it was on entry.
pub fn decode_extensions(
    buf: &mut HandshakeBuffer,
    block_len: usize,
) -> Result<HelloExtensions, ExtensionError> {
    buf.with_rollback(|b| decode_block(b, block_len))
        .inspect_err(|e| debug!(error = %e, block_len, "extensions block rejected"))
}

/// Read an optional extensions block at the end of a hello body.
///
/// No unread bytes means no extensions. Otherwise a 16-bit block length
/// follows and the block is decoded by [`decode_extensions`].
pub fn read_extensions(buf: &mut HandshakeBuffer) -> Result<HelloExtensions, ExtensionError> {
    if buf.is_empty() {
        return Ok(HelloExtensions::new());
    }
    buf.with_rollback(|b| {
        let block_len = b.read_u16()? as usize;
        decode_extensions(b, block_len)
    })
}

fn decode_block(
    buf: &mut HandshakeBuffer,
    block_len: usize,
) -> Result<HelloExtensions, ExtensionError> {
    let mut set = HelloExtensions::new();
    let mut remaining = block_len;

    while remaining > 0 {
        if remaining < EXTENSION_HEADER_SIZE {
            return Err(ExtensionError::MalformedBlock("truncated extension header"));
        }
        let ext_type = ExtensionType(buf.read_u16()?);
        let declared = buf.read_u16()? as usize;
        remaining -= EXTENSION_HEADER_SIZE;

        if declared > remaining {
            return Err(ExtensionError::MalformedBlock("extension overruns block"));
        }
        if set.has(ext_type) {
            return Err(ExtensionError::DuplicateExtension(ext_type.id()));
        }

        let before = buf.available();
        let ext = HelloExtension::decode(ext_type, buf, declared)?;
        if before - buf.available() != declared {
            return Err(ExtensionError::Malformed {
                ext_type: ext_type.id(),
                reason: "extension data not fully consumed",
            });
        }
        remaining -= declared;

        trace!(ext = %ext_type, len = declared, "extension decoded");
        set.extensions.push(ext);
    }
    Ok(set)
}
