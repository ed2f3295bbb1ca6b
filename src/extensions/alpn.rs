//! Application-Layer Protocol Negotiation (RFC 7301).
//!
//! ```text
//! opaque ProtocolName<1..2^8-1>;
//! struct {
//!     ProtocolName protocol_name_list<2..2^16-1>
//! } ProtocolNameList;
//! ```
//!
//! The client lists names in preference order; the server answers with
//! exactly one of them.

use tracing::debug;

use crate::buffer::{HandshakeBuffer, HandshakeWriter};
use crate::core::{ExtensionError, MAX_EXTENSION_LENGTH, MAX_PROTOCOL_NAME_LENGTH};

use super::codec::read_opaque_list;
use super::{DecodeExtension, ExtensionCodec, ExtensionType};

/// Largest protocol list that still leaves room for the list length field
/// inside a 16-bit extension length.
const MAX_PROTOCOL_LIST_LENGTH: usize = MAX_EXTENSION_LENGTH - 2;

/// Ordered list of application protocol names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationProtocols {
    names: Vec<String>,
    /// Encoded size of the name list (sum of 1 + name length).
    list_len: usize,
}

impl ApplicationProtocols {
    /// Build an outbound list.
    ///
    /// # Errors
    /// - `EmptyList` if `names` is empty
    /// - `EmptyItem` if a name is empty
    /// - `OversizedItem` if a name exceeds 255 bytes, or if adding a name
    ///   would overflow the list length (reported for the first such name)
    pub fn new<I, S>(names: I) -> Result<Self, ExtensionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ext_type = ExtensionType::ALPN.id();
        let mut out = Vec::new();
        let mut list_len = 0usize;

        for name in names {
            let name = name.into();
            if name.is_empty() {
                return Err(ExtensionError::EmptyItem { ext_type });
            }
            if name.len() > MAX_PROTOCOL_NAME_LENGTH {
                return Err(ExtensionError::OversizedItem {
                    ext_type,
                    len: name.len(),
                    max: MAX_PROTOCOL_NAME_LENGTH,
                });
            }
            list_len += 1 + name.len();
            if list_len > MAX_PROTOCOL_LIST_LENGTH {
                return Err(ExtensionError::OversizedItem {
                    ext_type,
                    len: list_len,
                    max: MAX_PROTOCOL_LIST_LENGTH,
                });
            }
            out.push(name);
        }

        if out.is_empty() {
            return Err(ExtensionError::EmptyList { ext_type });
        }
        Ok(Self {
            names: out,
            list_len,
        })
    }

    /// Build the single-name reply a server sends.
    pub fn selected(name: impl Into<String>) -> Result<Self, ExtensionError> {
        Self::new([name.into()])
    }

    /// Names in preference order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Check if `name` is in the list.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Number of names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false: an empty list cannot be constructed or decoded.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl ExtensionCodec for ApplicationProtocols {
    fn ext_type(&self) -> ExtensionType {
        ExtensionType::ALPN
    }

    fn encoded_length(&self) -> u16 {
        (2 + self.list_len) as u16
    }

    fn encode(&self, w: &mut HandshakeWriter) -> Result<(), ExtensionError> {
        w.put_u16(self.list_len as u16);
        for name in &self.names {
            w.put_vector8(name.as_bytes())?;
        }
        Ok(())
    }
}

impl DecodeExtension for ApplicationProtocols {
    const EXT_TYPE: ExtensionType = ExtensionType::ALPN;

    fn decode_data(
        buf: &mut HandshakeBuffer,
        declared_length: usize,
    ) -> Result<Self, ExtensionError> {
        let items = read_opaque_list(buf, declared_length, Self::EXT_TYPE)?;
        let names = items
            .into_iter()
            .map(|raw| {
                String::from_utf8(raw).map_err(|_| ExtensionError::Malformed {
                    ext_type: Self::EXT_TYPE.id(),
                    reason: "protocol name is not UTF-8",
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            names,
            list_len: declared_length - 2,
        })
    }
}

/// Server side: choose a protocol from the client's offer.
///
/// Walks the server's own preference list and returns the first name the
/// client also offered.
///
/// # Errors
/// Returns `NoApplicationProtocol` if nothing matches.
pub fn select_application_protocol<'a, S: AsRef<str>>(
    local_preference: &'a [S],
    offered: &ApplicationProtocols,
) -> Result<&'a str, ExtensionError> {
    let selected = local_preference
        .iter()
        .map(AsRef::as_ref)
        .find(|name| offered.contains(name));

    match selected {
        Some(name) => {
            debug!(protocol = name, "application protocol selected");
            Ok(name)
        }
        None => {
            debug!(offered = ?offered.names(), "no matching application protocol");
            Err(ExtensionError::NoApplicationProtocol)
        }
    }
}

/// Client side: validate the server's ALPN reply against what was offered.
///
/// # Errors
/// Returns `UnexpectedApplicationProtocol` unless the reply carries exactly
/// one name that the client offered.
pub fn confirm_server_selection(
    offered: &ApplicationProtocols,
    reply: &ApplicationProtocols,
) -> Result<String, ExtensionError> {
    match reply.names() {
        [name] if offered.contains(name) => Ok(name.clone()),
        [name] => Err(ExtensionError::UnexpectedApplicationProtocol(name.clone())),
        names => Err(ExtensionError::UnexpectedApplicationProtocol(names.join(","))),
    }
}
