//! Error types for the handshake layer.
//!
//! Every error here rejects the message being parsed. None of them are
//! recoverable inside the handshake: the caller aborts with [`AlertDescription`]
//! obtained from `alert()`.

use thiserror::Error;

/// TLS alert descriptions the handshake layer may need to send (RFC 5246 §7.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AlertDescription {
    /// handshake_failure(40)
    HandshakeFailure = 40,
    /// illegal_parameter(47)
    IllegalParameter = 47,
    /// decode_error(50)
    DecodeError = 50,
    /// internal_error(80)
    InternalError = 80,
    /// unsupported_extension(110)
    UnsupportedExtension = 110,
    /// no_application_protocol(120)
    NoApplicationProtocol = 120,
}

impl AlertDescription {
    /// Get the wire byte.
    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

/// Errors raised by bounds-checked buffer reads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A read asked for more bytes than remain unread.
    #[error("unexpected end of data: requested {requested}, available {available}")]
    UnexpectedEndOfData {
        /// Bytes the read required.
        requested: usize,
        /// Unread bytes at the time of the read.
        available: usize,
    },

    /// A checkpoint was rewound to after the buffer compacted. The cursor is
    /// left where it was.
    #[error("stale checkpoint: taken in generation {taken}, buffer is at {current}")]
    StaleCheckpoint {
        /// Compaction generation the checkpoint was taken in.
        taken: u64,
        /// Current compaction generation.
        current: u64,
    },
}

impl DecodeError {
    /// Alert to send when aborting on this error.
    pub fn alert(&self) -> AlertDescription {
        match self {
            DecodeError::UnexpectedEndOfData { .. } => AlertDescription::DecodeError,
            DecodeError::StaleCheckpoint { .. } => AlertDescription::InternalError,
        }
    }
}

/// Errors raised while writing length-prefixed vectors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Vector body does not fit its length prefix.
    #[error("vector too long: {len} > {max}")]
    VectorTooLong {
        /// Body length.
        len: usize,
        /// Largest value the prefix can carry.
        max: usize,
    },
}

/// Errors from encoding, decoding, or negotiating hello extensions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtensionError {
    /// Underlying buffer read failed.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Writing a length-prefixed vector failed.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Length bookkeeping inside an extension does not add up.
    #[error("malformed extension 0x{ext_type:04x}: {reason}")]
    Malformed {
        /// Extension type id.
        ext_type: u16,
        /// What was inconsistent.
        reason: &'static str,
    },

    /// The extensions block framing is broken (truncated header, or an
    /// extension reaching past the block end).
    #[error("malformed extensions block: {0}")]
    MalformedBlock(&'static str),

    /// An opaque list item has zero length.
    #[error("empty item in extension 0x{ext_type:04x}")]
    EmptyItem {
        /// Extension type id.
        ext_type: u16,
    },

    /// An item or list exceeds its field's maximum length.
    #[error("oversized item in extension 0x{ext_type:04x}: {len} > {max}")]
    OversizedItem {
        /// Extension type id.
        ext_type: u16,
        /// Offending length.
        len: usize,
        /// Field maximum.
        max: usize,
    },

    /// A list that must carry at least one item is empty.
    #[error("empty list in extension 0x{ext_type:04x}")]
    EmptyList {
        /// Extension type id.
        ext_type: u16,
    },

    /// The peer's point-format list omits the uncompressed format.
    #[error("peer does not support uncompressed point format")]
    UnsupportedPointFormat,

    /// The same extension type appears twice in one block.
    #[error("duplicate extension 0x{0:04x}")]
    DuplicateExtension(u16),

    /// An extension wrote a different number of bytes than it reported.
    #[error("extension 0x{ext_type:04x} reported {reported} bytes but wrote {written}")]
    LengthMismatch {
        /// Extension type id.
        ext_type: u16,
        /// Value of `encoded_length()`.
        reported: usize,
        /// Bytes actually written.
        written: usize,
    },

    /// No offered application protocol is supported locally.
    #[error("no matching application protocol")]
    NoApplicationProtocol,

    /// The server selected an application protocol the client never offered,
    /// or its reply did not carry exactly one name.
    #[error("unexpected application protocol selection: {0:?}")]
    UnexpectedApplicationProtocol(String),

    /// The peer sent an extension the local side never requested.
    #[error("unsolicited extension 0x{0:04x}")]
    UnsolicitedExtension(u16),
}

impl ExtensionError {
    /// Alert to send when aborting on this error.
    pub fn alert(&self) -> AlertDescription {
        match self {
            ExtensionError::Decode(e) => e.alert(),
            ExtensionError::Malformed { .. }
            | ExtensionError::MalformedBlock(_)
            | ExtensionError::EmptyItem { .. }
            | ExtensionError::OversizedItem { .. }
            | ExtensionError::EmptyList { .. } => AlertDescription::DecodeError,
            ExtensionError::UnsupportedPointFormat | ExtensionError::DuplicateExtension(_) => {
                AlertDescription::IllegalParameter
            }
            ExtensionError::Encode(_) | ExtensionError::LengthMismatch { .. } => {
                AlertDescription::InternalError
            }
            ExtensionError::NoApplicationProtocol => AlertDescription::NoApplicationProtocol,
            ExtensionError::UnexpectedApplicationProtocol(_) => AlertDescription::HandshakeFailure,
            ExtensionError::UnsolicitedExtension(_) => AlertDescription::UnsupportedExtension,
        }
    }

    /// Check if this error comes from length accounting (truncation, slack,
    /// empty or oversized items).
    pub fn is_length_error(&self) -> bool {
        matches!(
            self,
            ExtensionError::Decode(DecodeError::UnexpectedEndOfData { .. })
                | ExtensionError::Malformed { .. }
                | ExtensionError::MalformedBlock(_)
                | ExtensionError::EmptyItem { .. }
                | ExtensionError::OversizedItem { .. }
                | ExtensionError::EmptyList { .. }
                | ExtensionError::LengthMismatch { .. }
        )
    }
}

/// Errors from issuing, verifying, or carrying stateless cookies.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CookieError {
    /// No cookie was presented.
    #[error("cookie missing")]
    Missing,

    /// Cookie is not exactly the issued size.
    #[error("invalid cookie length: {0}")]
    WrongLength(usize),

    /// Cookie version matches neither the current nor the previous secret.
    #[error("cookie version {0} outside timing window")]
    UnknownVersion(u32),

    /// Recomputed digest differs from the presented cookie.
    #[error("cookie digest mismatch")]
    DigestMismatch,

    /// A peer-supplied cookie exceeds the version-specific ceiling.
    #[error("cookie too large: {len} > {max}")]
    TooLarge {
        /// Presented length.
        len: usize,
        /// Ceiling for the protocol version.
        max: usize,
    },

    /// A ClientHello field is too long for its length prefix.
    #[error("hello {field} too long: {len} > {max}")]
    HelloFieldTooLong {
        /// Field name.
        field: &'static str,
        /// Field length in items.
        len: usize,
        /// Most items the field may hold.
        max: usize,
    },

    /// Underlying buffer read failed.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

impl CookieError {
    /// Check if this error means the server should answer with a fresh
    /// HelloVerifyRequest rather than abort.
    pub fn is_cookie_rejection(&self) -> bool {
        matches!(
            self,
            CookieError::Missing
                | CookieError::WrongLength(_)
                | CookieError::UnknownVersion(_)
                | CookieError::DigestMismatch
        )
    }

    /// Alert to send when aborting on this error.
    pub fn alert(&self) -> AlertDescription {
        match self {
            CookieError::Decode(e) => e.alert(),
            _ => AlertDescription::IllegalParameter,
        }
    }
}

/// Top-level handshake errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HandshakeError {
    /// Buffer read error.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Vector encoding error.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Extension error.
    #[error("extension error: {0}")]
    Extension(#[from] ExtensionError),

    /// Cookie error.
    #[error("cookie error: {0}")]
    Cookie(#[from] CookieError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl HandshakeError {
    /// Alert to send when aborting on this error.
    pub fn alert(&self) -> AlertDescription {
        match self {
            HandshakeError::Decode(e) => e.alert(),
            HandshakeError::Encode(_) => AlertDescription::InternalError,
            HandshakeError::Extension(e) => e.alert(),
            HandshakeError::Cookie(e) => e.alert(),
            HandshakeError::Config(_) => AlertDescription::InternalError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_alerts() {
        assert_eq!(
            ExtensionError::UnsupportedPointFormat.alert(),
            AlertDescription::IllegalParameter
        );
        assert_eq!(
            ExtensionError::NoApplicationProtocol.alert().as_byte(),
            120
        );
        assert_eq!(
            ExtensionError::EmptyItem { ext_type: 16 }.alert(),
            AlertDescription::DecodeError
        );
    }

    #[test]
    fn test_length_errors() {
        let eod = DecodeError::UnexpectedEndOfData {
            requested: 4,
            available: 1,
        };
        assert!(ExtensionError::from(eod).is_length_error());
        assert!(ExtensionError::EmptyList { ext_type: 11 }.is_length_error());

        let stale = DecodeError::StaleCheckpoint {
            taken: 0,
            current: 1,
        };
        assert!(!ExtensionError::from(stale.clone()).is_length_error());
        assert_eq!(
            ExtensionError::from(stale).alert(),
            AlertDescription::InternalError
        );
        assert!(!ExtensionError::UnsupportedPointFormat.is_length_error());
        assert!(!ExtensionError::NoApplicationProtocol.is_length_error());
    }

    #[test]
    fn test_cookie_rejections() {
        assert!(CookieError::Missing.is_cookie_rejection());
        assert!(CookieError::WrongLength(31).is_cookie_rejection());
        assert!(CookieError::UnknownVersion(7).is_cookie_rejection());
        assert!(CookieError::DigestMismatch.is_cookie_rejection());

        assert!(!CookieError::TooLarge { len: 40, max: 32 }.is_cookie_rejection());
    }

    #[test]
    fn test_handshake_error_wraps() {
        let err: HandshakeError = ExtensionError::DuplicateExtension(16).into();
        assert_eq!(err.alert(), AlertDescription::IllegalParameter);

        let err = HandshakeError::Config("zero lifetime".into());
        assert_eq!(err.alert(), AlertDescription::InternalError);
        assert_eq!(err.to_string(), "configuration error: zero lifetime");
    }
}
