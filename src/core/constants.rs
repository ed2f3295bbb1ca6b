//! Protocol constants for the handshake layer.
//!
//! These values are fixed by the TLS/DTLS wire formats and MUST NOT be changed.

use std::time::Duration;

// =============================================================================
// HANDSHAKE FRAMING (RFC 5246 §7.4, RFC 6347 §4.2.2)
// =============================================================================

/// TLS handshake header size (type + 24-bit length).
pub const TLS_HANDSHAKE_HEADER_SIZE: usize = 4;

/// DTLS handshake header size (type + length + message_seq + fragment offset/length).
pub const DTLS_HANDSHAKE_HEADER_SIZE: usize = 12;

/// Largest value representable by a 24-bit length prefix.
pub const MAX_U24: usize = 0x00FF_FFFF;

// =============================================================================
// EXTENSIONS (RFC 5246 §7.4.1.4)
// =============================================================================

/// Extension header size (type + length).
pub const EXTENSION_HEADER_SIZE: usize = 4;

/// Largest extension body or extension list (16-bit length).
pub const MAX_EXTENSION_LENGTH: usize = u16::MAX as usize;

/// Largest single protocol name in an ALPN list (8-bit length prefix).
pub const MAX_PROTOCOL_NAME_LENGTH: usize = u8::MAX as usize;

/// Largest point-format list (8-bit length prefix).
pub const MAX_POINT_FORMATS_LENGTH: usize = u8::MAX as usize;

// =============================================================================
// EC POINT FORMATS (RFC 4492 §5.1.2)
// =============================================================================

/// Uncompressed point format. Every peer MUST support it.
pub const POINT_FORMAT_UNCOMPRESSED: u8 = 0;

/// ANSI X9.62 compressed, prime curves.
pub const POINT_FORMAT_ANSIX962_COMPRESSED_PRIME: u8 = 1;

/// ANSI X9.62 compressed, characteristic-2 curves.
pub const POINT_FORMAT_ANSIX962_COMPRESSED_CHAR2: u8 = 2;

// =============================================================================
// STATELESS COOKIES (RFC 6347 §4.2.1)
// =============================================================================

/// Size of a cookie issued by the cookie manager.
pub const COOKIE_SIZE: usize = 32;

/// Leading bytes of a cookie carrying the secret version (BE32).
pub const COOKIE_VERSION_SIZE: usize = 4;

/// Trailing digest bytes kept in a cookie.
pub const COOKIE_DIGEST_SIZE: usize = COOKIE_SIZE - COOKIE_VERSION_SIZE;

/// SHA-256 output size.
pub const HASH_SIZE: usize = 32;

/// Cookie secret key size.
pub const COOKIE_SECRET_SIZE: usize = 32;

/// Default lifetime of a cookie secret before rotation.
pub const COOKIE_SECRET_LIFETIME: Duration = Duration::from_secs(3600);

/// Largest cookie a DTLS 1.0 HelloVerifyRequest may carry.
pub const MAX_COOKIE_LENGTH_DTLS10: usize = 32;

/// Largest cookie a DTLS 1.2 HelloVerifyRequest may carry.
pub const MAX_COOKIE_LENGTH_DTLS12: usize = 255;

/// Longest ClientHello session id.
pub const MAX_SESSION_ID_LENGTH: usize = 32;

/// Most cipher suites a ClientHello can carry (`CipherSuite<2..2^16-2>`).
pub const MAX_CIPHER_SUITES: usize = (u16::MAX as usize - 1) / 2;

/// Most compression methods a ClientHello can carry.
pub const MAX_COMPRESSION_METHODS: usize = u8::MAX as usize;

// =============================================================================
// PROTOCOL VERSIONS
// =============================================================================

/// DTLS 1.0 wire version.
pub const DTLS10_VERSION: u16 = 0xFEFF;

/// DTLS 1.2 wire version.
pub const DTLS12_VERSION: u16 = 0xFEFD;
