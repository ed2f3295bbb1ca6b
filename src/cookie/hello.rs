//! DTLS hello messages as they relate to cookies.
//!
//! HelloVerifyRequest (RFC 6347 §4.2.1):
//! ```text
//! struct {
//!     ProtocolVersion server_version;
//!     opaque cookie<0..2^8-1>;
//! } HelloVerifyRequest;
//! ```

use crate::buffer::{HandshakeBuffer, HandshakeWriter};
use crate::core::{
    CookieError, CookieInput, DTLS10_VERSION, DTLS12_VERSION, EncodeError, MAX_CIPHER_SUITES,
    MAX_COMPRESSION_METHODS, MAX_COOKIE_LENGTH_DTLS10, MAX_COOKIE_LENGTH_DTLS12,
    MAX_SESSION_ID_LENGTH,
};

/// DTLS protocol version, as far as cookie limits are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DtlsVersion {
    /// DTLS 1.0 (RFC 4347): cookies up to 32 bytes.
    Dtls10,
    /// DTLS 1.2 (RFC 6347): cookies up to 255 bytes.
    Dtls12,
}

impl DtlsVersion {
    /// Wire encoding.
    pub fn wire(self) -> u16 {
        match self {
            DtlsVersion::Dtls10 => DTLS10_VERSION,
            DtlsVersion::Dtls12 => DTLS12_VERSION,
        }
    }

    /// Parse a wire version.
    pub fn from_wire(version: u16) -> Option<Self> {
        match version {
            DTLS10_VERSION => Some(DtlsVersion::Dtls10),
            DTLS12_VERSION => Some(DtlsVersion::Dtls12),
            _ => None,
        }
    }

    /// Largest cookie a peer may send under this version.
    pub fn max_cookie_length(self) -> usize {
        match self {
            DtlsVersion::Dtls10 => MAX_COOKIE_LENGTH_DTLS10,
            DtlsVersion::Dtls12 => MAX_COOKIE_LENGTH_DTLS12,
        }
    }
}

/// Client side: check the structure of a cookie offered by the server.
///
/// # Errors
/// Returns `TooLarge` if the cookie exceeds the version's ceiling. The
/// cookie is never truncated.
pub fn check_offered_cookie(version: DtlsVersion, cookie: &[u8]) -> Result<(), CookieError> {
    let max = version.max_cookie_length();
    if cookie.len() > max {
        return Err(CookieError::TooLarge {
            len: cookie.len(),
            max,
        });
    }
    Ok(())
}

/// The ClientHello fields a cookie is bound to.
///
/// The cookie field itself and the extensions are left out, so the retried
/// hello (which carries the cookie) binds to the same bytes as the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelloCookieInput<'a> {
    client_version: u16,
    random: &'a [u8; 32],
    session_id: &'a [u8],
    cipher_suites: &'a [u16],
    compression_methods: &'a [u8],
}

impl<'a> HelloCookieInput<'a> {
    /// Bind to the fields of a ClientHello.
    ///
    /// # Errors
    /// Returns `HelloFieldTooLong` if the session id exceeds 32 bytes or a
    /// list does not fit its length prefix.
    pub fn new(
        client_version: u16,
        random: &'a [u8; 32],
        session_id: &'a [u8],
        cipher_suites: &'a [u16],
        compression_methods: &'a [u8],
    ) -> Result<Self, CookieError> {
        check_field("session_id", session_id.len(), MAX_SESSION_ID_LENGTH)?;
        check_field("cipher_suites", cipher_suites.len(), MAX_CIPHER_SUITES)?;
        check_field(
            "compression_methods",
            compression_methods.len(),
            MAX_COMPRESSION_METHODS,
        )?;
        Ok(Self {
            client_version,
            random,
            session_id,
            cipher_suites,
            compression_methods,
        })
    }

    /// `client_version` from the hello.
    pub fn client_version(&self) -> u16 {
        self.client_version
    }

    /// Session id.
    pub fn session_id(&self) -> &'a [u8] {
        self.session_id
    }
}

fn check_field(field: &'static str, len: usize, max: usize) -> Result<(), CookieError> {
    if len > max {
        return Err(CookieError::HelloFieldTooLong { field, len, max });
    }
    Ok(())
}

// Lengths were bounded in `new`, so the prefix casts are lossless.
impl CookieInput for HelloCookieInput<'_> {
    fn write_cookie_input(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.client_version.to_be_bytes());
        out.extend_from_slice(self.random);
        out.push(self.session_id.len() as u8);
        out.extend_from_slice(self.session_id);
        out.extend_from_slice(&((2 * self.cipher_suites.len()) as u16).to_be_bytes());
        for suite in self.cipher_suites {
            out.extend_from_slice(&suite.to_be_bytes());
        }
        out.push(self.compression_methods.len() as u8);
        out.extend_from_slice(self.compression_methods);
    }
}

/// Server reply asking the client to retry with a cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelloVerifyRequest {
    server_version: u16,
    cookie: Vec<u8>,
}

impl HelloVerifyRequest {
    /// Build a request carrying `cookie`.
    ///
    /// # Errors
    /// Returns `TooLarge` if the cookie exceeds `version`'s ceiling.
    pub fn new(version: DtlsVersion, cookie: impl AsRef<[u8]>) -> Result<Self, CookieError> {
        let cookie = cookie.as_ref();
        check_offered_cookie(version, cookie)?;
        Ok(Self {
            server_version: version.wire(),
            cookie: cookie.to_vec(),
        })
    }

    /// `server_version` field.
    pub fn server_version(&self) -> u16 {
        self.server_version
    }

    /// Cookie the client must echo.
    pub fn cookie(&self) -> &[u8] {
        &self.cookie
    }

    /// Encoded body length.
    pub fn wire_size(&self) -> usize {
        2 + 1 + self.cookie.len()
    }

    /// Write the message body.
    pub fn encode(&self, w: &mut HandshakeWriter) -> Result<(), EncodeError> {
        w.put_u16(self.server_version);
        w.put_vector8(&self.cookie)
    }

    /// Read a message body as the client.
    ///
    /// The cookie ceiling is that of `version`, the version the client is
    /// speaking. On error the cursor is left where it started.
    pub fn decode(buf: &mut HandshakeBuffer, version: DtlsVersion) -> Result<Self, CookieError> {
        buf.with_rollback(|b| Self::decode_body(b, version))
    }

    fn decode_body(buf: &mut HandshakeBuffer, version: DtlsVersion) -> Result<Self, CookieError> {
        let server_version = buf.read_u16()?;
        let cookie = buf.read_vector8()?;
        check_offered_cookie(version, cookie)?;
        Ok(Self {
            server_version,
            cookie: cookie.to_vec(),
        })
    }
}
