//! # tls-handshake-core
//!
//! Building blocks for the TLS and DTLS handshake layer:
//!
//! - **Reassembly**: linearize handshake bytes delivered in arbitrary record
//!   fragments and read them with bounds-checked big-endian readers
//! - **Extensions**: encode and decode hello extensions (ALPN, EC point
//!   formats, supported groups), passing unknown types through untouched
//! - **Named groups**: the static catalog of ECDHE and FFDHE groups
//! - **Cookies**: stateless DTLS cookies with rotating secrets
//!
//! The handshake state machine, record protection and sockets live outside
//! this crate.
//!
//! ## Feature Flags
//!
//! - `extensions` (default): Hello extension codecs
//! - `cookie` (default): Stateless DTLS cookie manager (SHA-256, OS randomness)
//!
//! ## Modules
//!
//! - [`core`]: Constants, error types, and traits (always included)
//! - [`buffer`]: Reassembly buffer and writer (always included)
//! - [`groups`]: Named group registry (always included)
//! - [`extensions`]: Hello extensions (requires `extensions` feature)
//! - [`cookie`]: DTLS cookies (requires `cookie` feature)
//!
//! ## Example Usage
//!
//! ```rust
//! use tls_handshake_core::prelude::*;
//!
//! // Fragments arrive one record at a time
//! let mut buf = HandshakeBuffer::new();
//! buf.append(&[0x00, 0x0b, 0x00]);
//! buf.append(&[0x02, 0x01, 0x00]);
//!
//! let ext_type = ExtensionType(buf.read_u16()?);
//! let len = buf.read_u16()? as usize;
//! let ext = HelloExtension::decode(ext_type, &mut buf, len)?;
//!
//! assert_eq!(ext, HelloExtension::PointFormats(SupportedPointFormats::uncompressed_only()));
//! # Ok::<(), ExtensionError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Core module (always included)
pub mod core;

// Reassembly buffer and writer
pub mod buffer;

// Named groups
pub mod groups;

// Hello extensions (feature-gated)
#[cfg(feature = "extensions")]
#[cfg_attr(docsrs, doc(cfg(feature = "extensions")))]
pub mod extensions;

// DTLS cookies (feature-gated)
#[cfg(feature = "cookie")]
#[cfg_attr(docsrs, doc(cfg(feature = "cookie")))]
pub mod cookie;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::buffer::{Checkpoint, HandshakeBuffer, HandshakeWriter};
    pub use crate::core::*;
    pub use crate::groups::{GroupCategory, NamedGroup, NamedGroupRegistry};

    #[cfg(feature = "extensions")]
    pub use crate::extensions::{
        ApplicationProtocols, DecodeExtension, ExtensionCodec, ExtensionType, HelloExtension,
        HelloExtensions, SupportedGroups, SupportedPointFormats, UnknownExtension,
        decode_extensions, encode_extensions, read_extensions,
    };

    #[cfg(feature = "cookie")]
    pub use crate::cookie::{
        Cookie, CookieConfig, CookieManager, DtlsVersion, HelloCookieInput, HelloVerifyRequest,
    };
}

// Re-export commonly used items at crate root
pub use buffer::{HandshakeBuffer, HandshakeWriter};
pub use crate::core::{AlertDescription, CookieError, DecodeError, ExtensionError, HandshakeError};
pub use groups::{NamedGroup, NamedGroupRegistry};

#[cfg(feature = "extensions")]
pub use extensions::{HelloExtension, HelloExtensions};

#[cfg(feature = "cookie")]
pub use cookie::{Cookie, CookieManager};
