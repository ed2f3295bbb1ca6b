//! Hello extensions.
//!
//! | ID     | Module             | Extension                                 |
//! |--------|--------------------|-------------------------------------------|
//! | 0x000A | `supported_groups` | Named groups the sender can use           |
//! | 0x000B | `point_formats`    | EC point formats (uncompressed required)  |
//! | 0x0010 | `alpn`             | Application-Layer Protocol Negotiation    |
//!
//! Every other type id decodes to [`UnknownExtension`] and re-encodes
//! byte-for-byte. Unknown types are not an error at this layer.
//!
//! ## Block encoding
//!
//! A hello message ends with an optional 16-bit length-prefixed list of
//! extensions. See [`encode_extensions`], [`decode_extensions`] and
//! [`read_extensions`].

mod alpn;
mod block;
mod codec;
mod point_formats;
mod supported_groups;
mod types;

pub use alpn::*;
pub use block::*;
pub use codec::{
    DecodeExtension, ExtensionCodec, UnknownExtension, extension_wire_size, write_extension,
};
pub use point_formats::*;
pub use supported_groups::*;
pub use types::*;
