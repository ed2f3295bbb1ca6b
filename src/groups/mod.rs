//! Named groups for key exchange negotiation.
//!
//! | Range           | Category | Source    |
//! |-----------------|----------|-----------|
//! | `0x0001-0x0019` | ECDHE    | RFC 4492  |
//! | `0x001A-0x001C` | ECDHE    | RFC 7027  |
//! | `0x001D-0x001E` | ECDHE    | RFC 7748  |
//! | `0x0100-0x0104` | FFDHE    | RFC 7919  |
//!
//! The [`NamedGroupRegistry`] is a read-only view over the static table and
//! is shared by every connection. [`ProviderRegistry`] maps groups to the
//! key exchange implementations registered at startup.

mod named_group;
mod provider;
mod registry;

pub use named_group::*;
pub use provider::*;
pub use registry::*;
