//! Handshake byte buffers.
//!
//! - [`HandshakeBuffer`]: reassembles transport chunks and reads them back
//!   through bounds-checked big-endian readers
//! - [`HandshakeWriter`]: produces big-endian encodings with checked
//!   length prefixes

mod reader;
mod writer;

pub use reader::*;
pub use writer::*;
