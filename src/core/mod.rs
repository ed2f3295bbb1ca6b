//! Core constants, error types, and traits for the handshake layer.
//!
//! This module has no crypto dependencies and is always included.

mod constants;
mod error;
mod traits;

pub use constants::*;
pub use error::*;
pub use traits::*;
