//! Stateless DTLS cookies.
//!
//! A DTLS server answers an initial ClientHello with a HelloVerifyRequest
//! carrying a cookie, and commits no per-connection state until the client
//! echoes it. The cookie is derived from a rotating server secret and the
//! hello's content, so the server only has to remember two secrets.
//!
//! ## Flow
//!
//! ```text
//! Client                                   Server
//!   ClientHello (no cookie)       -->
//!                                 <--  HelloVerifyRequest(cookie = issue(hello))
//!   ClientHello (cookie)          -->      verify(cookie, hello)
//! ```
//!
//! ## Rotation
//!
//! Secrets are rotated lazily: the first `issue` after the current secret
//! expires generates a new one and demotes the old one to "previous".
//! Cookies issued under either secret verify; older ones do not.

mod hello;
mod manager;
mod secret;

pub use hello::*;
pub use manager::*;
pub use secret::Cookie;

pub(crate) use secret::CookieSecret;
