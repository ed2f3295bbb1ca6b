//! Core traits for the handshake layer.
//!
//! These traits are the seams through which the external handshake layer
//! supplies time and message content.

use std::time::SystemTime;

/// Wall-clock time source.
///
/// The cookie manager compares secret expiry against this clock. Tests and
/// simulations inject their own implementation to drive rotation.
pub trait Clock: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> SystemTime;
}

/// The operating system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> SystemTime {
        (**self).now()
    }
}

/// A message that can be bound to a stateless cookie.
///
/// # Requirements
///
/// - The encoding MUST be deterministic: the same message always yields
///   the same bytes.
/// - The encoding MUST exclude the cookie field itself, otherwise the
///   retried message would never match the one the cookie was issued for.
///
/// # Example
///
/// ```ignore
/// struct Hello { random: [u8; 32], suites: Vec<u16> }
///
/// impl CookieInput for Hello {
///     fn write_cookie_input(&self, out: &mut Vec<u8>) {
///         out.extend_from_slice(&self.random);
///         for s in &self.suites {
///             out.extend_from_slice(&s.to_be_bytes());
///         }
///     }
/// }
/// ```
pub trait CookieInput {
    /// Append the canonical cookie encoding of this message to `out`.
    fn write_cookie_input(&self, out: &mut Vec<u8>);
}

impl CookieInput for [u8] {
    fn write_cookie_input(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self);
    }
}

impl CookieInput for Vec<u8> {
    fn write_cookie_input(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self);
    }
}

impl<T: CookieInput + ?Sized> CookieInput for &T {
    fn write_cookie_input(&self, out: &mut Vec<u8>) {
        (**self).write_cookie_input(out);
    }
}
