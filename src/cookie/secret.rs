//! Cookie secrets and the cookie value.

use std::fmt;
use std::time::{Duration, SystemTime};

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::core::{
    COOKIE_DIGEST_SIZE, COOKIE_SECRET_SIZE, COOKIE_SIZE, COOKIE_VERSION_SIZE, CookieError,
    HASH_SIZE,
};

/// A 32-byte stateless cookie.
///
/// ```text
/// +0   Secret version (4 bytes BE32)
/// +4   SHA-256(secret || message)[4..32]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cookie([u8; COOKIE_SIZE]);

impl Cookie {
    /// Parse a cookie received from a peer.
    ///
    /// # Errors
    /// Returns `WrongLength` unless `bytes` is exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CookieError> {
        let raw: [u8; COOKIE_SIZE] = bytes
            .try_into()
            .map_err(|_| CookieError::WrongLength(bytes.len()))?;
        Ok(Self(raw))
    }

    /// Secret version embedded in the first four bytes.
    pub fn version(&self) -> u32 {
        let mut v = [0u8; COOKIE_VERSION_SIZE];
        v.copy_from_slice(&self.0[..COOKIE_VERSION_SIZE]);
        u32::from_be_bytes(v)
    }

    /// Digest tail bound to the message.
    pub fn digest(&self) -> &[u8] {
        &self.0[COOKIE_VERSION_SIZE..]
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; COOKIE_SIZE] {
        &self.0
    }
}

impl AsRef<[u8]> for Cookie {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// One generation of cookie key material.
///
/// The key is zeroized on drop.
pub(crate) struct CookieSecret {
    version: u32,
    key: [u8; COOKIE_SECRET_SIZE],
    /// `None` if `now + lifetime` is not representable.
    expiry: Option<SystemTime>,
}

impl CookieSecret {
    /// Generate a fresh random secret.
    pub(crate) fn generate(version: u32, now: SystemTime, lifetime: Duration) -> Self {
        let mut key = [0u8; COOKIE_SECRET_SIZE];
        OsRng.fill_bytes(&mut key);
        Self {
            version,
            key,
            expiry: now.checked_add(lifetime),
        }
    }

    pub(crate) fn version(&self) -> u32 {
        self.version
    }

    pub(crate) fn is_expired(&self, now: SystemTime) -> bool {
        self.expiry.is_some_and(|expiry| now >= expiry)
    }

    fn digest(&self, message: &[u8]) -> [u8; HASH_SIZE] {
        let mut hasher = Sha256::new();
        hasher.update(&self.key);
        hasher.update(message);
        hasher.finalize().into()
    }

    /// Compute the cookie this secret issues for `message`.
    pub(crate) fn cookie(&self, message: &[u8]) -> Cookie {
        let digest = self.digest(message);
        let mut out = [0u8; COOKIE_SIZE];
        out[..COOKIE_VERSION_SIZE].copy_from_slice(&self.version.to_be_bytes());
        out[COOKIE_VERSION_SIZE..].copy_from_slice(&digest[HASH_SIZE - COOKIE_DIGEST_SIZE..]);
        Cookie(out)
    }
}

impl Drop for CookieSecret {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl fmt::Debug for CookieSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CookieSecret")
            .field("version", &self.version)
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}
