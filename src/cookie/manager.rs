//! Stateless cookie issue and verification.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rand::{RngCore, rngs::OsRng};
use subtle::ConstantTimeEq;
use tracing::{debug, info};

use crate::core::{
    COOKIE_SECRET_LIFETIME, COOKIE_VERSION_SIZE, Clock, CookieError, CookieInput,
    HandshakeError, SystemClock,
};

use super::{Cookie, CookieSecret};

/// Cookie manager configuration.
#[derive(Debug, Clone)]
pub struct CookieConfig {
    /// How long a secret issues cookies before it is rotated out.
    ///
    /// Cookies remain verifiable for one more lifetime after rotation.
    pub secret_lifetime: Duration,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            secret_lifetime: COOKIE_SECRET_LIFETIME,
        }
    }
}

impl CookieConfig {
    /// Check the configuration.
    ///
    /// # Errors
    /// Returns `Config` for a zero secret lifetime.
    pub fn validate(&self) -> Result<(), HandshakeError> {
        if self.secret_lifetime.is_zero() {
            return Err(HandshakeError::Config(
                "cookie secret lifetime must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug)]
struct CookieState {
    current: Option<CookieSecret>,
    previous: Option<CookieSecret>,
    next_version: u32,
}

impl CookieState {
    fn secret_for(&self, version: u32) -> Option<&CookieSecret> {
        [self.current.as_ref(), self.previous.as_ref()]
            .into_iter()
            .flatten()
            .find(|s| s.version() == version)
    }
}

/// Issues and verifies DTLS stateless cookies.
///
/// One manager serves a whole listening endpoint and is shared across
/// connections, typically as `Arc<CookieManager>`. At most two secrets are
/// live: the current one, which issues cookies, and the one it replaced.
///
/// # Example
///
/// ```rust
/// use tls_handshake_core::cookie::CookieManager;
///
/// let manager = CookieManager::new();
/// let hello = b"canonical client hello".to_vec();
///
/// let cookie = manager.issue(&hello);
/// assert!(manager.verify(Some(cookie.as_ref()), &hello));
/// ```
#[derive(Debug)]
pub struct CookieManager<C = SystemClock> {
    clock: C,
    lifetime: Duration,
    state: Mutex<CookieState>,
}

impl CookieManager<SystemClock> {
    /// Create a manager with the default one-hour secret lifetime.
    pub fn new() -> Self {
        Self::build(CookieConfig::default(), SystemClock)
    }

    /// Create a manager with a custom configuration.
    ///
    /// # Errors
    /// Returns `Config` if the configuration is invalid.
    pub fn with_config(config: CookieConfig) -> Result<Self, HandshakeError> {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for CookieManager<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> CookieManager<C> {
    /// Create a manager reading time from `clock`.
    ///
    /// # Errors
    /// Returns `Config` if the configuration is invalid.
    pub fn with_clock(config: CookieConfig, clock: C) -> Result<Self, HandshakeError> {
        config.validate()?;
        Ok(Self::build(config, clock))
    }

    fn build(config: CookieConfig, clock: C) -> Self {
        Self {
            clock,
            lifetime: config.secret_lifetime,
            state: Mutex::new(CookieState {
                current: None,
                previous: None,
                next_version: OsRng.next_u32(),
            }),
        }
    }

    // Every critical section leaves the state consistent, so a panic in
    // another holder does not invalidate it.
    fn lock(&self) -> MutexGuard<'_, CookieState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn rotate<'s>(&self, state: &'s mut CookieState) -> &'s CookieSecret {
        let version = state.next_version;
        state.next_version = version.wrapping_add(1);
        state.previous = state.current.take();
        info!(
            version,
            previous = state.previous.as_ref().map(CookieSecret::version),
            "cookie secret rotated"
        );
        state
            .current
            .insert(CookieSecret::generate(version, self.clock.now(), self.lifetime))
    }

    /// Issue a cookie bound to `message`.
    ///
    /// Rotates the secret first if it is missing or expired.
    pub fn issue<M: CookieInput + ?Sized>(&self, message: &M) -> Cookie {
        let mut input = Vec::new();
        message.write_cookie_input(&mut input);

        let mut state = self.lock();
        let now = self.clock.now();
        if let Some(secret) = state.current.as_ref().filter(|s| !s.is_expired(now)) {
            return secret.cookie(&input);
        }
        self.rotate(&mut state).cookie(&input)
    }

    /// Check a cookie presented with `message`.
    ///
    /// # Errors
    /// - `Missing` if no cookie was presented
    /// - `WrongLength` unless the cookie is exactly 32 bytes
    /// - `UnknownVersion` if the cookie predates the previous secret or was
    ///   never issued
    /// - `DigestMismatch` if the cookie was issued for different content
    pub fn validate<M: CookieInput + ?Sized>(
        &self,
        cookie: Option<&[u8]>,
        message: &M,
    ) -> Result<(), CookieError> {
        let cookie = Cookie::from_slice(cookie.ok_or(CookieError::Missing)?)?;
        let mut input = Vec::new();
        message.write_cookie_input(&mut input);

        let state = self.lock();
        let secret = state
            .secret_for(cookie.version())
            .ok_or(CookieError::UnknownVersion(cookie.version()))?;
        let expected = secret.cookie(&input);

        if bool::from(expected.as_bytes()[COOKIE_VERSION_SIZE..].ct_eq(cookie.digest())) {
            Ok(())
        } else {
            Err(CookieError::DigestMismatch)
        }
    }

    /// Like [`Self::validate`], reporting only whether the cookie is good.
    pub fn verify<M: CookieInput + ?Sized>(&self, cookie: Option<&[u8]>, message: &M) -> bool {
        match self.validate(cookie, message) {
            Ok(()) => true,
            Err(e) => {
                debug!(reason = %e, "cookie rejected");
                false
            }
        }
    }

    /// Rotate immediately, regardless of expiry.
    ///
    /// Cookies issued under the current secret stay valid until the next
    /// rotation; anything older is dropped.
    pub fn rotate_now(&self) {
        let mut state = self.lock();
        self.rotate(&mut state);
    }

    /// Version of the secret currently issuing cookies.
    pub fn current_version(&self) -> Option<u32> {
        self.lock().current.as_ref().map(CookieSecret::version)
    }

    /// Configured secret lifetime.
    pub fn secret_lifetime(&self) -> Duration {
        self.lifetime
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::SystemTime;

    /// Clock advanced by hand.
    #[derive(Debug, Default)]
    struct ManualClock {
        secs: AtomicU64,
    }

    impl ManualClock {
        fn advance(&self, by: Duration) {
            self.secs.fetch_add(by.as_secs(), Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> SystemTime {
            SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000 + self.secs.load(Ordering::SeqCst))
        }
    }

    const HOUR: Duration = Duration::from_secs(3600);

    fn manager() -> (CookieManager<Arc<ManualClock>>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let manager = CookieManager::with_clock(CookieConfig::default(), clock.clone()).unwrap();
        (manager, clock)
    }

    #[test]
    fn test_issue_then_verify() {
        let (manager, _) = manager();
        let hello = b"client hello".to_vec();

        let cookie = manager.issue(&hello);
        assert!(manager.verify(Some(cookie.as_ref()), &hello));
        assert_eq!(manager.current_version(), Some(cookie.version()));
    }

    #[test]
    fn test_single_byte_mutation_rejected() {
        let (manager, _) = manager();
        let hello = b"client hello".to_vec();
        let cookie = manager.issue(&hello);

        let mut other = hello.clone();
        other[3] ^= 0x01;
        assert_eq!(
            manager.validate(Some(cookie.as_ref()), &other),
            Err(CookieError::DigestMismatch)
        );

        let mut forged = *cookie.as_bytes();
        forged[31] ^= 0x80;
        assert!(!manager.verify(Some(forged.as_slice()), &hello));
    }

    #[test]
    fn test_rotation_window() {
        let (manager, clock) = manager();
        let hello = b"client hello".to_vec();
        let old = manager.issue(&hello);

        // First rotation: the old cookie is covered by the previous secret
        clock.advance(HOUR);
        let fresh = manager.issue(&hello);
        assert_ne!(fresh.version(), old.version());
        assert_eq!(fresh.version(), old.version().wrapping_add(1));
        assert!(manager.verify(Some(old.as_ref()), &hello));
        assert!(manager.verify(Some(fresh.as_ref()), &hello));

        // Second rotation: the old secret is gone
        clock.advance(HOUR);
        manager.issue(&hello);
        assert_eq!(
            manager.validate(Some(old.as_ref()), &hello),
            Err(CookieError::UnknownVersion(old.version()))
        );
        assert!(manager.verify(Some(fresh.as_ref()), &hello));
    }

    #[test]
    fn test_no_rotation_before_expiry() {
        let (manager, clock) = manager();
        let first = manager.issue(b"a".as_slice());
        clock.advance(HOUR - Duration::from_secs(1));
        let second = manager.issue(b"a".as_slice());
        assert_eq!(first, second);
    }

    #[test]
    fn test_rotate_now() {
        let (manager, _) = manager();
        let hello = b"hello".to_vec();
        let old = manager.issue(&hello);

        manager.rotate_now();
        assert!(manager.verify(Some(old.as_ref()), &hello));
        manager.rotate_now();
        assert!(!manager.verify(Some(old.as_ref()), &hello));
    }

    #[test]
    fn test_structural_rejections() {
        let (manager, _) = manager();
        let hello = b"hello".to_vec();
        let cookie = manager.issue(&hello);

        assert_eq!(manager.validate(None, &hello), Err(CookieError::Missing));
        assert_eq!(
            manager.validate(Some(&cookie.as_bytes()[..31]), &hello),
            Err(CookieError::WrongLength(31))
        );
        assert_eq!(
            manager.validate(Some(&[][..]), &hello),
            Err(CookieError::WrongLength(0))
        );

        let mut unknown = *cookie.as_bytes();
        unknown[..4].copy_from_slice(&cookie.version().wrapping_add(7).to_be_bytes());
        assert!(matches!(
            manager.validate(Some(unknown.as_slice()), &hello),
            Err(CookieError::UnknownVersion(_))
        ));
    }

    #[test]
    fn test_verify_before_any_issue() {
        let (manager, _) = manager();
        assert!(!manager.verify(Some(&[0u8; 32][..]), b"x".as_slice()));
        assert_eq!(manager.current_version(), None);
    }

    #[test]
    fn test_zero_lifetime_rejected() {
        let config = CookieConfig {
            secret_lifetime: Duration::ZERO,
        };
        assert!(matches!(
            CookieManager::with_config(config),
            Err(HandshakeError::Config(_))
        ));
        assert_eq!(CookieManager::new().secret_lifetime(), COOKIE_SECRET_LIFETIME);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_shared_across_tasks() {
        let (manager, clock) = manager();
        let manager = Arc::new(manager);

        let mut handles = Vec::new();
        for i in 0..16u8 {
            let manager = manager.clone();
            let clock = clock.clone();
            handles.push(tokio::spawn(async move {
                let hello = vec![i; 48];
                for round in 0..50 {
                    let cookie = manager.issue(&hello);
                    assert!(manager.verify(Some(cookie.as_ref()), &hello));
                    if i == 0 && round % 10 == 0 {
                        clock.advance(Duration::from_secs(1));
                    }
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert!(manager.current_version().is_some());
    }
}
