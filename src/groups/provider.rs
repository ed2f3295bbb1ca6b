//! Key exchange provider registration.
//!
//! Providers are registered explicitly at startup and queried by name or by
//! the group they can serve. Nothing is discovered at runtime.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::NamedGroup;
use crate::core::HandshakeError;

/// A key exchange implementation for one or more named groups.
pub trait KeyExchangeProvider: Send + Sync {
    /// Unique provider name.
    fn name(&self) -> &str;

    /// Check if the provider can run key exchange over `group`.
    fn supports(&self, group: &NamedGroup) -> bool;
}

/// Ordered set of registered providers.
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn KeyExchangeProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider. Earlier registrations win when several
    /// providers support the same group.
    ///
    /// # Errors
    /// Returns `Config` if a provider with the same name is already registered.
    pub fn register(&mut self, provider: Arc<dyn KeyExchangeProvider>) -> Result<(), HandshakeError> {
        if self.by_name(provider.name()).is_some() {
            return Err(HandshakeError::Config(format!(
                "key exchange provider {:?} already registered",
                provider.name()
            )));
        }
        debug!(provider = provider.name(), "key exchange provider registered");
        self.providers.push(provider);
        Ok(())
    }

    /// Find a provider by name.
    pub fn by_name(&self, name: &str) -> Option<Arc<dyn KeyExchangeProvider>> {
        self.providers.iter().find(|p| p.name() == name).cloned()
    }

    /// Find the first provider supporting `group`.
    pub fn for_group(&self, group: &NamedGroup) -> Option<Arc<dyn KeyExchangeProvider>> {
        self.providers.iter().find(|p| p.supports(group)).cloned()
    }

    /// Number of registered providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Check if no provider is registered.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.providers.iter().map(|p| p.name()))
            .finish()
    }
}
