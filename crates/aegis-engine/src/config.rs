//! Engine configuration

use std::time::Duration;

/// Configuration for [`AccessControlEngine`](crate::AccessControlEngine)
///
/// The storage backend is injected separately as a
/// [`GrantStore`](aegis_store::GrantStore) implementation.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How long a cached resolution stays valid
    pub cache_ttl: Duration,
    /// Grantor recorded on assignments that do not name one
    pub default_granted_by: Option<String>,
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With cache TTL
    #[inline]
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// With default grantor
    #[inline]
    #[must_use]
    pub fn with_default_granted_by(mut self, grantor: impl Into<String>) -> Self {
        self.default_granted_by = Some(grantor.into());
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(300),
            default_granted_by: None,
        }
    }
}
