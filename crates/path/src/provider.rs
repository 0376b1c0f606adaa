//! Pluggable member path resolution with a caching front.

use crate::cache::{BoundedCache, CacheStats};
use crate::error::PathError;
use crate::path::MemberPath;
use std::sync::{Arc, RwLock};

/// Turns raw path text into a [`MemberPath`]. Returns `None` to let the next
/// provider try.
pub trait MemberPathProvider: Send + Sync {
    fn try_get_member_path(&self, path: &str) -> Option<Arc<MemberPath>>;

    fn name(&self) -> &'static str {
        "member-path-provider"
    }
}

/// Parses every path with the built-in segment grammar.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultMemberPathProvider;

impl MemberPathProvider for DefaultMemberPathProvider {
    fn try_get_member_path(&self, path: &str) -> Option<Arc<MemberPath>> {
        Some(MemberPath::parse(path))
    }

    fn name(&self) -> &'static str {
        "default"
    }
}

/// Asks its providers in order and memoizes the first answer by raw text.
pub struct CachingMemberPathProvider {
    providers: RwLock<Vec<Arc<dyn MemberPathProvider>>>,
    cache: BoundedCache<String, Arc<MemberPath>>,
}

impl std::fmt::Debug for CachingMemberPathProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachingMemberPathProvider")
            .field("providers", &self.provider_names())
            .field("cache", &self.cache)
            .finish()
    }
}

impl CachingMemberPathProvider {
    /// A cache in front of [`DefaultMemberPathProvider`].
    pub fn new(capacity: usize) -> Self {
        Self::with_providers(vec![Arc::new(DefaultMemberPathProvider)], capacity)
    }

    pub fn with_providers(providers: Vec<Arc<dyn MemberPathProvider>>, capacity: usize) -> Self {
        Self {
            providers: RwLock::new(providers),
            cache: BoundedCache::new(capacity),
        }
    }

    /// Registers `provider` ahead of the existing ones and drops every cached path.
    pub fn add_provider(&self, provider: Arc<dyn MemberPathProvider>) {
        log::debug!("Adding member path provider '{}'", provider.name());
        {
            let mut providers = self.providers.write().unwrap_or_else(|poisoned| {
                log::warn!("Recovering poisoned member path provider lock");
                poisoned.into_inner()
            });
            providers.insert(0, provider);
        }
        self.invalidate();
    }

    pub fn invalidate(&self) {
        log::debug!("Invalidating member path cache ({} entries)", self.cache.len());
        self.cache.clear();
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.snapshot().iter().map(|p| p.name()).collect()
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn get_member_path(&self, path: &str) -> Result<Arc<MemberPath>, PathError> {
        self.cache
            .try_get_or_insert_with(path, || self.resolve_uncached(path))
    }

    fn resolve_uncached(&self, path: &str) -> Result<Arc<MemberPath>, PathError> {
        self.snapshot()
            .iter()
            .find_map(|provider| provider.try_get_member_path(path))
            .ok_or_else(|| PathError::unresolved(path))
    }

    /// Clones the provider list so resolution runs without the lock held.
    fn snapshot(&self) -> Vec<Arc<dyn MemberPathProvider>> {
        self.providers
            .read()
            .map(|providers| providers.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl MemberPathProvider for CachingMemberPathProvider {
    fn try_get_member_path(&self, path: &str) -> Option<Arc<MemberPath>> {
        self.get_member_path(path).ok()
    }

    fn name(&self) -> &'static str {
        "caching"
    }
}
