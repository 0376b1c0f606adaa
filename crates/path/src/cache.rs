//! A small thread-safe cache with insertion-order eviction.

use indexmap::IndexMap;
use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub len: usize,
}

/// Bounded map guarded by an `RwLock`. Locks are held only for the map
/// operation itself; callers compute values outside the lock.
///
/// A capacity of `0` disables caching. A poisoned lock is recovered, since a
/// panic mid-insert cannot leave the map torn.
///
/// Every [`clear`](Self::clear) starts a new generation. A value computed
/// during an older generation is returned to its caller but not stored.
pub struct BoundedCache<K, V> {
    capacity: usize,
    entries: RwLock<IndexMap<K, V>>,
    /// Only changed while the write lock is held.
    generation: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K, V> std::fmt::Debug for BoundedCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedCache")
            .field("capacity", &self.capacity)
            .field("len", &self.read().len())
            .finish()
    }
}

impl<K, V> BoundedCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: RwLock::new(IndexMap::new()),
            generation: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut entries = self.write();
        entries.clear();
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            len: self.len(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, IndexMap<K, V>> {
        self.entries.read().unwrap_or_else(|poisoned| {
            log::warn!("Recovering poisoned cache lock");
            poisoned.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexMap<K, V>> {
        self.entries.write().unwrap_or_else(|poisoned| {
            log::warn!("Recovering poisoned cache lock");
            poisoned.into_inner()
        })
    }
}

impl<K: Hash + Eq, V: Clone> BoundedCache<K, V> {
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.capacity == 0 {
            return None;
        }
        let found = self.read().get(key).cloned();
        let counter = if found.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Stores `value` unless another thread stored one first; returns the
    /// value that ends up cached.
    pub fn insert(&self, key: K, value: V) -> V {
        self.insert_in_generation(key, value, None)
    }

    /// Like [`Self::insert`], but skips the store when the cache was cleared
    /// since `generation` was read.
    fn insert_in_generation(&self, key: K, value: V, generation: Option<u64>) -> V {
        if self.capacity == 0 {
            return value;
        }
        let mut entries = self.write();
        if generation.is_some_and(|g| g != self.generation.load(Ordering::SeqCst)) {
            log::trace!("Cache cleared during lookup; not storing the result");
            return value;
        }
        if let Some(existing) = entries.get(&key) {
            return existing.clone();
        }
        while entries.len() >= self.capacity {
            entries.shift_remove_index(0);
        }
        entries.insert(key, value.clone());
        value
    }

    /// Looks `key` up, computing and caching it on a miss. `compute` runs
    /// without the lock held.
    pub fn get_or_insert_with<Q>(&self, key: &Q, compute: impl FnOnce() -> V) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        let generation = self.generation();
        if let Some(value) = self.get(key) {
            return value;
        }
        let value = compute();
        self.insert_in_generation(key.to_owned(), value, Some(generation))
    }

    /// Like [`Self::get_or_insert_with`], but failures are not cached.
    pub fn try_get_or_insert_with<Q, E>(
        &self,
        key: &Q,
        compute: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        let generation = self.generation();
        if let Some(value) = self.get(key) {
            return Ok(value);
        }
        let value = compute()?;
        Ok(self.insert_in_generation(key.to_owned(), value, Some(generation)))
    }
}
