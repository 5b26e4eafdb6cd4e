//! SharedLruCache: mutex-guarded LRU cache handle for multi-threaded callers

use std::borrow::Borrow;
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;

use ahash::RandomState;
use parking_lot::{Mutex, MutexGuard};

use crate::config::CacheConfig;
use crate::error::Result;
use crate::lru::LruCache;
use crate::stats::CacheStats;

/// Cloneable handle serializing every call on one [`LruCache`]
///
/// Every operation takes the same exclusive lock, reads included, since a
/// `get` reorders the recency list.
pub struct SharedLruCache<K, V, S = RandomState> {
    inner: Arc<Mutex<LruCache<K, V, S>>>,
}

impl<K, V> SharedLruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new shared cache holding at most `capacity` entries
    ///
    /// # Returns
    /// * `Result<SharedLruCache>` - `Error::InvalidSize` if `capacity` is zero
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self::from(LruCache::new(capacity)?))
    }

    /// Create a new shared cache from a [`CacheConfig`]
    pub fn with_config(config: CacheConfig) -> Result<Self> {
        Ok(Self::from(LruCache::with_config(config)?))
    }
}

impl<K, V, S> SharedLruCache<K, V, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher,
{
    /// Get a clone of a value, marking it most recently used
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Insert a key-value pair, evicting the least recently used entry if full
    pub fn put(&self, key: K, value: V) {
        self.inner.lock().put(key, value);
    }

    /// Check whether a key is present without changing its recency
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().contains_key(key)
    }

    /// Remove a key, returning its value if it was present
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().remove(key)
    }
}

impl<K, V, S> SharedLruCache<K, V, S> {
    /// Lock the cache for a multi-step critical section
    pub fn lock(&self) -> MutexGuard<'_, LruCache<K, V, S>> {
        self.inner.lock()
    }

    /// Get current cache size
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Get a copy of the cache statistics
    pub fn stats(&self) -> CacheStats {
        *self.inner.lock().stats()
    }

    /// Clear the cache and its statistics
    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl<K, V, S> Clone for SharedLruCache<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V, S> From<LruCache<K, V, S>> for SharedLruCache<K, V, S> {
    fn from(cache: LruCache<K, V, S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }
}
