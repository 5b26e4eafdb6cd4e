//! LRU (Least Recently Used) cache implementation
//!
//! Entries live in an arena of nodes addressed by index. Slot 0 is a
//! permanent sentinel that closes the recency list into a ring:
//! `sentinel.next` is the most recently used entry and `sentinel.prev` the
//! least recently used one. An empty cache is a sentinel linked to itself.
//! Slots released by removal or eviction are recycled through a free list.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::iter::FusedIterator;

use ahash::RandomState;
use tracing::{debug, trace};

use crate::config::CacheConfig;
use crate::error::Result;
use crate::stats::CacheStats;

/// Arena slot reserved for the sentinel
const SENTINEL: usize = 0;

/// Slot in the arena. `entry` is `None` for the sentinel and for free slots.
struct Node<K, V> {
    entry: Option<(K, V)>,
    prev: usize,
    next: usize,
}

impl<K, V> Node<K, V> {
    fn sentinel() -> Self {
        Self {
            entry: None,
            prev: SENTINEL,
            next: SENTINEL,
        }
    }
}

/// LRU cache with fixed capacity
///
/// Every operation that hits an entry (`get`, `get_mut`, `put`) makes it the
/// most recently used. Inserting a new key into a full cache evicts exactly
/// one entry, the least recently used.
///
/// ```
/// use ringcache::LruCache;
///
/// let mut cache = LruCache::new(2)?;
/// cache.put(1, "a");
/// cache.put(2, "b");
/// assert_eq!(cache.get(&1), Some(&"a"));
///
/// cache.put(3, "c"); // evicts 2
/// assert!(!cache.contains_key(&2));
/// assert_eq!(cache.len(), 2);
/// # Ok::<(), ringcache::Error>(())
/// ```
pub struct LruCache<K, V, S = RandomState> {
    map: HashMap<K, usize, S>,
    nodes: Vec<Node<K, V>>,
    free_list: Vec<usize>,
    capacity: usize,
    stats: CacheStats,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new LRU cache holding at most `capacity` entries
    ///
    /// # Returns
    /// * `Result<LruCache>` - `Error::InvalidSize` if `capacity` is zero
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_config(CacheConfig::new(capacity))
    }

    /// Create a new LRU cache from a [`CacheConfig`]
    pub fn with_config(config: CacheConfig) -> Result<Self> {
        Self::with_config_and_hasher(config, RandomState::new())
    }
}

impl<K, V, S> LruCache<K, V, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher,
{
    /// Create a new LRU cache that hashes keys with `hasher`
    pub fn with_hasher(capacity: usize, hasher: S) -> Result<Self> {
        Self::with_config_and_hasher(CacheConfig::new(capacity), hasher)
    }

    /// Create a new LRU cache from a [`CacheConfig`] and a custom hasher
    pub fn with_config_and_hasher(config: CacheConfig, hasher: S) -> Result<Self> {
        let capacity = config.validate()?;
        let reserve = config.reserved_slots();

        let mut nodes = Vec::with_capacity(reserve + 1);
        nodes.push(Node::sentinel());

        debug!(capacity, reserve, "created lru cache");

        Ok(Self {
            map: HashMap::with_capacity_and_hasher(reserve, hasher),
            nodes,
            free_list: Vec::new(),
            capacity,
            stats: CacheStats::new(),
        })
    }

    /// Get a value from the cache, marking it most recently used
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if let Some(&idx) = self.map.get(key) {
            self.stats.record_hit();
            self.move_to_front(idx);
            self.nodes[idx].entry.as_ref().map(|(_, value)| value)
        } else {
            self.stats.record_miss();
            None
        }
    }

    /// Get a mutable reference to a value, marking it most recently used
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if let Some(&idx) = self.map.get(key) {
            self.stats.record_hit();
            self.move_to_front(idx);
            self.nodes[idx].entry.as_mut().map(|(_, value)| value)
        } else {
            self.stats.record_miss();
            None
        }
    }

    /// Get a value, or `default` when the key is absent
    ///
    /// A miss leaves the cache untouched.
    pub fn get_or<'a, Q>(&'a mut self, key: &Q, default: &'a V) -> &'a V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).unwrap_or(default)
    }

    /// Get a value without changing its recency
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.map.get(key)?;
        self.nodes[idx].entry.as_ref().map(|(_, value)| value)
    }

    /// Insert a key-value pair into the cache
    ///
    /// Overwriting an existing key keeps the size unchanged. A new key that
    /// pushes the cache past its capacity evicts the least recently used entry.
    pub fn put(&mut self, key: K, value: V) {
        if let Some(&idx) = self.map.get(&key) {
            // Update existing
            if let Some((_, slot)) = self.nodes[idx].entry.as_mut() {
                *slot = value;
            }
            self.move_to_front(idx);
            self.stats.record_update();
            return;
        }

        let idx = self.alloc_node(key.clone(), value);
        self.attach(idx);
        self.map.insert(key, idx);
        self.stats.record_insert();

        // At most one over capacity per insert
        if self.map.len() > self.capacity {
            self.evict();
        }
    }

    /// Check whether a key is present without changing its recency
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Remove a key from the cache, returning its value if it was present
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (_, value) = self.unlink_key(key)?;
        self.stats.record_removal();
        Some(value)
    }

    /// Peek at the least recently used entry, the next to be evicted
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        let idx = self.lru_index()?;
        self.nodes[idx].entry.as_ref().map(|(key, value)| (key, value))
    }

    /// Remove and return the least recently used entry
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let entry = self.take_lru()?;
        self.stats.record_removal();
        Some(entry)
    }

    /// Change the capacity, evicting least recently used entries to fit
    ///
    /// # Returns
    /// * `Result<()>` - `Error::InvalidSize` if `capacity` is zero
    pub fn resize(&mut self, capacity: usize) -> Result<()> {
        let capacity = CacheConfig::new(capacity).validate()?;
        let old = self.capacity;
        self.capacity = capacity;

        while self.map.len() > self.capacity && self.evict() {}

        debug!(old, capacity, len = self.map.len(), "resized lru cache");
        Ok(())
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.nodes[SENTINEL].next == idx {
            return; // Already at front
        }

        self.detach(idx);
        self.attach(idx);
    }

    /// Splice a slot between the sentinel and the current front
    fn attach(&mut self, idx: usize) {
        let first = self.nodes[SENTINEL].next;

        self.nodes[idx].prev = SENTINEL;
        self.nodes[idx].next = first;
        self.nodes[first].prev = idx;
        self.nodes[SENTINEL].next = idx;
    }

    /// Splice a slot's neighbours together
    fn detach(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);

        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }

    /// Shared removal path for `remove`, `pop_lru` and eviction
    fn unlink_key<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.map.remove(key)?;
        self.detach(idx);
        self.free_list.push(idx);
        self.nodes[idx].entry.take()
    }

    fn take_lru(&mut self) -> Option<(K, V)> {
        let idx = self.lru_index()?;
        let key = self.nodes[idx].entry.as_ref().map(|(key, _)| key.clone())?;
        self.unlink_key(&key)
    }

    fn evict(&mut self) -> bool {
        if self.take_lru().is_none() {
            return false;
        }

        self.stats.record_eviction();
        trace!(
            len = self.map.len(),
            capacity = self.capacity,
            "evicted least recently used entry"
        );
        true
    }

    fn alloc_node(&mut self, key: K, value: V) -> usize {
        let node = Node {
            entry: Some((key, value)),
            prev: SENTINEL,
            next: SENTINEL,
        };

        if let Some(idx) = self.free_list.pop() {
            self.nodes[idx] = node;
            idx
        } else {
            self.nodes.push(node);
            self.nodes.len() - 1
        }
    }
}

impl<K, V, S> LruCache<K, V, S> {
    /// Get the current number of entries
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Usage counters since creation or the last reset
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Zero the usage counters
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Clear the cache and its statistics
    pub fn clear(&mut self) {
        self.map.clear();
        self.nodes.truncate(1);
        self.nodes[SENTINEL] = Node::sentinel();
        self.free_list.clear();
        self.stats.reset();

        debug!(capacity = self.capacity, "cleared lru cache");
    }

    /// Iterate entries from most to least recently used
    ///
    /// Iteration does not change recency.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: &self.nodes,
            front: self.nodes[SENTINEL].next,
            back: self.nodes[SENTINEL].prev,
            remaining: self.map.len(),
        }
    }

    fn lru_index(&self) -> Option<usize> {
        let idx = self.nodes[SENTINEL].prev;
        (idx != SENTINEL).then_some(idx)
    }
}

impl<K, V, S> fmt::Debug for LruCache<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, S> IntoIterator for &'a LruCache<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over cache entries in recency order, most recent first
pub struct Iter<'a, K, V> {
    nodes: &'a [Node<K, V>],
    front: usize,
    back: usize,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let nodes = self.nodes;
        let node = &nodes[self.front];
        self.front = node.next;
        self.remaining -= 1;
        node.entry.as_ref().map(|(key, value)| (key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let nodes = self.nodes;
        let node = &nodes[self.back];
        self.back = node.prev;
        self.remaining -= 1;
        node.entry.as_ref().map(|(key, value)| (key, value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}
