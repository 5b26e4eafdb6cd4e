//! Construction-time configuration

use crate::error::{Error, Result};

/// Default capacity (number of entries) used by [`CacheConfig::default`]
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Upper bound on slots reserved up front when no explicit reserve is given
pub const DEFAULT_RESERVE: usize = 4096;

/// Settings for building an [`LruCache`](crate::LruCache)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    capacity: usize,
    reserve: usize,
}

impl CacheConfig {
    /// Create a config for a cache holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            reserve: capacity.min(DEFAULT_RESERVE),
        }
    }

    /// Set the maximum number of entries
    ///
    /// The reserve is left as is and clamped at build time.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set how many entry slots to allocate up front
    pub fn reserve(mut self, reserve: usize) -> Self {
        self.reserve = reserve;
        self
    }

    /// Maximum number of entries
    pub fn max_entries(&self) -> usize {
        self.capacity
    }

    /// Slots to preallocate, never more than the capacity
    pub fn reserved_slots(&self) -> usize {
        self.reserve.min(self.capacity)
    }

    /// Check the config and return the validated capacity
    ///
    /// # Returns
    /// * `Result<usize>` - Capacity, or `Error::InvalidSize` when it is zero
    pub fn validate(&self) -> Result<usize> {
        if self.capacity == 0 {
            return Err(Error::InvalidSize(self.capacity));
        }
        Ok(self.capacity)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
