//! # ringcache
//!
//! Fixed-capacity key/value cache with least-recently-used eviction.
//!
//! ## Architecture
//! - **HashMap**: AHash-keyed index from key to arena slot (O(1))
//! - **Ring**: circular doubly-linked list threaded through a `Vec` arena,
//!   closed by a sentinel in slot 0 (O(1) move-to-front and eviction)
//! - **Free list**: recycled slots, so removals never reshuffle the arena
//! - **SharedLruCache**: `Arc<Mutex<_>>` handle for multi-threaded callers
//!
//! The core [`LruCache`] takes `&mut self` for every call that can reorder
//! entries, `get` included. It does no locking and no I/O.

#![warn(missing_docs)]

mod config;
mod error;
mod lru;
mod shared;
mod stats;

pub use config::{CacheConfig, DEFAULT_CAPACITY, DEFAULT_RESERVE};
pub use error::{Error, Result};
pub use lru::{Iter, LruCache};
pub use shared::SharedLruCache;
pub use stats::CacheStats;
