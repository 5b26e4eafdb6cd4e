//! Error types for ringcache

use std::fmt;

/// Result type alias for ringcache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cache construction and resizing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Requested capacity is not a positive number of entries
    InvalidSize(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidSize(size) => {
                write!(f, "Invalid cache size: {} (must be at least 1)", size)
            }
        }
    }
}

impl std::error::Error for Error {}
