//! # Memcache Error Types
//!
//! All errors that can occur while allocating from or returning blocks to a pool.

use thiserror::Error;

/// Errors that can occur in the memcache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemCacheError {
    /// Zero-byte requests have no bucket to live in.
    #[error("zero-sized allocation requested")]
    ZeroSize,

    /// Request exceeds the configured block size limit.
    #[error("allocation of {requested} bytes exceeds the limit of {limit} bytes")]
    TooLarge {
        /// The size that was requested.
        requested: usize,
        /// The configured maximum.
        limit: usize,
    },

    /// The system allocator could not satisfy a cache miss.
    #[error("out of memory allocating a {size}-byte block")]
    OutOfMemory {
        /// The block size that could not be allocated.
        size: usize,
    },

    /// A block was handed to a pool that does not own it.
    #[error("block belongs to a different pool")]
    ForeignBlock,

    /// Invalid configuration file or value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for memcache operations.
pub type MemCacheResult<T> = Result<T, MemCacheError>;
