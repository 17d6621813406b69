//! # Memcache Core
//!
//! Thread-safe object pooling allocator for repeated same-sized objects:
//! - One bucket per exact request size, no rounding
//! - Freed blocks are cached and handed out again
//! - Cache hits never touch the system allocator
//!
//! ## Architecture
//!
//! 1. **Size index** - ordered map from size to bucket
//! 2. **Buckets** - in-use and cached sub-pools of one capacity
//! 3. **Blocks** - caller handles that know their own bucket and pool
//!
//! ## Example
//!
//! ```rust,ignore
//! use memcache_core::{MemCache, MemCacheConfig};
//!
//! let config = MemCacheConfig::from_file("config/memcache.toml")?;
//! let cache = MemCache::with_config(config)?;
//!
//! let mut packet = cache.alloc(1500)?;
//! packet[..4].copy_from_slice(b"PING");
//! cache.free(packet)?;
//!
//! cache.clear(true);
//! let report = cache.destroy();
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod memory;

pub use config::MemCacheConfig;
pub use error::{MemCacheError, MemCacheResult};
pub use memory::{Block, BucketSnapshot, MemCache, TeardownReport};
