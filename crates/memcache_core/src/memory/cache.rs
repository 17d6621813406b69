//! # MemCache
//!
//! Thread-safe pool of reusable blocks, partitioned by exact size.
//!
//! ## Locking
//!
//! One mutex per pool guards the size index and every bucket in it.
//! Requests for different sizes still serialize against each other, and a
//! cache miss calls the system allocator while the lock is held.
//!
//! ## Lifecycle of a node
//!
//! ```text
//!   alloc (miss)        free / drop
//!  ─────────────> InUse ───────────> Cached ──> freed by clear / destroy
//!                   ^                  │
//!                   └── alloc (hit) ───┘
//! ```

use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::{debug, trace, warn};

use super::block::Block;
use super::bucket::{Bucket, Source};
use super::index::SizeIndex;
use super::node::Node;
use super::report::TeardownReport;
use crate::config::MemCacheConfig;
use crate::error::{MemCacheError, MemCacheResult};

/// State shared between a pool handle and the blocks it hands out.
pub(crate) struct Shared {
    config: MemCacheConfig,
    index: Mutex<SizeIndex>,
}

impl Shared {
    /// Parks a node on its owner's free list.
    ///
    /// Nodes whose bucket is gone (the pool was torn down) are freed.
    pub(crate) fn recycle(&self, node: Box<Node>) {
        let mut index = self.index.lock();
        let Some(bucket) = index.bucket_mut(node.owner()) else {
            drop(index);
            trace!("{}: released an orphaned block", self.config.name);
            return;
        };
        let capacity = bucket.capacity();
        bucket.checkin(node);
        let in_use = bucket.in_use();
        drop(index);

        trace!(
            "{}: {}-byte block cached, {} still in use",
            self.config.name,
            capacity,
            in_use
        );
    }
}

/// A size-partitioned object pool.
///
/// Each distinct request size gets its own bucket; freed blocks are kept
/// and handed out again to the next request of the same size.
///
/// # Thread Safety
///
/// `MemCache` is `Send + Sync`. Share it by reference or in an [`Arc`].
///
/// # Example
///
/// ```rust
/// use memcache_core::MemCache;
///
/// let cache = MemCache::create();
/// let a = cache.alloc(64)?;
/// let addr = a.as_ptr();
/// cache.free(a)?;
///
/// // Same size again: served from the cache.
/// let b = cache.alloc(64)?;
/// assert_eq!(b.as_ptr(), addr);
/// # Ok::<(), memcache_core::MemCacheError>(())
/// ```
pub struct MemCache {
    shared: Arc<Shared>,
    destroyed: bool,
}

impl MemCache {
    /// Creates an empty pool with the default configuration.
    #[must_use]
    pub fn create() -> Self {
        Self::from_config(MemCacheConfig::default())
    }

    /// Creates an empty pool with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MemCacheError::InvalidConfig`] if the config fails
    /// validation.
    pub fn with_config(config: MemCacheConfig) -> MemCacheResult<Self> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: MemCacheConfig) -> Self {
        debug!("{}: pool created", config.name);
        Self {
            shared: Arc::new(Shared {
                config,
                index: Mutex::new(SizeIndex::default()),
            }),
            destroyed: false,
        }
    }

    /// Pool label used in log records.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.shared.config.name
    }

    /// The configuration the pool was created with.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &MemCacheConfig {
        &self.shared.config
    }

    /// Checks out a block of exactly `size` bytes.
    ///
    /// A cached block of that size is reused when one exists; its bytes are
    /// whatever the previous holder left. Otherwise a new block is
    /// allocated, zero-filled.
    ///
    /// # Errors
    ///
    /// - [`MemCacheError::ZeroSize`] if `size` is zero
    /// - [`MemCacheError::TooLarge`] if `size` exceeds `max_block_size`
    /// - [`MemCacheError::OutOfMemory`] if the system allocator fails; a
    ///   bucket created for this request is removed again
    pub fn alloc(&self, size: usize) -> MemCacheResult<Block> {
        let config = &self.shared.config;
        config.check_request(size)?;

        let mut index = self.shared.index.lock();
        let checked_out = index.find_or_insert(size).and_then(|(id, created)| {
            let checked_out = index.bucket_mut(id).and_then(Bucket::checkout);
            if checked_out.is_none() && created {
                index.erase(size);
            }
            checked_out.map(|(node, source)| (node, source, created))
        });
        drop(index);

        let Some((node, source, created)) = checked_out else {
            warn!("{}: out of memory allocating {} bytes", config.name, size);
            return Err(MemCacheError::OutOfMemory { size });
        };

        match source {
            Source::Cached => trace!("{}: cache hit for {} bytes", config.name, size),
            Source::Fresh if created => {
                trace!("{}: cache miss for {} bytes, new bucket", config.name, size);
            }
            Source::Fresh => trace!("{}: cache miss for {} bytes", config.name, size),
        }

        Ok(Block::new(node, Arc::downgrade(&self.shared)))
    }

    /// Checks out a block sized for one `T`.
    ///
    /// # Errors
    ///
    /// Same as [`alloc`](Self::alloc); zero-sized types yield
    /// [`MemCacheError::ZeroSize`].
    pub fn alloc_for<T>(&self) -> MemCacheResult<Block> {
        self.alloc(std::mem::size_of::<T>())
    }

    /// Returns a block to the cache.
    ///
    /// The block goes back to the bucket recorded inside it. With
    /// `verify_owner` enabled, a block from another pool is refused; it
    /// is still recycled into its own pool when dropped.
    ///
    /// # Errors
    ///
    /// Returns [`MemCacheError::ForeignBlock`] if the block belongs to a
    /// different pool and `verify_owner` is set.
    pub fn free(&self, block: Block) -> MemCacheResult<()> {
        if self.shared.config.verify_owner && !block.belongs_to(self) {
            warn!("{}: refused a block owned by another pool", self.name());
            return Err(MemCacheError::ForeignBlock);
        }
        block.release();
        Ok(())
    }

    /// Frees every cached block back to the system.
    ///
    /// Blocks held by callers are untouched. With `delete_empty_buckets`,
    /// buckets that have no block in use afterwards are removed too.
    pub fn clear(&self, delete_empty_buckets: bool) {
        let (drained, remaining) = {
            let mut index = self.shared.index.lock();
            let drained = index.drain_cached(delete_empty_buckets);
            (drained, index.len())
        };
        debug!(
            "{}: cleared {} cached blocks, removed {} buckets, {} remain",
            self.name(),
            drained.nodes,
            drained.buckets,
            remaining
        );
    }

    /// Frees every cached block, keeping all buckets.
    pub fn clear_cached(&self) {
        self.clear(false);
    }

    /// Tears the pool down and reports what it held.
    ///
    /// All buckets and cached blocks are freed. Blocks still held by
    /// callers stay valid; they are freed to the system when dropped.
    /// Dropping a `MemCache` does the same without the report.
    pub fn destroy(mut self) -> TeardownReport {
        self.destroyed = true;
        self.teardown()
    }

    /// Sizes that currently have a bucket, ascending.
    #[must_use]
    pub fn bucket_sizes(&self) -> Vec<usize> {
        self.shared.index.lock().sizes()
    }

    /// True if a bucket for exactly `size` bytes exists.
    #[must_use]
    pub fn contains_bucket(&self, size: usize) -> bool {
        self.shared.index.lock().find(size).is_some()
    }

    /// Number of buckets.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.shared.index.lock().len()
    }

    pub(crate) fn owns(&self, pool: &Weak<Shared>) -> bool {
        std::ptr::eq(pool.as_ptr(), Arc::as_ptr(&self.shared))
    }

    fn teardown(&self) -> TeardownReport {
        let buckets = self.shared.index.lock().take_all();
        let report = TeardownReport {
            buckets: buckets.iter().map(Bucket::snapshot).collect(),
        };
        drop(buckets);

        let outstanding = report.outstanding_blocks();
        if outstanding > 0 {
            warn!(
                "{}: destroyed with {} blocks still in use",
                self.name(),
                outstanding
            );
        }
        debug!(
            "{}: destroyed {} buckets, freed {} cached blocks",
            self.name(),
            report.bucket_count(),
            report.cached_nodes()
        );
        report
    }
}

impl Default for MemCache {
    fn default() -> Self {
        Self::create()
    }
}

impl fmt::Debug for MemCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemCache")
            .field("name", &self.name())
            .field("buckets", &self.bucket_sizes())
            .finish()
    }
}

impl Drop for MemCache {
    fn drop(&mut self) {
        if !self.destroyed {
            self.teardown();
        }
    }
}
