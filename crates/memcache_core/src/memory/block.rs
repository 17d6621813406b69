//! # Blocks
//!
//! Caller-side handle to one in-use node.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Weak;

use super::cache::{MemCache, Shared};
use super::node::Node;

/// A block of memory checked out of a [`MemCache`].
///
/// Derefs to its payload bytes. The block remembers its bucket and its
/// pool, so returning it needs no lookup: call [`MemCache::free`],
/// [`Block::release`], or simply drop it. If the pool has been destroyed
/// in the meantime the memory goes straight back to the system.
///
/// Recycled blocks keep whatever bytes the previous holder wrote.
pub struct Block {
    /// Always `Some` until the block is dropped.
    node: Option<Box<Node>>,
    pool: Weak<Shared>,
}

impl Block {
    pub(crate) fn new(node: Box<Node>, pool: Weak<Shared>) -> Self {
        Self {
            node: Some(node),
            pool,
        }
    }

    /// Payload size in bytes, equal to the size passed to `alloc`.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.payload().len()
    }

    /// Whether the payload is empty. Never true for blocks issued by a pool,
    /// which rejects zero-sized requests.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payload().is_empty()
    }

    /// Address of the first payload byte. Stable for the life of the node,
    /// including across reuse.
    #[inline]
    #[must_use]
    pub fn as_ptr(&self) -> *const u8 {
        self.payload().as_ptr()
    }

    /// Mutable address of the first payload byte.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.payload_mut().as_mut_ptr()
    }

    /// True if `cache` is the pool this block was allocated from.
    #[must_use]
    pub fn belongs_to(&self, cache: &MemCache) -> bool {
        cache.owns(&self.pool)
    }

    /// Returns the block to its own pool without going through a handle.
    pub fn release(self) {
        drop(self);
    }

    fn payload(&self) -> &[u8] {
        match self.node.as_deref() {
            Some(node) => node.payload(),
            None => &[],
        }
    }

    fn payload_mut(&mut self) -> &mut [u8] {
        match self.node.as_deref_mut() {
            Some(node) => node.payload_mut(),
            None => &mut [],
        }
    }
}

impl Deref for Block {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.payload()
    }
}

impl DerefMut for Block {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.payload_mut()
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("len", &self.len())
            .field("ptr", &self.as_ptr())
            .finish()
    }
}

impl Drop for Block {
    fn drop(&mut self) {
        let Some(node) = self.node.take() else {
            return;
        };
        if let Some(pool) = self.pool.upgrade() {
            pool.recycle(node);
        }
    }
}
