//! # Buckets
//!
//! One bucket per exact request size. Every node a bucket has created is
//! either held by a caller (in use) or parked on the bucket's free list
//! (cached).

use super::node::{BucketId, FreeList, Node};
use super::report::BucketSnapshot;

/// Where a checked-out node came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Source {
    /// Reused from the free list.
    Cached,
    /// Freshly allocated from the system.
    Fresh,
}

/// Partition of a pool holding every node of one capacity.
pub(crate) struct Bucket {
    /// Slab slot this bucket lives in, stamped into every node it creates.
    id: BucketId,
    /// Payload size in bytes, exact and unrounded.
    capacity: usize,
    /// Nodes currently held by callers.
    in_use: usize,
    /// Nodes waiting for reuse.
    cached: FreeList,
}

impl Bucket {
    pub(crate) fn new(id: BucketId, capacity: usize) -> Self {
        Self {
            id,
            capacity,
            in_use: 0,
            cached: FreeList::default(),
        }
    }

    #[inline]
    pub(crate) const fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub(crate) const fn in_use(&self) -> usize {
        self.in_use
    }

    #[inline]
    pub(crate) const fn cached(&self) -> usize {
        self.cached.len()
    }

    /// True when the bucket holds no nodes at all.
    #[inline]
    pub(crate) const fn is_vacant(&self) -> bool {
        self.in_use == 0 && self.cached.is_empty()
    }

    /// Moves a node into the in-use partition.
    ///
    /// Prefers the free list; allocates only when it is empty. Returns
    /// `None` if that allocation fails, leaving the bucket unchanged.
    pub(crate) fn checkout(&mut self) -> Option<(Box<Node>, Source)> {
        let checked_out = match self.cached.pop_front() {
            Some(node) => (node, Source::Cached),
            None => (Node::try_new(self.id, self.capacity)?, Source::Fresh),
        };
        self.in_use += 1;
        Some(checked_out)
    }

    /// Moves an in-use node back onto the free list. Payload bytes are kept.
    pub(crate) fn checkin(&mut self, node: Box<Node>) {
        debug_assert_eq!(node.owner(), self.id);
        debug_assert!(self.in_use > 0);
        self.in_use = self.in_use.saturating_sub(1);
        self.cached.push_front(node);
    }

    /// Frees every cached node, returning how many were freed.
    pub(crate) fn drain_cached(&mut self) -> usize {
        self.cached.release_all()
    }

    pub(crate) const fn snapshot(&self) -> BucketSnapshot {
        BucketSnapshot {
            capacity: self.capacity,
            cached: self.cached(),
            in_use: self.in_use,
        }
    }
}
