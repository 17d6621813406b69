//! # Size Index
//!
//! Ordered map from request size to bucket.
//!
//! Buckets live in a slab so a node can name its owner with a plain slot
//! number; the ordered map only translates sizes into slots. A slot is
//! recycled only after its bucket has been erased, and a bucket is erased
//! only once no node of it is in use, so a live node's [`BucketId`] never
//! points at a stranger.

use std::collections::BTreeMap;

use super::bucket::Bucket;
use super::node::BucketId;

/// Result of draining the index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Drained {
    /// Cached nodes freed back to the system.
    pub(crate) nodes: usize,
    /// Buckets erased because nothing was left in them.
    pub(crate) buckets: usize,
}

/// Size-ordered collection of buckets with at most one bucket per size.
#[derive(Default)]
pub(crate) struct SizeIndex {
    by_size: BTreeMap<usize, BucketId>,
    slots: Vec<Option<Bucket>>,
    vacant: Vec<BucketId>,
}

impl SizeIndex {
    /// Number of buckets.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.by_size.len()
    }

    /// Exact-size lookup.
    pub(crate) fn find(&self, size: usize) -> Option<BucketId> {
        self.by_size.get(&size).copied()
    }

    /// Looks up the bucket for `size`, creating an empty one if absent.
    ///
    /// The flag is `true` when the bucket was created by this call.
    /// Returns `None` if the slab cannot grow to hold a new bucket.
    pub(crate) fn find_or_insert(&mut self, size: usize) -> Option<(BucketId, bool)> {
        if let Some(id) = self.find(size) {
            return Some((id, false));
        }

        let id = match self.vacant.pop() {
            Some(id) => id,
            None => {
                self.slots.try_reserve(1).ok()?;
                self.slots.push(None);
                BucketId(self.slots.len() - 1)
            }
        };
        if let Some(slot) = self.slots.get_mut(id.0) {
            *slot = Some(Bucket::new(id, size));
        }
        self.by_size.insert(size, id);
        Some((id, true))
    }

    /// Slots allocated in the slab, live or vacant.
    #[cfg(test)]
    fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// The bucket stored in slot `id`, if any.
    #[inline]
    pub(crate) fn bucket_mut(&mut self, id: BucketId) -> Option<&mut Bucket> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Removes the bucket for `size` and frees its slot.
    pub(crate) fn erase(&mut self, size: usize) -> Option<Bucket> {
        let id = self.by_size.remove(&size)?;
        let bucket = self.slots.get_mut(id.0).and_then(Option::take);
        self.vacant.push(id);
        bucket
    }

    /// Bucket sizes in ascending order.
    pub(crate) fn sizes(&self) -> Vec<usize> {
        self.by_size.keys().copied().collect()
    }

    /// Frees every cached node in ascending size order.
    ///
    /// With `delete_vacant`, buckets left with no nodes are erased as well.
    pub(crate) fn drain_cached(&mut self, delete_vacant: bool) -> Drained {
        let mut drained = Drained::default();
        let slots = &mut self.slots;
        let vacant = &mut self.vacant;

        self.by_size.retain(|_, id| {
            let Some(slot) = slots.get_mut(id.0) else {
                return false;
            };
            let Some(bucket) = slot.as_mut() else {
                return false;
            };

            drained.nodes += bucket.drain_cached();
            if delete_vacant && bucket.is_vacant() {
                *slot = None;
                vacant.push(*id);
                drained.buckets += 1;
                return false;
            }
            true
        });

        drained
    }

    /// Empties the index, handing back every bucket in ascending size order.
    pub(crate) fn take_all(&mut self) -> Vec<Bucket> {
        let by_size = std::mem::take(&mut self.by_size);
        let mut slots = std::mem::take(&mut self.slots);
        self.vacant.clear();

        by_size
            .into_values()
            .filter_map(|id| slots.get_mut(id.0).and_then(Option::take))
            .collect()
    }
}
