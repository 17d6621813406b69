//! # Teardown Report
//!
//! Receipt returned by [`MemCache::destroy`](crate::MemCache::destroy).

/// State of one bucket at the moment its pool was destroyed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BucketSnapshot {
    /// Block size served by the bucket.
    pub capacity: usize,
    /// Cached nodes freed by the teardown.
    pub cached: usize,
    /// Blocks still held by callers. They are freed when dropped.
    pub in_use: usize,
}

/// Everything a pool held when it was destroyed, in ascending size order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TeardownReport {
    /// One entry per bucket.
    pub buckets: Vec<BucketSnapshot>,
}

impl TeardownReport {
    /// Number of buckets the pool held.
    #[inline]
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Total cached nodes freed.
    #[must_use]
    pub fn cached_nodes(&self) -> usize {
        self.buckets.iter().map(|b| b.cached).sum()
    }

    /// Total blocks that outlived the pool.
    #[must_use]
    pub fn outstanding_blocks(&self) -> usize {
        self.buckets.iter().map(|b| b.in_use).sum()
    }

    /// Snapshot of the bucket serving `capacity`, if the pool had one.
    #[must_use]
    pub fn bucket(&self, capacity: usize) -> Option<&BucketSnapshot> {
        self.buckets.iter().find(|b| b.capacity == capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals() {
        let report = TeardownReport {
            buckets: vec![
                BucketSnapshot { capacity: 16, cached: 3, in_use: 0 },
                BucketSnapshot { capacity: 64, cached: 1, in_use: 2 },
            ],
        };
        assert_eq!(report.bucket_count(), 2);
        assert_eq!(report.cached_nodes(), 4);
        assert_eq!(report.outstanding_blocks(), 2);
        assert_eq!(report.bucket(64).unwrap().in_use, 2);
        assert!(report.bucket(32).is_none());
    }
}
