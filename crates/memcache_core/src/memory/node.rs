//! # Nodes and Free Lists
//!
//! A node is one allocation unit: the payload buffer plus the id of the
//! bucket that owns it. Cached nodes are chained through their own `next`
//! field, so parking a node on a free list never allocates.

/// Slab slot of the bucket that owns a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct BucketId(pub(crate) usize);

/// One allocation unit.
pub(crate) struct Node {
    /// Back-reference to the owning bucket.
    owner: BucketId,
    /// Free list link. Always `None` while the node is in use.
    next: Option<Box<Node>>,
    /// Caller-visible bytes, exactly the bucket capacity.
    payload: Box<[u8]>,
}

impl Node {
    /// Allocates a node with a `capacity`-byte payload.
    ///
    /// Returns `None` if the payload cannot be reserved.
    pub(crate) fn try_new(owner: BucketId, capacity: usize) -> Option<Box<Self>> {
        let mut payload: Vec<u8> = Vec::new();
        payload.try_reserve_exact(capacity).ok()?;
        payload.resize(capacity, 0);
        Some(Box::new(Self {
            owner,
            next: None,
            payload: payload.into_boxed_slice(),
        }))
    }

    #[inline]
    pub(crate) const fn owner(&self) -> BucketId {
        self.owner
    }

    #[inline]
    pub(crate) fn payload(&self) -> &[u8] {
        &self.payload
    }

    #[inline]
    pub(crate) fn payload_mut(&mut self) -> &mut [u8] {
        &mut self.payload
    }
}

/// LIFO list of cached nodes linked through [`Node::next`].
#[derive(Default)]
pub(crate) struct FreeList {
    head: Option<Box<Node>>,
    len: usize,
}

impl FreeList {
    #[inline]
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) const fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Parks a node at the front of the list.
    pub(crate) fn push_front(&mut self, mut node: Box<Node>) {
        node.next = self.head.take();
        self.head = Some(node);
        self.len += 1;
    }

    /// Takes the most recently parked node.
    pub(crate) fn pop_front(&mut self) -> Option<Box<Node>> {
        let mut node = self.head.take()?;
        self.head = node.next.take();
        self.len -= 1;
        Some(node)
    }

    /// Frees every node back to the system, returning how many were freed.
    pub(crate) fn release_all(&mut self) -> usize {
        let released = self.len;
        // One node at a time: dropping the head would recurse down the chain.
        while let Some(node) = self.pop_front() {
            drop(node);
        }
        released
    }
}

impl Drop for FreeList {
    fn drop(&mut self) {
        self.release_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_payload_size() {
        let node = Node::try_new(BucketId(3), 48).unwrap();
        assert_eq!(node.payload().len(), 48);
        assert_eq!(node.owner(), BucketId(3));
    }

    #[test]
    fn test_free_list_is_lifo() {
        let mut list = FreeList::default();
        let first = Node::try_new(BucketId(0), 8).unwrap();
        let second = Node::try_new(BucketId(0), 8).unwrap();
        let first_addr = first.payload().as_ptr();
        let second_addr = second.payload().as_ptr();

        list.push_front(first);
        list.push_front(second);
        assert_eq!(list.len(), 2);

        assert_eq!(list.pop_front().unwrap().payload().as_ptr(), second_addr);
        assert_eq!(list.pop_front().unwrap().payload().as_ptr(), first_addr);
        assert!(list.pop_front().is_none());
        assert!(list.is_empty());
    }

    #[test]
    fn test_payload_survives_parking() {
        let mut list = FreeList::default();
        let mut node = Node::try_new(BucketId(0), 4).unwrap();
        node.payload_mut().copy_from_slice(&[1u8, 2, 3, 4]);
        list.push_front(node);

        let node = list.pop_front().unwrap();
        assert_eq!(node.payload(), &[1u8, 2, 3, 4]);
    }

    #[test]
    fn test_release_long_chain() {
        let mut list = FreeList::default();
        for _ in 0..100_000 {
            list.push_front(Node::try_new(BucketId(0), 1).unwrap());
        }
        assert_eq!(list.release_all(), 100_000);
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
    }
}
