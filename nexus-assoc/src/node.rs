//! Nodes and the sentinel-based slot handle that links them.
//!
//! Links between nodes (list neighbours, tree parent/children, bucket
//! entries) are slot indices into the owning arena rather than pointers.
//! A reserved sentinel (`NodeId::NONE`) stands in for "no node" so links
//! stay one word wide instead of `Option<usize>`.

use std::sync::atomic::{AtomicU64, Ordering};

/// Slot index of a node in its sequence's arena.
///
/// `NodeId::NONE` doubles as the end position of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Sentinel value representing "no node" / the end position.
    pub(crate) const NONE: Self = NodeId(usize::MAX);

    #[inline]
    pub(crate) const fn from_slot(slot: usize) -> Self {
        NodeId(slot)
    }

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        self.0
    }

    #[inline]
    pub(crate) fn is_none(self) -> bool {
        self == Self::NONE
    }

    #[inline]
    pub(crate) fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// Storage unit shared by every container.
///
/// `link` carries whatever per-node state the index needs (tree links for
/// ordered containers, nothing for hashed ones). `stamp` is unique for the
/// lifetime of the owning sequence and lets a cursor detect that its slot
/// was freed and reused.
#[derive(Debug, Clone)]
pub struct Node<T, L> {
    pub(crate) value: T,
    pub(crate) prev: NodeId,
    pub(crate) next: NodeId,
    pub(crate) stamp: u64,
    pub(crate) link: L,
}

impl<T, L> Node<T, L> {
    #[inline]
    pub(crate) fn new(value: T, stamp: u64, link: L) -> Self {
        Self {
            value,
            prev: NodeId::NONE,
            next: NodeId::NONE,
            stamp,
            link,
        }
    }
}

/// Identity of one element sequence.
///
/// Cursors record it so a cursor handed to the wrong container is rejected
/// instead of being resolved against unrelated slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(u64);

impl OwnerId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        OwnerId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel() {
        assert!(NodeId::NONE.is_none());
        assert!(!NodeId::NONE.is_some());
        assert!(NodeId::from_slot(0).is_some());
        assert_eq!(NodeId::from_slot(7).slot(), 7);
    }

    #[test]
    fn owners_are_distinct() {
        let a = OwnerId::next();
        let b = OwnerId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn new_node_is_unlinked() {
        let node = Node::new(5u32, 1, ());
        assert!(node.prev.is_none());
        assert!(node.next.is_none());
        assert_eq!(node.value, 5);
    }
}
