//! The element sequence: a doubly linked list of nodes in a slab arena.
//!
//! Every container stores its elements here. The sequence owns the nodes;
//! indexes refer to them by [`NodeId`] and keep their own per-node state in
//! `Node::link`. Iteration order of a container is the order of its
//! sequence.
//!
//! Insertion and removal are O(1) and never move other nodes, so slot
//! indices (and the cursors built on them) stay valid until their own node
//! is removed. Slots are reused by the arena; the per-node stamp is what
//! tells a reused slot apart from the node a cursor was taken on.

use std::iter::FusedIterator;

use slab::Slab;

use crate::node::{Node, NodeId, OwnerId};
use crate::{Cursor, Error};

/// Arena-backed doubly linked node sequence.
pub struct Sequence<T, L> {
    nodes: Slab<Node<T, L>>,
    head: NodeId,
    tail: NodeId,
    len: usize,
    next_stamp: u64,
    owner: OwnerId,
}

impl<T, L> Default for Sequence<T, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, L: Clone> Clone for Sequence<T, L> {
    /// Deep copy. The copy gets its own identity, so cursors into `self`
    /// are foreign to it even though slot indices coincide.
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            head: self.head,
            tail: self.tail,
            len: self.len,
            next_stamp: self.next_stamp,
            owner: OwnerId::next(),
        }
    }
}

impl<T, L> Sequence<T, L> {
    pub(crate) fn new() -> Self {
        Self::with_capacity(0)
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Slab::with_capacity(capacity),
            head: NodeId::NONE,
            tail: NodeId::NONE,
            len: 0,
            next_stamp: 1,
            owner: OwnerId::next(),
        }
    }

    /// Reserves arena room for `additional` more nodes.
    #[inline]
    pub(crate) fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub(crate) fn head(&self) -> NodeId {
        self.head
    }

    #[inline]
    pub(crate) fn tail(&self) -> NodeId {
        self.tail
    }

    // ========================================================================
    // Node access
    // ========================================================================

    // Indexing panics on a vacant slot: a dangling id inside the engine is an
    // invariant violation, not a caller error.

    #[inline]
    pub(crate) fn value(&self, id: NodeId) -> &T {
        &self.nodes[id.slot()].value
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, id: NodeId) -> &mut T {
        &mut self.nodes[id.slot()].value
    }

    #[inline]
    pub(crate) fn link(&self, id: NodeId) -> &L {
        &self.nodes[id.slot()].link
    }

    #[inline]
    pub(crate) fn link_mut(&mut self, id: NodeId) -> &mut L {
        &mut self.nodes[id.slot()].link
    }

    /// Successor of `id`; `NONE` after the tail.
    #[inline]
    pub(crate) fn next(&self, id: NodeId) -> NodeId {
        self.nodes[id.slot()].next
    }

    /// Predecessor of `id`. The predecessor of the end position is the tail.
    #[inline]
    pub(crate) fn prev(&self, id: NodeId) -> NodeId {
        if id.is_none() {
            self.tail
        } else {
            self.nodes[id.slot()].prev
        }
    }

    // ========================================================================
    // Cursors
    // ========================================================================

    #[inline]
    pub(crate) fn cursor(&self, id: NodeId) -> Cursor {
        if id.is_none() {
            Cursor::end(self.owner)
        } else {
            Cursor::new(self.owner, id, self.nodes[id.slot()].stamp)
        }
    }

    #[inline]
    pub(crate) fn begin(&self) -> Cursor {
        self.cursor(self.head)
    }

    #[inline]
    pub(crate) fn end(&self) -> Cursor {
        Cursor::end(self.owner)
    }

    /// Validates a cursor against this sequence. Returns `NONE` for end.
    pub(crate) fn resolve(&self, cursor: &Cursor) -> Result<NodeId, Error> {
        if cursor.owner != self.owner {
            return Err(Error::ForeignCursor);
        }
        if cursor.node.is_none() {
            return Ok(NodeId::NONE);
        }
        match self.nodes.get(cursor.node.slot()) {
            Some(node) if node.stamp == cursor.stamp => Ok(cursor.node),
            _ => Err(Error::StaleCursor),
        }
    }

    /// Like [`resolve`](Self::resolve), but the end position is out of range.
    pub(crate) fn resolve_element(&self, cursor: &Cursor) -> Result<NodeId, Error> {
        let id = self.resolve(cursor)?;
        if id.is_none() {
            return Err(Error::OutOfRange);
        }
        Ok(id)
    }

    pub(crate) fn get(&self, cursor: &Cursor) -> Result<&T, Error> {
        let id = self.resolve_element(cursor)?;
        Ok(self.value(id))
    }

    pub(crate) fn step_forward(&self, cursor: &Cursor) -> Result<Cursor, Error> {
        let id = self.resolve_element(cursor)?;
        Ok(self.cursor(self.next(id)))
    }

    pub(crate) fn step_back(&self, cursor: &Cursor) -> Result<Cursor, Error> {
        let id = self.resolve(cursor)?;
        let prev = self.prev(id);
        if prev.is_none() {
            return Err(Error::OutOfRange);
        }
        Ok(self.cursor(prev))
    }

    /// Node ids of `[first, last)` in order.
    ///
    /// Fails with [`Error::UnreachableRange`] if `last` does not follow
    /// `first`. Nothing is modified either way.
    pub(crate) fn collect_range(&self, first: &Cursor, last: &Cursor) -> Result<Vec<NodeId>, Error> {
        let mut id = self.resolve(first)?;
        let last = self.resolve(last)?;

        let mut ids = Vec::new();
        while id != last {
            if id.is_none() {
                return Err(Error::UnreachableRange);
            }
            ids.push(id);
            id = self.next(id);
        }
        Ok(ids)
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Inserts a new node before `before` (`NONE` appends).
    pub(crate) fn insert_before(&mut self, before: NodeId, value: T, link: L) -> NodeId {
        let stamp = self.next_stamp;
        self.next_stamp += 1;

        let id = NodeId::from_slot(self.nodes.insert(Node::new(value, stamp, link)));
        let prev = self.prev(before);

        {
            let node = &mut self.nodes[id.slot()];
            node.prev = prev;
            node.next = before;
        }

        if prev.is_some() {
            self.nodes[prev.slot()].next = id;
        } else {
            self.head = id;
        }

        if before.is_some() {
            self.nodes[before.slot()].prev = id;
        } else {
            self.tail = id;
        }

        self.len += 1;
        id
    }

    /// Unlinks and frees `id`, returning its value and its successor.
    pub(crate) fn remove(&mut self, id: NodeId) -> (T, NodeId) {
        let node = self.nodes.remove(id.slot());

        if node.prev.is_some() {
            self.nodes[node.prev.slot()].next = node.next;
        } else {
            self.head = node.next;
        }

        if node.next.is_some() {
            self.nodes[node.next.slot()].prev = node.prev;
        } else {
            self.tail = node.prev;
        }

        self.len -= 1;
        (node.value, node.next)
    }

    /// Removes `[first, last)`. `last` must follow `first`. Returns the
    /// number of removed nodes.
    pub(crate) fn erase_range(&mut self, first: NodeId, last: NodeId) -> usize {
        let mut id = first;
        let mut removed = 0;
        while id != last {
            let (_, next) = self.remove(id);
            id = next;
            removed += 1;
        }
        removed
    }

    /// Moves `[first, last)` to sit directly before `before`, keeping the
    /// nodes (and their stamps). The range must be non-empty and must not
    /// contain `before`.
    pub(crate) fn relink(&mut self, before: NodeId, first: NodeId, last: NodeId) {
        if before == last {
            return;
        }
        let back = self.prev(last);

        let outer = self.nodes[first.slot()].prev;
        if outer.is_some() {
            self.nodes[outer.slot()].next = last;
        } else {
            self.head = last;
        }
        if last.is_some() {
            self.nodes[last.slot()].prev = outer;
        } else {
            self.tail = outer;
        }

        let prev = self.prev(before);
        self.nodes[first.slot()].prev = prev;
        self.nodes[back.slot()].next = before;
        if prev.is_some() {
            self.nodes[prev.slot()].next = first;
        } else {
            self.head = first;
        }
        if before.is_some() {
            self.nodes[before.slot()].prev = back;
        } else {
            self.tail = back;
        }
    }

    #[inline]
    pub(crate) fn push_front(&mut self, value: T, link: L) -> NodeId {
        self.insert_before(self.head, value, link)
    }

    #[inline]
    pub(crate) fn push_back(&mut self, value: T, link: L) -> NodeId {
        self.insert_before(NodeId::NONE, value, link)
    }

    pub(crate) fn pop_front(&mut self) -> Option<T> {
        if self.head.is_none() {
            return None;
        }
        Some(self.remove(self.head).0)
    }

    pub(crate) fn pop_back(&mut self) -> Option<T> {
        if self.tail.is_none() {
            return None;
        }
        Some(self.remove(self.tail).0)
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.head = NodeId::NONE;
        self.tail = NodeId::NONE;
        self.len = 0;
    }

    // ========================================================================
    // Iteration
    // ========================================================================

    pub(crate) fn iter(&self) -> Iter<'_, T, L> {
        self.iter_between(self.head, self.tail, self.len)
    }

    /// Iterates `len` nodes starting at `front` and ending at `back`.
    pub(crate) fn iter_between(&self, front: NodeId, back: NodeId, len: usize) -> Iter<'_, T, L> {
        Iter {
            nodes: &self.nodes,
            front,
            back,
            remaining: len,
        }
    }

    pub(crate) fn ids(&self) -> Ids<'_, T, L> {
        Ids {
            nodes: &self.nodes,
            next: self.head,
        }
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Borrowing iterator over a container's elements in sequence order.
pub struct Iter<'a, T, L> {
    nodes: &'a Slab<Node<T, L>>,
    front: NodeId,
    back: NodeId,
    remaining: usize,
}

impl<T, L> Clone for Iter<'_, T, L> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, T, L> Iterator for Iter<'a, T, L> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = &self.nodes[self.front.slot()];
        self.front = node.next;
        self.remaining -= 1;
        Some(&node.value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, L> DoubleEndedIterator for Iter<'_, T, L> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = &self.nodes[self.back.slot()];
        self.back = node.prev;
        self.remaining -= 1;
        Some(&node.value)
    }
}

impl<T, L> ExactSizeIterator for Iter<'_, T, L> {}

impl<T, L> FusedIterator for Iter<'_, T, L> {}

/// Node ids in sequence order.
pub(crate) struct Ids<'a, T, L> {
    nodes: &'a Slab<Node<T, L>>,
    next: NodeId,
}

impl<T, L> Iterator for Ids<'_, T, L> {
    type Item = NodeId;

    #[inline]
    fn next(&mut self) -> Option<NodeId> {
        if self.next.is_none() {
            return None;
        }
        let id = self.next;
        self.next = self.nodes[id.slot()].next;
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(seq: &Sequence<u32, ()>) -> Vec<u32> {
        seq.iter().copied().collect()
    }

    #[test]
    fn new_is_empty() {
        let seq: Sequence<u32, ()> = Sequence::new();
        assert!(seq.is_empty());
        assert!(seq.head().is_none());
        assert!(seq.tail().is_none());
        assert!(seq.begin().is_end());
    }

    #[test]
    fn insert_before_keeps_order() {
        let mut seq = Sequence::new();
        let c = seq.push_back(3, ());
        let a = seq.insert_before(c, 1, ());
        seq.insert_before(c, 2, ());
        seq.push_front(0, ());
        seq.push_back(4, ());

        assert_eq!(values(&seq), vec![0, 1, 2, 3, 4]);
        assert_eq!(seq.len(), 5);
        assert_eq!(*seq.value(seq.next(a)), 2);
        assert_eq!(seq.prev(NodeId::NONE), seq.tail());
    }

    #[test]
    fn remove_returns_successor() {
        let mut seq = Sequence::new();
        seq.push_back(1, ());
        let b = seq.push_back(2, ());
        let c = seq.push_back(3, ());

        let (value, next) = seq.remove(b);
        assert_eq!(value, 2);
        assert_eq!(next, c);
        assert_eq!(values(&seq), vec![1, 3]);

        let (_, next) = seq.remove(c);
        assert!(next.is_none());
        assert_eq!(seq.tail(), seq.head());
    }

    #[test]
    fn erase_range_counts() {
        let mut seq = Sequence::new();
        let ids: Vec<_> = (0..6).map(|i| seq.push_back(i, ())).collect();

        assert_eq!(seq.erase_range(ids[1], ids[4]), 3);
        assert_eq!(values(&seq), vec![0, 4, 5]);
        assert_eq!(seq.erase_range(ids[4], NodeId::NONE), 2);
        assert_eq!(values(&seq), vec![0]);
    }

    #[test]
    fn pop_both_ends() {
        let mut seq = Sequence::new();
        seq.push_back(1, ());
        seq.push_back(2, ());
        seq.push_back(3, ());

        assert_eq!(seq.pop_front(), Some(1));
        assert_eq!(seq.pop_back(), Some(3));
        assert_eq!(seq.pop_back(), Some(2));
        assert_eq!(seq.pop_front(), None);
        assert!(seq.is_empty());
    }

    #[test]
    fn stale_cursor_after_slot_reuse() {
        let mut seq = Sequence::new();
        let a = seq.push_back(1, ());
        let cursor = seq.cursor(a);
        seq.remove(a);

        // Slab hands the freed slot to the next insert.
        let b = seq.push_back(2, ());
        assert_eq!(a, b);
        assert_eq!(seq.resolve(&cursor), Err(Error::StaleCursor));
        assert!(seq.resolve(&seq.cursor(b)).is_ok());
    }

    #[test]
    fn foreign_cursor() {
        let mut a: Sequence<u32, ()> = Sequence::new();
        let b: Sequence<u32, ()> = Sequence::new();
        let id = a.push_back(1, ());

        assert_eq!(b.resolve(&a.cursor(id)), Err(Error::ForeignCursor));
        assert_eq!(b.resolve(&a.end()), Err(Error::ForeignCursor));
    }

    #[test]
    fn stepping_past_either_end() {
        let mut seq = Sequence::new();
        seq.push_back(1, ());

        let begin = seq.begin();
        let end = seq.step_forward(&begin).unwrap();
        assert!(end.is_end());
        assert_eq!(seq.step_forward(&end).unwrap_err(), Error::OutOfRange);
        assert_eq!(seq.get(&end), Err(Error::OutOfRange));
        assert_eq!(seq.step_back(&begin).unwrap_err(), Error::OutOfRange);
        assert!(seq.step_back(&end).unwrap().equals(&begin).unwrap());
    }

    #[test]
    fn collect_range_detects_reversed_bounds() {
        let mut seq = Sequence::new();
        let a = seq.push_back(1, ());
        let b = seq.push_back(2, ());

        let ids = seq.collect_range(&seq.cursor(a), &seq.end()).unwrap();
        assert_eq!(ids, vec![a, b]);
        assert_eq!(
            seq.collect_range(&seq.cursor(b), &seq.cursor(a)),
            Err(Error::UnreachableRange)
        );
    }

    #[test]
    fn iter_double_ended() {
        let mut seq = Sequence::new();
        for i in 0..5 {
            seq.push_back(i, ());
        }

        let mut iter = seq.iter();
        assert_eq!(iter.len(), 5);
        assert_eq!(iter.next(), Some(&0));
        assert_eq!(iter.next_back(), Some(&4));
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&3));
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);

        let rev: Vec<_> = seq.iter().rev().copied().collect();
        assert_eq!(rev, vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn clone_gets_fresh_identity() {
        let mut seq = Sequence::new();
        let a = seq.push_back(1u32, ());
        let copy = seq.clone();

        assert_eq!(copy.resolve(&seq.cursor(a)), Err(Error::ForeignCursor));
        assert_eq!(copy.iter().copied().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn relink_every_shape() {
        fn order(seq: &Sequence<u32, ()>) -> Vec<u32> {
            let forward: Vec<u32> = seq.iter().copied().collect();
            let mut backward: Vec<u32> = seq.iter().rev().copied().collect();
            backward.reverse();
            assert_eq!(forward, backward);
            assert_eq!(forward.len(), seq.len());
            forward
        }

        let mut seq = Sequence::new();
        let ids: Vec<NodeId> = (0..6).map(|v| seq.push_back(v, ())).collect();

        // Middle run to the front.
        seq.relink(ids[0], ids[2], ids[4]);
        assert_eq!(order(&seq), vec![2, 3, 0, 1, 4, 5]);
        assert_eq!(seq.head(), ids[2]);

        // Front run to the back.
        seq.relink(NodeId::NONE, ids[2], ids[0]);
        assert_eq!(order(&seq), vec![0, 1, 4, 5, 2, 3]);
        assert_eq!(seq.tail(), ids[3]);

        // Tail run into the middle.
        seq.relink(ids[4], ids[2], NodeId::NONE);
        assert_eq!(order(&seq), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(seq.tail(), ids[5]);

        // Already in place.
        seq.relink(ids[3], ids[1], ids[3]);
        assert_eq!(order(&seq), vec![0, 1, 2, 3, 4, 5]);

        // Single node one step back.
        seq.relink(ids[4], ids[5], NodeId::NONE);
        assert_eq!(order(&seq), vec![0, 1, 2, 3, 5, 4]);
        assert_eq!(seq.get(&seq.cursor(ids[5])), Ok(&5));
    }

    #[test]
    fn ids_follow_order() {
        let mut seq = Sequence::new();
        let b = seq.push_back(2u32, ());
        let a = seq.push_front(1, ());
        assert_eq!(seq.ids().collect::<Vec<_>>(), vec![a, b]);
    }
}
