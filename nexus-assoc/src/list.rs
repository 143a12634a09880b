//! Doubly linked list addressed by cursors.
//!
//! [`List`] exposes the element sequence that backs every associative
//! container as a container of its own. Nodes live in a slab arena, so
//! insertion and removal anywhere are O(1) and never disturb other
//! cursors.
//!
//! # Example
//!
//! ```
//! use nexus_assoc::List;
//!
//! let mut list: List<u32> = (1..=5).collect();
//!
//! // Erase the middle element; the returned cursor addresses its successor.
//! let mid = list.next(&list.next(&list.begin()).unwrap()).unwrap();
//! let after = list.erase(&mid).unwrap();
//! assert_eq!(list.value(&after), Ok(&4));
//! assert_eq!(list.len(), 4);
//!
//! let c = list.insert_before(&after, 3).unwrap();
//! assert_eq!(list.value(&c), Ok(&3));
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
//! ```
//!
//! # Splicing
//!
//! Within one list, [`List::splice_within`] relinks nodes in place and
//! every cursor stays valid. Lists do not share an arena, so `splice`
//! between lists moves values instead: the moved elements get new cursors
//! in the destination and their old cursors become stale.

use std::fmt;
use std::iter::FusedIterator;

use crate::node::NodeId;
use crate::sequence::{Iter, Sequence};
use crate::{Cursor, Error};

/// Doubly linked list over a slab arena.
pub struct List<T> {
    seq: Sequence<T, ()>,
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> List<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            seq: Sequence::new(),
        }
    }

    /// Creates an empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            seq: Sequence::with_capacity(capacity),
        }
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.seq.len()
    }

    /// Returns `true` if the list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    // ========================================================================
    // Cursors
    // ========================================================================

    /// Cursor to the first element, or `end()` if empty.
    #[inline]
    pub fn begin(&self) -> Cursor {
        self.seq.begin()
    }

    /// The past-the-end position.
    #[inline]
    pub fn end(&self) -> Cursor {
        self.seq.end()
    }

    /// Advances `cursor`; fails with [`Error::OutOfRange`] at `end()`.
    pub fn next(&self, cursor: &Cursor) -> Result<Cursor, Error> {
        self.seq.step_forward(cursor)
    }

    /// Moves `cursor` back; fails with [`Error::OutOfRange`] at `begin()`.
    pub fn prev(&self, cursor: &Cursor) -> Result<Cursor, Error> {
        self.seq.step_back(cursor)
    }

    /// Returns the element at `cursor`.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] for `end()`; [`Error::ForeignCursor`] or
    /// [`Error::StaleCursor`] if `cursor` does not address a live element.
    pub fn value(&self, cursor: &Cursor) -> Result<&T, Error> {
        self.seq.get(cursor)
    }

    /// Mutable access to the element at `cursor`.
    pub fn value_mut(&mut self, cursor: &Cursor) -> Result<&mut T, Error> {
        let id = self.seq.resolve_element(cursor)?;
        Ok(self.seq.value_mut(id))
    }

    // ========================================================================
    // Ends
    // ========================================================================

    /// Returns the first element.
    pub fn front(&self) -> Option<&T> {
        let head = self.seq.head();
        head.is_some().then(|| self.seq.value(head))
    }

    /// Returns the last element.
    pub fn back(&self) -> Option<&T> {
        let tail = self.seq.tail();
        tail.is_some().then(|| self.seq.value(tail))
    }

    /// Mutable access to the first element.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        let head = self.seq.head();
        if head.is_none() {
            return None;
        }
        Some(self.seq.value_mut(head))
    }

    /// Mutable access to the last element.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        let tail = self.seq.tail();
        if tail.is_none() {
            return None;
        }
        Some(self.seq.value_mut(tail))
    }

    /// Prepends `value`, returning its cursor.
    pub fn push_front(&mut self, value: T) -> Cursor {
        let id = self.seq.push_front(value, ());
        self.seq.cursor(id)
    }

    /// Appends `value`, returning its cursor.
    pub fn push_back(&mut self, value: T) -> Cursor {
        let id = self.seq.push_back(value, ());
        self.seq.cursor(id)
    }

    /// Removes and returns the first element.
    pub fn pop_front(&mut self) -> Option<T> {
        self.seq.pop_front()
    }

    /// Removes and returns the last element.
    pub fn pop_back(&mut self) -> Option<T> {
        self.seq.pop_back()
    }

    // ========================================================================
    // Positional insert / erase
    // ========================================================================

    /// Inserts `value` before `pos` (`end()` appends).
    ///
    /// # Errors
    ///
    /// Fails if `pos` does not belong to this list or is stale; nothing is
    /// inserted.
    pub fn insert_before(&mut self, pos: &Cursor, value: T) -> Result<Cursor, Error> {
        let before = self.seq.resolve(pos)?;
        let id = self.seq.insert_before(before, value, ());
        Ok(self.seq.cursor(id))
    }

    /// Removes the element at `pos`, returning a cursor to its successor.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] for `end()`.
    pub fn erase(&mut self, pos: &Cursor) -> Result<Cursor, Error> {
        let id = self.seq.resolve_element(pos)?;
        let (_, next) = self.seq.remove(id);
        Ok(self.seq.cursor(next))
    }

    /// Removes `[first, last)`, returning `last`.
    ///
    /// # Errors
    ///
    /// [`Error::UnreachableRange`] if `last` does not follow `first`.
    /// Nothing is removed on failure.
    pub fn erase_range(&mut self, first: &Cursor, last: &Cursor) -> Result<Cursor, Error> {
        let ids = self.seq.collect_range(first, last)?;
        let last = self.seq.resolve(last)?;
        if let Some(&first) = ids.first() {
            self.seq.erase_range(first, last);
        }
        Ok(self.seq.cursor(last))
    }

    /// Removes and returns the element at `pos`.
    pub fn remove(&mut self, pos: &Cursor) -> Result<T, Error> {
        let id = self.seq.resolve_element(pos)?;
        Ok(self.seq.remove(id).0)
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.seq.clear();
    }

    // ========================================================================
    // Splicing
    // ========================================================================

    /// Moves every element of `other` before `pos`, leaving `other` empty.
    ///
    /// # Errors
    ///
    /// Fails if `pos` does not belong to this list; both lists are
    /// unchanged.
    pub fn splice(&mut self, pos: &Cursor, other: &mut List<T>) -> Result<(), Error> {
        let before = self.seq.resolve(pos)?;
        while let Some(value) = other.seq.pop_front() {
            self.seq.insert_before(before, value, ());
        }
        Ok(())
    }

    /// Moves `[first, last)` of `other` before `pos`.
    ///
    /// # Errors
    ///
    /// Fails if `pos` does not belong to this list, or the range is not a
    /// valid range of `other`; both lists are unchanged.
    pub fn splice_range(
        &mut self,
        pos: &Cursor,
        other: &mut List<T>,
        first: &Cursor,
        last: &Cursor,
    ) -> Result<(), Error> {
        let before = self.seq.resolve(pos)?;
        let ids = other.seq.collect_range(first, last)?;
        for id in ids {
            let (value, _) = other.seq.remove(id);
            self.seq.insert_before(before, value, ());
        }
        Ok(())
    }

    /// Moves `[first, last)` of this list before `pos` by relinking nodes.
    ///
    /// Cursors to the moved elements stay valid. Checking the range walks
    /// it once; the move itself is constant time.
    ///
    /// # Errors
    ///
    /// [`Error::UnreachableRange`] if `last` does not follow `first`,
    /// [`Error::PositionInRange`] if `pos` lies inside `[first, last)`.
    /// The list is unchanged on failure.
    pub fn splice_within(
        &mut self,
        pos: &Cursor,
        first: &Cursor,
        last: &Cursor,
    ) -> Result<(), Error> {
        let before = self.seq.resolve(pos)?;
        let ids = self.seq.collect_range(first, last)?;
        if ids.contains(&before) {
            return Err(Error::PositionInRange);
        }
        if let Some(&head) = ids.first() {
            let last = self.seq.resolve(last)?;
            self.seq.relink(before, head, last);
        }
        Ok(())
    }

    /// Moves every element of `other` to the back of this list.
    pub fn append(&mut self, other: &mut List<T>) {
        while let Some(value) = other.seq.pop_front() {
            self.seq.insert_before(NodeId::NONE, value, ());
        }
    }

    /// Iterates front to back.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T, ()> {
        self.seq.iter()
    }
}

// =============================================================================
// Trait impls
// =============================================================================

impl<T: Clone> Clone for List<T> {
    fn clone(&self) -> Self {
        Self {
            seq: self.seq.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for List<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for List<T> {}

impl<T> Extend<T> for List<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.seq.push_back(value, ());
        }
    }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, ()>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for List<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { list: self }
    }
}

/// Owning iterator over a [`List`].
pub struct IntoIter<T> {
    list: List<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.list.pop_front()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.list.pop_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(list: &List<u32>) -> Vec<u32> {
        list.iter().copied().collect()
    }

    #[test]
    fn new_list_is_empty() {
        let list: List<u32> = List::new();
        assert!(list.is_empty());
        assert_eq!(list.front(), None);
        assert_eq!(list.back(), None);
        assert!(list.begin().equals(&list.end()).unwrap());
    }

    #[test]
    fn push_and_pop_both_ends() {
        let mut list = List::new();
        list.push_back(2);
        list.push_front(1);
        list.push_back(3);
        assert_eq!(collect(&list), vec![1, 2, 3]);
        assert_eq!(list.pop_front(), Some(1));
        assert_eq!(list.pop_back(), Some(3));
        assert_eq!(list.pop_back(), Some(2));
        assert_eq!(list.pop_back(), None);
    }

    #[test]
    fn front_and_back_mut() {
        let mut list: List<u32> = (1..=3).collect();
        *list.front_mut().unwrap() += 10;
        *list.back_mut().unwrap() += 20;
        assert_eq!(collect(&list), vec![11, 2, 23]);
    }

    #[test]
    fn erase_middle_returns_successor() {
        let mut list: List<u32> = (1..=5).collect();
        let mut c = list.begin();
        for _ in 0..2 {
            c = list.next(&c).unwrap();
        }
        let after = list.erase(&c).unwrap();
        assert_eq!(list.value(&after), Ok(&4));
        assert_eq!(list.len(), 4);
        assert_eq!(list.value(&c), Err(Error::StaleCursor));
    }

    #[test]
    fn erase_end_is_out_of_range() {
        let mut list: List<u32> = (1..=2).collect();
        let end = list.end();
        assert_eq!(list.erase(&end).unwrap_err(), Error::OutOfRange);
        assert_eq!(list.value(&end), Err(Error::OutOfRange));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn insert_before_keeps_other_cursors() {
        let mut list: List<u32> = List::new();
        let a = list.push_back(1);
        let c = list.push_back(3);
        let b = list.insert_before(&c, 2).unwrap();
        list.insert_before(&list.end(), 4).unwrap();
        assert_eq!(collect(&list), vec![1, 2, 3, 4]);
        assert_eq!(list.value(&a), Ok(&1));
        assert_eq!(list.value(&b), Ok(&2));
        assert_eq!(list.value(&c), Ok(&3));
    }

    #[test]
    fn erase_range_and_unreachable() {
        let mut list: List<u32> = (0..6).collect();
        let first = list.next(&list.begin()).unwrap();
        let last = list.prev(&list.end()).unwrap();

        assert_eq!(list.erase_range(&last, &first).unwrap_err(), Error::UnreachableRange);
        assert_eq!(list.len(), 6);

        let ret = list.erase_range(&first, &last).unwrap();
        assert!(ret.equals(&last).unwrap());
        assert_eq!(collect(&list), vec![0, 5]);

        let ret = list.erase_range(&last, &last).unwrap();
        assert_eq!(list.value(&ret), Ok(&5));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn foreign_cursor_rejected() {
        let mut a: List<u32> = (0..3).collect();
        let b: List<u32> = (0..3).collect();
        let c = b.begin();
        assert_eq!(a.value(&c), Err(Error::ForeignCursor));
        assert_eq!(a.insert_before(&c, 9).unwrap_err(), Error::ForeignCursor);
        assert_eq!(a.erase(&c).unwrap_err(), Error::ForeignCursor);
        assert!(a.begin().equals(&c).is_err());
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn splice_whole_list() {
        let mut a: List<u32> = [1, 4].into_iter().collect();
        let mut b: List<u32> = [2, 3].into_iter().collect();
        let pos = a.prev(&a.end()).unwrap();
        a.splice(&pos, &mut b).unwrap();
        assert_eq!(collect(&a), vec![1, 2, 3, 4]);
        assert!(b.is_empty());
    }

    #[test]
    fn splice_within_keeps_cursors() {
        let mut list: List<u32> = (1..=6).collect();
        let cursors: Vec<Cursor> = {
            let mut out = Vec::new();
            let mut c = list.begin();
            while !c.is_end() {
                out.push(c);
                c = list.next(&c).unwrap();
            }
            out
        };

        // [3, 5) to the front.
        list.splice_within(&cursors[0], &cursors[2], &cursors[4]).unwrap();
        assert_eq!(collect(&list), vec![3, 4, 1, 2, 5, 6]);

        // [1, 2] to the back.
        list.splice_within(&list.end(), &cursors[0], &cursors[4]).unwrap();
        assert_eq!(collect(&list), vec![3, 4, 5, 6, 1, 2]);
        assert_eq!(list.len(), 6);

        for (c, v) in cursors.iter().zip(1..) {
            assert_eq!(list.value(c), Ok(&v));
        }
        assert_eq!(list.front(), Some(&3));
        assert_eq!(list.back(), Some(&2));
        assert_eq!(list.prev(&list.end()).map(|c| *list.value(&c).unwrap()), Ok(2));
    }

    #[test]
    fn splice_within_rejects_bad_positions() {
        let mut list: List<u32> = (1..=4).collect();
        let first = list.begin();
        let second = list.next(&first).unwrap();
        let third = list.next(&second).unwrap();

        assert_eq!(list.splice_within(&second, &first, &third), Err(Error::PositionInRange));
        assert_eq!(list.splice_within(&first, &third, &second), Err(Error::UnreachableRange));
        assert_eq!(collect(&list), vec![1, 2, 3, 4]);

        // Empty range is a no-op.
        list.splice_within(&first, &third, &third).unwrap();
        assert_eq!(collect(&list), vec![1, 2, 3, 4]);
    }

    #[test]
    fn splice_range_moves_subrange() {
        let mut a: List<u32> = [0, 9].into_iter().collect();
        let mut b: List<u32> = (1..=5).collect();
        let first = b.next(&b.begin()).unwrap();
        let last = b.prev(&b.end()).unwrap();
        let pos = a.prev(&a.end()).unwrap();

        a.splice_range(&pos, &mut b, &first, &last).unwrap();
        assert_eq!(collect(&a), vec![0, 2, 3, 4, 9]);
        assert_eq!(collect(&b), vec![1, 5]);
        assert_eq!(b.value(&first), Err(Error::StaleCursor));

        // Invalid range: nothing moves.
        let bad = a.begin();
        assert!(a.splice_range(&pos, &mut b, &bad, &last).is_err());
        assert_eq!(collect(&b), vec![1, 5]);
    }

    #[test]
    fn append_and_into_iter() {
        let mut a: List<u32> = (0..2).collect();
        let mut b: List<u32> = (2..4).collect();
        a.append(&mut b);
        assert!(b.is_empty());
        assert_eq!(a.clone().into_iter().rev().collect::<Vec<_>>(), vec![3, 2, 1, 0]);
        assert_eq!(a.into_iter().len(), 4);
    }

    #[test]
    fn clone_eq_and_debug() {
        let a: List<u32> = (1..=3).collect();
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(format!("{b:?}"), "[1, 2, 3]");
        assert_eq!(b.value(&a.begin()), Err(Error::ForeignCursor));
    }

    #[test]
    fn remove_returns_value() {
        let mut list: List<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
        let c = list.begin();
        assert_eq!(list.remove(&c).as_deref(), Ok("a"));
        assert_eq!(list.front().map(String::as_str), Some("b"));
    }
}
