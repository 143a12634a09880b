//! The associative container engine shared by all eight variants.
//!
//! [`Assoc`] composes an element [`Sequence`] with one index and two
//! policies:
//!
//! ```text
//! Assoc<T, P, X, D>
//!        │  │  │  └── Duplicates: Unique | Multi
//!        │  │  └───── IndexStrategy: Tree<C> | Hashed<H>
//!        │  └──────── KeyOf: Identity (sets) | First (maps)
//!        └─────────── stored value
//! ```
//!
//! Every insert and erase runs the same skeleton regardless of variant:
//! the index decides, the sequence stores, the index records. Inputs are
//! validated before anything is touched, so an `Err` leaves the container
//! unchanged.
//!
//! The ordered-only and hashed-only surfaces live in [`ordered`](crate::ordered)
//! and [`hashed`](crate::hashed); map helpers in [`map`](crate::map).

use std::fmt;
use std::marker::PhantomData;

use crate::index::IndexStrategy;
use crate::node::NodeId;
use crate::policy::{Duplicates, KeyOf};
use crate::sequence::{Iter, Sequence};
use crate::{Cursor, Error, RevCursor};

/// Associative container over a shared node sequence.
///
/// Use the aliases ([`OrderedSet`](crate::OrderedSet),
/// [`HashedMultiMap`](crate::HashedMultiMap), ...) rather than naming this
/// type directly.
pub struct Assoc<T, P, X, D>
where
    P: KeyOf<T>,
    X: IndexStrategy<T, P>,
{
    pub(crate) seq: Sequence<T, X::Link>,
    pub(crate) index: X,
    _marker: PhantomData<fn() -> (P, D)>,
}

impl<T, P, X, D> Default for Assoc<T, P, X, D>
where
    P: KeyOf<T>,
    X: IndexStrategy<T, P> + Default,
    D: Duplicates,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P, X, D> Assoc<T, P, X, D>
where
    P: KeyOf<T>,
    X: IndexStrategy<T, P>,
    D: Duplicates,
{
    /// Creates an empty container with a default-constructed policy.
    pub fn new() -> Self
    where
        X: Default,
    {
        Self::with_index(X::default())
    }

    pub(crate) fn with_index(index: X) -> Self {
        Self {
            seq: Sequence::new(),
            index,
            _marker: PhantomData,
        }
    }

    /// Copies `[first, last)` of `src` into a new container with the same
    /// policy.
    ///
    /// # Errors
    ///
    /// Fails if either cursor does not belong to `src`, or `last` does not
    /// follow `first`.
    pub fn from_range(src: &Self, first: &Cursor, last: &Cursor) -> Result<Self, Error>
    where
        T: Clone,
        X: Clone,
    {
        let ids = src.seq.collect_range(first, last)?;
        let mut index = src.index.clone();
        index.clear();

        let mut out = Self::with_index(index);
        out.insert_iter(ids.into_iter().map(|id| src.seq.value(id).clone()));
        Ok(out)
    }

    // ========================================================================
    // Size
    // ========================================================================

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.seq.len()
    }

    /// Returns `true` if the container holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// Removes every element. All cursors except `end()` become stale.
    pub fn clear(&mut self) {
        self.index.clear();
        self.seq.clear();
    }

    /// Exchanges the contents of two containers in O(1).
    ///
    /// Cursors follow their elements: a cursor taken from `self` before the
    /// swap is accepted by `other` afterwards and rejected by `self`.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
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

    /// Reverse cursor to the last element.
    #[inline]
    pub fn rbegin(&self) -> RevCursor {
        RevCursor::new(self.end())
    }

    /// The reverse past-the-end position.
    #[inline]
    pub fn rend(&self) -> RevCursor {
        RevCursor::new(self.begin())
    }

    /// Returns the element at `cursor`.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] for `end()`; [`Error::ForeignCursor`] or
    /// [`Error::StaleCursor`] for a cursor that does not address a live
    /// element of this container.
    pub fn value(&self, cursor: &Cursor) -> Result<&T, Error> {
        self.seq.get(cursor)
    }

    /// Advances `cursor` by one position.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] when `cursor` is already `end()`.
    pub fn next(&self, cursor: &Cursor) -> Result<Cursor, Error> {
        self.seq.step_forward(cursor)
    }

    /// Moves `cursor` back by one position.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] when `cursor` is `begin()`.
    pub fn prev(&self, cursor: &Cursor) -> Result<Cursor, Error> {
        self.seq.step_back(cursor)
    }

    /// Returns the element one position before the reverse cursor's base.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] for `rend()`.
    pub fn rvalue(&self, cursor: &RevCursor) -> Result<&T, Error> {
        let base = self.seq.resolve(&cursor.base())?;
        let id = self.seq.prev(base);
        if id.is_none() {
            return Err(Error::OutOfRange);
        }
        Ok(self.seq.value(id))
    }

    /// Advances a reverse cursor (towards the front).
    pub fn rnext(&self, cursor: &RevCursor) -> Result<RevCursor, Error> {
        Ok(RevCursor::new(self.seq.step_back(&cursor.base())?))
    }

    /// Moves a reverse cursor back (towards the end).
    pub fn rprev(&self, cursor: &RevCursor) -> Result<RevCursor, Error> {
        Ok(RevCursor::new(self.seq.step_forward(&cursor.base())?))
    }

    /// Iterates elements in container order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T, X::Link> {
        self.seq.iter()
    }

    /// Returns the first element.
    pub fn first(&self) -> Option<&T> {
        let head = self.seq.head();
        head.is_some().then(|| self.seq.value(head))
    }

    /// Returns the last element.
    pub fn last(&self) -> Option<&T> {
        let tail = self.seq.tail();
        tail.is_some().then(|| self.seq.value(tail))
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Cursor to an element with key `key`, or `end()`.
    ///
    /// In multi containers this is the first element of the key's run.
    pub fn find(&self, key: &P::Key) -> Cursor {
        self.seq.cursor(self.index.find(&self.seq, key))
    }

    /// Returns `true` if an element with key `key` is present.
    pub fn contains_key(&self, key: &P::Key) -> bool {
        self.index.find(&self.seq, key).is_some()
    }

    /// Number of elements with key `key`.
    pub fn count(&self, key: &P::Key) -> usize {
        let (mut id, last) = self.index.equal_range(&self.seq, key);
        let mut n = 0;
        while id != last {
            n += 1;
            id = self.seq.next(id);
        }
        n
    }

    /// Half-open cursor range of the elements with key `key`.
    ///
    /// When there is none the range is empty: ordered containers place it
    /// at the key's insertion point, hashed containers at `end()`.
    pub fn equal_range(&self, key: &P::Key) -> (Cursor, Cursor) {
        let (first, last) = self.index.equal_range(&self.seq, key);
        (self.seq.cursor(first), self.seq.cursor(last))
    }

    // ========================================================================
    // Insert
    // ========================================================================

    /// Inserts `value`.
    ///
    /// Returns the element's cursor and `true`, or, when a unique container
    /// already holds the key, the existing element's cursor and `false`
    /// (and `value` is dropped).
    pub fn insert(&mut self, value: T) -> (Cursor, bool) {
        let (id, inserted) = self.insert_one(value);
        if inserted {
            self.index.grow(&self.seq);
        }
        (self.seq.cursor(id), inserted)
    }

    /// Inserts `value`, trying the spot directly before `hint` first.
    ///
    /// A hint inconsistent with the index is ignored and a full search is
    /// done instead. Reports like [`insert`](Self::insert): on a unique
    /// collision the existing element's cursor and `false`.
    ///
    /// # Errors
    ///
    /// Fails if `hint` does not belong to this container or is stale.
    pub fn insert_hint(&mut self, hint: &Cursor, value: T) -> Result<(Cursor, bool), Error> {
        let hint = self.seq.resolve(hint)?;

        let key = P::key(&value);
        let placement = match self.index.locate_near(&self.seq, hint, key, D::UNIQUE) {
            Some(placement) => placement,
            None => match self.index.locate(&self.seq, key, D::UNIQUE) {
                Ok(placement) => placement,
                Err(existing) => return Ok((self.seq.cursor(existing), false)),
            },
        };

        let id = self.place(placement, value);
        self.index.grow(&self.seq);
        Ok((self.seq.cursor(id), true))
    }

    /// Inserts every value as a batch. The index checks its growth once,
    /// after the accepted values are in.
    pub fn insert_iter<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        let values = values.into_iter();
        self.seq.reserve(values.size_hint().0);
        for value in values {
            self.insert_one(value);
        }
        self.index.grow(&self.seq);
    }

    /// Inserts copies of `[first, last)` of another container of the same
    /// kind.
    ///
    /// # Errors
    ///
    /// Fails if either cursor does not belong to `src`, or `last` does not
    /// follow `first`. Nothing is inserted on failure.
    pub fn insert_range(&mut self, src: &Self, first: &Cursor, last: &Cursor) -> Result<(), Error>
    where
        T: Clone,
    {
        let ids = src.seq.collect_range(first, last)?;
        self.insert_iter(ids.into_iter().map(|id| src.seq.value(id).clone()));
        Ok(())
    }

    /// Inserts without the post-insert growth check.
    fn insert_one(&mut self, value: T) -> (NodeId, bool) {
        match self.index.locate(&self.seq, P::key(&value), D::UNIQUE) {
            Ok(placement) => (self.place(placement, value), true),
            Err(existing) => (existing, false),
        }
    }

    fn place(&mut self, placement: X::Placement, value: T) -> NodeId {
        let before = self.index.position(&self.seq, &placement);
        let id = self.seq.insert_before(before, value, X::Link::default());
        self.index.attach(&mut self.seq, id, placement);
        id
    }

    // ========================================================================
    // Erase
    // ========================================================================

    /// Removes every element with key `key`. Returns how many were removed.
    pub fn erase_key(&mut self, key: &P::Key) -> usize {
        let (first, last) = self.index.equal_range(&self.seq, key);
        self.erase_nodes(first, last)
    }

    /// Removes the element at `cursor`. Returns a cursor to the element
    /// that followed it.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] for `end()`; [`Error::ForeignCursor`] or
    /// [`Error::StaleCursor`] for a cursor not addressing a live element.
    pub fn erase(&mut self, cursor: &Cursor) -> Result<Cursor, Error> {
        let id = self.seq.resolve_element(cursor)?;
        self.index.detach(&mut self.seq, id);
        let (_, next) = self.seq.remove(id);
        Ok(self.seq.cursor(next))
    }

    /// Removes `[first, last)`. Returns `last`.
    ///
    /// # Errors
    ///
    /// Fails if either cursor does not belong to this container, or
    /// `last` does not follow `first`. Nothing is removed on failure.
    pub fn erase_range(&mut self, first: &Cursor, last: &Cursor) -> Result<Cursor, Error> {
        let ids = self.seq.collect_range(first, last)?;
        let last = self.seq.resolve(last)?;
        if let Some(&first) = ids.first() {
            for &id in &ids {
                self.index.detach(&mut self.seq, id);
            }
            self.seq.erase_range(first, last);
        }
        Ok(self.seq.cursor(last))
    }

    /// Detaches `[first, last)` from the index, then drops it from the
    /// sequence.
    fn erase_nodes(&mut self, first: NodeId, last: NodeId) -> usize {
        let mut id = first;
        while id != last {
            // Detach in order; the sequence stays intact until the end.
            let next = self.seq.next(id);
            self.index.detach(&mut self.seq, id);
            id = next;
        }
        self.seq.erase_range(first, last)
    }
}

// =============================================================================
// Trait impls
// =============================================================================

impl<T, P, X, D> Clone for Assoc<T, P, X, D>
where
    T: Clone,
    P: KeyOf<T>,
    X: IndexStrategy<T, P> + Clone,
    X::Link: Clone,
{
    /// Deep copy with a fresh identity: cursors into `self` are foreign to
    /// the copy.
    fn clone(&self) -> Self {
        Self {
            seq: self.seq.clone(),
            index: self.index.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T, P, X, D> fmt::Debug for Assoc<T, P, X, D>
where
    T: fmt::Debug,
    P: KeyOf<T>,
    X: IndexStrategy<T, P>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.seq.iter()).finish()
    }
}

impl<T, P, X, D> Extend<T> for Assoc<T, P, X, D>
where
    P: KeyOf<T>,
    X: IndexStrategy<T, P>,
    D: Duplicates,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_iter(iter);
    }
}

impl<T, P, X, D> FromIterator<T> for Assoc<T, P, X, D>
where
    P: KeyOf<T>,
    X: IndexStrategy<T, P> + Default,
    D: Duplicates,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut out = Self::new();
        out.insert_iter(iter);
        out
    }
}

impl<'a, T, P, X, D> IntoIterator for &'a Assoc<T, P, X, D>
where
    P: KeyOf<T>,
    X: IndexStrategy<T, P>,
    D: Duplicates,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T, X::Link>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
