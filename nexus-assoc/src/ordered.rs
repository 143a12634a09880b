//! Ordered containers: the engine over a red-black [`Tree`].
//!
//! Iteration is always in ascending key order under the comparator, and
//! equal keys of multi containers are adjacent, oldest first.
//!
//! ```
//! use nexus_assoc::{OrderedMultiMap, OrderedSet};
//!
//! let mut set: OrderedSet<u32> = OrderedSet::new();
//! for v in [5, 3, 8, 1, 4] {
//!     set.insert(v);
//! }
//! assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![1, 3, 4, 5, 8]);
//!
//! let lb = set.lower_bound(&4);
//! let ub = set.upper_bound(&4);
//! assert_eq!(set.value(&lb), Ok(&4));
//! assert_eq!(set.value(&ub), Ok(&5));
//!
//! let mut tags: OrderedMultiMap<&str, u32> = OrderedMultiMap::new();
//! tags.insert(("a", 1));
//! tags.insert(("b", 2));
//! tags.insert(("a", 3));
//! assert_eq!(tags.count(&"a"), 2);
//! ```

use crate::assoc::Assoc;
use crate::policy::{Compare, Duplicates, First, Identity, KeyOf, Multi, Natural, Unique};
use crate::tree::Tree;
use crate::Cursor;

/// Ordered set of unique keys.
pub type OrderedSet<K, C = Natural> = Assoc<K, Identity, Tree<C>, Unique>;

/// Ordered set admitting equivalent keys.
pub type OrderedMultiSet<K, C = Natural> = Assoc<K, Identity, Tree<C>, Multi>;

/// Ordered map from unique keys to values.
pub type OrderedMap<K, V, C = Natural> = Assoc<(K, V), First, Tree<C>, Unique>;

/// Ordered map admitting equivalent keys.
pub type OrderedMultiMap<K, V, C = Natural> = Assoc<(K, V), First, Tree<C>, Multi>;

impl<T, P, C, D> Assoc<T, P, Tree<C>, D>
where
    P: KeyOf<T>,
    C: Compare<P::Key>,
    D: Duplicates,
{
    /// Creates an empty container ordered by `cmp`.
    pub fn with_compare(cmp: C) -> Self {
        Self::with_index(Tree::new(cmp))
    }

    /// Cursor to the first element whose key is not less than `key`.
    pub fn lower_bound(&self, key: &P::Key) -> Cursor {
        self.seq.cursor(self.index.lower_bound::<T, P>(&self.seq, key))
    }

    /// Cursor to the first element whose key is greater than `key`.
    pub fn upper_bound(&self, key: &P::Key) -> Cursor {
        self.seq.cursor(self.index.upper_bound::<T, P>(&self.seq, key))
    }

    /// The key comparator.
    #[inline]
    pub fn key_comp(&self) -> &C {
        self.index.compare()
    }

    /// A comparator over whole stored values, ordering them by key.
    pub fn value_comp(&self) -> impl Fn(&T, &T) -> bool + '_ {
        move |a: &T, b: &T| self.index.compare().less(P::key(a), P::key(b))
    }

    #[cfg(test)]
    pub(crate) fn check(&self) {
        self.index.validate::<T, P>(&self.seq);
    }
}
