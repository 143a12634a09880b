//! Ordered and hashed associative containers over a shared node sequence.
//!
//! Every container in this crate is the same engine: a doubly linked
//! sequence of nodes stored in a slab arena, plus one index that decides
//! where nodes go and how to find them.
//!
//! # Design
//!
//! ```text
//! Sequence (slab arena)  - owns the elements, defines iteration order
//! Index (tree / hash)    - refers to nodes by slot, never owns them
//! Cursor                 - (container, slot, stamp) handle, checked on use
//! ```
//!
//! Benefits:
//! - **Stable cursors**: insert and erase never invalidate cursors to other
//!   elements, and a rehash invalidates none at all
//! - **Checked handles**: a cursor from another container, or to an erased
//!   element, is reported as an [`Error`] instead of reading the wrong slot
//! - **One skeleton**: unique and multi, ordered and hashed variants share
//!   the insert and erase paths of [`Assoc`]
//!
//! # Quick Start
//!
//! ```
//! use nexus_assoc::{HashedSet, OrderedMultiSet};
//!
//! let mut set: OrderedMultiSet<&str> = OrderedMultiSet::new();
//! set.insert_iter(["b", "a", "c", "a"]);
//! assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec!["a", "a", "b", "c"]);
//! assert_eq!(set.count(&"a"), 2);
//!
//! // Erase by cursor; the returned cursor addresses the next element.
//! let (first, _) = set.equal_range(&"a");
//! let next = set.erase(&first).unwrap();
//! assert_eq!(set.value(&next), Ok(&"a"));
//!
//! let mut seen: HashedSet<u64> = HashedSet::new();
//! assert!(seen.insert(7).1);
//! assert!(!seen.insert(7).1);
//! ```
//!
//! # Cursor Rules
//!
//! Cursors are plain `Copy` values and do not borrow their container:
//!
//! ```
//! use nexus_assoc::{Error, OrderedSet};
//!
//! let mut a: OrderedSet<u32> = (0..4).collect();
//! let b: OrderedSet<u32> = (0..4).collect();
//!
//! let c = a.find(&2);
//! a.insert(10); // unrelated changes keep `c` valid
//! assert_eq!(a.value(&c), Ok(&2));
//!
//! // Wrong container: rejected, not misread.
//! assert_eq!(b.value(&c), Err(Error::ForeignCursor));
//!
//! // Erased element: rejected even if the slot is reused.
//! a.erase(&c).unwrap();
//! a.insert(11);
//! assert_eq!(a.value(&c), Err(Error::StaleCursor));
//! ```
//!
//! After `a.swap(&mut b)` cursors follow the elements: a cursor taken from
//! `a` is then valid for `b` and foreign to `a`.
//!
//! # Containers
//!
//! | Type | Index | Keys | Iteration order |
//! |------|-------|------|-----------------|
//! | [`OrderedSet`], [`OrderedMap`] | red-black tree | unique | ascending |
//! | [`OrderedMultiSet`], [`OrderedMultiMap`] | red-black tree | repeated | ascending, runs oldest first |
//! | [`HashedSet`], [`HashedMap`] | buckets | unique | insertion |
//! | [`HashedMultiSet`], [`HashedMultiMap`] | buckets | repeated | insertion, runs grouped |
//! | [`List`] | none | - | positional |
//!
//! # Logging
//!
//! Structural events go through the [`log`] facade: rehashes at `debug`,
//! load factor changes at `trace`.

#![warn(missing_docs)]

mod assoc;
mod cursor;
mod error;
mod hash;
mod index;
mod node;
mod policy;
mod sequence;
mod tree;

pub mod hashed;
pub mod list;
pub mod map;
pub mod ordered;

pub use assoc::Assoc;
pub use cursor::{Cursor, RevCursor};
pub use error::Error;
pub use hash::{HashConfig, Hashed};
pub use hashed::{BucketIter, HashedMap, HashedMultiMap, HashedMultiSet, HashedSet};
pub use index::IndexStrategy;
pub use list::List;
pub use ordered::{OrderedMap, OrderedMultiMap, OrderedMultiSet, OrderedSet};
pub use policy::{
    Compare, DefaultHashing, Duplicates, First, Identity, KeyHasher, KeyOf, Multi, Natural, Unique,
};
pub use sequence::Iter;
pub use tree::Tree;
