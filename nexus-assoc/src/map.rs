//! Map helpers for containers of `(key, value)` pairs.
//!
//! Keys are read-only once stored: mutable access is only ever handed out
//! for the value half of a pair, so the index never goes out of sync.

use crate::assoc::Assoc;
use crate::index::IndexStrategy;
use crate::policy::{Duplicates, First};
use crate::{Cursor, Error};

impl<K, V, X, D> Assoc<(K, V), First, X, D>
where
    X: IndexStrategy<(K, V), First>,
    D: Duplicates,
{
    /// Value of an element with key `key`; the first of its run in multi
    /// maps.
    pub fn get(&self, key: &K) -> Option<&V> {
        let id = self.index.find(&self.seq, key);
        id.is_some().then(|| &self.seq.value(id).1)
    }

    /// Mutable value of an element with key `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.index.find(&self.seq, key);
        if id.is_none() {
            return None;
        }
        Some(&mut self.seq.value_mut(id).1)
    }

    /// Mutable value of the element at `cursor`.
    ///
    /// # Errors
    ///
    /// Same as [`value`](Assoc::value).
    pub fn value_mut(&mut self, cursor: &Cursor) -> Result<&mut V, Error> {
        let id = self.seq.resolve_element(cursor)?;
        Ok(&mut self.seq.value_mut(id).1)
    }

    /// Keys in container order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator + '_ {
        self.seq.iter().map(|(k, _)| k)
    }

    /// Values in container order.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator + '_ {
        self.seq.iter().map(|(_, v)| v)
    }
}
