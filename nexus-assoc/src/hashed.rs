//! Hashed containers: the engine over a bucketed [`Hashed`] index.
//!
//! Iteration follows insertion order, except that equal keys of multi
//! containers are grouped: a duplicate is placed right after the run of
//! its key.
//!
//! ```
//! use nexus_assoc::{HashConfig, HashedMap, HashedSet};
//!
//! let mut set: HashedSet<u32> = HashedSet::new();
//! set.insert_iter([3, 1, 2]);
//! assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![3, 1, 2]);
//! assert!(set.load_factor() <= set.max_load_factor());
//!
//! let config = HashConfig { buckets: 64, max_load_factor: 0.75 };
//! let mut map: HashedMap<&str, u32> = HashedMap::with_config(Default::default(), config).unwrap();
//! map.insert(("x", 1));
//! assert_eq!(map.bucket_count(), 64);
//! assert_eq!(map.get(&"x"), Some(&1));
//! ```

use std::iter::FusedIterator;
use std::slice;

use crate::assoc::Assoc;
use crate::hash::{max_bucket_count, HashConfig, Hashed};
use crate::node::NodeId;
use crate::policy::{DefaultHashing, Duplicates, First, Identity, KeyHasher, KeyOf, Multi, Unique};
use crate::sequence::Sequence;
use crate::Error;

/// Hashed set of unique keys.
pub type HashedSet<K, H = DefaultHashing> = Assoc<K, Identity, Hashed<H>, Unique>;

/// Hashed set admitting equal keys.
pub type HashedMultiSet<K, H = DefaultHashing> = Assoc<K, Identity, Hashed<H>, Multi>;

/// Hashed map from unique keys to values.
pub type HashedMap<K, V, H = DefaultHashing> = Assoc<(K, V), First, Hashed<H>, Unique>;

/// Hashed map admitting equal keys.
pub type HashedMultiMap<K, V, H = DefaultHashing> = Assoc<(K, V), First, Hashed<H>, Multi>;

impl<T, P, H, D> Assoc<T, P, Hashed<H>, D>
where
    P: KeyOf<T>,
    H: KeyHasher<P::Key>,
    D: Duplicates,
{
    /// Creates an empty container using `hasher`.
    pub fn with_hasher(hasher: H) -> Self {
        Self::with_index(Hashed::new(hasher))
    }

    /// Creates an empty container using `hasher` and `config`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidLoadFactor`] if the configured max load factor is
    /// not finite and positive.
    pub fn with_config(hasher: H, config: HashConfig) -> Result<Self, Error> {
        Ok(Self::with_index(Hashed::with_config(hasher, config)?))
    }

    /// The hash policy.
    #[inline]
    pub fn hasher(&self) -> &H {
        self.index.hasher()
    }

    /// Number of buckets.
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.index.bucket_count()
    }

    /// Number of elements in bucket `bucket`.
    ///
    /// # Errors
    ///
    /// [`Error::BucketOutOfRange`] if `bucket >= bucket_count()`.
    pub fn bucket_size(&self, bucket: usize) -> Result<usize, Error> {
        self.bucket_ids(bucket).map(<[NodeId]>::len)
    }

    /// The bucket `key` hashes to.
    #[inline]
    pub fn bucket(&self, key: &P::Key) -> usize {
        self.index.bucket_of(key)
    }

    /// Iterates the elements of one bucket.
    ///
    /// # Errors
    ///
    /// [`Error::BucketOutOfRange`] if `bucket >= bucket_count()`.
    pub fn bucket_iter(&self, bucket: usize) -> Result<BucketIter<'_, T>, Error> {
        Ok(BucketIter {
            seq: &self.seq,
            ids: self.bucket_ids(bucket)?.iter(),
        })
    }

    fn bucket_ids(&self, bucket: usize) -> Result<&[NodeId], Error> {
        self.index.bucket(bucket).ok_or(Error::BucketOutOfRange {
            bucket,
            count: self.index.bucket_count(),
        })
    }

    /// Current `len / bucket_count`.
    #[inline]
    pub fn load_factor(&self) -> f32 {
        self.index.load_factor(self.seq.len())
    }

    /// Load factor above which the bucket array grows.
    #[inline]
    pub fn max_load_factor(&self) -> f32 {
        self.index.max_load_factor()
    }

    /// Sets the max load factor, rehashing now if it is already exceeded.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidLoadFactor`] unless `factor` is finite and positive,
    /// or if the current elements would need more than
    /// [`max_bucket_count`](Self::max_bucket_count) buckets at `factor`.
    /// The container is unchanged.
    pub fn set_max_load_factor(&mut self, factor: f32) -> Result<(), Error> {
        self.index.set_max_load_factor::<T, P>(&self.seq, factor)
    }

    /// Grows the bucket array to at least `buckets`. Never shrinks.
    ///
    /// Cursors stay valid; only bucket membership changes.
    ///
    /// # Errors
    ///
    /// [`Error::CapacityOverflow`] if `buckets` exceeds
    /// [`max_bucket_count`](Self::max_bucket_count); the container is
    /// unchanged.
    pub fn rehash(&mut self, buckets: usize) -> Result<(), Error> {
        self.index.rehash::<T, P>(&self.seq, buckets)
    }

    /// Makes room for `count` elements without exceeding the max load
    /// factor.
    ///
    /// # Errors
    ///
    /// [`Error::CapacityOverflow`] if that takes more than
    /// [`max_bucket_count`](Self::max_bucket_count) buckets.
    pub fn reserve(&mut self, count: usize) -> Result<(), Error> {
        self.index.reserve::<T, P>(&self.seq, count)
    }

    /// Largest bucket count the container can grow to.
    #[inline]
    pub fn max_bucket_count(&self) -> usize {
        max_bucket_count()
    }

    #[cfg(test)]
    pub(crate) fn check(&self) {
        self.index.validate::<T, P>(&self.seq);
    }
}

/// Iterator over the elements of one bucket.
pub struct BucketIter<'a, T> {
    seq: &'a Sequence<T, ()>,
    ids: slice::Iter<'a, NodeId>,
}

impl<'a, T> Iterator for BucketIter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let seq = self.seq;
        self.ids.next().map(|&id| seq.value(id))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl<T> ExactSizeIterator for BucketIter<'_, T> {}

impl<T> FusedIterator for BucketIter<'_, T> {}
