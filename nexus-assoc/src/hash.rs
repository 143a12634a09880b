//! Hash index: a growable array of buckets holding node ids.
//!
//! ```text
//! buckets[0]: [n4]
//! buckets[1]: [n0, n7, n2]      bucket = hash(key) mod bucket_count
//! buckets[2]: []
//! ```
//!
//! Buckets only hold ids; elements stay in the sequence, which keeps
//! insertion order (equal keys of multi containers grouped together). A
//! rehash rebuilds the bucket array from the sequence and never touches
//! the nodes, so cursors survive it.
//!
//! # Growth
//!
//! After an insert, if `len / bucket_count > max_load_factor`, the array
//! grows to `max(2 * bucket_count + 1, ceil(len / max_load_factor))`.
//! Batch inserts check once, after the accepted elements are in.
//!
//! Bucket counts are capped at [`max_bucket_count`]. Requests past the cap
//! fail before anything changes; growth that a tiny load factor would push
//! past it falls back to doubling.

use log::{debug, trace};

use crate::index::IndexStrategy;
use crate::node::NodeId;
use crate::policy::{KeyHasher, KeyOf};
use crate::sequence::Sequence;
use crate::Error;

/// Tuning for a hash index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HashConfig {
    /// Initial bucket count. Zero is treated as one.
    pub buckets: usize,
    /// Load factor above which the index grows.
    pub max_load_factor: f32,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            buckets: 1,
            max_load_factor: 1.0,
        }
    }
}

impl HashConfig {
    /// Checks that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLoadFactor`] unless `max_load_factor` is
    /// finite and positive.
    pub fn validate(&self) -> Result<(), Error> {
        check_load_factor(self.max_load_factor)
    }
}

fn check_load_factor(factor: f32) -> Result<(), Error> {
    if factor.is_finite() && factor > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidLoadFactor(factor))
    }
}

/// Where a new node goes: its bucket, and the sequence node it precedes.
#[derive(Debug, Clone, Copy)]
pub struct HashPlacement {
    bucket: usize,
    before: NodeId,
}

/// Bucketed hash index keyed by a [`KeyHasher`] policy.
#[derive(Debug, Clone)]
pub struct Hashed<H> {
    buckets: Vec<Vec<NodeId>>,
    hasher: H,
    max_load_factor: f32,
}

impl<H: Default> Default for Hashed<H> {
    fn default() -> Self {
        Self::new(H::default())
    }
}

impl<H> Hashed<H> {
    /// Creates an index with the default configuration.
    pub fn new(hasher: H) -> Self {
        let config = HashConfig::default();
        Self {
            buckets: empty_buckets(config.buckets),
            hasher,
            max_load_factor: config.max_load_factor,
        }
    }

    /// Creates an index with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Fails if the configuration does not [`validate`](HashConfig::validate).
    pub fn with_config(hasher: H, config: HashConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            buckets: empty_buckets(config.buckets.max(1)),
            hasher,
            max_load_factor: config.max_load_factor,
        })
    }

    /// Returns the hasher.
    #[inline]
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    #[inline]
    pub(crate) fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub(crate) fn bucket(&self, index: usize) -> Option<&[NodeId]> {
        self.buckets.get(index).map(Vec::as_slice)
    }

    #[inline]
    pub(crate) fn max_load_factor(&self) -> f32 {
        self.max_load_factor
    }

    #[inline]
    pub(crate) fn load_factor(&self, len: usize) -> f32 {
        len as f32 / self.buckets.len() as f32
    }

    fn overloaded(&self, len: usize) -> bool {
        len as f64 > self.buckets.len() as f64 * f64::from(self.max_load_factor)
    }
}

/// Largest bucket count a hash index can address.
#[inline]
pub fn max_bucket_count() -> usize {
    isize::MAX as usize / std::mem::size_of::<Vec<NodeId>>()
}

/// Buckets needed for `len` elements at `factor`, or `None` past
/// [`max_bucket_count`].
fn buckets_for(len: usize, factor: f32) -> Option<usize> {
    let count = (len as f64 / f64::from(factor)).ceil();
    (count <= max_bucket_count() as f64).then(|| (count as usize).min(max_bucket_count()))
}

#[inline]
fn empty_buckets(count: usize) -> Vec<Vec<NodeId>> {
    (0..count).map(|_| Vec::new()).collect()
}

impl<H> Hashed<H> {
    #[inline]
    pub(crate) fn bucket_of<K: ?Sized>(&self, key: &K) -> usize
    where
        H: KeyHasher<K>,
    {
        (self.hasher.hash(key) % self.buckets.len() as u64) as usize
    }

    /// Grows to at least `count` buckets. Never shrinks.
    ///
    /// Fails with [`Error::CapacityOverflow`] past [`max_bucket_count`],
    /// leaving the index untouched.
    pub(crate) fn rehash<T, P>(
        &mut self,
        seq: &Sequence<T, ()>,
        count: usize,
    ) -> Result<(), Error>
    where
        P: KeyOf<T>,
        H: KeyHasher<P::Key>,
    {
        if count > max_bucket_count() {
            return Err(Error::CapacityOverflow(count));
        }
        self.rebuild::<T, P>(seq, count);
        Ok(())
    }

    fn rebuild<T, P>(&mut self, seq: &Sequence<T, ()>, count: usize)
    where
        P: KeyOf<T>,
        H: KeyHasher<P::Key>,
    {
        if count <= self.buckets.len() {
            return;
        }
        debug!(
            "rehash: {} -> {} buckets ({} elements)",
            self.buckets.len(),
            count,
            seq.len()
        );

        let mut buckets = empty_buckets(count);
        for id in seq.ids() {
            let hash = self.hasher.hash(P::key(seq.value(id)));
            buckets[(hash % count as u64) as usize].push(id);
        }
        self.buckets = buckets;
    }

    /// Makes room for `count` elements without exceeding the max load factor.
    pub(crate) fn reserve<T, P>(
        &mut self,
        seq: &Sequence<T, ()>,
        count: usize,
    ) -> Result<(), Error>
    where
        P: KeyOf<T>,
        H: KeyHasher<P::Key>,
    {
        let target =
            buckets_for(count, self.max_load_factor).ok_or(Error::CapacityOverflow(count))?;
        self.rebuild::<T, P>(seq, target);
        Ok(())
    }

    /// Sets the max load factor, rehashing right away if it is already
    /// exceeded.
    pub(crate) fn set_max_load_factor<T, P>(
        &mut self,
        seq: &Sequence<T, ()>,
        factor: f32,
    ) -> Result<(), Error>
    where
        P: KeyOf<T>,
        H: KeyHasher<P::Key>,
    {
        check_load_factor(factor)?;
        let len = seq.len();
        let target = if len as f64 > self.buckets.len() as f64 * f64::from(factor) {
            buckets_for(len, factor).ok_or(Error::InvalidLoadFactor(factor))?
        } else {
            0
        };

        trace!("max load factor {} -> {}", self.max_load_factor, factor);
        self.max_load_factor = factor;
        self.rebuild::<T, P>(seq, target);
        Ok(())
    }

    #[inline]
    fn equal<T, P>(&self, seq: &Sequence<T, ()>, id: NodeId, key: &P::Key) -> bool
    where
        P: KeyOf<T>,
        H: KeyHasher<P::Key>,
    {
        self.hasher.eq(P::key(seq.value(id)), key)
    }

    /// Any node in `bucket` with a key equal to `key`, or `NONE`.
    fn scan<T, P>(&self, seq: &Sequence<T, ()>, bucket: usize, key: &P::Key) -> NodeId
    where
        P: KeyOf<T>,
        H: KeyHasher<P::Key>,
    {
        self.buckets[bucket]
            .iter()
            .copied()
            .find(|&id| self.equal::<T, P>(seq, id, key))
            .unwrap_or(NodeId::NONE)
    }

    /// One past the run of equal keys that contains `id`.
    fn run_end<T, P>(&self, seq: &Sequence<T, ()>, id: NodeId, key: &P::Key) -> NodeId
    where
        P: KeyOf<T>,
        H: KeyHasher<P::Key>,
    {
        let mut id = seq.next(id);
        while id.is_some() && self.equal::<T, P>(seq, id, key) {
            id = seq.next(id);
        }
        id
    }

    /// Checks bucket membership of every node. Returns the number of
    /// bucket entries.
    #[cfg(test)]
    pub(crate) fn validate<T, P>(&self, seq: &Sequence<T, ()>) -> usize
    where
        P: KeyOf<T>,
        H: KeyHasher<P::Key>,
    {
        let mut seen = std::collections::HashSet::new();
        let mut entries = 0;
        for (index, bucket) in self.buckets.iter().enumerate() {
            for &id in bucket {
                assert_eq!(self.bucket_of(P::key(seq.value(id))), index, "node in wrong bucket");
                assert!(seen.insert(id), "node listed twice");
                entries += 1;
            }
        }
        assert_eq!(entries, seq.len(), "bucket sizes do not sum to len");
        for id in seq.ids() {
            assert!(seen.contains(&id), "node missing from buckets");
        }
        entries
    }
}

impl<T, P, H> IndexStrategy<T, P> for Hashed<H>
where
    P: KeyOf<T>,
    H: KeyHasher<P::Key>,
{
    type Link = ();
    type Placement = HashPlacement;

    fn find(&self, seq: &Sequence<T, ()>, key: &P::Key) -> NodeId {
        let mut id = self.scan::<T, P>(seq, self.bucket_of(key), key);
        if id.is_none() {
            return id;
        }
        // Report the start of the run so multi containers agree with
        // `equal_range`.
        loop {
            let prev = seq.prev(id);
            if prev.is_none() || !self.equal::<T, P>(seq, prev, key) {
                return id;
            }
            id = prev;
        }
    }

    fn locate(
        &self,
        seq: &Sequence<T, ()>,
        key: &P::Key,
        unique: bool,
    ) -> Result<HashPlacement, NodeId> {
        let bucket = self.bucket_of(key);
        let existing = self.scan::<T, P>(seq, bucket, key);

        let before = if existing.is_none() {
            NodeId::NONE
        } else if unique {
            return Err(existing);
        } else {
            self.run_end::<T, P>(seq, existing, key)
        };

        Ok(HashPlacement { bucket, before })
    }

    fn locate_near(
        &self,
        seq: &Sequence<T, ()>,
        hint: NodeId,
        key: &P::Key,
        unique: bool,
    ) -> Option<HashPlacement> {
        // A unique insert needs the bucket scan regardless of the hint.
        if unique {
            return None;
        }

        let prev = seq.prev(hint);
        let joins_run = (hint.is_some() && self.equal::<T, P>(seq, hint, key))
            || (prev.is_some() && self.equal::<T, P>(seq, prev, key));
        joins_run.then(|| HashPlacement {
            bucket: self.bucket_of(key),
            before: hint,
        })
    }

    #[inline]
    fn position(&self, _seq: &Sequence<T, ()>, placement: &HashPlacement) -> NodeId {
        placement.before
    }

    fn attach(&mut self, _seq: &mut Sequence<T, ()>, id: NodeId, placement: HashPlacement) {
        self.buckets[placement.bucket].push(id);
    }

    fn detach(&mut self, seq: &mut Sequence<T, ()>, id: NodeId) {
        let bucket = self.bucket_of(P::key(seq.value(id)));
        let entries = &mut self.buckets[bucket];
        match entries.iter().position(|&entry| entry == id) {
            Some(pos) => {
                entries.remove(pos);
            }
            None => unreachable!("node missing from its bucket"),
        }
    }

    fn equal_range(&self, seq: &Sequence<T, ()>, key: &P::Key) -> (NodeId, NodeId) {
        let first = IndexStrategy::<T, P>::find(self, seq, key);
        if first.is_none() {
            return (NodeId::NONE, NodeId::NONE);
        }
        (first, self.run_end::<T, P>(seq, first, key))
    }

    fn grow(&mut self, seq: &Sequence<T, ()>) {
        if self.overloaded(seq.len()) {
            let doubled = self.buckets.len().saturating_mul(2).saturating_add(1);
            let needed = buckets_for(seq.len(), self.max_load_factor).unwrap_or(0);
            let target = doubled.max(needed).min(max_bucket_count());
            self.rebuild::<T, P>(seq, target);
        }
    }

    fn clear(&mut self) {
        self.buckets.iter_mut().for_each(Vec::clear);
    }
}
