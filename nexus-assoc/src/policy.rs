//! Pluggable policies: ordering, hashing, key extraction and duplicates.
//!
//! A container is assembled from four choices:
//!
//! ```text
//! KeyOf       - how to find the key inside a stored value (set vs map)
//! Compare     - total order on keys          (ordered containers)
//! KeyHasher   - hash + equality on keys      (hashed containers)
//! Duplicates  - reject or allow equal keys   (unique vs multi)
//! ```
//!
//! Comparators and hashers must be pure and must not change behaviour over
//! the lifetime of a container; the indexes assume results are stable.

use std::hash::{BuildHasher, Hash};

// =============================================================================
// Ordering
// =============================================================================

/// Strict weak ordering on keys.
///
/// Two keys are equivalent when neither is less than the other.
pub trait Compare<K: ?Sized> {
    /// Returns `true` if `a` orders strictly before `b`.
    fn less(&self, a: &K, b: &K) -> bool;
}

/// Orders keys by their [`Ord`] implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Natural;

impl<K: Ord + ?Sized> Compare<K> for Natural {
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        a < b
    }
}

impl<K: ?Sized, F> Compare<K> for F
where
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        self(a, b)
    }
}

// =============================================================================
// Hashing
// =============================================================================

/// Hash function plus the equality it is consistent with.
///
/// `eq(a, b)` must imply `hash(a) == hash(b)`.
pub trait KeyHasher<K: ?Sized> {
    /// Hashes a key.
    fn hash(&self, key: &K) -> u64;

    /// Returns `true` if the keys are equal.
    fn eq(&self, a: &K, b: &K) -> bool;
}

// Fixed seeds keep hashing deterministic across runs.
const SEEDS: [u64; 4] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
];

/// `ahash` over the key's [`Hash`] implementation, equality from [`Eq`].
#[derive(Clone)]
pub struct DefaultHashing {
    state: ahash::RandomState,
}

impl DefaultHashing {
    /// Creates a hasher with the crate's fixed seeds.
    pub fn new() -> Self {
        Self::with_seeds(SEEDS)
    }

    /// Creates a hasher with caller-chosen seeds.
    pub fn with_seeds(seeds: [u64; 4]) -> Self {
        Self {
            state: ahash::RandomState::with_seeds(seeds[0], seeds[1], seeds[2], seeds[3]),
        }
    }
}

impl Default for DefaultHashing {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for DefaultHashing {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DefaultHashing").finish_non_exhaustive()
    }
}

impl<K: Hash + Eq + ?Sized> KeyHasher<K> for DefaultHashing {
    #[inline]
    fn hash(&self, key: &K) -> u64 {
        BuildHasher::hash_one(&self.state, key)
    }

    #[inline]
    fn eq(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

impl<K: ?Sized, H, E> KeyHasher<K> for (H, E)
where
    H: Fn(&K) -> u64,
    E: Fn(&K, &K) -> bool,
{
    #[inline]
    fn hash(&self, key: &K) -> u64 {
        (self.0)(key)
    }

    #[inline]
    fn eq(&self, a: &K, b: &K) -> bool {
        (self.1)(a, b)
    }
}

// =============================================================================
// Key extraction
// =============================================================================

/// Extracts the key from a stored value.
pub trait KeyOf<T> {
    /// The key type.
    type Key;

    /// Returns the key component of `value`.
    fn key(value: &T) -> &Self::Key;
}

/// Sets: the value is its own key.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl<K> KeyOf<K> for Identity {
    type Key = K;

    #[inline]
    fn key(value: &K) -> &K {
        value
    }
}

/// Maps: the key is the first element of a `(key, value)` pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct First;

impl<K, V> KeyOf<(K, V)> for First {
    type Key = K;

    #[inline]
    fn key(value: &(K, V)) -> &K {
        &value.0
    }
}

// =============================================================================
// Duplicate-key policy
// =============================================================================

/// Whether a container admits several elements with equivalent keys.
pub trait Duplicates {
    /// `true` if inserting an equivalent key is rejected.
    const UNIQUE: bool;
}

/// Equivalent keys are rejected; the existing element wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unique;

impl Duplicates for Unique {
    const UNIQUE: bool = true;
}

/// Equivalent keys are admitted and kept adjacent.
#[derive(Debug, Clone, Copy, Default)]
pub struct Multi;

impl Duplicates for Multi {
    const UNIQUE: bool = false;
}
