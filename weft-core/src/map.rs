//! Order-preserving maps with order-insensitive equality and hashing.

use core::fmt::{self, Display};
use core::hash::{Hash, Hasher};
use fxhash::{FxBuildHasher, FxHasher};
use indexmap::IndexMap;

/// A map that preserves the order of its elements.
type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Order-preserving map backing mappings and environments.
///
/// Two maps are equal iff they hold the same entries, regardless of the
/// order in which they were inserted; hashing agrees with that equality.
#[derive(Clone, Debug)]
pub struct Map<K, V>(FxIndexMap<K, V>);

impl<K, V> Map<K, V> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty map that can hold `n` entries without reallocating.
    pub fn with_capacity(n: usize) -> Self {
        Self(FxIndexMap::with_capacity_and_hasher(
            n,
            FxBuildHasher::default(),
        ))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.0.keys()
    }

    /// Iterate over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.0.iter()
    }
}

impl<K: Eq + Hash, V> Map<K, V> {
    /// Return the value stored under `key`, if any.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.0.get(key)
    }

    /// Insert `value` under `key`, returning the previous value, if any.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.0.insert(key, value)
    }
}

impl<K, V> Default for Map<K, V> {
    fn default() -> Self {
        Self(Default::default())
    }
}

impl<K: Eq + Hash, V> core::iter::FromIterator<(K, V)> for Map<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<K, V> IntoIterator for Map<K, V> {
    type Item = (K, V);
    type IntoIter = indexmap::map::IntoIter<K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Right-biased merge: entries of `other` win over equal keys of `self`.
impl<K: Eq + Hash, V> core::ops::Add for Map<K, V> {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self.0.extend(other);
        self
    }
}

impl<K: Hash + Eq, V: PartialEq> PartialEq for Map<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<K: Hash + Eq, V: Eq> Eq for Map<K, V> {}

/// Order-insensitive: each entry is hashed on its own and the results are
/// combined with a commutative operation.
impl<K: Hash, V: Hash> Hash for Map<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut acc: u64 = 0;
        for (k, v) in &self.0 {
            let mut h = FxHasher::default();
            k.hash(&mut h);
            v.hash(&mut h);
            acc = acc.wrapping_add(h.finish());
        }
        state.write_usize(self.0.len());
        state.write_u64(acc);
    }
}

impl<K: Display, V: Display> Display for Map<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        "{".fmt(f)?;
        let mut iter = self.0.iter();
        if let Some((k, v)) = iter.next() {
            write!(f, "{}:{}", k, v)?;
        }
        iter.try_for_each(|(k, v)| write!(f, ",{}:{}", k, v))?;
        "}".fmt(f)
    }
}
