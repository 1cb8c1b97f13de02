//! Environments consulted during substitution.

use crate::map::Map;
use crate::term::{Key, Term};
use core::fmt;
use fxhash::FxHashSet;
use std::rc::Rc;

/// Immutable mapping of keys to terms, cheap to clone and share.
///
/// Environments compare and hash by value, so two environments built from
/// the same entries in any order are interchangeable as cache keys.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Env(Rc<Map<Key, Term>>);

impl Env {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the environment holds no bindings.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the term bound to `key`, if any.
    pub fn get(&self, key: &Key) -> Option<&Term> {
        self.0.get(key)
    }

    /// Iterate over the bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Term)> {
        self.0.iter()
    }

    /// Return a new environment with `key` bound to `value`.
    pub fn set(&self, key: impl Into<Key>, value: impl Into<Term>) -> Self {
        let mut map = (*self.0).clone();
        map.insert(key.into(), value.into());
        Self(Rc::new(map))
    }

    /// Return a new environment extended with all entries of `entries`,
    /// which win over equal keys.
    pub fn extend(&self, entries: Map<Key, Term>) -> Self {
        Self(Rc::new((*self.0).clone() + entries))
    }

    /// Merge subtree defaults over this environment, leaving keys pinned by
    /// user overrides untouched.
    pub(crate) fn merge_defaults(&self, defaults: &Map<Key, Term>, pinned: &FxHashSet<Key>) -> Self {
        let mut map = (*self.0).clone();
        for (k, v) in defaults.iter() {
            if !pinned.contains(k) {
                map.insert(k.clone(), v.clone());
            }
        }
        Self(Rc::new(map))
    }
}

impl From<Map<Key, Term>> for Env {
    fn from(map: Map<Key, Term>) -> Self {
        Self(Rc::new(map))
    }
}

impl<K: Into<Key>, V: Into<Term>> FromIterator<(K, V)> for Env {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(Rc::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }
}

impl fmt::Display for Env {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}
