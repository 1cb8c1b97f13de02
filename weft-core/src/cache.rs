//! Session-scoped memoization of key resolutions.

use crate::env::Env;
use crate::term::{Key, Term};
use fxhash::FxHashMap;

/// Memo table for one evaluation session.
///
/// Entries are keyed by lookup key and environment *value*: two structurally
/// equal environments share entries, no matter how they were built. The
/// table only ever grows; it is meant to live for one session and be
/// dropped whole.
#[derive(Debug, Default)]
pub struct Cache {
    entries: FxHashMap<(Key, Env), Term>,
}

impl Cache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of memoized resolutions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been memoized yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn get(&self, key: &Key, env: &Env) -> Option<&Term> {
        self.entries.get(&(key.clone(), env.clone()))
    }

    pub(crate) fn insert(&mut self, key: Key, env: Env, value: Term) {
        self.entries.insert((key, env), value);
    }
}

/// Run `f` with a fresh, empty cache that is discarded afterwards.
///
/// Evaluations inside `f` share dependency resolutions with each other and
/// with nobody else; the cache is torn down on every exit path, panics
/// included, by ordinary ownership.
pub fn with_clean_cache<T>(f: impl FnOnce(&mut Cache) -> T) -> T {
    let mut cache = Cache::new();
    f(&mut cache)
}
