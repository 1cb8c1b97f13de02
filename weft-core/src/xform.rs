//! The substitution engine.
//!
//! Reduction walks a term depth-first. Collections are rebuilt from their
//! reduced elements, dropping removals and cascading empties upward;
//! everything else is chased through the environment until it reaches a
//! fixpoint. Function candidates found along the way are invoked with the
//! ambient environment; dependency-wrapped functions resolve their declared
//! keys through the session cache first, so shared dependencies are computed
//! once per session.

use crate::cache::{with_clean_cache, Cache};
use crate::env::Env;
use crate::func::Func;
use crate::map::Map;
use crate::term::{Key, Term, TermR};
use crate::Error;
use fxhash::FxHashSet;
use itertools::Itertools;
use std::rc::Rc;

thread_local! {
    /// Reserved mapping key introducing subtree-scoped default bindings.
    ///
    /// When a mapping carries this entry, its value (a mapping itself) is
    /// merged over the ambient environment while the remaining entries are
    /// reduced, and the entry is dropped from the output.
    ///
    /// Stored thread-locally: `Key` holds an `Rc<str>`, which is not `Sync`,
    /// so it cannot live in a plain `static`.
    pub static DEFAULTS: Key = Key::from("@defaults");
}

/// Reduce `term` in an empty environment.
pub fn xform(term: &Term) -> TermR {
    xform_with(term, &Env::new())
}

/// Reduce `term` until every reachable subterm is a fixpoint of `env`.
///
/// Nested defaults shadow equal keys of `env`; use [`xform_args`] or
/// [`Xform::overrides`] for bindings that outrank defaults.
pub fn xform_with(term: &Term, env: &Env) -> TermR {
    with_clean_cache(|cache| Xform::new(cache).run(term, env))
}

/// Reduce `term` with a flat `[k1, v1, k2, v2, ...]` list of overrides.
///
/// Overrides are tagged as user-supplied and outrank nested defaults at any
/// depth. A term in key position that cannot act as a key is an error.
pub fn xform_args<T: Into<Term>>(term: &Term, args: impl IntoIterator<Item = T>) -> TermR {
    with_clean_cache(|cache| Xform::new(cache).override_pairs(args)?.run(term, &Env::new()))
}

/// One evaluation within a cache session.
///
/// Carries the explicit cache handle, the caller's options, and the
/// in-progress resolution stack used to detect cyclic key graphs. Several
/// evaluations may share one cache by constructing one `Xform` per run
/// against the same handle.
pub struct Xform<'c> {
    cache: &'c mut Cache,
    overrides: Map<Key, Term>,
    pinned: FxHashSet<Key>,
    stack: Vec<Key>,
    prune: bool,
}

impl<'c> Xform<'c> {
    /// Start an evaluation against the given cache.
    pub fn new(cache: &'c mut Cache) -> Self {
        Self {
            cache,
            overrides: Map::new(),
            pinned: FxHashSet::default(),
            stack: Vec::new(),
            prune: true,
        }
    }

    /// Keep empty collections instead of cascading them into removals.
    pub fn keep_empty(mut self) -> Self {
        self.prune = false;
        self
    }

    /// Add user overrides; these outrank nested defaults at any depth.
    pub fn overrides<K, V>(mut self, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Key>,
        V: Into<Term>,
    {
        for (k, v) in entries {
            self.overrides.insert(k.into(), v.into());
        }
        self
    }

    /// Add user overrides from a flat `[k1, v1, k2, v2, ...]` list.
    pub fn override_pairs<T: Into<Term>>(
        mut self,
        args: impl IntoIterator<Item = T>,
    ) -> Result<Self, Error> {
        for (k, v) in args.into_iter().map(Into::into).tuples() {
            let k = k.as_key().ok_or(Error::Key(k))?;
            self.overrides.insert(k, v);
        }
        Ok(self)
    }

    /// Run the engine on `term` against `env`.
    pub fn run(mut self, term: &Term, env: &Env) -> TermR {
        let env = if self.overrides.is_empty() {
            env.clone()
        } else {
            self.pinned = self.overrides.keys().cloned().collect();
            env.extend(std::mem::take(&mut self.overrides))
        };
        self.walk(term, &env, true)
    }

    /// Cached single-key resolution against `env`.
    ///
    /// On a miss, runs the resolution chain for `key` and memoizes the
    /// result under the environment's value. Errors are not memoized.
    pub fn resolve(&mut self, key: &Key, env: &Env) -> TermR {
        if let Some(v) = self.cache.get(key, env) {
            log::trace!("cache hit: {key}");
            return Ok(v.clone());
        }
        log::trace!("cache miss: {key}");
        let v = self.chain(Term::from(key.clone()), env)?;
        self.cache.insert(key.clone(), env.clone(), v.clone());
        Ok(v)
    }

    fn walk(&mut self, term: &Term, env: &Env, root: bool) -> TermR {
        match term {
            Term::Seq(s) => {
                let mut out = Vec::with_capacity(s.len());
                for t in s.iter() {
                    let r = self.walk(t, env, false)?;
                    if !r.is_remove() {
                        out.push(r);
                    }
                }
                if !root && self.prune && out.is_empty() {
                    Ok(Term::Remove)
                } else {
                    Ok(Term::Seq(Rc::new(out)))
                }
            }
            Term::Map(m) => {
                let env = self.local_env(m, env)?;
                let mut out = Map::with_capacity(m.len());
                for (k, v) in m.iter() {
                    if DEFAULTS.with(|d| *k == *d) {
                        continue;
                    }
                    let r = self.walk(v, &env, false)?;
                    if !r.is_remove() {
                        out.insert(k.clone(), r);
                    }
                }
                if !root && self.prune && out.is_empty() {
                    Ok(Term::Remove)
                } else {
                    Ok(Term::Map(Rc::new(out)))
                }
            }
            Term::Str(_) | Term::Int(_) | Term::Bool(_) => self.chain(term.clone(), env),
            // null, floats, functions, opaques and the sentinel never act
            // as keys, so they are fixpoints already
            _ => Ok(term.clone()),
        }
    }

    /// Ambient environment for the children of `m`, honoring a reserved
    /// defaults entry.
    fn local_env(&self, m: &Map<Key, Term>, env: &Env) -> Result<Env, Error> {
        match DEFAULTS.with(|d| m.get(d).cloned()) {
            None => Ok(env.clone()),
            Some(Term::Map(d)) => Ok(env.merge_defaults(&d, &self.pinned)),
            Some(t) => Err(Error::Defaults(t)),
        }
    }

    /// Chase a non-collection term through `env` until it reaches a
    /// fixpoint, unwinding the resolution stack on every exit path.
    fn chain(&mut self, term: Term, env: &Env) -> TermR {
        let base = self.stack.len();
        let r = self.chain_inner(term, env);
        self.stack.truncate(base);
        r
    }

    fn chain_inner(&mut self, mut cur: Term, env: &Env) -> TermR {
        loop {
            let key = match cur.as_key() {
                Some(k) => k,
                None => return Ok(cur),
            };
            let found = match env.get(&key) {
                Some(t) => t,
                None => return Ok(cur),
            };
            if *found == cur {
                return Ok(cur);
            }
            if let Some(i) = self.stack.iter().position(|k| *k == key) {
                let mut keys: Vec<Key> = self.stack[i..].to_vec();
                keys.push(key);
                return Err(Error::Cycle(keys));
            }
            self.stack.push(key);
            let mut cand = found.clone();
            while let Term::Fun(f) = &cand {
                let f = f.clone();
                cand = self.invoke(&f, env)?;
            }
            match cand {
                Term::Opaque(_) => return Ok(cand),
                Term::Seq(_) | Term::Map(_) => return self.walk(&cand, env, false),
                other => cur = other,
            }
        }
    }

    /// Invoke a function candidate with the ambient environment, resolving
    /// declared dependencies through the cache first.
    fn invoke(&mut self, f: &Func, env: &Env) -> TermR {
        match f {
            Func::Ambient(body) => body(env),
            Func::Deps(d) => {
                log::debug!("invoking {f}");
                let mut bound = Map::with_capacity(d.deps().len());
                for k in d.deps() {
                    let v = self.resolve(k, env)?;
                    bound.insert(k.clone(), v);
                }
                (d.body())(&Env::from(bound))
            }
        }
    }
}
