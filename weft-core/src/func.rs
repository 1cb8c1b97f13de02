//! Function terms and the dependency wrapper.

use crate::env::Env;
use crate::term::{Key, TermR};
use core::fmt;
use core::hash::{Hash, Hasher};
use std::rc::Rc;

/// Body shared by plain and dependency-wrapped functions.
///
/// Bodies must be pure: same environment in, same term out, no capture of
/// mutable outer state.
pub type Body = dyn Fn(&Env) -> TermR;

/// A function-valued term.
///
/// Equality and hashing use reference identity, so a function is only ever
/// equal to clones of itself.
#[derive(Clone)]
pub enum Func {
    /// Receives the entire ambient environment at the point of lookup.
    Ambient(Rc<Body>),
    /// Resolves its declared dependencies through the cache first, then
    /// receives the resolved bindings.
    Deps(Rc<DepFn>),
}

impl Func {
    /// Wrap a body that reads the ambient environment directly.
    pub fn ambient(f: impl Fn(&Env) -> TermR + 'static) -> Self {
        Self::Ambient(Rc::new(f))
    }

    /// The description given at construction, if any.
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Ambient(_) => None,
            Self::Deps(d) => Some(d.description()),
        }
    }

    /// The declared dependency keys, in declaration order.
    pub fn deps(&self) -> &[Key] {
        match self {
            Self::Ambient(_) => &[],
            Self::Deps(d) => d.deps(),
        }
    }
}

/// A body tagged with the keys it needs resolved before it runs.
pub struct DepFn {
    description: String,
    deps: Vec<Key>,
    body: Box<Body>,
}

impl DepFn {
    /// Human-readable description of what the body computes.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The declared dependency keys, in declaration order.
    pub fn deps(&self) -> &[Key] {
        &self.deps
    }

    pub(crate) fn body(&self) -> &Body {
        &*self.body
    }
}

/// Wrap `body` so that each key in `deps` is resolved (and cached) before
/// the body runs with the resolved bindings.
///
/// The bindings environment passed to the body holds exactly the declared
/// keys, each bound to its fully-reduced value. Dependencies shared between
/// several such functions are computed once per cache session.
pub fn with_deps<K, I, F>(description: &str, deps: I, body: F) -> Func
where
    K: Into<Key>,
    I: IntoIterator<Item = K>,
    F: Fn(&Env) -> TermR + 'static,
{
    Func::Deps(Rc::new(DepFn {
        description: description.to_string(),
        deps: deps.into_iter().map(Into::into).collect(),
        body: Box::new(body),
    }))
}

impl fmt::Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Ambient(_) => f.debug_struct("Ambient").finish(),
            Self::Deps(d) => f
                .debug_struct("Deps")
                .field("description", &d.description)
                .field("deps", &d.deps)
                .finish(),
        }
    }
}

impl fmt::Display for Func {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Ambient(_) => write!(f, "<fn>"),
            Self::Deps(d) => write!(f, "<fn {}>", d.description),
        }
    }
}

impl PartialEq for Func {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Ambient(x), Self::Ambient(y)) => Rc::ptr_eq(x, y),
            (Self::Deps(x), Self::Deps(y)) => Rc::ptr_eq(x, y),
            _ => false,
        }
    }
}

impl Eq for Func {}

impl Hash for Func {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Ambient(f) => (Rc::as_ptr(f).cast::<()>() as usize).hash(state),
            Self::Deps(d) => (Rc::as_ptr(d).cast::<()>() as usize).hash(state),
        }
    }
}
