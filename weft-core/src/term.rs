//! Template values with reference-counted sharing.

use crate::func::Func;
use crate::map::Map;
use crate::Error;
use core::fmt;
use core::hash::{Hash, Hasher};
use std::any::Any;
use std::rc::Rc;

/// Scalar usable as a lookup key in a mapping or environment.
///
/// Floats and null are scalars but not keys: they never resolve and are
/// always fixpoints of substitution.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// String key
    Str(Rc<str>),
    /// Integer key
    Int(isize),
    /// Boolean key
    Bool(bool),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Str(s) => s.fmt(f),
            Self::Int(i) => i.fmt(f),
            Self::Bool(b) => b.fmt(f),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self::Str(s.into())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Self::Str(s.into())
    }
}

impl From<isize> for Key {
    fn from(i: isize) -> Self {
        Self::Int(i)
    }
}

impl From<bool> for Key {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Template value with sharing.
///
/// The closed set of shapes the engine rewrites. `Str`, `Int`, and `Bool`
/// double as lookup keys; `Opaque` values are carried through substitution
/// without ever being traversed; `Remove` marks an entry for deletion from
/// its enclosing collection.
#[derive(Clone, Debug)]
pub enum Term {
    /// Null
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(isize),
    /// Floating-point number
    Float(f64),
    /// String
    Str(Rc<str>),
    /// Sequence of terms
    Seq(Rc<Vec<Term>>),
    /// Mapping from keys to terms, insertion-ordered, compared unordered
    Map(Rc<Map<Key, Term>>),
    /// Function producing a term from an environment
    Fun(Func),
    /// Tagged foreign value, never traversed
    Opaque(Opaque),
    /// Sentinel marking "drop this entry"
    Remove,
}

/// A term result.
pub type TermR = Result<Term, Error>;

impl Term {
    /// If the term can act as a lookup key, return that key.
    pub fn as_key(&self) -> Option<Key> {
        match self {
            Self::Str(s) => Some(Key::Str(Rc::clone(s))),
            Self::Int(i) => Some(Key::Int(*i)),
            Self::Bool(b) => Some(Key::Bool(*b)),
            _ => None,
        }
    }

    /// True if the term is the removal sentinel.
    pub fn is_remove(&self) -> bool {
        matches!(self, Self::Remove)
    }

    /// True if the term is neither null nor false.
    pub fn as_bool(&self) -> bool {
        !matches!(self, Self::Null | Self::Bool(false))
    }

    /// If the term is a string, return it, else fail.
    pub fn as_str(&self) -> Result<Rc<str>, Error> {
        match self {
            Self::Str(s) => Ok(Rc::clone(s)),
            _ => Err(Error::Str(self.clone())),
        }
    }

    /// If the term is an integer, return it, else fail.
    pub fn as_int(&self) -> Result<isize, Error> {
        match self {
            Self::Int(i) => Ok(*i),
            _ => Err(Error::Int(self.clone())),
        }
    }

    /// If the term is a sequence, return it, else fail.
    pub fn as_seq(&self) -> Result<Rc<Vec<Term>>, Error> {
        match self {
            Self::Seq(s) => Ok(Rc::clone(s)),
            _ => Err(Error::Seq(self.clone())),
        }
    }

    /// If the term is a mapping, return it, else fail.
    pub fn as_map(&self) -> Result<Rc<Map<Key, Term>>, Error> {
        match self {
            Self::Map(m) => Ok(Rc::clone(m)),
            _ => Err(Error::Map(self.clone())),
        }
    }
}

/// Tagged foreign value carried through substitution untouched.
///
/// The tag names the foreign type for display and diagnostics. Equality and
/// hashing use reference identity: two opaque terms are equal iff they wrap
/// the very same allocation.
#[derive(Clone)]
pub struct Opaque {
    tag: Rc<str>,
    value: Rc<dyn Any>,
}

impl Opaque {
    /// Wrap `value` under the given type tag.
    pub fn new(tag: &str, value: impl Any) -> Self {
        Self {
            tag: tag.into(),
            value: Rc::new(value),
        }
    }

    /// The tag given at construction.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Recover the wrapped value if it has type `T`.
    pub fn downcast<T: Any>(&self) -> Option<Rc<T>> {
        Rc::clone(&self.value).downcast().ok()
    }

    /// True if both wrap the very same allocation.
    pub fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Opaque").field("tag", &self.tag).finish()
    }
}

impl fmt::Display for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<opaque {}>", self.tag)
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl Eq for Opaque {}

impl Hash for Opaque {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.value).cast::<()>() as usize).hash(state)
    }
}

// bitwise comparison distinguishes NaN payloads but identifies the two
// zeros, keeping equality consistent with hashing
fn float_eq(left: f64, right: f64) -> bool {
    (left == 0.0 && right == 0.0) || left.to_bits() == right.to_bits()
}

fn float_bits(x: f64) -> u64 {
    if x == 0.0 {
        0
    } else {
        x.to_bits()
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(x), Self::Bool(y)) => x == y,
            (Self::Int(x), Self::Int(y)) => x == y,
            (Self::Float(x), Self::Float(y)) => float_eq(*x, *y),
            (Self::Str(x), Self::Str(y)) => x == y,
            (Self::Seq(x), Self::Seq(y)) => x == y,
            (Self::Map(x), Self::Map(y)) => x == y,
            (Self::Fun(x), Self::Fun(y)) => x == y,
            (Self::Opaque(x), Self::Opaque(y)) => x == y,
            (Self::Remove, Self::Remove) => true,
            _ => false,
        }
    }
}

impl Eq for Term {}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Self::Null | Self::Remove => {}
            Self::Bool(b) => b.hash(state),
            Self::Int(i) => i.hash(state),
            Self::Float(x) => float_bits(*x).hash(state),
            Self::Str(s) => s.hash(state),
            Self::Seq(s) => s.hash(state),
            Self::Map(m) => m.hash(state),
            Self::Fun(f) => f.hash(state),
            Self::Opaque(o) => o.hash(state),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => b.fmt(f),
            Self::Int(i) => i.fmt(f),
            Self::Float(x) => x.fmt(f),
            Self::Str(s) => write!(f, "\"{}\"", s),
            Self::Seq(s) => {
                write!(f, "[")?;
                let mut iter = s.iter();
                if let Some(first) = iter.next() {
                    first.fmt(f)?
                };
                iter.try_for_each(|x| write!(f, ",{}", x))?;
                write!(f, "]")
            }
            Self::Map(m) => m.fmt(f),
            Self::Fun(fun) => fun.fmt(f),
            Self::Opaque(o) => o.fmt(f),
            Self::Remove => write!(f, "<remove>"),
        }
    }
}

impl From<Key> for Term {
    fn from(k: Key) -> Self {
        match k {
            Key::Str(s) => Self::Str(s),
            Key::Int(i) => Self::Int(i),
            Key::Bool(b) => Self::Bool(b),
        }
    }
}

impl From<&str> for Term {
    fn from(s: &str) -> Self {
        Self::Str(s.into())
    }
}

impl From<String> for Term {
    fn from(s: String) -> Self {
        Self::Str(s.into())
    }
}

impl From<isize> for Term {
    fn from(i: isize) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Term {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for Term {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<Term>> for Term {
    fn from(s: Vec<Term>) -> Self {
        Self::Seq(Rc::new(s))
    }
}

impl From<Map<Key, Term>> for Term {
    fn from(m: Map<Key, Term>) -> Self {
        Self::Map(Rc::new(m))
    }
}

impl From<Func> for Term {
    fn from(f: Func) -> Self {
        Self::Fun(f)
    }
}

impl From<Opaque> for Term {
    fn from(o: Opaque) -> Self {
        Self::Opaque(o)
    }
}

impl FromIterator<Term> for Term {
    fn from_iter<I: IntoIterator<Item = Term>>(iter: I) -> Self {
        Self::Seq(Rc::new(iter.into_iter().collect()))
    }
}

impl FromIterator<(Key, Term)> for Term {
    fn from_iter<I: IntoIterator<Item = (Key, Term)>>(iter: I) -> Self {
        Self::Map(Rc::new(iter.into_iter().collect()))
    }
}

impl From<serde_json::Value> for Term {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value::*;
        match v {
            Null => Self::Null,
            Bool(b) => Self::Bool(b),
            Number(n) => n.as_i64().map_or_else(
                || Self::Float(n.as_f64().unwrap_or(f64::NAN)),
                |i| Self::Int(i as isize),
            ),
            String(s) => Self::Str(s.into()),
            Array(a) => a.into_iter().map(Term::from).collect(),
            Object(o) => o
                .into_iter()
                .map(|(k, v)| (Key::from(k), Term::from(v)))
                .collect(),
        }
    }
}

impl From<Term> for serde_json::Value {
    fn from(t: Term) -> serde_json::Value {
        use serde_json::Value::*;
        match t {
            Term::Null | Term::Remove => Null,
            Term::Bool(b) => Bool(b),
            Term::Int(i) => Number((i as i64).into()),
            Term::Float(x) => serde_json::Number::from_f64(x).map_or(Null, Number),
            Term::Str(s) => String(s.to_string()),
            Term::Seq(s) => Array(s.iter().map(|x| x.clone().into()).collect()),
            Term::Map(m) => Object(
                m.iter()
                    .map(|(k, v)| (k.to_string(), v.clone().into()))
                    .collect(),
            ),
            // functions and foreign values have no data representation
            Term::Fun(_) | Term::Opaque(_) => Null,
        }
    }
}
