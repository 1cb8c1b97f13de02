use crate::term::{Key, Term};
use core::fmt;
use itertools::Itertools;

/// Errors that can occur during substitution.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// a key reappeared within its own resolution chain
    Cycle(Vec<Key>),
    /// reserved defaults entry whose value is not a mapping
    Defaults(Term),
    /// override list entry not usable as a key
    Key(Term),
    /// raised by a user-supplied function body
    Val(Term),
    /// `as_str` on a non-string
    Str(Term),
    /// `as_int` on a non-integer
    Int(Term),
    /// `as_seq` on a non-sequence
    Seq(Term),
    /// `as_map` on a non-mapping
    Map(Term),
}

impl Error {
    /// Build a body error from something that can be converted to a string.
    pub fn str(s: impl ToString) -> Self {
        Self::Val(Term::from(s.to_string()))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Self::Cycle(keys) => {
                write!(f, "cyclic key resolution: {}", keys.iter().format(" -> "))
            }
            Self::Defaults(t) => write!(f, "cannot use {t} as defaults mapping"),
            Self::Key(t) => write!(f, "cannot use {t} as key"),
            Self::Val(Term::Str(s)) => s.fmt(f),
            Self::Val(t) => t.fmt(f),
            Self::Str(t) => write!(f, "cannot use {t} as string"),
            Self::Int(t) => write!(f, "cannot use {t} as integer"),
            Self::Seq(t) => write!(f, "cannot use {t} as sequence"),
            Self::Map(t) => write!(f, "cannot use {t} as mapping"),
        }
    }
}

impl std::error::Error for Error {}
