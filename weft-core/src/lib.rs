//! Fixpoint substitution for nested templates.
//!
//! This crate reduces nested data against an environment: every key found in
//! the data is looked up and replaced, over and over, until nothing changes.
//! Values in the environment may be plain data, functions over the ambient
//! environment, or functions wrapped with [`with_deps`], which declare the
//! keys they need resolved before they run. Declared dependencies are
//! resolved through a session [`Cache`], so a dependency shared by several
//! computed values is computed exactly once per session.
//!
//! Mappings may carry a reserved [`DEFAULTS`] entry scoping extra bindings
//! to their own subtree, and caller-supplied overrides outrank those
//! defaults at any depth. Entries that reduce to [`Term::Remove`] are
//! dropped, and collections emptied by such removals cascade away.
//!
//! The example below substitutes through a chain of keys.
//!
//! ~~~
//! use weft_core::{xform_with, Env, Term};
//! use serde_json::json;
//!
//! let template = Term::from(json!({"a": "B", "c": "D"}));
//! let env: Env = [("B", json!("C")), ("C", json!(10)), ("D", json!(20))]
//!     .into_iter()
//!     .collect();
//!
//! let out = xform_with(&template, &env).unwrap();
//! assert_eq!(out, Term::from(json!({"a": 10, "c": 20})));
//! ~~~
#![warn(missing_docs)]

mod cache;
mod env;
mod error;
mod func;
mod map;
mod term;
mod xform;

pub use cache::{with_clean_cache, Cache};
pub use env::Env;
pub use error::Error;
pub use func::{with_deps, Body, DepFn, Func};
pub use map::Map;
pub use term::{Key, Opaque, Term, TermR};
pub use xform::{xform, xform_args, xform_with, Xform, DEFAULTS};
