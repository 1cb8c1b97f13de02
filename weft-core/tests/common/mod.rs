use serde_json::Value;
use weft_core::{xform_with, Env, Term};

/// Initialize test logging; later calls are no-ops.
pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Build an environment from string keys and JSON values.
pub fn env<const N: usize>(entries: [(&str, Value); N]) -> Env {
    entries.into_iter().collect()
}

/// Check that reducing `template` against the environment built from
/// `entries` yields `expect`.
pub fn give<const N: usize>(template: Value, entries: [(&str, Value); N], expect: Value) {
    init();
    let out = xform_with(&Term::from(template), &env(entries)).unwrap();
    assert_eq!(out, Term::from(expect));
}
