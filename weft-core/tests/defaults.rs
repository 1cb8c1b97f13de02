pub mod common;

use common::{env, give, init};
use serde_json::json;
use weft_core::{with_clean_cache, xform, xform_args, xform_with, Env, Error, Term, Xform};

#[test]
fn local_defaults_bind_their_subtree() {
    give(
        json!({"@defaults": {"Name": "World"}, "greeting": "Name"}),
        [],
        json!({"greeting": "World"}),
    );
}

#[test]
fn defaults_do_not_escape_their_subtree() {
    give(
        json!({"sub": {"@defaults": {"N": 1}, "x": "N"}, "y": "N"}),
        [],
        json!({"sub": {"x": 1}, "y": "N"}),
    );
}

#[test]
fn nested_defaults_reference_parent_scope() {
    give(
        json!({
            "@defaults": {"B": "hi"},
            "inner": {"@defaults": {"A": "B"}, "msg": "A"},
        }),
        [],
        json!({"inner": {"msg": "hi"}}),
    );
}

fn heading_template() -> Term {
    Term::from(json!({
        "section": {"@defaults": {"Heading": "Default"}, "heading": "Heading"},
    }))
}

#[test]
fn defaults_shadow_the_ambient_environment() {
    init();
    let out = xform_with(&heading_template(), &env([("Heading", json!("User"))]));
    assert_eq!(
        out.unwrap(),
        Term::from(json!({"section": {"heading": "Default"}}))
    );
}

#[test]
fn overrides_outrank_nested_defaults() {
    init();
    let out = xform_args(&heading_template(), [json!("Heading"), json!("User")]);
    assert_eq!(
        out.unwrap(),
        Term::from(json!({"section": {"heading": "User"}}))
    );
}

#[test]
fn overrides_builder_form() {
    init();
    let out = with_clean_cache(|cache| {
        Xform::new(cache)
            .overrides([("Heading", json!("User"))])
            .run(&heading_template(), &Env::new())
    });
    assert_eq!(
        out.unwrap(),
        Term::from(json!({"section": {"heading": "User"}}))
    );
}

#[test]
fn defaults_must_be_a_mapping() {
    init();
    let t = Term::from(json!({"@defaults": 3, "x": 1}));
    assert_eq!(xform(&t), Err(Error::Defaults(Term::Int(3))));
}

#[test]
fn override_keys_must_be_keys() {
    init();
    let t = Term::from(json!({"x": 1}));
    let out = xform_args(&t, [json!([1]), json!(2)]);
    assert_eq!(out, Err(Error::Key(Term::from(json!([1])))));
}

#[test]
fn defaults_entry_is_dropped_from_output() {
    give(
        json!({"@defaults": {"X": 1}, "a": 2}),
        [],
        json!({"a": 2}),
    );
}

#[test]
fn map_holding_only_defaults_prunes_away() {
    give(
        json!({"keep": 1, "sub": {"@defaults": {"X": 1}}}),
        [],
        json!({"keep": 1}),
    );
}
