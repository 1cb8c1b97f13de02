pub mod common;

use common::{env, give, init};
use serde_json::json;
use weft_core::{with_clean_cache, xform, xform_with, Env, Key, Opaque, Term, Xform};

#[test]
fn chains() {
    give(
        json!({"a": "B", "c": "D"}),
        [("B", json!("C")), ("C", json!(10)), ("D", json!(20))],
        json!({"a": 10, "c": 20}),
    );
}

#[test]
fn fixpoints() {
    // a self-mapping and an unbound key both stay put
    give(
        json!({"self": "X", "missing": "Y"}),
        [("X", json!("X")), ("Y", json!("Missing"))],
        json!({"self": "X", "missing": "Missing"}),
    );
}

#[test]
fn plain_data_untouched() {
    let t = json!({"n": 1, "f": 1.5, "s": "s", "b": true, "z": null, "v": [1, 2]});
    give(t.clone(), [], t);
}

#[test]
fn seq_elements() {
    give(
        json!(["B", 1, "D"]),
        [("B", json!("x")), ("D", json!([2, 3]))],
        json!(["x", 1, [2, 3]]),
    );
}

#[test]
fn int_and_bool_keys() {
    init();
    let env = Env::new().set(1isize, json!("one")).set(true, json!("yes"));
    let t = Term::from(json!({"x": 1, "y": true}));
    let out = xform_with(&t, &env).unwrap();
    assert_eq!(out, Term::from(json!({"x": "one", "y": "yes"})));
}

#[test]
fn floats_and_null_never_resolve() {
    // not keys, so they cannot be looked up even with a string-ish binding
    give(
        json!({"x": 1.5, "z": null}),
        [("1.5", json!("no"))],
        json!({"x": 1.5, "z": null}),
    );
}

#[test]
fn empty_collection_cascade() {
    give(json!({"outer": {"middle": {"inner": []}}}), [], json!({}));
}

#[test]
fn root_collection_is_exempt() {
    init();
    assert_eq!(xform(&Term::from(json!([]))).unwrap(), Term::from(json!([])));
    assert_eq!(xform(&Term::from(json!({}))).unwrap(), Term::from(json!({})));
}

#[test]
fn keep_empty_disables_pruning() {
    init();
    let t = Term::from(json!({"outer": {"middle": {"inner": []}}}));
    let out = with_clean_cache(|cache| Xform::new(cache).keep_empty().run(&t, &Env::new()));
    assert_eq!(out.unwrap(), t);
}

#[test]
fn remove_injection() {
    init();
    let env = Env::new().set("Gone", Term::Remove);
    let t = Term::from(json!({"a": "Gone", "b": 1}));
    assert_eq!(xform_with(&t, &env).unwrap(), Term::from(json!({"b": 1})));
}

#[test]
fn removal_cascades_through_seq() {
    init();
    let env = Env::new().set("Gone", Term::Remove);
    let t = Term::from(json!({"a": ["Gone", "Gone"], "b": 1}));
    assert_eq!(xform_with(&t, &env).unwrap(), Term::from(json!({"b": 1})));
}

#[test]
fn idempotence() {
    init();
    let t = Term::from(json!({
        "@defaults": {"N": "M"},
        "a": "N",
        "b": ["N", {"c": "Unbound"}],
    }));
    let e = env([("M", json!(7))]);
    let once = xform_with(&t, &e).unwrap();
    let twice = xform(&once).unwrap();
    assert_eq!(twice, once);
}

#[test]
fn determinism_under_env_order() {
    init();
    let e1 = env([("A", json!(1)), ("B", json!(2))]);
    let e2 = env([("B", json!(2)), ("A", json!(1))]);
    assert_eq!(e1, e2);
    let t = Term::from(json!({"x": "A", "y": "B"}));
    assert_eq!(xform_with(&t, &e1).unwrap(), xform_with(&t, &e2).unwrap());
}

#[test]
fn opaque_passes_through_untraversed() {
    init();
    let data = Opaque::new("dataset", vec![1i32, 2, 3]);
    let env = Env::new().set("Data", Term::from(data.clone()));
    let t = Term::from(json!({"data": "Data", "nested": {"deep": {"data": "Data"}}}));
    let out = xform_with(&t, &env).unwrap();

    let top = out.as_map().unwrap();
    let first = top.get(&Key::from("data")).unwrap();
    let deep = top
        .get(&Key::from("nested"))
        .and_then(|t| t.as_map().ok())
        .and_then(|m| m.get(&Key::from("deep")).cloned())
        .and_then(|t| t.as_map().ok())
        .and_then(|m| m.get(&Key::from("data")).cloned())
        .unwrap();

    for t in [first.clone(), deep] {
        match t {
            Term::Opaque(o) => {
                assert!(o.same(&data));
                assert_eq!(*o.downcast::<Vec<i32>>().unwrap(), vec![1, 2, 3]);
            }
            t => panic!("expected opaque, got {t}"),
        }
    }
}
