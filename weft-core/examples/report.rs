//! Reduce a small report template whose computed field derives from an
//! attached dataset.
//!
//! The dataset travels through the template as an opaque value; the axis
//! domain is a dependency-wrapped function that unwraps it. Run with:
//!
//!     LOG=trace cargo run --example report

use serde_json::json;
use weft_core::{with_deps, xform_with, Env, Error, Key, Opaque, Term};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("LOG", "info")).init();

    let points: Vec<(f64, f64)> = vec![(1.0, 3.2), (2.0, 4.1), (3.0, 2.7)];

    let domain = with_deps("x domain of the data", ["Data"], |deps| {
        let data = deps
            .get(&Key::from("Data"))
            .ok_or_else(|| Error::str("Data unbound"))?
            .clone();
        let points = match &data {
            Term::Opaque(o) => o
                .downcast::<Vec<(f64, f64)>>()
                .ok_or_else(|| Error::str("Data is not a point set"))?,
            t => return Err(Error::str(format!("cannot read points from {t}"))),
        };
        let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
        for (x, _) in points.iter() {
            lo = lo.min(*x);
            hi = hi.max(*x);
        }
        Ok(Term::from(vec![Term::from(lo), Term::from(hi)]))
    });

    let template = Term::from(json!({
        "@defaults": {"Title": "Untitled"},
        "title": "Title",
        "axis": {"domain": "Domain"},
    }));

    let env: Env = [
        ("Domain", Term::from(domain)),
        ("Data", Term::from(Opaque::new("points", points))),
    ]
    .into_iter()
    .collect();

    match xform_with(&template, &env) {
        Ok(out) => println!("{out}"),
        Err(e) => eprintln!("error: {e}"),
    }
}
