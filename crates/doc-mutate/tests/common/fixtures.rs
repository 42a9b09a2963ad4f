#![allow(dead_code)]

use doc_mutate::{apply, inverse, Instruction, Path};
use serde_json::{json, Map, Value};

pub fn p(steps: &[&str]) -> Path {
    steps.iter().map(|s| s.to_string()).collect()
}

pub fn obj(v: Value) -> Map<String, Value> {
    match v {
        Value::Object(map) => map,
        other => panic!("fixture is not an object: {other}"),
    }
}

/// A document touching every shape the engine edits.
pub fn sample_doc() -> Value {
    json!({
        "title": "Hello, world",
        "visible": true,
        "tags": ["a", "b", "c"],
        "style": {"color": "red", "width": 1},
        "nodes": [
            {"id": "n1", "children": []},
            {"id": "n2", "children": [{"id": "n3"}]}
        ],
        "empty": []
    })
}

/// Apply `ins`, then its inverse, and check the starting document comes back.
/// Returns the post-apply tree.
pub fn assert_round_trip(doc: &Value, ins: &Instruction) -> Value {
    let inv = inverse(doc, ins).unwrap_or_else(|e| panic!("inverse of {ins:?} failed: {e}"));
    let after = apply(doc, ins).unwrap_or_else(|e| panic!("apply of {ins:?} failed: {e}"));
    let restored =
        apply(&after, &inv).unwrap_or_else(|e| panic!("apply of inverse {inv:?} failed: {e}"));
    assert_eq!(&restored, doc, "round trip of {ins:?} via {inv:?}");
    after
}
