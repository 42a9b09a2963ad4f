mod common;

use common::fixtures::{obj, p};
use doc_mutate::codec::validate::validate_batch;
use doc_mutate::codec::{decode, decode_batch, encode, encode_batch};
use doc_mutate::{apply_all, CodecError, EncodeOptions, Instruction, MutateError, OpKind};
use serde_json::{json, Value};

/// Every kind in its fully-populated wire form, with its mandatory fields.
fn wire_forms() -> Vec<(Value, Vec<&'static str>)> {
    vec![
        (json!({"o": 0, "p": ["a"], "v": 1}), vec!["v"]),
        (json!({"o": 1, "p": ["a"]}), vec![]),
        (json!({"o": 2, "p": ["l"], "v": 1}), vec!["v"]),
        (json!({"o": 3, "p": ["l"], "i": 0, "v": 1}), vec!["i", "v"]),
        (json!({"o": 4, "p": ["l"], "i": 0}), vec!["i"]),
        (json!({"o": 5, "p": ["l"]}), vec![]),
        (json!({"o": 6, "p": ["l"]}), vec![]),
        (json!({"o": 7, "p": ["l"], "v": 1}), vec!["v"]),
        (json!({"o": 8, "p": ["l"], "fi": 0, "ti": 1}), vec!["fi", "ti"]),
        (json!({"o": 9, "p": ["s"], "i": 0, "v": "x"}), vec!["i", "v"]),
        (json!({"o": 10, "p": ["s"], "v": "x"}), vec!["v"]),
        (json!({"o": 11, "p": ["s"], "i": 0, "l": 1}), vec!["i", "l"]),
        (json!({"o": 12, "p": ["s"], "i": 0, "l": 1, "v": "x"}), vec!["i", "l", "v"]),
        (json!({"o": 13, "p": ["s"], "s": "a", "r": "b"}), vec!["s", "r"]),
        (json!({"o": 14, "p": ["s"], "s": "a", "r": "b"}), vec!["s", "r"]),
        (json!({"o": 15, "p": ["t"]}), vec![]),
        (json!({"o": 16, "p": ["m"], "v": {"k": 1}, "u": ["z"]}), vec!["v"]),
        (json!({"o": 17, "p": ["a"], "dp": ["b"], "b": 0}), vec!["dp"]),
        (json!({"o": 18, "p": ["a"], "dp": ["l"], "i": 0, "b": 0}), vec!["dp"]),
    ]
}

#[test]
fn wire_forms_cover_every_opcode() {
    let kinds: Vec<OpKind> = wire_forms()
        .iter()
        .map(|(raw, _)| decode(raw).unwrap().kind())
        .collect();
    assert_eq!(kinds, OpKind::ALL.to_vec());
}

#[test]
fn missing_mandatory_fields_are_rejected() {
    for (raw, mandatory) in wire_forms() {
        let kind = decode(&raw).unwrap().kind();
        for field in mandatory {
            let mut stripped = raw.clone();
            stripped.as_object_mut().unwrap().remove(field);
            assert_eq!(
                decode(&stripped).unwrap_err(),
                CodecError::MissingField {
                    op: kind.name(),
                    field,
                },
                "{raw}"
            );
        }
    }
}

#[test]
fn optional_fields_may_be_dropped() {
    for (raw, field) in [
        (json!({"o": 16, "p": ["m"], "v": {}, "u": ["z"]}), "u"),
        (json!({"o": 17, "p": ["a"], "dp": ["b"], "b": 0}), "b"),
        (json!({"o": 18, "p": ["a"], "dp": ["l"], "i": 0}), "i"),
    ] {
        let mut stripped = raw.clone();
        stripped.as_object_mut().unwrap().remove(field);
        assert!(decode(&stripped).is_ok(), "{stripped}");
    }
}

#[test]
fn unknown_fields_are_tolerated() {
    for (raw, _) in wire_forms() {
        let mut extended = raw.clone();
        let map = extended.as_object_mut().unwrap();
        map.insert("x".into(), json!({"future": true}));
        map.insert("ts".into(), json!(1700000000));
        assert_eq!(decode(&extended).unwrap(), decode(&raw).unwrap());
    }
}

#[test]
fn encode_reproduces_wire_forms() {
    let options = EncodeOptions::default();
    for (raw, _) in wire_forms() {
        assert_eq!(encode(&decode(&raw).unwrap(), &options), raw);
    }
}

#[test]
fn named_opcodes_decode_identically() {
    let named = EncodeOptions { names: true };
    let batch = decode_batch(&Value::Array(wire_forms().into_iter().map(|(raw, _)| raw).collect())).unwrap();
    let encoded = encode_batch(&batch, &named);
    assert_eq!(encoded[17]["o"], json!("move"));
    assert_eq!(decode_batch(&encoded).unwrap(), batch);
}

#[test]
fn pointer_and_array_paths_agree() {
    let from_pointer = decode(&json!({"o": 15, "p": "/a~1b/list/0"})).unwrap();
    let from_array = decode(&json!({"o": 15, "p": ["a/b", "list", 0]})).unwrap();
    assert_eq!(from_pointer, from_array);
    assert_eq!(from_array.path(), &p(&["a/b", "list", "0"]));
}

#[test]
fn decoded_batch_drives_the_applier() {
    let raw = json!([
        {"o": "merge", "p": ["style"], "v": {"color": "blue"}, "u": ["width"]},
        {"o": "insert_move", "p": ["style", "color"], "dp": ["palette"]}
    ]);
    let batch = validate_batch(&raw).unwrap();
    let out = apply_all(&json!({"style": {"color": "red", "width": 1}, "palette": []}), &batch).unwrap();
    assert_eq!(out, json!({"style": {}, "palette": ["blue"]}));
    assert_eq!(
        batch[0],
        Instruction::Merge {
            path: p(&["style"]),
            value: obj(json!({"color": "blue"})),
            unset: vec!["width".into()],
        }
    );
}

#[test]
fn codec_errors_are_validation_errors() {
    let err: MutateError = decode(&json!({"o": 42})).unwrap_err().into();
    assert_eq!(err.category(), doc_mutate::ErrorCategory::Validation);
    assert_eq!(err.to_string(), "invalid instruction: unknown operation: 42");
}
