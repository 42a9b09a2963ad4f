use doc_mutate::{apply, inverse, Instruction, PathBuilder};
use proptest::prelude::*;
use serde_json::{json, Value};

fn doc_with(s: &str) -> Value {
    json!({ "s": s })
}

fn round_trips(doc: &Value, ins: &Instruction) -> Result<(), TestCaseError> {
    let inv = inverse(doc, ins).map_err(|e| TestCaseError::fail(e.to_string()))?;
    let after = apply(doc, ins).map_err(|e| TestCaseError::fail(e.to_string()))?;
    let restored = apply(&after, &inv).map_err(|e| TestCaseError::fail(e.to_string()))?;
    prop_assert_eq!(&restored, doc);
    Ok(())
}

/// A string plus an in-bounds char range over it.
fn text_and_range() -> impl Strategy<Value = (String, usize, usize)> {
    ".{0,24}".prop_flat_map(|s| {
        let len = s.chars().count();
        (Just(s), 0..=len).prop_flat_map(move |(s, index)| (Just(s), Just(index), 0..=len - index))
    })
}

fn small_list() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..12)
}

proptest! {
    #[test]
    fn prop_str_insert(
        (s, index, _) in text_and_range(),
        text in ".{0,8}",
    ) {
        round_trips(&doc_with(&s), &PathBuilder::new().key("s").str_insert(index, text))?;
    }

    #[test]
    fn prop_str_remove((s, index, length) in text_and_range()) {
        let ins = PathBuilder::new().key("s").str_remove(index, length);
        let after = apply(&doc_with(&s), &ins).unwrap();
        prop_assert_eq!(
            after["s"].as_str().unwrap().chars().count(),
            s.chars().count() - length
        );
        round_trips(&doc_with(&s), &ins)?;
    }

    #[test]
    fn prop_str_replace(
        (s, index, length) in text_and_range(),
        text in ".{0,8}",
    ) {
        round_trips(&doc_with(&s), &PathBuilder::new().key("s").str_replace(index, length, text))?;
    }

    #[test]
    fn prop_replace_first_and_all(
        s in "[ab ]{0,16}",
        search in "[ab]{1,2}",
        replacement in "[ab]{0,3}",
    ) {
        let doc = doc_with(&s);
        round_trips(&doc, &PathBuilder::new().key("s").replace_first(search.clone(), replacement.clone()))?;
        round_trips(&doc, &PathBuilder::new().key("s").replace_all(search, replacement))?;
    }

    #[test]
    fn prop_out_of_range_is_rejected((s, index, length) in text_and_range()) {
        let over = s.chars().count() - index - length + 1;
        let ins = PathBuilder::new().key("s").str_remove(index, length + over);
        prop_assert!(apply(&doc_with(&s), &ins).is_err());
        prop_assert!(inverse(&doc_with(&s), &ins).is_err());
    }

    #[test]
    fn prop_reorder(list in small_list(), a in any::<prop::sample::Index>(), b in any::<prop::sample::Index>()) {
        let (from, to) = (a.index(list.len()), b.index(list.len()));
        let doc = json!({ "l": list });
        round_trips(&doc, &PathBuilder::new().key("l").reorder(from, to))?;
    }

    #[test]
    fn prop_move_within_sequence(list in small_list(), a in any::<prop::sample::Index>(), b in any::<prop::sample::Index>()) {
        let from = a.index(list.len());
        // after the detach the sequence is one shorter; its end is still settable
        let to = b.index(list.len());
        let doc = json!({ "l": list });
        let ins = PathBuilder::new().key("l").index(from).move_to(vec!["l".to_string(), to.to_string()]);
        round_trips(&doc, &ins)?;
    }

    #[test]
    fn prop_insert_move_within_sequence(list in small_list(), a in any::<prop::sample::Index>(), b in any::<prop::sample::Index>()) {
        let from = a.index(list.len());
        let to = b.index(list.len());
        let doc = json!({ "l": list });
        let ins = PathBuilder::new().key("l").index(from).insert_move_to(vec!["l".to_string()], Some(to));
        round_trips(&doc, &ins)?;
    }
}
