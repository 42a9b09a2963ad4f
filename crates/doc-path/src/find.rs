//! Path resolution over `serde_json::Value` trees.

use serde_json::Value;

use crate::types::{Reference, ReferenceKey};
use crate::{parse_index, PathError};

/// Resolve `path` against `doc`.
///
/// Walks every segment but the last, requiring each intermediate value to
/// exist and be a mapping or sequence. The last segment may be absent; the
/// returned [`Reference`] then has `val == None` and callers decide whether
/// absence is acceptable.
///
/// # Errors
///
/// - [`PathError::NotFound`] if an intermediate segment is missing, out of
///   range, or not a container.
/// - [`PathError::InvalidIndex`] if the last segment addresses a sequence but
///   is not a canonical index.
///
/// ```
/// use doc_path::{find, PathError};
/// use serde_json::json;
///
/// let doc = json!({"a": {"b": 1}});
/// let missing = find(&doc, &["a".into(), "c".into()]).unwrap();
/// assert!(missing.val.is_none());
///
/// let err = find(&doc, &["x".into(), "y".into()]).unwrap_err();
/// assert_eq!(err, PathError::NotFound { prefix: "/x".into() });
/// ```
pub fn find<'a>(doc: &'a Value, path: &[String]) -> Result<Reference<'a>, PathError> {
    let Some((last, init)) = path.split_last() else {
        return Ok(Reference {
            val: Some(doc),
            obj: None,
            key: None,
        });
    };

    let mut current = doc;
    for (depth, step) in init.iter().enumerate() {
        current = step_into(current, step).ok_or_else(|| PathError::not_found(path, depth))?;
    }

    let depth = init.len();
    match current {
        Value::Object(map) => Ok(Reference {
            val: map.get(last),
            obj: Some(current),
            key: Some(ReferenceKey::Field(last.clone())),
        }),
        Value::Array(arr) => {
            let idx = parse_index(last).ok_or_else(|| PathError::invalid_index(path, depth))?;
            Ok(Reference {
                val: arr.get(idx),
                obj: Some(current),
                key: Some(ReferenceKey::Index(idx)),
            })
        }
        _ => Err(PathError::not_found(path, depth)),
    }
}

/// Get a value by path. Returns `None` if any segment does not resolve.
///
/// ```
/// use doc_path::get;
/// use serde_json::json;
///
/// let doc = json!({"list": [10, 20]});
/// assert_eq!(get(&doc, &["list".into(), "1".into()]), Some(&json!(20)));
/// assert_eq!(get(&doc, &["list".into(), "01".into()]), None);
/// ```
pub fn get<'a>(doc: &'a Value, path: &[String]) -> Option<&'a Value> {
    let mut current = doc;
    for step in path {
        current = step_into(current, step)?;
    }
    Some(current)
}

/// Get a mutable reference to a value by path.
pub fn get_mut<'a>(doc: &'a mut Value, path: &[String]) -> Option<&'a mut Value> {
    let mut current = doc;
    for step in path {
        match current {
            Value::Object(map) => {
                current = map.get_mut(step)?;
            }
            Value::Array(arr) => {
                let idx = parse_index(step)?;
                current = arr.get_mut(idx)?;
            }
            _ => return None,
        }
    }
    Some(current)
}

/// Walk all segments but the last and return the container they lead to.
///
/// The returned value is not checked for being a container; the caller
/// matches on it and reports a shape error if needed.
///
/// # Errors
///
/// [`PathError::NoParent`] for the root path, [`PathError::NotFound`] if an
/// intermediate segment does not resolve.
pub fn parent_mut<'a>(doc: &'a mut Value, path: &[String]) -> Result<&'a mut Value, PathError> {
    let Some((_, init)) = path.split_last() else {
        return Err(PathError::NoParent);
    };
    let mut current = doc;
    for (depth, step) in init.iter().enumerate() {
        match current {
            Value::Object(map) => {
                current = map
                    .get_mut(step)
                    .ok_or_else(|| PathError::not_found(path, depth))?;
            }
            Value::Array(arr) => {
                current = parse_index(step)
                    .and_then(|idx| arr.get_mut(idx))
                    .ok_or_else(|| PathError::not_found(path, depth))?;
            }
            _ => return Err(PathError::not_found(path, depth)),
        }
    }
    Ok(current)
}

fn step_into<'a>(current: &'a Value, step: &str) -> Option<&'a Value> {
    match current {
        Value::Object(map) => map.get(step),
        Value::Array(arr) => arr.get(parse_index(step)?),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn p(steps: &[&str]) -> Vec<String> {
        steps.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn find_root() {
        let doc = json!({"a": 1});
        let r = find(&doc, &[]).unwrap();
        assert!(r.is_root());
        assert_eq!(r.val, Some(&doc));
    }

    #[test]
    fn find_mapping_field() {
        let doc = json!({"a": {"b": 1}});
        let r = find(&doc, &p(&["a", "b"])).unwrap();
        assert_eq!(r.val, Some(&json!(1)));
        assert_eq!(r.obj, Some(&json!({"b": 1})));
        assert_eq!(r.key, Some(ReferenceKey::Field("b".into())));
    }

    #[test]
    fn find_sequence_end() {
        let doc = json!({"list": [1, 2]});
        let r = find(&doc, &p(&["list", "2"])).unwrap();
        assert!(r.val.is_none());
        assert!(r.is_array_end());
    }

    #[test]
    fn find_reports_offending_prefix() {
        let doc = json!({"a": {"b": [1]}});
        assert_eq!(
            find(&doc, &p(&["a", "x", "y"])).unwrap_err(),
            PathError::NotFound { prefix: "/a/x".into() }
        );
        assert_eq!(
            find(&doc, &p(&["a", "b", "5", "z"])).unwrap_err(),
            PathError::NotFound { prefix: "/a/b/5".into() }
        );
    }

    #[test]
    fn find_scalar_mid_path() {
        let doc = json!({"a": 1});
        assert_eq!(
            find(&doc, &p(&["a", "b"])).unwrap_err(),
            PathError::NotFound { prefix: "/a/b".into() }
        );
    }

    #[test]
    fn find_bad_last_index() {
        let doc = json!([1, 2]);
        assert_eq!(
            find(&doc, &p(&["x"])).unwrap_err(),
            PathError::InvalidIndex { prefix: "/x".into() }
        );
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut doc = json!({"a": [0, {"b": false}]});
        *get_mut(&mut doc, &p(&["a", "1", "b"])).unwrap() = json!(true);
        assert_eq!(doc, json!({"a": [0, {"b": true}]}));
        assert!(get_mut(&mut doc, &p(&["a", "9"])).is_none());
    }

    #[test]
    fn parent_mut_walks_all_but_last() {
        let mut doc = json!({"a": {"b": {"c": 1}}});
        let parent = parent_mut(&mut doc, &p(&["a", "b", "c"])).unwrap();
        assert_eq!(*parent, json!({"c": 1}));
        assert_eq!(parent_mut(&mut doc, &[]).unwrap_err(), PathError::NoParent);
        assert_eq!(
            parent_mut(&mut doc, &p(&["q", "r"])).unwrap_err(),
            PathError::NotFound { prefix: "/q".into() }
        );
    }
}
