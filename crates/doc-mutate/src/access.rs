//! Shared navigation and slicing helpers for apply and inverse.

use std::cmp::Ordering;

use doc_path::{find, format_json_pointer, parent_mut, parse_index, PathError, Reference};
use serde_json::Value;

use crate::error::{MutateError, Shape};

pub(crate) fn not_found(path: &[String]) -> MutateError {
    MutateError::Path(PathError::NotFound {
        prefix: format_json_pointer(path),
    })
}

pub(crate) fn shape_error(path: &[String], expected: Shape, found: &Value) -> MutateError {
    MutateError::Shape {
        path: format_json_pointer(path),
        expected,
        found: Shape::of(found),
    }
}

pub(crate) fn out_of_range(path: &[String], index: usize, len: usize) -> MutateError {
    MutateError::IndexOutOfRange {
        path: format_json_pointer(path),
        index,
        len,
    }
}

fn index_segment(path: &[String], segment: &str) -> Result<usize, MutateError> {
    parse_index(segment).ok_or_else(|| {
        MutateError::Path(PathError::InvalidIndex {
            prefix: format_json_pointer(path),
        })
    })
}

// ── Read access ───────────────────────────────────────────────────────────

/// Error for a resolved reference with no value behind it. A sequence index
/// past the end is a range error; a missing key is a navigation miss.
fn missing(path: &[String], r: &Reference<'_>) -> MutateError {
    match (r.obj, r.index()) {
        (Some(Value::Array(arr)), Some(idx)) => out_of_range(path, idx, arr.len()),
        _ => not_found(path),
    }
}

/// The existing value at `path`.
pub(crate) fn target<'a>(doc: &'a Value, path: &[String]) -> Result<&'a Value, MutateError> {
    let r = find(doc, path)?;
    r.val.ok_or_else(|| missing(path, &r))
}

pub(crate) fn sequence_at<'a>(doc: &'a Value, path: &[String]) -> Result<&'a [Value], MutateError> {
    match target(doc, path)? {
        Value::Array(arr) => Ok(arr.as_slice()),
        other => Err(shape_error(path, Shape::Sequence, other)),
    }
}

pub(crate) fn string_at<'a>(doc: &'a Value, path: &[String]) -> Result<&'a str, MutateError> {
    match target(doc, path)? {
        Value::String(s) => Ok(s.as_str()),
        other => Err(shape_error(path, Shape::String, other)),
    }
}

pub(crate) fn bool_at(doc: &Value, path: &[String]) -> Result<bool, MutateError> {
    match target(doc, path)? {
        Value::Bool(b) => Ok(*b),
        other => Err(shape_error(path, Shape::Boolean, other)),
    }
}

/// Resolve a path that Set semantics may create, returning its current value.
///
/// Fails the same way [`set_at`] would: a sequence slot past the end is not
/// creatable.
pub(crate) fn settable<'a>(doc: &'a Value, path: &[String]) -> Result<Reference<'a>, MutateError> {
    let r = find(doc, path)?;
    if r.val.is_none() && r.is_array_reference() && !r.is_array_end() {
        return Err(missing(path, &r));
    }
    Ok(r)
}

// ── Write access ──────────────────────────────────────────────────────────

/// The existing value at `path`, mutably.
pub(crate) fn target_mut<'a>(doc: &'a mut Value, path: &[String]) -> Result<&'a mut Value, MutateError> {
    let Some(last) = path.last() else {
        return Ok(doc);
    };
    match parent_mut(doc, path)? {
        Value::Object(map) => map.get_mut(last).ok_or_else(|| not_found(path)),
        Value::Array(arr) => {
            let idx = index_segment(path, last)?;
            let len = arr.len();
            arr.get_mut(idx).ok_or_else(|| out_of_range(path, idx, len))
        }
        _ => Err(not_found(path)),
    }
}

pub(crate) fn sequence_mut<'a>(doc: &'a mut Value, path: &[String]) -> Result<&'a mut Vec<Value>, MutateError> {
    match target_mut(doc, path)? {
        Value::Array(arr) => Ok(arr),
        other => Err(shape_error(path, Shape::Sequence, other)),
    }
}

pub(crate) fn string_mut<'a>(doc: &'a mut Value, path: &[String]) -> Result<&'a mut String, MutateError> {
    match target_mut(doc, path)? {
        Value::String(s) => Ok(s),
        other => Err(shape_error(path, Shape::String, other)),
    }
}

/// Assign `value` at `path`, returning the value it replaced.
///
/// Mapping keys are inserted or replaced. Sequence slots are replaced, or
/// appended when the index equals the length. The root is replaced outright.
pub(crate) fn set_at(doc: &mut Value, path: &[String], value: Value) -> Result<Option<Value>, MutateError> {
    let Some(last) = path.last() else {
        return Ok(Some(std::mem::replace(doc, value)));
    };
    match parent_mut(doc, path)? {
        Value::Object(map) => Ok(map.insert(last.clone(), value)),
        Value::Array(arr) => {
            let idx = index_segment(path, last)?;
            match idx.cmp(&arr.len()) {
                Ordering::Less => Ok(Some(std::mem::replace(&mut arr[idx], value))),
                Ordering::Equal => {
                    arr.push(value);
                    Ok(None)
                }
                Ordering::Greater => Err(out_of_range(path, idx, arr.len())),
            }
        }
        _ => Err(not_found(path)),
    }
}

/// How a detached value's source slot was left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Vacated {
    /// A mapping key was removed.
    Field,
    /// A sequence element was removed; later elements shifted down.
    Element(usize),
    /// The slot now holds the backfill value.
    Backfilled,
}

/// Take the value at `path` out of the document.
pub(crate) fn detach(
    doc: &mut Value,
    path: &[String],
    backfill: Option<Value>,
) -> Result<(Value, Vacated), MutateError> {
    let Some(last) = path.last() else {
        return Err(MutateError::Validation(
            "cannot detach the document root".into(),
        ));
    };
    match parent_mut(doc, path)? {
        Value::Object(map) => {
            let taken = match backfill {
                Some(b) if map.contains_key(last) => {
                    map.insert(last.clone(), b).map(|v| (v, Vacated::Backfilled))
                }
                Some(_) => None,
                None => map.remove(last).map(|v| (v, Vacated::Field)),
            };
            taken.ok_or_else(|| not_found(path))
        }
        Value::Array(arr) => {
            let idx = index_segment(path, last)?;
            if idx >= arr.len() {
                return Err(out_of_range(path, idx, arr.len()));
            }
            Ok(match backfill {
                Some(b) => (std::mem::replace(&mut arr[idx], b), Vacated::Backfilled),
                None => (arr.remove(idx), Vacated::Element(idx)),
            })
        }
        _ => Err(not_found(path)),
    }
}

// ── Strings ───────────────────────────────────────────────────────────────

pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte offset of the `char_idx`-th char; `s.len()` when past the end.
pub(crate) fn byte_offset(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

/// Check `index + length <= len` and return the byte range it covers.
pub(crate) fn char_range(
    path: &[String],
    s: &str,
    index: usize,
    length: usize,
) -> Result<std::ops::Range<usize>, MutateError> {
    let len = char_len(s);
    match index.checked_add(length) {
        Some(end) if end <= len => Ok(byte_offset(s, index)..byte_offset(s, end)),
        _ => Err(MutateError::StrRange {
            path: format_json_pointer(path),
            index,
            length,
            len,
        }),
    }
}

/// Check `index <= len` and return its byte offset.
pub(crate) fn char_position(path: &[String], s: &str, index: usize) -> Result<usize, MutateError> {
    let len = char_len(s);
    if index > len {
        return Err(out_of_range(path, index, len));
    }
    Ok(byte_offset(s, index))
}
