//! Path vocabulary for JSON-like document trees.
//!
//! A path is an ordered list of string segments. A segment addressing a
//! sequence element is the decimal form of its zero-based index; a segment
//! addressing a mapping field is the field name. The empty path addresses the
//! whole document.
//!
//! # Example
//!
//! ```
//! use doc_path::{find, format_json_pointer, ReferenceKey};
//! use serde_json::json;
//!
//! let doc = json!({"items": ["a", "b"]});
//! let path = vec!["items".to_string(), "1".to_string()];
//!
//! let r = find(&doc, &path).unwrap();
//! assert_eq!(r.val, Some(&json!("b")));
//! assert_eq!(r.key, Some(ReferenceKey::Index(1)));
//! assert_eq!(format_json_pointer(&path), "/items/1");
//! ```

use thiserror::Error;

pub mod types;
pub use types::{Path, PathStep, Reference, ReferenceKey};

pub mod find;
pub use find::{find, get, get_mut, parent_mut};

pub mod validate;
pub use validate::{validate_path, MAX_PATH_LENGTH};

/// Errors produced while navigating a document by path.
///
/// Every navigation error carries the offending path prefix, rendered as a
/// JSON Pointer, so callers can tell which segment stopped resolving.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("path not found: \"{prefix}\"")]
    NotFound { prefix: String },
    #[error("invalid sequence index at \"{prefix}\"")]
    InvalidIndex { prefix: String },
    #[error("root path has no parent")]
    NoParent,
    #[error("path too long ({len} segments, max {max})")]
    PathTooLong { len: usize, max: usize },
}

impl PathError {
    pub(crate) fn not_found(path: &[String], depth: usize) -> Self {
        PathError::NotFound {
            prefix: format_json_pointer(&path[..=depth]),
        }
    }

    pub(crate) fn invalid_index(path: &[String], depth: usize) -> Self {
        PathError::InvalidIndex {
            prefix: format_json_pointer(&path[..=depth]),
        }
    }
}

/// Unescapes a JSON Pointer path component.
///
/// Per RFC 6901, `~1` is replaced with `/` and `~0` is replaced with `~`.
///
/// ```
/// use doc_path::unescape_component;
///
/// assert_eq!(unescape_component("a~0b"), "a~b");
/// assert_eq!(unescape_component("c~1d"), "c/d");
/// ```
pub fn unescape_component(component: &str) -> String {
    if !component.contains('~') {
        return component.to_string();
    }
    // ~1 before ~0, otherwise "~01" would decode to "/"
    component.replace("~1", "/").replace("~0", "~")
}

/// Escapes a JSON Pointer path component.
///
/// ```
/// use doc_path::escape_component;
///
/// assert_eq!(escape_component("a~b"), "a~0b");
/// assert_eq!(escape_component("c/d"), "c~1d");
/// ```
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    component.replace('~', "~0").replace('/', "~1")
}

/// Parse a JSON Pointer string into path segments.
///
/// The empty string is the root. A pointer without a leading `/` is treated
/// as if it had one.
///
/// ```
/// use doc_path::parse_json_pointer;
///
/// assert_eq!(parse_json_pointer(""), Vec::<String>::new());
/// assert_eq!(parse_json_pointer("/a/0"), vec!["a", "0"]);
/// assert_eq!(parse_json_pointer("a/0"), vec!["a", "0"]);
/// ```
pub fn parse_json_pointer(pointer: &str) -> Path {
    if pointer.is_empty() {
        return Vec::new();
    }
    let body = pointer.strip_prefix('/').unwrap_or(pointer);
    body.split('/').map(unescape_component).collect()
}

/// Format path segments as a JSON Pointer string. The root formats as `""`.
pub fn format_json_pointer(path: &[String]) -> String {
    let mut out = String::new();
    for component in path {
        out.push('/');
        out.push_str(&escape_component(component));
    }
    out
}

/// Check if a path points to the root value.
pub fn is_root(path: &[String]) -> bool {
    path.is_empty()
}

/// Check if `child` lies strictly below `parent`.
///
/// ```
/// use doc_path::is_child;
///
/// let parent = vec!["a".to_string()];
/// let child = vec!["a".to_string(), "b".to_string()];
/// assert!(is_child(&parent, &child));
/// assert!(!is_child(&child, &parent));
/// assert!(!is_child(&parent, &parent));
/// ```
pub fn is_child(parent: &[String], child: &[String]) -> bool {
    parent.len() < child.len() && child[..parent.len()] == *parent
}

/// Get the parent path of a given path.
pub fn parent(path: &[String]) -> Result<Path, PathError> {
    match path.split_last() {
        Some((_, rest)) => Ok(rest.to_vec()),
        None => Err(PathError::NoParent),
    }
}

/// Check if a segment is a canonical non-negative sequence index.
///
/// Leading zeros are rejected so that every index has exactly one spelling.
///
/// ```
/// use doc_path::is_valid_index;
///
/// assert!(is_valid_index("0"));
/// assert!(is_valid_index("42"));
/// assert!(!is_valid_index("007"));
/// assert!(!is_valid_index("-1"));
/// assert!(!is_valid_index(""));
/// ```
pub fn is_valid_index(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    if bytes.is_empty() || (bytes.len() > 1 && bytes[0] == b'0') {
        return false;
    }
    bytes.iter().all(u8::is_ascii_digit)
}

/// Parse a segment as a sequence index, if it is one.
pub fn parse_index(segment: &str) -> Option<usize> {
    if !is_valid_index(segment) {
        return None;
    }
    segment.parse().ok()
}
