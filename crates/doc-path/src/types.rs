//! Type definitions for document paths.

use std::fmt;

use serde_json::Value;

/// A single path segment: a mapping key or a decimal sequence index.
pub type PathStep = String;

/// An ordered list of segments. Empty means "the whole document".
pub type Path = Vec<PathStep>;

/// How the last segment of a path addresses its parent container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceKey {
    /// A field of a mapping.
    Field(String),
    /// An element of a sequence.
    Index(usize),
}

impl ReferenceKey {
    pub fn as_index(&self) -> Option<usize> {
        match self {
            ReferenceKey::Index(i) => Some(*i),
            ReferenceKey::Field(_) => None,
        }
    }

    pub fn as_field(&self) -> Option<&str> {
        match self {
            ReferenceKey::Field(k) => Some(k),
            ReferenceKey::Index(_) => None,
        }
    }
}

impl fmt::Display for ReferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKey::Field(k) => f.write_str(k),
            ReferenceKey::Index(i) => write!(f, "{i}"),
        }
    }
}

/// The result of resolving a path: the parent container, the key used to
/// address the target within it, and the target itself when present.
///
/// For the root path `obj` and `key` are `None` and `val` is the document.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference<'a> {
    /// The target value. `None` if the last segment is not present.
    pub val: Option<&'a Value>,
    /// The mapping or sequence holding the target.
    pub obj: Option<&'a Value>,
    /// The last segment, typed by the shape of `obj`.
    pub key: Option<ReferenceKey>,
}

impl<'a> Reference<'a> {
    pub fn is_root(&self) -> bool {
        self.obj.is_none()
    }

    pub fn exists(&self) -> bool {
        self.val.is_some()
    }

    pub fn is_array_reference(&self) -> bool {
        matches!(self.obj, Some(Value::Array(_)))
    }

    pub fn is_object_reference(&self) -> bool {
        matches!(self.obj, Some(Value::Object(_)))
    }

    /// True when the key is one past the last element of a sequence parent.
    pub fn is_array_end(&self) -> bool {
        match (self.obj, &self.key) {
            (Some(Value::Array(arr)), Some(ReferenceKey::Index(idx))) => *idx == arr.len(),
            _ => false,
        }
    }

    pub fn index(&self) -> Option<usize> {
        self.key.as_ref().and_then(ReferenceKey::as_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn array_reference() {
        let doc = json!([1, 2, 3]);
        let r = Reference {
            val: None,
            obj: Some(&doc),
            key: Some(ReferenceKey::Index(3)),
        };
        assert!(r.is_array_reference());
        assert!(r.is_array_end());
        assert!(!r.exists());
        assert_eq!(r.index(), Some(3));
    }

    #[test]
    fn object_reference() {
        let doc = json!({"foo": "bar"});
        let r = Reference {
            val: doc.get("foo"),
            obj: Some(&doc),
            key: Some(ReferenceKey::Field("foo".into())),
        };
        assert!(r.is_object_reference());
        assert!(!r.is_array_end());
        assert_eq!(r.index(), None);
        assert_eq!(r.key.unwrap().to_string(), "foo");
    }
}
