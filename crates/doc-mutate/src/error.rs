//! Error types for the mutation engine.

use std::fmt;

use doc_path::PathError;
use serde_json::Value;
use thiserror::Error;

/// The shape of a document value, used in shape-mismatch errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Null,
    Boolean,
    Number,
    String,
    Sequence,
    Mapping,
}

impl Shape {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Shape::Null,
            Value::Bool(_) => Shape::Boolean,
            Value::Number(_) => Shape::Number,
            Value::String(_) => Shape::String,
            Value::Array(_) => Shape::Sequence,
            Value::Object(_) => Shape::Mapping,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Null => "null",
            Shape::Boolean => "boolean",
            Shape::Number => "number",
            Shape::String => "string",
            Shape::Sequence => "sequence",
            Shape::Mapping => "mapping",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse classification of a [`MutateError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed instruction, caught before any tree is touched.
    Validation,
    /// A path segment does not resolve.
    Navigation,
    /// The target exists but has the wrong shape for the operation.
    Shape,
    /// An index, offset or length is outside the target's bounds.
    Range,
}

/// Error returned by apply and inverse.
///
/// Paths in error payloads are rendered as JSON Pointers.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MutateError {
    #[error("invalid instruction: {0}")]
    Validation(String),
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("expected {expected} at \"{path}\", found {found}")]
    Shape {
        path: String,
        expected: Shape,
        found: Shape,
    },
    #[error("index {index} out of range at \"{path}\" (length {len})")]
    IndexOutOfRange { path: String, index: usize, len: usize },
    #[error("range {index}..+{length} out of bounds at \"{path}\" (length {len})")]
    StrRange {
        path: String,
        index: usize,
        length: usize,
        len: usize,
    },
}

impl MutateError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MutateError::Validation(_) => ErrorCategory::Validation,
            MutateError::Path(PathError::PathTooLong { .. }) => ErrorCategory::Validation,
            MutateError::Path(_) => ErrorCategory::Navigation,
            MutateError::Shape { .. } => ErrorCategory::Shape,
            MutateError::IndexOutOfRange { .. } | MutateError::StrRange { .. } => {
                ErrorCategory::Range
            }
        }
    }
}

/// A batch failed at `step` (zero-based). Nothing from the batch persists.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("instruction {step} failed: {source}")]
pub struct BatchError {
    pub step: usize,
    pub source: MutateError,
}
