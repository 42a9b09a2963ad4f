//! Wire codec for instructions.
//!
//! Each instruction is a JSON object with abbreviated field names:
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `o`   | opcode (number 0-18, or kind name) |
//! | `p`   | path (array of segments, or a JSON Pointer string) |
//! | `v`   | value, text, or merge payload |
//! | `i`   | index or char offset |
//! | `l`   | char length |
//! | `s`   | search text |
//! | `r`   | replacement text |
//! | `fi`  | reorder source index |
//! | `ti`  | reorder destination index |
//! | `dp`  | destination path |
//! | `u`   | merge keys to unset |
//! | `b`   | move backfill |
//!
//! Unknown fields are ignored on decode.

use thiserror::Error;

use crate::error::MutateError;

pub mod compact;
pub mod validate;

pub use compact::{decode, decode_batch, encode, encode_batch, from_str, to_string, EncodeOptions};

/// Error produced while decoding the wire form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("invalid JSON: {0}")]
    Json(String),
    #[error("instruction must be an object")]
    NotAnObject,
    #[error("batch must be an array")]
    NotAnArray,
    #[error("missing opcode")]
    MissingOp,
    #[error("unknown operation: {0}")]
    UnknownOp(String),
    #[error("{op}: missing field \"{field}\"")]
    MissingField {
        op: &'static str,
        field: &'static str,
    },
    #[error("{op}: invalid field \"{field}\": {reason}")]
    InvalidField {
        op: &'static str,
        field: &'static str,
        reason: &'static str,
    },
    #[error("instruction {index}: {source}")]
    InBatch {
        index: usize,
        source: Box<CodecError>,
    },
}

impl From<serde_json::Error> for CodecError {
    fn from(e: serde_json::Error) -> Self {
        CodecError::Json(e.to_string())
    }
}

impl From<CodecError> for MutateError {
    fn from(e: CodecError) -> Self {
        MutateError::Validation(e.to_string())
    }
}
