//! Core logic behind the `doc-mutate` binary.
//!
//! Applies a batch of encoded instructions to a document, or prints the
//! batch's inverse.

use serde_json::Value;
use thiserror::Error;

use crate::apply::apply_all;
use crate::codec::validate::{validate_batch, ValidationError};
use crate::codec::{encode_batch, EncodeOptions};
use crate::error::BatchError;
use crate::inverse::inverse_all;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Batch(#[from] BatchError),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CliOptions {
    /// Print the inverse batch instead of the new document.
    pub inverse: bool,
    /// Encode opcodes as names in printed instructions.
    pub names: bool,
    pub pretty: bool,
}

/// Apply `instructions_json` (an encoded batch) to `doc_json`.
pub fn run(doc_json: &str, instructions_json: &str, options: &CliOptions) -> Result<String, CliError> {
    let doc: Value = serde_json::from_str(doc_json)?;
    let raw: Value = serde_json::from_str(instructions_json)?;
    let instructions = validate_batch(&raw)?;

    let out = if options.inverse {
        let inverses = inverse_all(&doc, &instructions)?;
        encode_batch(&inverses, &EncodeOptions { names: options.names })
    } else {
        apply_all(&doc, &instructions)?
    };
    let text = if options.pretty {
        serde_json::to_string_pretty(&out)?
    } else {
        serde_json::to_string(&out)?
    };
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn applies_batch() {
        let out = run(
            r#"{"items":["a","b"]}"#,
            r#"[{"o":"push","p":["items"],"v":"c"},{"o":8,"p":"/items","fi":0,"ti":2}]"#,
            &CliOptions::default(),
        )
        .unwrap();
        assert_eq!(out, r#"{"items":["b","c","a"]}"#);
    }

    #[test]
    fn prints_inverse() {
        let out = run(
            r#"{"on":true}"#,
            r#"[{"o":0,"p":["n"],"v":1},{"o":15,"p":["on"]}]"#,
            &CliOptions {
                inverse: true,
                names: true,
                pretty: false,
            },
        )
        .unwrap();
        let v: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            v,
            json!([{"o": "toggle", "p": ["on"]}, {"o": "remove", "p": ["n"]}])
        );
    }

    #[test]
    fn reports_failing_step() {
        let err = run(r#"{"a":1}"#, r#"[{"o":1,"p":["a"]},{"o":1,"p":["a"]}]"#, &CliOptions::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "instruction 1 failed: path not found: \"/a\"");
    }

    #[test]
    fn reports_invalid_input() {
        let err = run("{", "[]", &CliOptions::default()).unwrap_err();
        assert!(matches!(err, CliError::Json(_)));
        let err = run("{}", r#"[{"o":"nope"}]"#, &CliOptions::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error in instruction [index = 0] (unknown operation: nope)."
        );
    }
}
