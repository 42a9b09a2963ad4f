//! Validation of raw, encoded instructions.
//!
//! Checks untrusted wire input before it reaches the applier: the encoded
//! shape must decode, and the decoded instruction must pass
//! [`Instruction::validate`](crate::Instruction::validate).

use serde_json::Value;

use super::compact::decode;
use crate::types::Instruction;

/// Error returned by validation functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ValidationError {}

/// Validate a batch of encoded instructions.
///
/// Errors name the failing instruction:
/// `"Error in instruction [index = N] (reason)."`.
pub fn validate_batch(batch: &Value) -> Result<Vec<Instruction>, ValidationError> {
    let arr = batch
        .as_array()
        .ok_or_else(|| ValidationError("Not an array.".into()))?;
    arr.iter()
        .enumerate()
        .map(|(i, raw)| {
            validate_instruction(raw).map_err(|e| {
                ValidationError(format!("Error in instruction [index = {}] ({}).", i, e.0))
            })
        })
        .collect()
}

/// Validate one encoded instruction, returning it decoded.
pub fn validate_instruction(raw: &Value) -> Result<Instruction, ValidationError> {
    let ins = decode(raw).map_err(|e| ValidationError(e.to_string()))?;
    ins.validate().map_err(|e| ValidationError(e.to_string()))?;
    Ok(ins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn batch_throws_not_array() {
        let err = validate_batch(&json!({"o": 0})).unwrap_err();
        assert_eq!(err.0, "Not an array.");
    }

    #[test]
    fn batch_accepts_empty() {
        assert_eq!(validate_batch(&json!([])).unwrap(), vec![]);
    }

    #[test]
    fn batch_names_failing_instruction() {
        let err = validate_batch(&json!([
            {"o": 0, "p": ["a"], "v": 1},
            {"o": 1}
        ]))
        .unwrap_err();
        assert_eq!(
            err.0,
            "Error in instruction [index = 1] (invalid instruction: remove at \"\": cannot remove the document root)."
        );
    }

    #[test]
    fn instruction_throws_missing_field() {
        let err = validate_instruction(&json!({"o": "str_insert", "p": ["s"], "i": 0})).unwrap_err();
        assert_eq!(err.0, "str_insert: missing field \"v\"");
    }

    #[test]
    fn instruction_throws_empty_search() {
        let err = validate_instruction(&json!({"o": 13, "p": ["s"], "s": "", "r": "x"})).unwrap_err();
        assert!(err.0.contains("search text must not be empty"));
    }

    #[test]
    fn instruction_throws_deep_path() {
        let deep: Vec<Value> = (0..300).map(|_| json!("a")).collect();
        let err = validate_instruction(&json!({"o": 15, "p": deep})).unwrap_err();
        assert!(err.0.contains("path too long"));
    }

    #[test]
    fn instruction_succeeds_valid() {
        let ins = validate_instruction(&json!({"o": "toggle", "p": "/flags/0"})).unwrap();
        assert_eq!(ins.kind().name(), "toggle");
    }
}
