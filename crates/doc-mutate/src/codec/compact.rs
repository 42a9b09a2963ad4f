//! Compact object codec.
//!
//! Encodes each instruction as a JSON object keyed by the abbreviated field
//! names listed in the [module docs](super). The decode side accepts numeric
//! and named opcodes, and paths given either as segment arrays or as JSON
//! Pointer strings.

use doc_path::{is_valid_index, parse_json_pointer, Path};
use serde_json::{json, Map, Value};

use super::CodecError;
use crate::types::{Instruction, OpKind};

// ── Path encoding ──────────────────────────────────────────────────────────

/// Segments that are canonical sequence indices are written as numbers.
fn encode_path(path: &[String]) -> Value {
    Value::Array(
        path.iter()
            .map(|s| match s.parse::<u64>() {
                Ok(n) if is_valid_index(s) => json!(n),
                _ => json!(s),
            })
            .collect(),
    )
}

fn decode_path(op: &'static str, field: &'static str, v: &Value) -> Result<Path, CodecError> {
    let invalid = |reason| CodecError::InvalidField { op, field, reason };
    match v {
        Value::String(s) => Ok(parse_json_pointer(s)),
        Value::Array(arr) => arr
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                Value::Number(n) => n
                    .as_u64()
                    .map(|n| n.to_string())
                    .ok_or_else(|| invalid("path index must be a non-negative integer")),
                _ => Err(invalid("path segment must be a string or number")),
            })
            .collect(),
        Value::Null => Ok(vec![]),
        _ => Err(invalid("path must be a string or array")),
    }
}

// ── Encode ─────────────────────────────────────────────────────────────────

/// Options for the compact encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncodeOptions {
    /// Write opcodes as kind names (`"set"`) instead of numbers.
    pub names: bool,
}

/// Encode one instruction.
pub fn encode(ins: &Instruction, options: &EncodeOptions) -> Value {
    let kind = ins.kind();
    let mut map = Map::new();
    map.insert(
        "o".into(),
        if options.names {
            json!(kind.name())
        } else {
            json!(kind.opcode())
        },
    );
    if !ins.path().is_empty() {
        map.insert("p".into(), encode_path(ins.path()));
    }

    let mut put = |field: &str, v: Value| {
        map.insert(field.to_string(), v);
    };
    match ins {
        Instruction::Remove { .. }
        | Instruction::Pop { .. }
        | Instruction::Shift { .. }
        | Instruction::Toggle { .. } => {}
        Instruction::Set { value, .. }
        | Instruction::Push { value, .. }
        | Instruction::Unshift { value, .. } => put("v", value.clone()),
        Instruction::Insert { index, value, .. } => {
            put("i", json!(index));
            put("v", value.clone());
        }
        Instruction::RemoveAt { index, .. } => put("i", json!(index)),
        Instruction::Reorder { from, to, .. } => {
            put("fi", json!(from));
            put("ti", json!(to));
        }
        Instruction::StrInsert { index, text, .. } => {
            put("i", json!(index));
            put("v", json!(text));
        }
        Instruction::StrAppend { text, .. } => put("v", json!(text)),
        Instruction::StrRemove { index, length, .. } => {
            put("i", json!(index));
            put("l", json!(length));
        }
        Instruction::StrReplace {
            index,
            length,
            text,
            ..
        } => {
            put("i", json!(index));
            put("l", json!(length));
            put("v", json!(text));
        }
        Instruction::ReplaceFirst {
            search,
            replacement,
            ..
        }
        | Instruction::ReplaceAll {
            search,
            replacement,
            ..
        } => {
            put("s", json!(search));
            put("r", json!(replacement));
        }
        Instruction::Merge { value, unset, .. } => {
            put("v", Value::Object(value.clone()));
            if !unset.is_empty() {
                put("u", json!(unset));
            }
        }
        Instruction::Move { to, backfill, .. } => {
            put("dp", encode_path(to));
            if let Some(b) = backfill {
                put("b", b.clone());
            }
        }
        Instruction::InsertMove {
            to,
            index,
            backfill,
            ..
        } => {
            put("dp", encode_path(to));
            if let Some(i) = index {
                put("i", json!(i));
            }
            if let Some(b) = backfill {
                put("b", b.clone());
            }
        }
    }
    Value::Object(map)
}

/// Encode a batch as a JSON array.
pub fn encode_batch(instructions: &[Instruction], options: &EncodeOptions) -> Value {
    Value::Array(instructions.iter().map(|ins| encode(ins, options)).collect())
}

/// Textual form of one instruction.
pub fn to_string(ins: &Instruction, options: &EncodeOptions) -> String {
    encode(ins, options).to_string()
}

// ── Decode ─────────────────────────────────────────────────────────────────

fn decode_kind(v: &Value) -> Result<OpKind, CodecError> {
    match v {
        Value::Number(n) => n
            .as_u64()
            .and_then(|code| u8::try_from(code).ok())
            .and_then(OpKind::from_opcode)
            .ok_or_else(|| CodecError::UnknownOp(n.to_string())),
        Value::String(s) => OpKind::from_name(s).ok_or_else(|| CodecError::UnknownOp(s.clone())),
        _ => Err(CodecError::UnknownOp(v.to_string())),
    }
}

/// Typed field access for one encoded instruction.
struct Fields<'a> {
    op: &'static str,
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    fn required(&self, field: &'static str) -> Result<&'a Value, CodecError> {
        self.map.get(field).ok_or(CodecError::MissingField { op: self.op, field })
    }

    fn invalid(&self, field: &'static str, reason: &'static str) -> CodecError {
        CodecError::InvalidField {
            op: self.op,
            field,
            reason,
        }
    }

    fn value(&self, field: &'static str) -> Result<Value, CodecError> {
        self.required(field).cloned()
    }

    fn to_index(&self, field: &'static str, v: &Value) -> Result<usize, CodecError> {
        v.as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| self.invalid(field, "expected a non-negative integer"))
    }

    fn index(&self, field: &'static str) -> Result<usize, CodecError> {
        self.to_index(field, self.required(field)?)
    }

    fn opt_index(&self, field: &'static str) -> Result<Option<usize>, CodecError> {
        match self.map.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => self.to_index(field, v).map(Some),
        }
    }

    fn text(&self, field: &'static str) -> Result<String, CodecError> {
        self.required(field)?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.invalid(field, "expected a string"))
    }

    fn path(&self, field: &'static str) -> Result<Path, CodecError> {
        match self.map.get(field) {
            None => Ok(vec![]),
            Some(v) => decode_path(self.op, field, v),
        }
    }

    fn dest_path(&self, field: &'static str) -> Result<Path, CodecError> {
        decode_path(self.op, field, self.required(field)?)
    }

    fn mapping(&self, field: &'static str) -> Result<Map<String, Value>, CodecError> {
        self.required(field)?
            .as_object()
            .cloned()
            .ok_or_else(|| self.invalid(field, "expected an object"))
    }

    fn keys(&self, field: &'static str) -> Result<Vec<String>, CodecError> {
        let Some(v) = self.map.get(field) else {
            return Ok(vec![]);
        };
        v.as_array()
            .ok_or_else(|| self.invalid(field, "expected an array of strings"))?
            .iter()
            .map(|k| {
                k.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| self.invalid(field, "expected an array of strings"))
            })
            .collect()
    }
}

/// Decode one instruction.
pub fn decode(v: &Value) -> Result<Instruction, CodecError> {
    let map = v.as_object().ok_or(CodecError::NotAnObject)?;
    let kind = decode_kind(map.get("o").ok_or(CodecError::MissingOp)?)?;
    let f = Fields {
        op: kind.name(),
        map,
    };
    let path = f.path("p")?;

    let ins = match kind {
        OpKind::Set => Instruction::Set {
            path,
            value: f.value("v")?,
        },
        OpKind::Remove => Instruction::Remove { path },
        OpKind::Push => Instruction::Push {
            path,
            value: f.value("v")?,
        },
        OpKind::Insert => Instruction::Insert {
            path,
            index: f.index("i")?,
            value: f.value("v")?,
        },
        OpKind::RemoveAt => Instruction::RemoveAt {
            path,
            index: f.index("i")?,
        },
        OpKind::Pop => Instruction::Pop { path },
        OpKind::Shift => Instruction::Shift { path },
        OpKind::Unshift => Instruction::Unshift {
            path,
            value: f.value("v")?,
        },
        OpKind::Reorder => Instruction::Reorder {
            path,
            from: f.index("fi")?,
            to: f.index("ti")?,
        },
        OpKind::StrInsert => Instruction::StrInsert {
            path,
            index: f.index("i")?,
            text: f.text("v")?,
        },
        OpKind::StrAppend => Instruction::StrAppend {
            path,
            text: f.text("v")?,
        },
        OpKind::StrRemove => Instruction::StrRemove {
            path,
            index: f.index("i")?,
            length: f.index("l")?,
        },
        OpKind::StrReplace => Instruction::StrReplace {
            path,
            index: f.index("i")?,
            length: f.index("l")?,
            text: f.text("v")?,
        },
        OpKind::ReplaceFirst => Instruction::ReplaceFirst {
            path,
            search: f.text("s")?,
            replacement: f.text("r")?,
        },
        OpKind::ReplaceAll => Instruction::ReplaceAll {
            path,
            search: f.text("s")?,
            replacement: f.text("r")?,
        },
        OpKind::Toggle => Instruction::Toggle { path },
        OpKind::Merge => Instruction::Merge {
            path,
            value: f.mapping("v")?,
            unset: f.keys("u")?,
        },
        OpKind::Move => Instruction::Move {
            path,
            to: f.dest_path("dp")?,
            backfill: map.get("b").cloned(),
        },
        OpKind::InsertMove => Instruction::InsertMove {
            path,
            to: f.dest_path("dp")?,
            index: f.opt_index("i")?,
            backfill: map.get("b").cloned(),
        },
    };
    Ok(ins)
}

/// Decode a JSON array of encoded instructions.
pub fn decode_batch(v: &Value) -> Result<Vec<Instruction>, CodecError> {
    v.as_array()
        .ok_or(CodecError::NotAnArray)?
        .iter()
        .enumerate()
        .map(|(index, item)| {
            decode(item).map_err(|e| CodecError::InBatch {
                index,
                source: Box::new(e),
            })
        })
        .collect()
}

/// Parse the textual form of one instruction.
pub fn from_str(s: &str) -> Result<Instruction, CodecError> {
    decode(&serde_json::from_str(s)?)
}

// ── Tests ──────────────────────────────────────────────────────────────────
