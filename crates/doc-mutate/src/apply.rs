//! Forward application of instructions.
//!
//! [`apply`] never touches the caller's tree: it clones the input and
//! mutates the clone. [`apply_in_place`] is the underlying step for callers
//! that already own a scratch copy; on error the copy may be partially
//! mutated and must be discarded.

use doc_path::{find, format_json_pointer, get};
use serde_json::Value;

use crate::access::{
    bool_at, char_position, char_range, detach, out_of_range, sequence_mut, set_at, shape_error,
    string_mut, target, target_mut,
};
use crate::error::{BatchError, MutateError, Shape};
use crate::types::Instruction;

/// Result of a guarded apply.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The edit was applied; holds the new tree.
    Applied(Value),
    /// The guard refused the edit. Nothing changed.
    Vetoed,
}

impl Outcome {
    pub fn is_vetoed(&self) -> bool {
        matches!(self, Outcome::Vetoed)
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Outcome::Applied(doc) => Some(doc),
            Outcome::Vetoed => None,
        }
    }
}

/// Apply one instruction, returning the new tree.
///
/// ```
/// use doc_mutate::{apply, Instruction};
/// use serde_json::json;
///
/// let doc = json!({"name": "a"});
/// let ins = Instruction::Set { path: vec!["name".into()], value: json!("b") };
/// assert_eq!(apply(&doc, &ins).unwrap(), json!({"name": "b"}));
/// assert_eq!(doc, json!({"name": "a"}));
/// ```
pub fn apply(doc: &Value, ins: &Instruction) -> Result<Value, MutateError> {
    let mut next = doc.clone();
    apply_in_place(&mut next, ins)?;
    Ok(next)
}

/// Apply one instruction after consulting `guard`.
///
/// The guard receives the parent container of the addressed value (of the
/// source, for moves; `None` for the root) and the instruction. Returning
/// `false` vetoes the edit and yields [`Outcome::Vetoed`]. Navigation errors
/// are reported before the guard runs.
pub fn apply_with_guard<G>(doc: &Value, ins: &Instruction, mut guard: G) -> Result<Outcome, MutateError>
where
    G: FnMut(Option<&Value>, &Instruction) -> bool,
{
    ins.validate()?;
    let mut next = doc.clone();
    let allowed = guard(find(&next, ins.path())?.obj, ins);
    if !allowed {
        tracing::debug!(
            op = ins.kind().name(),
            path = %format_json_pointer(ins.path()),
            "instruction vetoed"
        );
        return Ok(Outcome::Vetoed);
    }
    execute(&mut next, ins)?;
    Ok(Outcome::Applied(next))
}

/// Apply one instruction to a tree the caller owns.
pub fn apply_in_place(doc: &mut Value, ins: &Instruction) -> Result<(), MutateError> {
    ins.validate()?;
    execute(doc, ins)
}

/// Dispatch an already validated instruction.
fn execute(doc: &mut Value, ins: &Instruction) -> Result<(), MutateError> {
    tracing::trace!(
        op = ins.kind().name(),
        path = %format_json_pointer(ins.path()),
        "apply"
    );
    match ins {
        Instruction::Set { path, value } => {
            set_at(doc, path, value.clone())?;
        }
        Instruction::Remove { path } => {
            detach(doc, path, None)?;
        }

        Instruction::Push { path, value } => {
            sequence_mut(doc, path)?.push(value.clone());
        }
        Instruction::Insert { path, index, value } => {
            let seq = sequence_mut(doc, path)?;
            if *index > seq.len() {
                return Err(out_of_range(path, *index, seq.len()));
            }
            seq.insert(*index, value.clone());
        }
        Instruction::RemoveAt { path, index } => {
            let seq = sequence_mut(doc, path)?;
            if *index >= seq.len() {
                return Err(out_of_range(path, *index, seq.len()));
            }
            seq.remove(*index);
        }
        Instruction::Pop { path } => {
            let seq = sequence_mut(doc, path)?;
            if seq.pop().is_none() {
                return Err(out_of_range(path, 0, 0));
            }
        }
        Instruction::Shift { path } => {
            let seq = sequence_mut(doc, path)?;
            if seq.is_empty() {
                return Err(out_of_range(path, 0, 0));
            }
            seq.remove(0);
        }
        Instruction::Unshift { path, value } => {
            sequence_mut(doc, path)?.insert(0, value.clone());
        }
        Instruction::Reorder { path, from, to } => {
            let seq = sequence_mut(doc, path)?;
            for idx in [*from, *to] {
                if idx >= seq.len() {
                    return Err(out_of_range(path, idx, seq.len()));
                }
            }
            if from != to {
                let item = seq.remove(*from);
                seq.insert(*to, item);
            }
        }

        Instruction::StrInsert { path, index, text } => {
            let s = string_mut(doc, path)?;
            let at = char_position(path, s, *index)?;
            s.insert_str(at, text);
        }
        Instruction::StrAppend { path, text } => {
            string_mut(doc, path)?.push_str(text);
        }
        Instruction::StrRemove {
            path,
            index,
            length,
        } => {
            let s = string_mut(doc, path)?;
            let range = char_range(path, s, *index, *length)?;
            s.replace_range(range, "");
        }
        Instruction::StrReplace {
            path,
            index,
            length,
            text,
        } => {
            let s = string_mut(doc, path)?;
            let range = char_range(path, s, *index, *length)?;
            s.replace_range(range, text);
        }
        Instruction::ReplaceFirst {
            path,
            search,
            replacement,
        } => {
            let s = string_mut(doc, path)?;
            *s = s.replacen(search.as_str(), replacement, 1);
        }
        Instruction::ReplaceAll {
            path,
            search,
            replacement,
        } => {
            let s = string_mut(doc, path)?;
            *s = s.replace(search.as_str(), replacement);
        }

        Instruction::Toggle { path } => {
            let flipped = !bool_at(doc, path)?;
            *target_mut(doc, path)? = Value::Bool(flipped);
        }

        Instruction::Merge { path, value, unset } => {
            if get(doc, path).is_none() {
                let mut created = value.clone();
                for key in unset {
                    created.remove(key);
                }
                set_at(doc, path, Value::Object(created))?;
            } else {
                match target_mut(doc, path)? {
                    Value::Object(map) => {
                        for (key, v) in value {
                            map.insert(key.clone(), v.clone());
                        }
                        for key in unset {
                            map.remove(key);
                        }
                    }
                    other => return Err(shape_error(path, Shape::Mapping, other)),
                }
            }
        }

        Instruction::Move { path, to, backfill } => {
            if path == to {
                target(doc, path)?;
                return Ok(());
            }
            let (moved, _) = detach(doc, path, backfill.clone())?;
            set_at(doc, to, moved)?;
        }
        Instruction::InsertMove {
            path,
            to,
            index,
            backfill,
        } => {
            let (moved, _) = detach(doc, path, backfill.clone())?;
            let seq = sequence_mut(doc, to)?;
            let at = index.unwrap_or(seq.len());
            if at > seq.len() {
                return Err(out_of_range(to, at, seq.len()));
            }
            seq.insert(at, moved);
        }
    }
    Ok(())
}

/// Apply a batch of instructions in order.
///
/// The tree produced by each step feeds the next. On the first failure the
/// whole batch is abandoned and the error names the failing step.
pub fn apply_all(doc: &Value, instructions: &[Instruction]) -> Result<Value, BatchError> {
    let span = tracing::debug_span!("apply_all", steps = instructions.len());
    let _enter = span.enter();

    let mut working = doc.clone();
    for (step, ins) in instructions.iter().enumerate() {
        apply_in_place(&mut working, ins).map_err(|source| {
            tracing::debug!(step, error = %source, "batch aborted");
            BatchError { step, source }
        })?;
    }
    Ok(working)
}
