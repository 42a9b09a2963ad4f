//! Inverse derivation.
//!
//! For every instruction `I` and tree `T` on which `I` applies cleanly:
//!
//! ```text
//! apply(apply(T, I), inverse(T, I)) == T
//! ```
//!
//! The inverse must be computed from the tree *before* `I` is applied, since
//! most inverses carry a value captured from it.

use doc_path::{find, parent, Path};
use serde_json::{Map, Value};

use crate::access::{
    bool_at, char_len, char_position, char_range, detach, not_found, out_of_range, sequence_at,
    settable, shape_error, string_at, target, Vacated,
};
use crate::apply::apply_in_place;
use crate::error::{BatchError, MutateError, Shape};
use crate::types::Instruction;

/// Derive the instruction that undoes `ins` applied to `before`.
///
/// Fails exactly when applying `ins` to `before` would fail. Guards are not
/// consulted.
pub fn inverse(before: &Value, ins: &Instruction) -> Result<Instruction, MutateError> {
    ins.validate()?;
    let inv = derive(before, ins)?;
    tracing::trace!(op = ins.kind().name(), inverse = inv.kind().name(), "inverse");
    Ok(inv)
}

/// Derive the inverse of a whole batch.
///
/// The result is already in undo order: applying it with
/// [`apply_all`](crate::apply_all) to the batch's output restores `before`.
pub fn inverse_all(before: &Value, instructions: &[Instruction]) -> Result<Vec<Instruction>, BatchError> {
    let mut working = before.clone();
    let mut inverses = Vec::with_capacity(instructions.len());
    for (step, ins) in instructions.iter().enumerate() {
        let inv = apply_and_invert(&mut working, ins).map_err(|source| BatchError { step, source })?;
        inverses.push(inv);
    }
    inverses.reverse();
    Ok(inverses)
}

/// Apply `ins` to `doc` in place, returning its inverse.
///
/// On error `doc` may be partially mutated.
pub(crate) fn apply_and_invert(doc: &mut Value, ins: &Instruction) -> Result<Instruction, MutateError> {
    let inv = inverse(doc, ins)?;
    apply_in_place(doc, ins)?;
    Ok(inv)
}

fn derive(before: &Value, ins: &Instruction) -> Result<Instruction, MutateError> {
    let inv = match ins {
        Instruction::Set { path, .. } => match settable(before, path)?.val {
            Some(old) => Instruction::Set {
                path: path.clone(),
                value: old.clone(),
            },
            None => Instruction::Remove { path: path.clone() },
        },
        Instruction::Remove { path } => {
            let r = find(before, path)?;
            let old = r.val.ok_or_else(|| not_found(path))?.clone();
            match r.index() {
                Some(index) => Instruction::Insert {
                    path: parent(path)?,
                    index,
                    value: old,
                },
                None => Instruction::Set {
                    path: path.clone(),
                    value: old,
                },
            }
        }

        Instruction::Push { path, .. } => Instruction::RemoveAt {
            path: path.clone(),
            index: sequence_at(before, path)?.len(),
        },
        Instruction::Insert { path, index, .. } => {
            let len = sequence_at(before, path)?.len();
            if *index > len {
                return Err(out_of_range(path, *index, len));
            }
            Instruction::RemoveAt {
                path: path.clone(),
                index: *index,
            }
        }
        Instruction::RemoveAt { path, index } => {
            let seq = sequence_at(before, path)?;
            let old = seq.get(*index).ok_or_else(|| out_of_range(path, *index, seq.len()))?;
            Instruction::Insert {
                path: path.clone(),
                index: *index,
                value: old.clone(),
            }
        }
        Instruction::Pop { path } => {
            let last = sequence_at(before, path)?.last().ok_or_else(|| out_of_range(path, 0, 0))?;
            Instruction::Push {
                path: path.clone(),
                value: last.clone(),
            }
        }
        Instruction::Shift { path } => {
            let first = sequence_at(before, path)?.first().ok_or_else(|| out_of_range(path, 0, 0))?;
            Instruction::Unshift {
                path: path.clone(),
                value: first.clone(),
            }
        }
        Instruction::Unshift { path, .. } => {
            sequence_at(before, path)?;
            Instruction::Shift { path: path.clone() }
        }
        Instruction::Reorder { path, from, to } => {
            let len = sequence_at(before, path)?.len();
            for idx in [*from, *to] {
                if idx >= len {
                    return Err(out_of_range(path, idx, len));
                }
            }
            Instruction::Reorder {
                path: path.clone(),
                from: *to,
                to: *from,
            }
        }

        Instruction::StrInsert { path, index, text } => {
            char_position(path, string_at(before, path)?, *index)?;
            Instruction::StrRemove {
                path: path.clone(),
                index: *index,
                length: char_len(text),
            }
        }
        Instruction::StrAppend { path, text } => Instruction::StrRemove {
            path: path.clone(),
            index: char_len(string_at(before, path)?),
            length: char_len(text),
        },
        Instruction::StrRemove { path, index, length } => {
            let s = string_at(before, path)?;
            let range = char_range(path, s, *index, *length)?;
            Instruction::StrInsert {
                path: path.clone(),
                index: *index,
                text: s[range].to_string(),
            }
        }
        Instruction::StrReplace {
            path,
            index,
            length,
            text,
        } => {
            let s = string_at(before, path)?;
            let range = char_range(path, s, *index, *length)?;
            Instruction::StrReplace {
                path: path.clone(),
                index: *index,
                length: char_len(text),
                text: s[range].to_string(),
            }
        }
        Instruction::ReplaceFirst {
            path,
            search,
            replacement,
        } => {
            let s = string_at(before, path)?;
            match s.find(search.as_str()) {
                Some(at) => Instruction::StrReplace {
                    path: path.clone(),
                    index: char_len(&s[..at]),
                    length: char_len(replacement),
                    text: search.clone(),
                },
                None => Instruction::Set {
                    path: path.clone(),
                    value: Value::String(s.to_string()),
                },
            }
        }
        Instruction::ReplaceAll { path, .. } => Instruction::Set {
            path: path.clone(),
            value: Value::String(string_at(before, path)?.to_string()),
        },

        Instruction::Toggle { path } => {
            bool_at(before, path)?;
            Instruction::Toggle { path: path.clone() }
        }

        Instruction::Merge { path, value, unset } => match settable(before, path)?.val {
            None => Instruction::Remove { path: path.clone() },
            Some(Value::Object(existing)) => invert_merge(path, existing, value, unset),
            Some(other) => return Err(shape_error(path, Shape::Mapping, other)),
        },

        Instruction::Move { path, to, .. } if path == to => {
            target(before, path)?;
            ins.clone()
        }
        Instruction::Move { path, to, backfill } => {
            let mut scratch = before.clone();
            let (_, vacated) = detach(&mut scratch, path, backfill.clone())?;
            let displaced = settable(&scratch, to)?.val.cloned();
            match vacated {
                Vacated::Element(index) => Instruction::InsertMove {
                    path: to.clone(),
                    to: parent(path)?,
                    index: Some(index),
                    backfill: displaced,
                },
                Vacated::Field | Vacated::Backfilled => Instruction::Move {
                    path: to.clone(),
                    to: path.clone(),
                    backfill: displaced,
                },
            }
        }
        Instruction::InsertMove {
            path,
            to,
            index,
            backfill,
        } => {
            let mut scratch = before.clone();
            let (_, vacated) = detach(&mut scratch, path, backfill.clone())?;
            let len = sequence_at(&scratch, to)?.len();
            let at = index.unwrap_or(len);
            if at > len {
                return Err(out_of_range(to, at, len));
            }
            let mut moved_path = to.clone();
            moved_path.push(at.to_string());
            match vacated {
                Vacated::Element(i) => Instruction::InsertMove {
                    path: moved_path,
                    to: parent(path)?,
                    index: Some(i),
                    backfill: None,
                },
                // The backfill was pushed one slot right by the insertion.
                Vacated::Backfilled if moved_path == *path => Instruction::RemoveAt {
                    path: to.clone(),
                    index: at + 1,
                },
                Vacated::Field | Vacated::Backfilled => Instruction::Move {
                    path: moved_path,
                    to: path.clone(),
                    backfill: None,
                },
            }
        }
    };
    Ok(inv)
}

/// Restore every key the merge touched: prior values for keys that existed,
/// `unset` for keys it introduced.
fn invert_merge(path: &Path, existing: &Map<String, Value>, value: &Map<String, Value>, unset: &[String]) -> Instruction {
    let mut prior = Map::new();
    for key in value.keys().chain(unset) {
        if let Some(old) = existing.get(key) {
            prior.insert(key.clone(), old.clone());
        }
    }
    let introduced = value
        .keys()
        .filter(|key| !existing.contains_key(*key) && !unset.contains(*key))
        .cloned()
        .collect();
    Instruction::Merge {
        path: path.clone(),
        value: prior,
        unset: introduced,
    }
}
