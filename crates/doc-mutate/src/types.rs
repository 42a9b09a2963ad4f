//! The instruction catalog.
//!
//! An [`Instruction`] describes one edit to a document. Each variant carries
//! exactly the fields its operation needs. `path` always addresses the value
//! the operation acts on: the sequence for sequence operations, the string
//! for string operations, the source for cross-location moves.

use doc_path::{format_json_pointer, validate_path, Path};
use serde_json::{Map, Value};

use crate::error::MutateError;

/// The closed set of operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Set,
    Remove,
    Push,
    Insert,
    RemoveAt,
    Pop,
    Shift,
    Unshift,
    Reorder,
    StrInsert,
    StrAppend,
    StrRemove,
    StrReplace,
    ReplaceFirst,
    ReplaceAll,
    Toggle,
    Merge,
    Move,
    InsertMove,
}

impl OpKind {
    pub const ALL: [OpKind; 19] = [
        OpKind::Set,
        OpKind::Remove,
        OpKind::Push,
        OpKind::Insert,
        OpKind::RemoveAt,
        OpKind::Pop,
        OpKind::Shift,
        OpKind::Unshift,
        OpKind::Reorder,
        OpKind::StrInsert,
        OpKind::StrAppend,
        OpKind::StrRemove,
        OpKind::StrReplace,
        OpKind::ReplaceFirst,
        OpKind::ReplaceAll,
        OpKind::Toggle,
        OpKind::Merge,
        OpKind::Move,
        OpKind::InsertMove,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OpKind::Set => "set",
            OpKind::Remove => "remove",
            OpKind::Push => "push",
            OpKind::Insert => "insert",
            OpKind::RemoveAt => "remove_at",
            OpKind::Pop => "pop",
            OpKind::Shift => "shift",
            OpKind::Unshift => "unshift",
            OpKind::Reorder => "reorder",
            OpKind::StrInsert => "str_insert",
            OpKind::StrAppend => "str_append",
            OpKind::StrRemove => "str_remove",
            OpKind::StrReplace => "str_replace",
            OpKind::ReplaceFirst => "replace_first",
            OpKind::ReplaceAll => "replace_all",
            OpKind::Toggle => "toggle",
            OpKind::Merge => "merge",
            OpKind::Move => "move",
            OpKind::InsertMove => "insert_move",
        }
    }

    /// Numeric wire opcode. Opcodes follow declaration order.
    pub fn opcode(&self) -> u8 {
        *self as u8
    }

    pub fn from_opcode(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }
}

/// A single described edit.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    // ── Whole-value ───────────────────────────────────────────────────────
    /// Replace the value at `path`, or create it if the key is absent.
    Set { path: Path, value: Value },
    /// Delete the value at `path`.
    Remove { path: Path },

    // ── Sequence ──────────────────────────────────────────────────────────
    Push { path: Path, value: Value },
    Insert { path: Path, index: usize, value: Value },
    RemoveAt { path: Path, index: usize },
    Pop { path: Path },
    Shift { path: Path },
    Unshift { path: Path, value: Value },
    /// Move the element at `from` so that it ends up at `to`.
    Reorder { path: Path, from: usize, to: usize },

    // ── String (offsets and lengths count chars) ──────────────────────────
    StrInsert { path: Path, index: usize, text: String },
    StrAppend { path: Path, text: String },
    StrRemove { path: Path, index: usize, length: usize },
    StrReplace {
        path: Path,
        index: usize,
        length: usize,
        text: String,
    },
    ReplaceFirst {
        path: Path,
        search: String,
        replacement: String,
    },
    ReplaceAll {
        path: Path,
        search: String,
        replacement: String,
    },

    // ── Boolean ───────────────────────────────────────────────────────────
    Toggle { path: Path },

    // ── Mapping ───────────────────────────────────────────────────────────
    /// Shallow merge: keys in `value` overwrite or insert, keys in `unset`
    /// are deleted. An absent target is created as a mapping.
    Merge {
        path: Path,
        value: Map<String, Value>,
        unset: Vec<String>,
    },

    // ── Cross-location ────────────────────────────────────────────────────
    /// Relocate the value at `path` to `to`, replacing whatever is there.
    /// With `backfill`, the source slot keeps that value instead of being
    /// vacated. `to` is resolved after the source is detached.
    Move {
        path: Path,
        to: Path,
        backfill: Option<Value>,
    },
    /// Relocate the value at `path` into the sequence at `to`, at `index` or
    /// at the end.
    InsertMove {
        path: Path,
        to: Path,
        index: Option<usize>,
        backfill: Option<Value>,
    },
}

impl Instruction {
    pub fn kind(&self) -> OpKind {
        match self {
            Instruction::Set { .. } => OpKind::Set,
            Instruction::Remove { .. } => OpKind::Remove,
            Instruction::Push { .. } => OpKind::Push,
            Instruction::Insert { .. } => OpKind::Insert,
            Instruction::RemoveAt { .. } => OpKind::RemoveAt,
            Instruction::Pop { .. } => OpKind::Pop,
            Instruction::Shift { .. } => OpKind::Shift,
            Instruction::Unshift { .. } => OpKind::Unshift,
            Instruction::Reorder { .. } => OpKind::Reorder,
            Instruction::StrInsert { .. } => OpKind::StrInsert,
            Instruction::StrAppend { .. } => OpKind::StrAppend,
            Instruction::StrRemove { .. } => OpKind::StrRemove,
            Instruction::StrReplace { .. } => OpKind::StrReplace,
            Instruction::ReplaceFirst { .. } => OpKind::ReplaceFirst,
            Instruction::ReplaceAll { .. } => OpKind::ReplaceAll,
            Instruction::Toggle { .. } => OpKind::Toggle,
            Instruction::Merge { .. } => OpKind::Merge,
            Instruction::Move { .. } => OpKind::Move,
            Instruction::InsertMove { .. } => OpKind::InsertMove,
        }
    }

    /// The path the instruction acts on (the source, for moves).
    pub fn path(&self) -> &Path {
        match self {
            Instruction::Set { path, .. }
            | Instruction::Remove { path }
            | Instruction::Push { path, .. }
            | Instruction::Insert { path, .. }
            | Instruction::RemoveAt { path, .. }
            | Instruction::Pop { path }
            | Instruction::Shift { path }
            | Instruction::Unshift { path, .. }
            | Instruction::Reorder { path, .. }
            | Instruction::StrInsert { path, .. }
            | Instruction::StrAppend { path, .. }
            | Instruction::StrRemove { path, .. }
            | Instruction::StrReplace { path, .. }
            | Instruction::ReplaceFirst { path, .. }
            | Instruction::ReplaceAll { path, .. }
            | Instruction::Toggle { path }
            | Instruction::Merge { path, .. }
            | Instruction::Move { path, .. }
            | Instruction::InsertMove { path, .. } => path,
        }
    }

    /// The destination path of cross-location instructions.
    pub fn destination(&self) -> Option<&Path> {
        match self {
            Instruction::Move { to, .. } | Instruction::InsertMove { to, .. } => Some(to),
            _ => None,
        }
    }

    /// Check the rules the type system cannot express.
    ///
    /// Runs before any tree is touched.
    pub fn validate(&self) -> Result<(), MutateError> {
        validate_path(self.path())?;
        if let Some(to) = self.destination() {
            validate_path(to)?;
        }
        match self {
            Instruction::Remove { path } if path.is_empty() => {
                Err(invalid(self, "cannot remove the document root"))
            }
            Instruction::ReplaceFirst { search, .. } | Instruction::ReplaceAll { search, .. }
                if search.is_empty() =>
            {
                Err(invalid(self, "search text must not be empty"))
            }
            Instruction::Move { path, to, .. } => {
                if path.is_empty() {
                    return Err(invalid(self, "cannot move the document root"));
                }
                if to.is_empty() {
                    return Err(invalid(self, "cannot move onto the document root"));
                }
                Ok(())
            }
            Instruction::InsertMove { path, .. } if path.is_empty() => {
                Err(invalid(self, "cannot move the document root"))
            }
            _ => Ok(()),
        }
    }
}

fn invalid(ins: &Instruction, reason: &str) -> MutateError {
    MutateError::Validation(format!(
        "{} at \"{}\": {}",
        ins.kind().name(),
        format_json_pointer(ins.path()),
        reason
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn p(steps: &[&str]) -> Path {
        steps.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn opcodes_round_trip() {
        for kind in OpKind::ALL {
            assert_eq!(OpKind::from_opcode(kind.opcode()), Some(kind));
            assert_eq!(OpKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(OpKind::InsertMove.opcode(), 18);
        assert_eq!(OpKind::from_opcode(19), None);
        assert_eq!(OpKind::from_name("add"), None);
    }

    #[test]
    fn path_and_destination() {
        let ins = Instruction::Move {
            path: p(&["a"]),
            to: p(&["b"]),
            backfill: None,
        };
        assert_eq!(ins.path(), &p(&["a"]));
        assert_eq!(ins.destination(), Some(&p(&["b"])));
        assert_eq!(ins.kind(), OpKind::Move);
        assert_eq!(Instruction::Toggle { path: p(&["t"]) }.destination(), None);
    }

    #[test]
    fn rejects_root_removal() {
        let err = Instruction::Remove { path: vec![] }.validate().unwrap_err();
        assert_eq!(
            err,
            MutateError::Validation("remove at \"\": cannot remove the document root".into())
        );
    }

    #[test]
    fn rejects_empty_search() {
        let ins = Instruction::ReplaceAll {
            path: p(&["s"]),
            search: String::new(),
            replacement: "x".into(),
        };
        assert!(ins.validate().is_err());
    }

    #[test]
    fn move_into_own_subtree_is_left_to_resolution() {
        // the destination is resolved after the source is detached
        let ins = Instruction::Move {
            path: p(&["list", "0"]),
            to: p(&["list", "0", "x"]),
            backfill: None,
        };
        assert!(ins.validate().is_ok());
        let backfilled = Instruction::Move {
            path: p(&["a"]),
            to: p(&["a", "b"]),
            backfill: Some(json!({})),
        };
        assert!(backfilled.validate().is_ok());
    }

    #[test]
    fn rejects_root_moves() {
        let from_root = Instruction::InsertMove {
            path: vec![],
            to: p(&["list"]),
            index: None,
            backfill: None,
        };
        assert!(from_root.validate().is_err());
        let onto_root = Instruction::Move {
            path: p(&["a"]),
            to: vec![],
            backfill: None,
        };
        assert!(onto_root.validate().is_err());
    }
}
