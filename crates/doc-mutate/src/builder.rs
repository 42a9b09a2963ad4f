//! Fluent construction of instructions.
//!
//! ```
//! use doc_mutate::PathBuilder;
//! use serde_json::json;
//!
//! let ins = PathBuilder::new().key("items").index(2).key("title").set(json!("Hi"));
//! assert_eq!(ins.path(), &vec!["items".to_string(), "2".into(), "title".into()]);
//! ```

use doc_path::Path;
use serde_json::{Map, Value};

use crate::types::Instruction;

/// Accumulates path segments, then finishes with one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathBuilder {
    path: Path,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing path.
    pub fn at(path: impl Into<Path>) -> Self {
        Self { path: path.into() }
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.path.push(key.into());
        self
    }

    pub fn index(mut self, index: usize) -> Self {
        self.path.push(index.to_string());
        self
    }

    /// Append a raw segment without interpreting it.
    pub fn push_segment(mut self, segment: impl Into<String>) -> Self {
        self.path.push(segment.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Finish without an instruction, keeping only the path.
    ///
    /// ```
    /// use doc_mutate::PathBuilder;
    ///
    /// let path = PathBuilder::new().key("nodes").index(2).key("id").into_path();
    /// assert_eq!(path, ["nodes", "2", "id"]);
    /// ```
    pub fn into_path(self) -> Path {
        self.path
    }

    // ── Whole-value ───────────────────────────────────────────────────────

    pub fn set(self, value: Value) -> Instruction {
        Instruction::Set {
            path: self.path,
            value,
        }
    }

    pub fn remove(self) -> Instruction {
        Instruction::Remove { path: self.path }
    }

    // ── Sequence ──────────────────────────────────────────────────────────

    pub fn push(self, value: Value) -> Instruction {
        Instruction::Push {
            path: self.path,
            value,
        }
    }

    pub fn insert(self, index: usize, value: Value) -> Instruction {
        Instruction::Insert {
            path: self.path,
            index,
            value,
        }
    }

    pub fn remove_at(self, index: usize) -> Instruction {
        Instruction::RemoveAt {
            path: self.path,
            index,
        }
    }

    pub fn pop(self) -> Instruction {
        Instruction::Pop { path: self.path }
    }

    pub fn shift(self) -> Instruction {
        Instruction::Shift { path: self.path }
    }

    pub fn unshift(self, value: Value) -> Instruction {
        Instruction::Unshift {
            path: self.path,
            value,
        }
    }

    pub fn reorder(self, from: usize, to: usize) -> Instruction {
        Instruction::Reorder {
            path: self.path,
            from,
            to,
        }
    }

    // ── String ────────────────────────────────────────────────────────────

    pub fn str_insert(self, index: usize, text: impl Into<String>) -> Instruction {
        Instruction::StrInsert {
            path: self.path,
            index,
            text: text.into(),
        }
    }

    pub fn str_append(self, text: impl Into<String>) -> Instruction {
        Instruction::StrAppend {
            path: self.path,
            text: text.into(),
        }
    }

    pub fn str_remove(self, index: usize, length: usize) -> Instruction {
        Instruction::StrRemove {
            path: self.path,
            index,
            length,
        }
    }

    pub fn str_replace(self, index: usize, length: usize, text: impl Into<String>) -> Instruction {
        Instruction::StrReplace {
            path: self.path,
            index,
            length,
            text: text.into(),
        }
    }

    pub fn replace_first(self, search: impl Into<String>, replacement: impl Into<String>) -> Instruction {
        Instruction::ReplaceFirst {
            path: self.path,
            search: search.into(),
            replacement: replacement.into(),
        }
    }

    pub fn replace_all(self, search: impl Into<String>, replacement: impl Into<String>) -> Instruction {
        Instruction::ReplaceAll {
            path: self.path,
            search: search.into(),
            replacement: replacement.into(),
        }
    }

    // ── Boolean / mapping ─────────────────────────────────────────────────

    pub fn toggle(self) -> Instruction {
        Instruction::Toggle { path: self.path }
    }

    pub fn merge(self, value: Map<String, Value>) -> Instruction {
        Instruction::Merge {
            path: self.path,
            value,
            unset: Vec::new(),
        }
    }

    // ── Cross-location ────────────────────────────────────────────────────

    pub fn move_to(self, to: impl Into<Path>) -> Instruction {
        Instruction::Move {
            path: self.path,
            to: to.into(),
            backfill: None,
        }
    }

    /// Move into the sequence at `to`, at `index` or at the end.
    pub fn insert_move_to(self, to: impl Into<Path>, index: Option<usize>) -> Instruction {
        Instruction::InsertMove {
            path: self.path,
            to: to.into(),
            index,
            backfill: None,
        }
    }
}

impl From<PathBuilder> for Path {
    fn from(b: PathBuilder) -> Self {
        b.path
    }
}
