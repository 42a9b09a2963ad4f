//! Undo/redo history.
//!
//! Each recorded step stores its forward instructions and the inverse
//! derived against the pre-apply tree. Undo applies the inverse and moves the
//! entry to the redo stack; redo reapplies the forward instructions. Recording
//! anything new clears the redo stack.
//!
//! The undo stack can be written out as JSON lines and read back:
//!
//! ```text
//! {"n":1,"f":[{"o":2,"p":["l"],"v":1}],"i":[{"o":4,"p":["l"],"i":0}]}
//! ```

use serde_json::{json, Value};
use thiserror::Error;

use crate::apply::apply_all;
use crate::codec::{decode_batch, encode_batch, CodecError, EncodeOptions};
use crate::error::{BatchError, MutateError};
use crate::inverse::apply_and_invert;
use crate::types::Instruction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryOptions {
    /// Maximum number of undo levels; 0 means unlimited.
    pub max_levels: usize,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self { max_levels: 100 }
    }
}

/// One undo step.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Monotonic sequence number, starting at 1.
    pub seq: u64,
    /// Instructions in application order.
    pub forward: Vec<Instruction>,
    /// Inverse instructions in undo order.
    pub inverse: Vec<Instruction>,
}

/// Error reading a history log.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LogError {
    #[error("line {line}: {source}")]
    Codec { line: usize, source: CodecError },
    #[error("line {line}: missing or invalid sequence number")]
    InvalidSeq { line: usize },
    #[error("line {line}: sequence number {seq} does not increase")]
    OutOfOrder { line: usize, seq: u64 },
}

#[derive(Debug, Clone)]
pub struct History {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    max_levels: usize,
    next_seq: u64,
}

impl Default for History {
    fn default() -> Self {
        Self::new(HistoryOptions::default())
    }
}

impl History {
    pub fn new(options: HistoryOptions) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels: options.max_levels,
            next_seq: 1,
        }
    }

    /// Apply `ins` to `doc` and record it as one undo step.
    pub fn record(&mut self, doc: &Value, ins: &Instruction) -> Result<Value, MutateError> {
        let mut next = doc.clone();
        let inverse = apply_and_invert(&mut next, ins)?;
        self.push(vec![ins.clone()], vec![inverse]);
        Ok(next)
    }

    /// Apply a batch and record it as one undo step.
    ///
    /// An empty batch records nothing.
    pub fn record_batch(&mut self, doc: &Value, instructions: &[Instruction]) -> Result<Value, BatchError> {
        let mut next = doc.clone();
        let mut inverse = Vec::with_capacity(instructions.len());
        for (step, ins) in instructions.iter().enumerate() {
            inverse.push(apply_and_invert(&mut next, ins).map_err(|source| BatchError { step, source })?);
        }
        if !instructions.is_empty() {
            inverse.reverse();
            self.push(instructions.to_vec(), inverse);
        }
        Ok(next)
    }

    fn push(&mut self, forward: Vec<Instruction>, inverse: Vec<Instruction>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.undo_stack.push(HistoryEntry {
            seq,
            forward,
            inverse,
        });
        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    /// Undo the most recent step. Returns `None` when there is nothing to undo.
    ///
    /// On error the entry stays on the undo stack.
    pub fn undo(&mut self, doc: &Value) -> Result<Option<Value>, BatchError> {
        let Some(entry) = self.undo_stack.pop() else {
            return Ok(None);
        };
        match apply_all(doc, &entry.inverse) {
            Ok(prev) => {
                tracing::debug!(seq = entry.seq, "undo");
                self.redo_stack.push(entry);
                Ok(Some(prev))
            }
            Err(e) => {
                self.undo_stack.push(entry);
                Err(e)
            }
        }
    }

    /// Redo the most recently undone step.
    pub fn redo(&mut self, doc: &Value) -> Result<Option<Value>, BatchError> {
        let Some(entry) = self.redo_stack.pop() else {
            return Ok(None);
        };
        match apply_all(doc, &entry.forward) {
            Ok(next) => {
                tracing::debug!(seq = entry.seq, "redo");
                self.undo_stack.push(entry);
                Ok(Some(next))
            }
            Err(e) => {
                self.redo_stack.push(entry);
                Err(e)
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Undoable entries, oldest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.undo_stack
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Write the undo stack as JSON lines.
    pub fn to_log(&self) -> String {
        let options = EncodeOptions::default();
        let mut out = String::new();
        for entry in &self.undo_stack {
            let line = json!({
                "n": entry.seq,
                "f": encode_batch(&entry.forward, &options),
                "i": encode_batch(&entry.inverse, &options),
            });
            out.push_str(&line.to_string());
            out.push('\n');
        }
        out
    }

    /// Rebuild a history from [`to_log`](Self::to_log) output.
    ///
    /// Blank lines are skipped. Sequence numbers must increase; numbering
    /// continues after the highest one read. Only the newest `max_levels`
    /// entries are kept.
    pub fn from_log(log: &str, options: HistoryOptions) -> Result<Self, LogError> {
        let mut history = Self::new(options);
        for (idx, text) in log.lines().enumerate() {
            let line = idx + 1;
            if text.trim().is_empty() {
                continue;
            }
            let codec = |source| LogError::Codec { line, source };
            let raw: Value = serde_json::from_str(text).map_err(|e| codec(CodecError::from(e)))?;
            let seq = raw
                .get("n")
                .and_then(Value::as_u64)
                .ok_or(LogError::InvalidSeq { line })?;
            if seq < history.next_seq {
                return Err(LogError::OutOfOrder { line, seq });
            }
            let forward = decode_batch(raw.get("f").unwrap_or(&Value::Null)).map_err(codec)?;
            let inverse = decode_batch(raw.get("i").unwrap_or(&Value::Null)).map_err(codec)?;
            history.undo_stack.push(HistoryEntry {
                seq,
                forward,
                inverse,
            });
            history.next_seq = seq + 1;
        }
        if history.max_levels > 0 && history.undo_stack.len() > history.max_levels {
            let excess = history.undo_stack.len() - history.max_levels;
            history.undo_stack.drain(..excess);
        }
        Ok(history)
    }
}
