//! Path-addressed mutation engine for JSON-like document trees.
//!
//! An [`Instruction`] describes one edit: set or remove a value, edit a
//! sequence, splice a string, toggle a boolean, merge a mapping or relocate a
//! value. [`apply`] produces a new tree with the edit applied and never
//! touches its input. [`inverse`] derives, from the pre-apply tree, the
//! instruction that restores it:
//!
//! ```
//! use doc_mutate::{apply, inverse, PathBuilder};
//! use serde_json::json;
//!
//! let before = json!({"items": ["a", "b", "c", "d"]});
//! let ins = PathBuilder::new().key("items").reorder(1, 3);
//!
//! let after = apply(&before, &ins).unwrap();
//! assert_eq!(after, json!({"items": ["a", "c", "d", "b"]}));
//!
//! let undo = inverse(&before, &ins).unwrap();
//! assert_eq!(apply(&after, &undo).unwrap(), before);
//! ```

mod access;
pub mod apply;
pub mod builder;
pub mod cli;
pub mod codec;
pub mod error;
pub mod history;
pub mod inverse;
pub mod types;

pub use apply::{apply, apply_all, apply_in_place, apply_with_guard, Outcome};
pub use builder::PathBuilder;
pub use codec::{CodecError, EncodeOptions};
pub use error::{BatchError, ErrorCategory, MutateError, Shape};
pub use history::{History, HistoryEntry, HistoryOptions, LogError};
pub use inverse::{inverse, inverse_all};
pub use types::{Instruction, OpKind};

pub use doc_path::{Path, PathError};
