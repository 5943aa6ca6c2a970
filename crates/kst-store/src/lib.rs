//! # kst-store
//!
//! Persistence for knowledge structures.
//!
//! Two interchange formats:
//!
//! - **Text states format** (`.states` or any non-JSON extension): one
//!   state per line, items separated by commas, `#` comments and blank
//!   lines ignored. The domain is the union of the listed states; ∅ is
//!   implied; the line listing the whole domain is required.
//! - **JSON documents** (`.json`): the serde document forms of
//!   `KnowledgeStructure` and `ProbabilisticKnowledgeStructure`.
//!
//! Writes are atomic (tmp file, rename, parent sync) and reads validate
//! the substrate before parsing.

pub mod file;
pub mod text;

pub use file::{
    read_probabilistic, read_structure, write_probabilistic, write_structure,
};
pub use text::{TextFormat, parse_states, render_states};

use kst_kernel::KernelError;

/// Errors from parsing or persisting structures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{path}: I/O error: {message}")]
    Io { path: String, message: String },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("corrupted input: {0}")]
    Corrupt(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error(transparent)]
    Kernel(#[from] KernelError),
}
