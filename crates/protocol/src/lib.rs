//! # Flag Refs Protocol
//!
//! Data model shared by every stage of a pull-request flag scan.
//!
//! ```text
//! FileDiff (old/new name + hunks)
//!     │
//!     ├──> Operation::classify(line)   per diff line
//!     │
//!     └──> ReferenceSummary            added / removed / extinct flags
//! ```

pub mod diff_paths;
mod file_diff;
mod operation;
mod summary;

pub use file_diff::{FileDiff, Hunk};
pub use operation::{classify, Operation};
pub use summary::{FlagAliasMap, ReferenceSummary};

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Concatenated hunk bodies keyed by on-disk file path
pub type DiffContents = BTreeMap<PathBuf, Vec<u8>>;
