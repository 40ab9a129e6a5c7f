//! # Flag Refs Scanner
//!
//! Finds flag references introduced or removed by a pull request.
//!
//! ## Pipeline
//!
//! ```text
//! Unified diff text
//!     │
//!     ├──> parse_multi_file_diff
//!     │      └─> FileDiff + hunks
//!     │
//!     ├──> preprocess (dotfiles, ignore files, renames)
//!     │      └─> one buffer per file
//!     │
//!     ├──> process_diffs (per line: classify + match)
//!     │      └─> ReferenceBuilder
//!     │
//!     ├──> check_extinctions (whole checkout, removed flags only)
//!     │
//!     └──> ReferenceSummary
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use flagrefs_protocol::FlagAliasMap;
//! use flagrefs_scanner::{parse_multi_file_diff, preprocess, scan_pull_request, ScanRequest};
//! use flagrefs_search::{DelimitedMatcher, Delimiters};
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let repo = Path::new("/path/to/checkout");
//!     let diff = std::fs::read_to_string("pr.diff")?;
//!     let contents = preprocess(repo, &parse_multi_file_diff(&diff)?);
//!     let matcher = DelimitedMatcher::new(["example-flag"], &FlagAliasMap::new(), Delimiters::default().resolve());
//!
//!     let report = scan_pull_request(
//!         ScanRequest { base_dir: repo, contents: &contents, max_flags: 5, check_extinctions: true },
//!         &matcher,
//!     )?;
//!     println!("added: {:?}", report.summary.added_keys());
//!     Ok(())
//! }
//! ```

mod diff;
mod error;
mod extinctions;
mod ignore_rules;
mod pipeline;
mod preprocess;
mod process;
mod scanner;

pub use diff::parse_multi_file_diff;
pub use error::{Result, ScanError};
pub use extinctions::check_extinctions;
pub use ignore_rules::{IgnoreRules, PROJECT_IGNORE_FILE};
pub use pipeline::{scan_pull_request, ScanReport, ScanRequest};
pub use preprocess::{check_diff_file, preprocess, preprocess_with, DiffPaths};
pub use process::{process_diffs, ProcessOutcome};
pub use scanner::FileScanner;
