//! # Flag Refs References
//!
//! Accumulates flag references found in a pull-request diff and turns them
//! into a [`ReferenceSummary`](flagrefs_protocol::ReferenceSummary).
//!
//! ## Example
//!
//! ```
//! use flagrefs_protocol::Operation;
//! use flagrefs_references::ReferenceBuilder;
//!
//! let mut builder = ReferenceBuilder::new(5, true);
//! builder.add_reference("new-flag", Operation::Add, &[]).unwrap();
//! builder.add_reference("old-flag", Operation::Delete, &[]).unwrap();
//!
//! let summary = builder.build();
//! assert_eq!(summary.added_keys(), vec!["new-flag"]);
//! assert_eq!(summary.extinct_keys(), vec!["old-flag"]);
//! ```

mod builder;
mod error;

pub use builder::ReferenceBuilder;
pub use error::{ReferenceError, Result};
