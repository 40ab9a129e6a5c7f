//! # Flag Refs Search
//!
//! Decides whether a line of text references a flag.
//!
//! - [`ElementMatcher`]: the capability the diff scan consumes
//! - [`DelimitedMatcher`]: flag keys bounded by delimiters, aliases as plain substrings
//! - [`generate_aliases`]: builds per-flag aliases from [`AliasConfig`] entries

mod aliases;
mod delimiters;
mod error;
mod matcher;

pub use aliases::{generate_aliases, split_words, AliasConfig, FLAG_KEY_PLACEHOLDER};
pub use delimiters::{Delimiters, DEFAULT_DELIMITERS};
pub use error::{Result, SearchError};
pub use matcher::{DelimitedMatcher, ElementMatcher};
