use serde::{Deserialize, Serialize};

/// Quote characters that bound a flag key by default
pub const DEFAULT_DELIMITERS: &[&str] = &["\"", "'", "`"];

/// Delimiter settings from the project config
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Delimiters {
    pub disable_defaults: bool,
    pub additional: Vec<String>,
}

impl Delimiters {
    /// Effective delimiter list, defaults first, deduplicated, empty entries dropped
    pub fn resolve(&self) -> Vec<String> {
        let defaults = if self.disable_defaults {
            &[][..]
        } else {
            DEFAULT_DELIMITERS
        };

        let mut out: Vec<String> = Vec::new();
        for delimiter in defaults
            .iter()
            .map(|d| d.to_string())
            .chain(self.additional.iter().cloned())
        {
            if delimiter.is_empty() || out.contains(&delimiter) {
                continue;
            }
            out.push(delimiter);
        }
        out
    }
}
