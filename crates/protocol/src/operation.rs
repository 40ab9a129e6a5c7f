use serde::{Deserialize, Serialize};
use std::fmt;

/// Operation of a single diff line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Context line, hunk metadata or anything else that is not a change
    #[default]
    Equal,
    /// Line introduced by the change (`+`)
    Add,
    /// Line removed by the change (`-`)
    Delete,
}

impl Operation {
    /// Classify a raw diff line by its leading marker
    pub fn classify(line: &str) -> Self {
        if line.starts_with('+') {
            Self::Add
        } else if line.starts_with('-') {
            Self::Delete
        } else {
            Self::Equal
        }
    }

    /// Leading marker of the operation in unified-diff syntax
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Delete => "-",
            Self::Equal => "",
        }
    }

    pub const fn is_change(self) -> bool {
        !matches!(self, Self::Equal)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Equal => "equal",
            Self::Add => "add",
            Self::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Shorthand for [`Operation::classify`]
pub fn classify(line: &str) -> Operation {
    Operation::classify(line)
}
