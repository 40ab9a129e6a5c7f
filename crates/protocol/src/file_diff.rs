use serde::{Deserialize, Serialize};

/// One `@@ ... @@` block of a file diff
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunk {
    pub orig_start_line: u32,
    pub orig_lines: u32,
    pub new_start_line: u32,
    pub new_lines: u32,
    /// Text after the closing `@@` (usually the enclosing function)
    #[serde(default)]
    pub section: String,
    /// Raw hunk lines without the header, each terminated by `\n`
    #[serde(default)]
    pub body: Vec<u8>,
}

/// Diff of a single file: names as written in the diff (`a/...`, `b/...`, `/dev/null`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiff {
    pub orig_name: String,
    pub new_name: String,
    /// Extended git header lines (`new file mode`, `rename from`, ...)
    #[serde(default)]
    pub extended: Vec<String>,
    #[serde(default)]
    pub hunks: Vec<Hunk>,
}

impl FileDiff {
    pub fn new(orig_name: impl Into<String>, new_name: impl Into<String>) -> Self {
        Self {
            orig_name: orig_name.into(),
            new_name: new_name.into(),
            ..Default::default()
        }
    }

    pub fn with_hunk(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.hunks.push(Hunk {
            body: body.into(),
            ..Default::default()
        });
        self
    }
}
