use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::{Path, PathBuf};

/// Project-specific ignore file, read next to `.gitignore` and `.ignore`
pub const PROJECT_IGNORE_FILE: &str = ".flagrefsignore";

const IGNORE_FILES: &[&str] = &[".gitignore", ".ignore", PROJECT_IGNORE_FILE];

/// Ignore files of one base directory, loaded once per scan
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    root: PathBuf,
    matchers: Vec<Gitignore>,
}

impl IgnoreRules {
    pub fn load(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let mut matchers = Vec::with_capacity(IGNORE_FILES.len());

        for name in IGNORE_FILES {
            let path = root.join(name);
            if !path.is_file() {
                continue;
            }
            let mut builder = GitignoreBuilder::new(&root);
            if let Some(err) = builder.add(&path) {
                log::warn!("Partially invalid ignore file {}: {err}", path.display());
            }
            match builder.build() {
                Ok(matcher) => {
                    log::debug!(
                        "Loaded {} ignore rules from {}",
                        matcher.num_ignores(),
                        path.display()
                    );
                    matchers.push(matcher);
                }
                Err(err) => log::warn!("Failed to load ignore file {}: {err}", path.display()),
            }
        }

        Self { root, matchers }
    }

    /// Whether `path` (absolute under the root, or root-relative) or one of its parents is ignored
    pub fn matches(&self, path: &Path, is_dir: bool) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        if relative.has_root() {
            return false;
        }
        self.matchers
            .iter()
            .any(|matcher| matcher.matched_path_or_any_parents(relative, is_dir).is_ignore())
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}
