use anyhow::{bail, Context, Result};
use flagrefs_search::{AliasConfig, Delimiters};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub(crate) const PROJECT_CONFIG_FILE: &str = ".flagrefs.toml";
pub(crate) const DEFAULT_MAX_FLAGS: usize = 5;

/// Contents of `.flagrefs.toml`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ProjectConfig {
    pub max_flags: Option<usize>,
    pub check_extinctions: Option<bool>,
    pub delimiters: Delimiters,
    pub aliases: Vec<AliasConfig>,
}

impl ProjectConfig {
    /// Load an explicit config file, or `<dir>/.flagrefs.toml` when it exists.
    pub(crate) fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        let (path, required): (PathBuf, bool) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => (dir.join(PROJECT_CONFIG_FILE), false),
        };

        if !path.is_file() {
            if required {
                bail!("Config file {} does not exist", path.display());
            }
            log::debug!("No {} found, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}

/// Command-line values that take precedence over the project file
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Overrides {
    pub max_flags: Option<usize>,
    pub check_extinctions: Option<bool>,
}

/// Effective settings for one run
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Settings {
    pub max_flags: usize,
    pub check_extinctions: bool,
    pub delimiters: Vec<String>,
    pub aliases: Vec<AliasConfig>,
}

impl Settings {
    pub(crate) fn resolve(project: ProjectConfig, overrides: Overrides) -> Result<Self> {
        let max_flags = overrides
            .max_flags
            .or(project.max_flags)
            .unwrap_or(DEFAULT_MAX_FLAGS);
        if max_flags == 0 {
            bail!("max_flags must be greater than 0");
        }

        Ok(Self {
            max_flags,
            check_extinctions: overrides
                .check_extinctions
                .or(project.check_extinctions)
                .unwrap_or(true),
            delimiters: project.delimiters.resolve(),
            aliases: project.aliases,
        })
    }
}
