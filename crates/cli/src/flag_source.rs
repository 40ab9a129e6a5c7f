use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// What the CLI knows about a flag besides its key
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub(crate) struct FlagInfo {
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub archived: bool,
}

impl FlagInfo {
    fn from_key(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Self::default()
        }
    }

    pub(crate) fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.key)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagEntry {
    Key(String),
    Flag(FlagInfo),
}

/// Either a bare list or an API-style `{"items": [...]}` page
#[derive(Deserialize)]
#[serde(untagged)]
enum FlagFile {
    List(Vec<FlagEntry>),
    Page { items: Vec<FlagEntry> },
}

/// Known flags, keyed and ordered by flag key
#[derive(Debug, Default)]
pub(crate) struct FlagCatalog {
    flags: BTreeMap<String, FlagInfo>,
}

impl FlagCatalog {
    /// Read flags from an optional JSON file plus keys given on the command line.
    pub(crate) fn load(path: Option<&Path>, keys: &[String]) -> Result<Self> {
        let mut catalog = Self::default();

        if let Some(path) = path {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read flags file {}", path.display()))?;
            catalog.extend_from_json(&raw).with_context(|| {
                format!("Failed to parse flags file {}", path.display())
            })?;
        }
        for key in keys {
            catalog.insert(FlagInfo::from_key(key));
        }

        log::debug!("Loaded {} flags", catalog.len());
        Ok(catalog)
    }

    fn extend_from_json(&mut self, raw: &str) -> Result<()> {
        let entries = match serde_json::from_str::<FlagFile>(raw)? {
            FlagFile::List(entries) => entries,
            FlagFile::Page { items } => items,
        };
        for entry in entries {
            match entry {
                FlagEntry::Key(key) => self.insert(FlagInfo::from_key(&key)),
                FlagEntry::Flag(info) => self.insert(info),
            }
        }
        Ok(())
    }

    fn insert(&mut self, mut info: FlagInfo) {
        info.key = info.key.trim().to_string();
        if info.key.is_empty() {
            return;
        }
        // richer entries from the file win over bare keys
        match self.flags.get(&info.key) {
            Some(existing) if info.name.is_none() && !info.archived => {
                log::debug!("Duplicate flag {}", existing.key);
            }
            _ => {
                self.flags.insert(info.key.clone(), info);
            }
        }
    }

    pub(crate) fn keys(&self) -> Vec<String> {
        self.flags.keys().cloned().collect()
    }

    pub(crate) fn get(&self, key: &str) -> Option<&FlagInfo> {
        self.flags.get(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.flags.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}
