use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Flag key -> aliases observed for that key
pub type FlagAliasMap = BTreeMap<String, Vec<String>>;

/// Final, read-only result of a pull-request scan.
///
/// A key is never present in both `flags_added` and `flags_removed`, and every
/// extinct key is a removed key. Alias lists are sorted and deduplicated so the
/// rendered output is stable between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSummary {
    flags_added: FlagAliasMap,
    flags_removed: FlagAliasMap,
    /// `None` when extinction checking was disabled or unavailable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    extinct_flags: Option<BTreeSet<String>>,
}

impl ReferenceSummary {
    pub fn new(
        flags_added: FlagAliasMap,
        flags_removed: FlagAliasMap,
        extinct_flags: Option<BTreeSet<String>>,
    ) -> Self {
        debug_assert!(flags_added
            .keys()
            .all(|key| !flags_removed.contains_key(key)));
        debug_assert!(extinct_flags
            .iter()
            .flatten()
            .all(|key| flags_removed.contains_key(key)));
        Self {
            flags_added,
            flags_removed,
            extinct_flags,
        }
    }

    pub fn flags_added(&self) -> &FlagAliasMap {
        &self.flags_added
    }

    pub fn flags_removed(&self) -> &FlagAliasMap {
        &self.flags_removed
    }

    pub fn extinct_flags(&self) -> Option<&BTreeSet<String>> {
        self.extinct_flags.as_ref()
    }

    pub fn any_found(&self) -> bool {
        !self.flags_added.is_empty() || !self.flags_removed.is_empty()
    }

    pub fn any_added(&self) -> bool {
        !self.flags_added.is_empty()
    }

    pub fn any_removed(&self) -> bool {
        !self.flags_removed.is_empty()
    }

    pub fn any_extinct(&self) -> bool {
        self.extinct_flags.as_ref().is_some_and(|set| !set.is_empty())
    }

    /// Sorted keys of added or modified flags
    pub fn added_keys(&self) -> Vec<String> {
        self.flags_added.keys().cloned().collect()
    }

    /// Sorted keys of removed flags
    pub fn removed_keys(&self) -> Vec<String> {
        self.flags_removed.keys().cloned().collect()
    }

    /// Sorted keys of extinct flags, empty when extinction data is unavailable
    pub fn extinct_keys(&self) -> Vec<String> {
        self.extinct_flags
            .iter()
            .flatten()
            .cloned()
            .collect()
    }

    /// Sorted keys of every flag touched by the change
    pub fn changed_keys(&self) -> Vec<String> {
        let all: BTreeSet<&String> = self
            .flags_added
            .keys()
            .chain(self.flags_removed.keys())
            .collect();
        all.into_iter().cloned().collect()
    }

    pub fn is_extinct(&self, flag_key: &str) -> bool {
        self.extinct_flags
            .as_ref()
            .is_some_and(|set| set.contains(flag_key))
    }

    pub fn added_count(&self) -> usize {
        self.flags_added.len()
    }

    pub fn removed_count(&self) -> usize {
        self.flags_removed.len()
    }

    pub fn extinct_count(&self) -> usize {
        self.extinct_flags.as_ref().map_or(0, BTreeSet::len)
    }
}
