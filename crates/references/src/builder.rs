use crate::error::{ReferenceError, Result};
use flagrefs_protocol::{FlagAliasMap, Operation, ReferenceSummary};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Accumulates flag references for one pull-request scan.
///
/// Fed by the diff scan through [`add_reference`](Self::add_reference), then
/// by the extinction scan through [`add_head_flag`](Self::add_head_flag), and
/// finally consumed by [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct ReferenceBuilder {
    /// Maximum number of distinct flags to collect
    max: usize,
    include_extinctions: bool,
    flags_added: HashMap<String, Vec<String>>,
    flags_removed: HashMap<String, Vec<String>>,
    flags_found_at_head: HashSet<String>,
    found_flags: HashSet<String>,
}

impl ReferenceBuilder {
    pub fn new(max: usize, include_extinctions: bool) -> Self {
        Self {
            max,
            include_extinctions,
            flags_added: HashMap::new(),
            flags_removed: HashMap::new(),
            flags_found_at_head: HashSet::new(),
            found_flags: HashSet::new(),
        }
    }

    /// Record one reference found on an added or deleted diff line
    pub fn add_reference(
        &mut self,
        flag_key: &str,
        op: Operation,
        aliases: &[String],
    ) -> Result<()> {
        let bucket = match op {
            Operation::Add => &mut self.flags_added,
            Operation::Delete => &mut self.flags_removed,
            Operation::Equal => {
                return Err(ReferenceError::InvalidOperation(op, flag_key.to_string()))
            }
        };

        bucket
            .entry(flag_key.to_string())
            .or_insert_with(|| Vec::with_capacity(aliases.len()))
            .extend(aliases.iter().cloned());

        if !self.found_flags.contains(flag_key) {
            self.found_flags.insert(flag_key.to_string());
        }
        Ok(())
    }

    /// Mark a flag as still referenced somewhere in the repository tree
    pub fn add_head_flag(&mut self, flag_key: &str) {
        if !self.flags_found_at_head.contains(flag_key) {
            self.flags_found_at_head.insert(flag_key.to_string());
        }
    }

    /// Whether the distinct-flag budget has been reached
    pub fn max_references(&self) -> bool {
        self.found_flags.len() >= self.max
    }

    /// Keys of every flag seen on a deleted line (unsorted)
    pub fn removed_flag_keys(&self) -> Vec<String> {
        self.flags_removed.keys().cloned().collect()
    }

    pub fn found_count(&self) -> usize {
        self.found_flags.len()
    }

    pub fn includes_extinctions(&self) -> bool {
        self.include_extinctions
    }

    /// Drop extinction reporting for this scan, e.g. when the repository walk failed
    pub fn disable_extinctions(&mut self) {
        if self.include_extinctions {
            log::debug!("Extinction reporting disabled for this scan");
        }
        self.include_extinctions = false;
    }

    /// Produce the final summary; the builder is spent afterwards
    pub fn build(self) -> ReferenceSummary {
        let mut added = FlagAliasMap::new();
        let mut removed = FlagAliasMap::new();
        let mut extinctions = BTreeSet::new();

        for flag_key in &self.found_flags {
            if let Some(aliases) = self.flags_added.get(flag_key) {
                // a key seen on both sides is a modification and reports as added
                let merged = aliases
                    .iter()
                    .chain(self.flags_removed.get(flag_key).into_iter().flatten());
                added.insert(flag_key.clone(), sorted_unique(merged));
            } else if let Some(aliases) = self.flags_removed.get(flag_key) {
                removed.insert(flag_key.clone(), sorted_unique(aliases.iter()));
                if !self.flags_found_at_head.contains(flag_key) {
                    extinctions.insert(flag_key.clone());
                }
            }
        }

        let extinct_flags = self.include_extinctions.then_some(extinctions);
        ReferenceSummary::new(added, removed, extinct_flags)
    }
}

/// Trimmed, non-empty, deduplicated and sorted
fn sorted_unique<'a>(aliases: impl Iterator<Item = &'a String>) -> Vec<String> {
    aliases
        .map(|alias| alias.trim())
        .filter(|alias| !alias.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn buckets_added_removed_and_extinct() {
        let mut builder = ReferenceBuilder::new(10, true);
        builder
            .add_reference("flag1", Operation::Add, &strings(&["alias1", "alias2"]))
            .unwrap();
        builder
            .add_reference("flag2", Operation::Add, &strings(&["alias3"]))
            .unwrap();
        builder
            .add_reference("flag2", Operation::Delete, &strings(&["alias3"]))
            .unwrap();
        builder
            .add_reference("flag3", Operation::Delete, &strings(&["alias4"]))
            .unwrap();
        builder
            .add_reference("flag4", Operation::Delete, &strings(&["alias5"]))
            .unwrap();
        builder.add_head_flag("flag3");

        let summary = builder.build();

        assert_eq!(summary.added_keys(), vec!["flag1", "flag2"]);
        assert_eq!(summary.removed_keys(), vec!["flag3", "flag4"]);
        assert_eq!(summary.extinct_keys(), vec!["flag4"]);
    }

    #[test]
    fn equal_operation_is_rejected() {
        let mut builder = ReferenceBuilder::new(10, false);
        let err = builder
            .add_reference("flag", Operation::Equal, &[])
            .unwrap_err();
        assert_eq!(
            err,
            ReferenceError::InvalidOperation(Operation::Equal, "flag".to_string())
        );
        assert_eq!(builder.found_count(), 0);
    }

    #[test]
    fn modified_flag_merges_aliases_into_added() {
        let mut builder = ReferenceBuilder::new(10, true);
        builder
            .add_reference("example-flag", Operation::Delete, &strings(&["OLD_NAME"]))
            .unwrap();
        builder
            .add_reference("example-flag", Operation::Add, &strings(&["exampleFlag"]))
            .unwrap();

        let summary = builder.build();

        assert_eq!(
            summary.flags_added().get("example-flag"),
            Some(&strings(&["OLD_NAME", "exampleFlag"]))
        );
        assert!(summary.flags_removed().is_empty());
        assert!(summary.extinct_keys().is_empty());
    }

    #[test]
    fn aliases_are_trimmed_deduplicated_and_sorted() {
        let mut builder = ReferenceBuilder::new(10, false);
        builder
            .add_reference("example-flag", Operation::Add, &strings(&["exampleFlag", " "]))
            .unwrap();
        builder
            .add_reference("example-flag", Operation::Add, &strings(&[" exampleFlag ", ""]))
            .unwrap();
        builder
            .add_reference("example-flag", Operation::Add, &strings(&["EXAMPLE_FLAG"]))
            .unwrap();
        // a single whitespace-only alias is dropped as well
        builder
            .add_reference("lonely-flag", Operation::Delete, &strings(&["   "]))
            .unwrap();

        let summary = builder.build();

        assert_eq!(
            summary.flags_added().get("example-flag"),
            Some(&strings(&["EXAMPLE_FLAG", "exampleFlag"]))
        );
        assert_eq!(summary.flags_removed().get("lonely-flag"), Some(&vec![]));
        assert_eq!(summary.extinct_flags(), None);
    }

    #[test]
    fn budget_counts_distinct_flags() {
        let mut builder = ReferenceBuilder::new(2, false);
        builder.add_reference("a", Operation::Add, &[]).unwrap();
        builder.add_reference("a", Operation::Delete, &[]).unwrap();
        assert!(!builder.max_references());
        builder.add_reference("b", Operation::Delete, &[]).unwrap();
        assert!(builder.max_references());
    }

    #[test]
    fn head_flags_only_matter_for_removed_keys() {
        let mut builder = ReferenceBuilder::new(10, true);
        builder.add_reference("gone", Operation::Delete, &[]).unwrap();
        builder.add_reference("moved", Operation::Delete, &[]).unwrap();
        builder.add_head_flag("moved");
        builder.add_head_flag("moved");
        builder.add_head_flag("never-seen");

        let mut removed = builder.removed_flag_keys();
        removed.sort();
        assert_eq!(removed, vec!["gone", "moved"]);

        let summary = builder.build();
        assert_eq!(summary.extinct_keys(), vec!["gone"]);
        assert_eq!(summary.removed_keys(), vec!["gone", "moved"]);
    }

    #[test]
    fn disabled_extinctions_report_none() {
        let mut builder = ReferenceBuilder::new(10, true);
        builder.add_reference("gone", Operation::Delete, &[]).unwrap();
        builder.disable_extinctions();
        assert!(!builder.includes_extinctions());

        let summary = builder.build();
        assert_eq!(summary.extinct_flags(), None);
        assert!(!summary.is_extinct("gone"));
    }

    fn event() -> impl Strategy<Value = (String, bool, Vec<String>)> {
        (
            "[a-e]",
            any::<bool>(),
            proptest::collection::vec("[ xyz]{0,3}", 0..4),
        )
    }

    proptest! {
        #[test]
        fn proptest_added_and_removed_are_disjoint(
            events in proptest::collection::vec(event(), 0..40),
            head in proptest::collection::vec("[a-e]", 0..5),
        ) {
            let mut builder = ReferenceBuilder::new(usize::MAX, true);
            for (key, added, aliases) in &events {
                let op = if *added { Operation::Add } else { Operation::Delete };
                builder.add_reference(key, op, aliases).unwrap();
            }
            for key in &head {
                builder.add_head_flag(key);
            }
            let summary = builder.build();

            for key in summary.flags_added().keys() {
                prop_assert!(!summary.flags_removed().contains_key(key));
            }
            for key in summary.extinct_keys() {
                prop_assert!(summary.flags_removed().contains_key(&key));
                prop_assert!(!head.contains(&key));
            }
            for aliases in summary.flags_added().values().chain(summary.flags_removed().values()) {
                let mut expected = aliases.clone();
                expected.sort();
                expected.dedup();
                prop_assert_eq!(aliases, &expected);
                prop_assert!(aliases.iter().all(|a| !a.trim().is_empty() && a.trim() == a));
            }
        }

        #[test]
        fn proptest_build_is_deterministic(events in proptest::collection::vec(event(), 0..30)) {
            let mut first = ReferenceBuilder::new(usize::MAX, true);
            let mut second = ReferenceBuilder::new(usize::MAX, true);
            for (key, added, aliases) in &events {
                let op = if *added { Operation::Add } else { Operation::Delete };
                first.add_reference(key, op, aliases).unwrap();
            }
            for (key, added, aliases) in events.iter().rev() {
                let op = if *added { Operation::Add } else { Operation::Delete };
                second.add_reference(key, op, aliases).unwrap();
            }
            prop_assert_eq!(first.build(), second.build());
        }
    }
}
