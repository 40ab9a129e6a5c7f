use anyhow::{Context, Result};
use flagrefs_protocol::ReferenceSummary;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Step outputs in the order they are written
pub(crate) fn github_outputs(summary: &ReferenceSummary) -> Vec<(&'static str, String)> {
    let added = summary.added_keys();
    let removed = summary.removed_keys();
    let extinct = summary.extinct_keys();
    let changed = summary.changed_keys();

    let mut outputs = Vec::with_capacity(12);
    for (any, list, count, keys) in [
        ("any-modified", "modified-flags", "modified-flags-count", &added),
        ("any-removed", "removed-flags", "removed-flags-count", &removed),
        ("any-extinct", "extinct-flags", "extinct-flags-count", &extinct),
        ("any-changed", "changed-flags", "changed-flags-count", &changed),
    ] {
        outputs.push((any, (!keys.is_empty()).to_string()));
        outputs.push((list, keys.join(" ")));
        outputs.push((count, keys.len().to_string()));
    }
    outputs
}

/// Append `name=value` lines to a GitHub Actions output file.
pub(crate) fn write_github_outputs(path: &Path, summary: &ReferenceSummary) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open output file {}", path.display()))?;

    let mut buf = String::new();
    for (name, value) in github_outputs(summary) {
        buf.push_str(&format!("{name}={value}\n"));
    }
    file.write_all(buf.as_bytes())
        .with_context(|| format!("Failed to write output file {}", path.display()))?;
    log::debug!("Wrote step outputs to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flagrefs_protocol::FlagAliasMap;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;
    use tempfile::tempdir;

    fn summary() -> ReferenceSummary {
        let added: FlagAliasMap = [("new-flag".to_string(), vec![])].into_iter().collect();
        let removed: FlagAliasMap = [
            ("gone-flag".to_string(), vec![]),
            ("moved-flag".to_string(), vec![]),
        ]
        .into_iter()
        .collect();
        ReferenceSummary::new(added, removed, Some(BTreeSet::from(["gone-flag".to_string()])))
    }

    #[test]
    fn lists_every_output() {
        let outputs = github_outputs(&summary());
        let get = |name: &str| {
            outputs
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| v.as_str())
                .unwrap()
        };

        assert_eq!(outputs.len(), 12);
        assert_eq!(get("any-modified"), "true");
        assert_eq!(get("modified-flags"), "new-flag");
        assert_eq!(get("removed-flags"), "gone-flag moved-flag");
        assert_eq!(get("removed-flags-count"), "2");
        assert_eq!(get("extinct-flags"), "gone-flag");
        assert_eq!(get("any-changed"), "true");
        assert_eq!(get("changed-flags-count"), "3");
    }

    #[test]
    fn empty_summary_reports_false() {
        let outputs = github_outputs(&ReferenceSummary::default());
        assert!(outputs
            .iter()
            .filter(|(name, _)| name.starts_with("any-"))
            .all(|(_, value)| value == "false"));
    }

    #[test]
    fn appends_to_existing_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("github_output");
        std::fs::write(&path, "previous=1\n").unwrap();

        write_github_outputs(&path, &summary()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("previous=1\nany-modified=true\n"));
        assert!(written.contains("extinct-flags-count=1\n"));
    }
}
