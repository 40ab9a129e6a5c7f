use crate::error::Result;
use crate::extinctions::check_extinctions;
use crate::process::process_diffs;
use flagrefs_protocol::{DiffContents, ReferenceSummary};
use flagrefs_references::ReferenceBuilder;
use flagrefs_search::DelimitedMatcher;
use std::path::Path;

/// Inputs of one pull-request scan
#[derive(Debug, Clone, Copy)]
pub struct ScanRequest<'a> {
    /// Repository checkout at the head of the pull request
    pub base_dir: &'a Path,
    /// Output of [`preprocess`](crate::preprocess)
    pub contents: &'a DiffContents,
    pub max_flags: usize,
    pub check_extinctions: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    pub summary: ReferenceSummary,
    pub files_scanned: usize,
    pub budget_reached: bool,
    /// False when extinction checking was disabled or the repository walk failed
    pub extinctions_checked: bool,
}

/// Diff scan, then extinction scan, then build.
pub fn scan_pull_request(
    request: ScanRequest<'_>,
    matcher: &DelimitedMatcher,
) -> Result<ScanReport> {
    let mut builder = ReferenceBuilder::new(request.max_flags, request.check_extinctions);
    let mut files_scanned = 0;
    let mut budget_reached = false;

    for (path, contents) in request.contents {
        if builder.max_references() {
            budget_reached = true;
            break;
        }
        log::debug!("Scanning diff of {}", path.display());
        let outcome = process_diffs(matcher, contents, &mut builder)?;
        files_scanned += 1;
        if outcome.budget_reached {
            budget_reached = true;
            break;
        }
    }

    if budget_reached {
        log::info!("Stopped after {} flags (max {})", builder.found_count(), request.max_flags);
    }

    let mut extinctions_checked = false;
    if builder.includes_extinctions() {
        let removed = builder.removed_flag_keys();
        match check_extinctions(&removed, request.base_dir, matcher, &mut builder) {
            Ok(_) => extinctions_checked = true,
            Err(err) => {
                log::warn!("Extinction check failed, skipping: {err}");
                builder.disable_extinctions();
            }
        }
    }

    let summary = builder.build();
    log::info!(
        "{} flags added or modified, {} removed, {} extinct",
        summary.added_count(),
        summary.removed_count(),
        summary.extinct_count()
    );

    Ok(ScanReport {
        summary,
        files_scanned,
        budget_reached,
        extinctions_checked,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flagrefs_protocol::FlagAliasMap;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn matcher(keys: &[&str]) -> DelimitedMatcher {
        DelimitedMatcher::new(keys.iter().copied(), &FlagAliasMap::new(), vec![])
    }

    #[test]
    fn failed_extinction_walk_leaves_extinctions_unavailable() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("missing");
        let mut contents = DiffContents::new();
        contents.insert(missing.join("a.go"), b"-old-flag\n".to_vec());

        let report = scan_pull_request(
            ScanRequest {
                base_dir: &missing,
                contents: &contents,
                max_flags: 5,
                check_extinctions: true,
            },
            &matcher(&["old-flag"]),
        )
        .unwrap();

        assert!(!report.extinctions_checked);
        assert_eq!(report.summary.removed_keys(), vec!["old-flag"]);
        assert_eq!(report.summary.extinct_flags(), None);
    }

    #[test]
    fn budget_stops_before_the_next_file() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("keep.go"), "").unwrap();
        let mut contents = DiffContents::new();
        contents.insert(temp.path().join("a.go"), b"+flag-a\n".to_vec());
        contents.insert(temp.path().join("b.go"), b"+flag-b\n".to_vec());

        let report = scan_pull_request(
            ScanRequest {
                base_dir: temp.path(),
                contents: &contents,
                max_flags: 1,
                check_extinctions: false,
            },
            &matcher(&["flag-a", "flag-b"]),
        )
        .unwrap();

        assert!(report.budget_reached);
        assert_eq!(report.files_scanned, 1);
        assert_eq!(report.summary.added_keys(), vec!["flag-a"]);
        assert!(!report.extinctions_checked);
    }
}
