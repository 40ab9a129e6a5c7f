use crate::error::Result;
use crate::scanner::FileScanner;
use flagrefs_references::ReferenceBuilder;
use flagrefs_search::{DelimitedMatcher, ElementMatcher};
use std::collections::BTreeSet;
use std::path::Path;

const BINARY_SNIFF_BYTES: usize = 8_000;

/// Search the whole checkout for flags removed by the diff.
///
/// Every removed key still referenced somewhere is reported to the builder via
/// `add_head_flag`; the rest become extinct at build time. Returns how many
/// removed keys are still referenced.
pub fn check_extinctions(
    removed_keys: &[String],
    repository_root: &Path,
    matcher: &DelimitedMatcher,
    builder: &mut ReferenceBuilder,
) -> Result<usize> {
    if removed_keys.is_empty() {
        return Ok(0);
    }

    let scoped = matcher.scoped(removed_keys);
    let files = FileScanner::new(repository_root).scan()?;
    let found = find_referenced_keys(&scoped, &files);

    for key in &found {
        builder.add_head_flag(key);
    }

    log::info!(
        "{} of {} removed flags are still referenced in {} files",
        found.len(),
        removed_keys.len(),
        files.len()
    );
    Ok(found.len())
}

fn find_referenced_keys(
    matcher: &DelimitedMatcher,
    files: &[impl AsRef<Path>],
) -> BTreeSet<String> {
    let mut found = BTreeSet::new();

    for path in files {
        if found.len() == matcher.len() {
            break;
        }
        let path = path.as_ref();
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                log::warn!("Failed to read {}: {err}", path.display());
                continue;
            }
        };
        if bytes.iter().take(BINARY_SNIFF_BYTES).any(|b| *b == 0) {
            log::debug!("Skipping binary file {}", path.display());
            continue;
        }

        let text = String::from_utf8_lossy(&bytes);
        for line in text.lines() {
            for key in matcher.find_matches(line) {
                if !found.contains(&key) {
                    log::debug!("Flag {key} still referenced in {}", path.display());
                    found.insert(key);
                }
            }
        }
    }

    found
}
