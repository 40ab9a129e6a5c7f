use crate::ignore_rules::IgnoreRules;
use flagrefs_protocol::diff_paths::{is_hidden_name, is_null_path, strip_side_prefix};
use flagrefs_protocol::{DiffContents, FileDiff};
use std::path::{Path, PathBuf};

/// Where a file diff lives on disk and whether the scan should skip it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffPaths {
    pub file_to_parse: PathBuf,
    pub skip: bool,
}

/// Concatenate hunk bodies per file, skipping dotfiles, ignored paths and renames
pub fn preprocess(base_dir: &Path, file_diffs: &[FileDiff]) -> DiffContents {
    let ignores = IgnoreRules::load(base_dir);
    preprocess_with(base_dir, file_diffs, &ignores)
}

/// [`preprocess`] with already loaded ignore rules
pub fn preprocess_with(
    base_dir: &Path,
    file_diffs: &[FileDiff],
    ignores: &IgnoreRules,
) -> DiffContents {
    let mut contents = DiffContents::new();

    for file_diff in file_diffs {
        let paths = check_diff_file(file_diff, base_dir, ignores);
        if paths.skip {
            log::debug!("Skipping {}", paths.file_to_parse.display());
            continue;
        }

        let buffer = contents.entry(paths.file_to_parse).or_default();
        for hunk in &file_diff.hunks {
            buffer.extend_from_slice(&hunk.body);
        }
    }

    log::debug!("Preprocessed {} of {} file diffs", contents.len(), file_diffs.len());
    contents
}

/// Resolve the on-disk path of a file diff and decide whether to skip it
pub fn check_diff_file(file_diff: &FileDiff, base_dir: &Path, ignores: &IgnoreRules) -> DiffPaths {
    let orig = strip_side_prefix(&file_diff.orig_name);
    let new = strip_side_prefix(&file_diff.new_name);
    let full_orig = base_dir.join(&orig);
    let full_new = base_dir.join(&new);

    // a missing new side means the file was deleted, so read the old side
    let (file_to_parse, is_dir) = match std::fs::metadata(&full_new) {
        Ok(meta) => (full_new, meta.is_dir()),
        Err(err) => {
            log::debug!("{}: {err}", full_new.display());
            (full_orig, false)
        }
    };

    // `dev/null` is never hidden, so added or deleted dotfiles are still scanned
    let dotfile = is_hidden_name(&orig) && is_hidden_name(&new);
    let renamed = orig != new && !is_null_path(&orig) && !is_null_path(&new);

    let skip = dotfile || renamed || ignores.matches(&file_to_parse, is_dir);
    DiffPaths { file_to_parse, skip }
}
