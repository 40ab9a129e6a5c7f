use crate::error::{Result, SearchError};
use flagrefs_protocol::{DiffContents, FlagAliasMap};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Placeholder replaced by the (regex-escaped) flag key in file-pattern aliases
pub const FLAG_KEY_PLACEHOLDER: &str = "FLAG_KEY";

/// One `[[aliases]]` entry of the project config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AliasConfig {
    /// Hard-coded aliases per flag key
    Literal { flags: BTreeMap<String, Vec<String>> },
    /// `exampleFlag`
    CamelCase,
    /// `ExampleFlag`
    PascalCase,
    /// `example_flag`
    SnakeCase,
    /// `EXAMPLE_FLAG`
    UpperSnakeCase,
    /// `example-flag`
    KebabCase,
    /// `example.flag`
    DotCase,
    /// Regexes applied to files matching `paths`; capture group 1 is the alias
    FilePattern {
        paths: Vec<String>,
        patterns: Vec<String>,
    },
}

/// Build aliases for every flag key.
///
/// File-pattern aliases read files under `dir` that match the configured
/// globs and also the diff contents, so aliases declared in files deleted by
/// the change are still picked up.
pub fn generate_aliases(
    flag_keys: &[String],
    configs: &[AliasConfig],
    dir: &Path,
    diff_contents: &DiffContents,
) -> Result<FlagAliasMap> {
    let mut out: FlagAliasMap = flag_keys
        .iter()
        .map(|key| (key.clone(), Vec::new()))
        .collect();

    for config in configs {
        match config {
            AliasConfig::Literal { flags } => {
                for (key, aliases) in flags {
                    if let Some(bucket) = out.get_mut(key) {
                        bucket.extend(aliases.iter().cloned());
                    }
                }
            }
            AliasConfig::FilePattern { paths, patterns } => {
                let sources = collect_sources(paths, dir, diff_contents)?;
                for key in flag_keys {
                    match file_pattern_aliases(key, patterns, &sources) {
                        Ok(found) => {
                            if let Some(bucket) = out.get_mut(key) {
                                bucket.extend(found);
                            }
                        }
                        Err(err) => log::warn!("Skipping file pattern alias for {key}: {err}"),
                    }
                }
            }
            case => {
                for key in flag_keys {
                    if let Some(alias) = case_alias(case, key) {
                        if let Some(bucket) = out.get_mut(key) {
                            bucket.push(alias);
                        }
                    }
                }
            }
        }
    }

    for aliases in out.values_mut() {
        dedupe_in_place(aliases);
    }
    Ok(out)
}

fn dedupe_in_place(values: &mut Vec<String>) {
    let mut seen = Vec::with_capacity(values.len());
    values.retain(|value| {
        if value.trim().is_empty() || seen.contains(value) {
            return false;
        }
        seen.push(value.clone());
        true
    });
}

fn case_alias(config: &AliasConfig, flag_key: &str) -> Option<String> {
    let words = split_words(flag_key);
    if words.is_empty() {
        return None;
    }
    let lower: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();

    let alias = match config {
        AliasConfig::CamelCase => {
            let mut out = lower[0].clone();
            for word in &lower[1..] {
                out.push_str(&capitalize(word));
            }
            out
        }
        AliasConfig::PascalCase => lower.iter().map(|w| capitalize(w)).collect(),
        AliasConfig::SnakeCase => lower.join("_"),
        AliasConfig::UpperSnakeCase => lower.join("_").to_uppercase(),
        AliasConfig::KebabCase => lower.join("-"),
        AliasConfig::DotCase => lower.join("."),
        AliasConfig::Literal { .. } | AliasConfig::FilePattern { .. } => return None,
    };
    Some(alias)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Split a flag key into words on `-`, `_`, `.`, whitespace and lower-to-upper boundaries
pub fn split_words(flag_key: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower_or_digit = false;

    for ch in flag_key.chars() {
        if matches!(ch, '-' | '_' | '.') || ch.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower_or_digit = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower_or_digit && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower_or_digit = ch.is_lowercase() || ch.is_ascii_digit();
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn collect_sources(
    paths: &[String],
    dir: &Path,
    diff_contents: &DiffContents,
) -> Result<Vec<(PathBuf, String)>> {
    let globs = build_globset(paths)?;
    let mut sources = Vec::new();

    if dir.is_dir() {
        let mut builder = WalkBuilder::new(dir);
        builder
            .hidden(false)
            .git_ignore(true)
            .require_git(false)
            .parents(false)
            .filter_entry(|entry| entry.file_name() != ".git");
        for entry in builder.build() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!("Failed to read entry: {err}");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let path = entry.path();
            let Ok(relative) = path.strip_prefix(dir) else {
                continue;
            };
            if !globs.is_match(relative) {
                continue;
            }
            let bytes = std::fs::read(path).map_err(|source| SearchError::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;
            sources.push((path.to_path_buf(), String::from_utf8_lossy(&bytes).into_owned()));
        }
    }

    for (path, contents) in diff_contents {
        let relative = path.strip_prefix(dir).unwrap_or(path);
        if globs.is_match(relative) {
            sources.push((path.clone(), String::from_utf8_lossy(contents).into_owned()));
        }
    }

    log::debug!("File pattern alias sources: {}", sources.len());
    Ok(sources)
}

fn build_globset(paths: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for path in paths {
        builder.add(Glob::new(path.trim_start_matches("./"))?);
    }
    Ok(builder.build()?)
}

fn file_pattern_aliases(
    flag_key: &str,
    patterns: &[String],
    sources: &[(PathBuf, String)],
) -> Result<Vec<String>> {
    let mut found = Vec::new();
    for pattern in patterns {
        let expanded = pattern.replace(FLAG_KEY_PLACEHOLDER, &regex::escape(flag_key));
        let regex = Regex::new(&expanded).map_err(|source| SearchError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;
        if regex.captures_len() != 2 {
            return Err(SearchError::MissingCaptureGroup(pattern.clone()));
        }
        for (_, contents) in sources {
            for captures in regex.captures_iter(contents) {
                if let Some(alias) = captures.get(1) {
                    found.push(alias.as_str().to_string());
                }
            }
        }
    }
    Ok(found)
}
