use flagrefs_protocol::FlagAliasMap;
use std::collections::BTreeMap;

/// Finds flag references on a single line of text
pub trait ElementMatcher {
    /// Flag keys referenced on the line, by key or by alias
    fn find_matches(&self, line: &str) -> Vec<String>;

    /// Aliases of `flag_key` present on the line
    fn find_aliases(&self, line: &str, flag_key: &str) -> Vec<String>;
}

#[derive(Debug, Clone)]
struct FlagPatterns {
    /// Key wrapped in every delimiter pair (or the bare key without delimiters)
    bounded: Vec<String>,
    aliases: Vec<String>,
}

impl FlagPatterns {
    fn new(flag_key: &str, aliases: &[String], delimiters: &[String]) -> Self {
        let bounded = if delimiters.is_empty() {
            vec![flag_key.to_string()]
        } else {
            let mut out = Vec::with_capacity(delimiters.len() * delimiters.len());
            for left in delimiters {
                for right in delimiters {
                    out.push(format!("{left}{flag_key}{right}"));
                }
            }
            out
        };

        let mut unique: Vec<String> = Vec::with_capacity(aliases.len());
        for alias in aliases {
            if alias.is_empty() || unique.contains(alias) {
                continue;
            }
            unique.push(alias.clone());
        }

        Self {
            bounded,
            aliases: unique,
        }
    }

    fn key_matches(&self, line: &str) -> bool {
        self.bounded.iter().any(|pattern| line.contains(pattern.as_str()))
    }

    fn aliases_in<'a>(&'a self, line: &'a str) -> impl Iterator<Item = &'a String> + 'a {
        self.aliases
            .iter()
            .filter(move |alias| line.contains(alias.as_str()))
    }
}

/// Substring matcher over a fixed flag set.
///
/// A key matches when it appears between two delimiters; aliases match as
/// plain substrings. Results come back in key order so scans are deterministic.
#[derive(Debug, Clone)]
pub struct DelimitedMatcher {
    flags: BTreeMap<String, FlagPatterns>,
    aliases: FlagAliasMap,
    delimiters: Vec<String>,
}

impl DelimitedMatcher {
    pub fn new<K>(flag_keys: K, aliases: &FlagAliasMap, delimiters: Vec<String>) -> Self
    where
        K: IntoIterator,
        K::Item: AsRef<str>,
    {
        let mut flags = BTreeMap::new();
        let mut kept_aliases = FlagAliasMap::new();
        for key in flag_keys {
            let key = key.as_ref();
            if key.is_empty() || flags.contains_key(key) {
                continue;
            }
            let key_aliases = aliases.get(key).cloned().unwrap_or_default();
            flags.insert(
                key.to_string(),
                FlagPatterns::new(key, &key_aliases, &delimiters),
            );
            kept_aliases.insert(key.to_string(), key_aliases);
        }

        log::debug!(
            "Matcher ready: {} flags, {} delimiters",
            flags.len(),
            delimiters.len()
        );

        Self {
            flags,
            aliases: kept_aliases,
            delimiters,
        }
    }

    /// Same delimiters and aliases, restricted to `keys`
    pub fn scoped<K>(&self, keys: K) -> Self
    where
        K: IntoIterator,
        K::Item: AsRef<str>,
    {
        let keys: Vec<String> = keys
            .into_iter()
            .map(|key| key.as_ref().to_string())
            .filter(|key| self.flags.contains_key(key))
            .collect();
        Self::new(keys, &self.aliases, self.delimiters.clone())
    }

    pub fn flag_keys(&self) -> impl Iterator<Item = &str> {
        self.flags.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl ElementMatcher for DelimitedMatcher {
    fn find_matches(&self, line: &str) -> Vec<String> {
        self.flags
            .iter()
            .filter(|(_, patterns)| {
                patterns.key_matches(line) || patterns.aliases_in(line).next().is_some()
            })
            .map(|(key, _)| key.clone())
            .collect()
    }

    fn find_aliases(&self, line: &str, flag_key: &str) -> Vec<String> {
        self.flags
            .get(flag_key)
            .map(|patterns| patterns.aliases_in(line).cloned().collect())
            .unwrap_or_default()
    }
}
