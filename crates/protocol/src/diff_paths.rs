/// Name used by unified diffs for the missing side of an added or deleted file
pub const NULL_PATH: &str = "/dev/null";

/// Strip the one-component side prefix (`a/`, `b/`) from a diff file name.
///
/// `/dev/null` becomes `dev/null`; names without a separator are returned as-is.
pub fn strip_side_prefix(name: &str) -> String {
    let name = name.trim().replace('\\', "/");
    match name.split_once('/') {
        Some((_, rest)) => rest.to_string(),
        None => name,
    }
}

/// Whether a prefix-stripped diff path stands for "no file"
pub fn is_null_path(rel_path: &str) -> bool {
    rel_path == NULL_PATH.trim_start_matches('/') || rel_path == NULL_PATH
}

/// Whether the final component of a relative path is a dotfile
pub fn is_hidden_name(rel_path: &str) -> bool {
    rel_path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .is_some_and(|name| name.starts_with('.') && name != "." && name != "..")
}
