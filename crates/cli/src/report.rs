use crate::flag_source::FlagCatalog;
use flagrefs_protocol::{FlagAliasMap, ReferenceSummary};
use sha2::{Digest, Sha256};

pub(crate) const COMMENT_HEADING: &str = "## Flag references";
pub(crate) const NO_REFERENCES_BODY: &str = "**No flag references found in PR**";

const TABLE_HEADER: &str = "| Name | Key | Aliases found |\n| --- | --- | --- |";
const MAX_CELL_CHARS: usize = 80;

/// Render the pull-request comment body.
///
/// Returns `None` when nothing was found and no placeholder was requested.
/// Rows are ordered by key, so identical summaries hash identically.
pub(crate) fn render_comment(
    summary: &ReferenceSummary,
    catalog: &FlagCatalog,
    placeholder: bool,
) -> Option<String> {
    if !summary.any_found() {
        return placeholder.then(|| format!("{COMMENT_HEADING}\n\n {NO_REFERENCES_BODY}"));
    }

    let mut sections = vec![COMMENT_HEADING.to_string()];

    if summary.any_added() {
        sections.push(format!(
            "### :mag: {} added or modified\n",
            pluralize("flag", summary.added_count())
        ));
        sections.push(TABLE_HEADER.to_string());
        sections.extend(rows(summary.flags_added(), catalog, |_| RowMarker::Added));
        sections.push("\n".to_string());
    }

    if summary.any_removed() {
        sections.push(format!(
            "### :x: {} removed\n",
            pluralize("flag", summary.removed_count())
        ));
        sections.push(TABLE_HEADER.to_string());
        sections.extend(rows(summary.flags_removed(), catalog, |key| {
            if summary.is_extinct(key) {
                RowMarker::Extinct
            } else {
                RowMarker::Removed
            }
        }));
        if summary.any_extinct() {
            sections.push(
                "\n:skull: no references to this flag remain in the repository".to_string(),
            );
        }
    }

    sections.push(format!(" <!-- flags:{} -->", summary.changed_keys().join(",")));

    let body = sections.join("\n");
    let hash = comment_hash(&body);
    Some(format!("{body}\n <!-- comment hash: {hash} -->"))
}

/// Hex sha256 of a comment body, used to detect an unchanged comment
pub(crate) fn comment_hash(body: &str) -> String {
    format!("{:x}", Sha256::digest(body.as_bytes()))
}

#[derive(Clone, Copy)]
enum RowMarker {
    Added,
    Removed,
    Extinct,
}

fn rows<'a>(
    flags: &'a FlagAliasMap,
    catalog: &'a FlagCatalog,
    marker: impl Fn(&str) -> RowMarker + 'a,
) -> impl Iterator<Item = String> + 'a {
    flags.iter().map(move |(key, aliases)| {
        let info = catalog.get(key);
        let mut name = escape_cell(&truncate_one_line(
            info.map_or(key.as_str(), |info| info.display_name()),
            MAX_CELL_CHARS,
        ));

        let row = marker(key);
        if info.is_some_and(|info| info.archived) {
            name = match row {
                RowMarker::Added => format!(":warning: {name} (archived)"),
                _ => format!("{name} (archived)"),
            };
        }
        if matches!(row, RowMarker::Extinct) {
            name = format!("{name} :skull:");
        }

        let aliases = aliases
            .iter()
            .map(|alias| format!("`{}`", escape_cell(alias)))
            .collect::<Vec<_>>()
            .join(", ");
        format!("| {name} | `{}` | {aliases} |", escape_cell(key))
    })
}

fn pluralize(noun: &str, count: usize) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

fn truncate_one_line(text: &str, max_chars: usize) -> String {
    let mut s = text.replace(['\n', '\r', '\t'], " ");
    s = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if s.chars().count() <= max_chars {
        return s;
    }
    let truncated: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{truncated}…")
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
