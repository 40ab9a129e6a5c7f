use crate::error::{Result, ScanError};
use flagrefs_protocol::{FileDiff, Hunk};

struct OpenHunk {
    hunk: Hunk,
    orig_remaining: u32,
    new_remaining: u32,
}

impl OpenHunk {
    fn is_complete(&self) -> bool {
        self.orig_remaining == 0 && self.new_remaining == 0
    }

    fn push_line(&mut self, raw: &str) {
        self.hunk.body.extend_from_slice(raw.as_bytes());
        if !raw.ends_with('\n') {
            self.hunk.body.push(b'\n');
        }
    }
}

/// Parse a (possibly multi-file) unified diff as produced by `git diff`.
///
/// Hunk bodies are consumed by line count, so a deleted line that itself starts
/// with `-- ` is content rather than a file header.
pub fn parse_multi_file_diff(input: &str) -> Result<Vec<FileDiff>> {
    let mut files: Vec<FileDiff> = Vec::new();
    let mut current: Option<FileDiff> = None;
    let mut open: Option<OpenHunk> = None;

    for (idx, raw) in input.split_inclusive('\n').enumerate() {
        let line_no = idx + 1;
        let line = raw.trim_end_matches(['\n', '\r']);

        if let Some(hunk) = open.as_mut() {
            let consumed = match line.chars().next() {
                None | Some(' ') if hunk.orig_remaining > 0 && hunk.new_remaining > 0 => {
                    hunk.orig_remaining -= 1;
                    hunk.new_remaining -= 1;
                    true
                }
                Some('-') if hunk.orig_remaining > 0 => {
                    hunk.orig_remaining -= 1;
                    true
                }
                Some('+') if hunk.new_remaining > 0 => {
                    hunk.new_remaining -= 1;
                    true
                }
                Some('\\') => true,
                _ => false,
            };
            if consumed {
                hunk.push_line(raw);
                if hunk.is_complete() {
                    close_hunk(&mut current, &mut open);
                }
                continue;
            }
            log::debug!("Hunk ended early at line {line_no}");
            close_hunk(&mut current, &mut open);
        }

        if let Some(rest) = line.strip_prefix("diff --git ") {
            flush_file(&mut files, &mut current);
            let (orig, new) = split_git_names(rest);
            current = Some(FileDiff::new(orig, new));
        } else if let Some(rest) = line.strip_prefix("--- ") {
            // plain diffs have no `diff --git` line between files
            if current.as_ref().is_some_and(|file| !file.hunks.is_empty()) {
                flush_file(&mut files, &mut current);
            }
            current.get_or_insert_with(FileDiff::default).orig_name = parse_name(rest);
        } else if let Some(rest) = line.strip_prefix("+++ ") {
            current.get_or_insert_with(FileDiff::default).new_name = parse_name(rest);
        } else if line.starts_with("@@ ") {
            let hunk = parse_hunk_header(line).ok_or_else(|| ScanError::InvalidHunkHeader {
                line: line_no,
                header: line.to_string(),
            })?;
            let file = current.get_or_insert_with(FileDiff::default);
            let state = OpenHunk {
                orig_remaining: hunk.orig_lines,
                new_remaining: hunk.new_lines,
                hunk,
            };
            if state.is_complete() {
                file.hunks.push(state.hunk);
            } else {
                open = Some(state);
            }
        } else if line.starts_with('\\') {
            // "\ No newline at end of file" trailing a completed hunk
            if let Some(last) = current.as_mut().and_then(|file| file.hunks.last_mut()) {
                last.body.extend_from_slice(line.as_bytes());
                last.body.push(b'\n');
            }
        } else if let Some(file) = current.as_mut() {
            if !line.is_empty() {
                file.extended.push(line.to_string());
            }
        }
    }

    if open.is_some() {
        log::debug!("Diff ended inside a hunk");
        close_hunk(&mut current, &mut open);
    }
    flush_file(&mut files, &mut current);

    log::debug!("Parsed {} file diffs", files.len());
    Ok(files)
}

fn close_hunk(current: &mut Option<FileDiff>, open: &mut Option<OpenHunk>) {
    if let Some(state) = open.take() {
        current
            .get_or_insert_with(FileDiff::default)
            .hunks
            .push(state.hunk);
    }
}

fn flush_file(files: &mut Vec<FileDiff>, current: &mut Option<FileDiff>) {
    if let Some(file) = current.take() {
        files.push(file);
    }
}

fn split_git_names(rest: &str) -> (String, String) {
    let rest = rest.trim();
    if let Some(idx) = rest.rfind(" b/").or_else(|| rest.rfind(" \"b/")) {
        return (unquote(&rest[..idx]), unquote(&rest[idx + 1..]));
    }
    match rest.split_once(' ') {
        Some((orig, new)) => (unquote(orig), unquote(new)),
        None => (unquote(rest), unquote(rest)),
    }
}

fn parse_name(rest: &str) -> String {
    // drop the optional timestamp after a tab
    let name = rest.split('\t').next().unwrap_or(rest);
    unquote(name.trim_end())
}

fn unquote(name: &str) -> String {
    let name = name.trim();
    name.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(name)
        .to_string()
}

fn parse_hunk_header(line: &str) -> Option<Hunk> {
    let rest = line.strip_prefix("@@ -")?;
    let (ranges, section) = rest.split_once(" @@")?;
    let (orig, new) = ranges.split_once(" +")?;
    let (orig_start_line, orig_lines) = parse_range(orig)?;
    let (new_start_line, new_lines) = parse_range(new)?;
    Some(Hunk {
        orig_start_line,
        orig_lines,
        new_start_line,
        new_lines,
        section: section.trim().to_string(),
        body: Vec::new(),
    })
}

fn parse_range(range: &str) -> Option<(u32, u32)> {
    match range.split_once(',') {
        Some((start, len)) => Some((start.parse().ok()?, len.parse().ok()?)),
        None => Some((range.parse().ok()?, 1)),
    }
}
