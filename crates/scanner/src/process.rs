use crate::error::Result;
use flagrefs_protocol::Operation;
use flagrefs_references::ReferenceBuilder;
use flagrefs_search::ElementMatcher;

/// What a single diff buffer contributed to the builder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// Added or deleted lines that were matched against the flag set
    pub changed_lines: usize,
    pub references: usize,
    /// The flag budget was reached and the rest of the buffer was not read
    pub budget_reached: bool,
}

/// Feed every added/deleted line of `contents` through the matcher into the builder.
///
/// The budget is checked after each changed line has been fully recorded, so the
/// line that reaches the budget still contributes all of its references.
pub fn process_diffs(
    matcher: &dyn ElementMatcher,
    contents: &[u8],
    builder: &mut ReferenceBuilder,
) -> Result<ProcessOutcome> {
    let text = String::from_utf8_lossy(contents);
    let mut outcome = ProcessOutcome::default();

    for line in text.split('\n') {
        let op = Operation::classify(line);
        if !op.is_change() {
            continue;
        }
        outcome.changed_lines += 1;

        for flag_key in matcher.find_matches(line) {
            let aliases = matcher.find_aliases(line, &flag_key);
            log::debug!(
                "Found ({}) reference to flag {flag_key} with aliases {aliases:?}",
                op.marker()
            );
            builder.add_reference(&flag_key, op, &aliases)?;
            outcome.references += 1;
        }

        if builder.max_references() {
            outcome.budget_reached = true;
            break;
        }
    }

    Ok(outcome)
}
