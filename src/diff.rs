//! Coloured unified diffs of a patch run.

use colored::Colorize;
use similar::{ChangeTag, TextDiff};
use std::path::Path;

/// Lines of unchanged context around each hunk.
const CONTEXT_LINES: usize = 3;

/// Render the changes between `original` and `modified` as hunks.
///
/// Returns an empty string when the two are identical.
pub fn render_diff(file: &Path, original: &str, modified: &str) -> String {
    if original == modified {
        return String::new();
    }

    let mut out = String::new();
    out.push_str(&format!("{}\n", format!("--- {} (original)", file.display()).dimmed()));
    out.push_str(&format!("{}\n", format!("+++ {} (patched)", file.display()).dimmed()));

    let diff = TextDiff::from_lines(original, modified);
    for (idx, group) in diff.grouped_ops(CONTEXT_LINES).iter().enumerate() {
        if idx > 0 {
            out.push_str(&format!("{}\n", "...".dimmed()));
        }
        for op in group {
            for change in diff.iter_changes(op) {
                let line = match change.tag() {
                    ChangeTag::Delete => format!("-{}", change).red(),
                    ChangeTag::Insert => format!("+{}", change).green(),
                    ChangeTag::Equal => format!(" {}", change).normal(),
                };
                out.push_str(&line.to_string());
                if change.missing_newline() {
                    out.push('\n');
                }
            }
        }
    }

    out
}
