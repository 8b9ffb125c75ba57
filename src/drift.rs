//! Drift diagnostics for rules that did not match.
//!
//! When an old literal is missing from the artifact, the usual cause is that
//! the component was reformatted or edited upstream. We anchor on the most
//! distinctive line of the literal and look for the closest line in the
//! artifact so the report can point at where the block went.

use serde::Serialize;
use std::fmt;

/// Lines scoring below this are not worth reporting.
pub const MIN_SIMILARITY: f64 = 0.6;

/// Closest artifact line to a rule's anchor line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriftHint {
    /// 1-based line number in the artifact
    pub line: usize,
    /// Normalized Levenshtein similarity in `[0, 1]`
    pub similarity: f64,
    /// Anchor line taken from the old literal (trimmed)
    pub expected: String,
    /// Best-matching artifact line (trimmed)
    pub found: String,
}

impl fmt::Display for DriftHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {} ({:.0}% similar): {}",
            self.line,
            self.similarity * 100.0,
            self.found
        )
    }
}

/// Pick the longest trimmed line of `literal`; ties go to the first one.
fn anchor_line(literal: &str) -> Option<&str> {
    literal
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .fold(None, |best: Option<&str>, line| match best {
            Some(current) if current.len() >= line.len() => Some(current),
            _ => Some(line),
        })
}

/// Find the artifact line closest to the anchor line of `literal`.
pub fn nearest_line(content: &str, literal: &str) -> Option<DriftHint> {
    let anchor = anchor_line(literal)?;

    let mut best: Option<(usize, f64, &str)> = None;
    for (idx, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let score = strsim::normalized_levenshtein(anchor, trimmed);
        if best.is_none_or(|(_, top, _)| score > top) {
            best = Some((idx + 1, score, trimmed));
            if score >= 1.0 {
                break;
            }
        }
    }

    let (line, similarity, found) = best?;
    if similarity < MIN_SIMILARITY {
        return None;
    }

    log::debug!("nearest line for anchor {anchor:?}: {line} ({similarity:.2})");

    Some(DriftHint {
        line,
        similarity,
        expected: anchor.to_string(),
        found: found.to_string(),
    })
}
