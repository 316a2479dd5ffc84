//! # Union Disambiguation
//!
//! When every member of a union rejects a value, one member's diagnostics
//! are reported in detail. The member chosen is the one whose failure looks
//! "least wrong": mismatches deep inside a matching structure are preferred
//! over mismatches at the top.
//!
//! Each member's stream is scored by level (depth below the union):
//! every diagnostic adds one at its level, and descending into a child
//! takes one back from the parent level, since a parent diagnostic that
//! merely announces failing children is not a mismatch of its own.
//!
//! ```text
//! stream                    score
//! [Int]      depth 0        [1]
//! Point      depth 0
//!   x        depth 1        [0, 1]
//! ```
//!
//! Scores compare lexicographically; a strict prefix is smaller. Ties go to
//! the earliest member.

use std::cmp::Ordering;

use crate::diagnostic::Diagnostic;

/// Per-level score of one member's diagnostic stream.
pub fn depth_score(diagnostics: &[Diagnostic], base_depth: usize) -> Vec<i64> {
    let mut score: Vec<i64> = Vec::new();
    let mut previous = base_depth;
    for diagnostic in diagnostics {
        let level = diagnostic.depth.saturating_sub(base_depth);
        if score.len() <= level {
            score.resize(level + 1, 0);
        }
        score[level] += 1;
        if diagnostic.depth > previous && level >= 1 {
            score[level - 1] -= 1;
        }
        previous = diagnostic.depth;
    }
    score
}

/// Lexicographic order on scores; a strict prefix orders first.
pub fn compare_scores(a: &[i64], b: &[i64]) -> Ordering {
    a.cmp(b)
}

/// Index of the member stream with the smallest score, earliest on ties.
/// `None` only for an empty slice.
pub fn select_least_wrong(streams: &[Vec<Diagnostic>], base_depth: usize) -> Option<usize> {
    let mut best: Option<(usize, Vec<i64>)> = None;
    for (index, stream) in streams.iter().enumerate() {
        let score = depth_score(stream, base_depth);
        tracing::trace!(member = index, ?score, "scored union member");
        let better = match &best {
            None => true,
            Some((_, current)) => compare_scores(&score, current) == Ordering::Less,
        };
        if better {
            best = Some((index, score));
        }
    }
    if let Some((index, score)) = &best {
        tracing::trace!(member = index, ?score, "selected union member");
    }
    best.map(|(index, _)| index)
}
