//! Pure functions over a `CoverageResult`: which lines and which branch
//! outcomes never executed during the observed run.

use crate::model::{Branch, CoverageResult};

/// 0-indexed positions of instrumentable lines with zero hits.
///
/// `NoData` entries (keywords, block delimiters) are never reported:
/// `[null, 1, 0, 1, 0]` yields `[2, 4]`.
#[must_use]
pub fn uncovered_lines(result: &CoverageResult) -> Vec<u32> {
    result
        .lines
        .iter()
        .enumerate()
        .filter(|(_, record)| record.is_uncovered())
        .map(|(i, _)| i as u32)
        .collect()
}

/// Branch outcomes with zero hits, in stored order.
#[must_use]
pub fn uncovered_branches(result: &CoverageResult) -> Vec<Branch> {
    Branch::build_from(result)
        .into_iter()
        .filter(|branch| !branch.covered())
        .collect()
}
