//! Value types shared across the analysis pipeline: the raw shapes a
//! coverage harness reports, the per-file `CoverageResult` under analysis,
//! and the `Diagnostic` records handed to the presentation layer.
//!
//! Lines and columns are 0-indexed throughout, including `Range` (the LSP
//! convention). Only human-readable diagnostic messages use 1-indexed line
//! numbers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Coverage record for a single source line.
///
/// Instrumentation reports `null` for lines that are not executable (block
/// delimiters, bare keywords); those lines can never be "uncovered".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<u64>", into = "Option<u64>")]
pub enum LineRecord {
    /// The line is not instrumentable; no hit count exists.
    NoData,
    /// The line executed this many times (possibly zero).
    Hits(u64),
}

impl LineRecord {
    /// True iff the line is instrumentable and was never executed.
    #[must_use]
    pub fn is_uncovered(&self) -> bool {
        matches!(self, LineRecord::Hits(0))
    }
}

impl From<Option<u64>> for LineRecord {
    fn from(value: Option<u64>) -> Self {
        match value {
            None => LineRecord::NoData,
            Some(n) => LineRecord::Hits(n),
        }
    }
}

impl From<LineRecord> for Option<u64> {
    fn from(value: LineRecord) -> Self {
        match value {
            LineRecord::NoData => None,
            LineRecord::Hits(n) => Some(n),
        }
    }
}

/// One outcome arm of a branch site, as reported by the harness.
///
/// Every field is optional: validation happens in `Branch::build_from`,
/// which skips unusable entries instead of failing the whole analysis.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBranchArm {
    /// Outcome label, e.g. "then" or "else".
    #[serde(default)]
    pub kind: Option<String>,
    /// Source range of this arm as `[start_line, start_col, end_line, end_col]`.
    #[serde(default)]
    pub range: Option<[i64; 4]>,
    /// Execution count. Negative counts are malformed and skipped.
    #[serde(default)]
    pub hits: Option<i64>,
}

/// A branch site (conditional construct) with its outcome arms, as
/// reported by the harness. Arm order is instrumentation order and is the
/// defined iteration order for analysis.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBranchSite {
    /// Originating construct category, e.g. "if" or "case".
    #[serde(default)]
    pub kind: Option<String>,
    /// Source range of the whole construct.
    #[serde(default)]
    pub range: Option<[i64; 4]>,
    #[serde(default)]
    pub arms: Vec<RawBranchArm>,
}

/// Raw coverage for a single file within a harness report.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileRecord {
    /// One entry per source line; index `i` covers 0-indexed line `i`.
    #[serde(default)]
    pub lines: Vec<LineRecord>,
    #[serde(default)]
    pub branches: Vec<RawBranchSite>,
}

/// The complete report a harness run writes to its report path, keyed by
/// file path as the harness saw it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReport {
    #[serde(default)]
    pub files: HashMap<String, FileRecord>,
}

/// Coverage measurements for one source file from one test run, with the
/// run's pass/fail signal merged in.
///
/// `lines` and `branches` are both empty when instrumentation collected
/// nothing for the file (e.g. its test never loaded it). That means "no
/// diagnostics derivable", not "fully covered".
#[derive(Debug, Clone, Default)]
pub struct CoverageResult {
    pub lines: Vec<LineRecord>,
    pub branches: Vec<RawBranchSite>,
    /// True iff the associated test run passed.
    pub test_status: bool,
}

impl CoverageResult {
    /// Merge a raw per-file record with the run's pass/fail status.
    #[must_use]
    pub fn from_record(record: FileRecord, test_status: bool) -> Self {
        Self {
            lines: record.lines,
            branches: record.branches,
            test_status,
        }
    }

    /// True iff instrumentation collected nothing for this file.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.branches.is_empty()
    }
}

/// Canonical source range: 0-indexed lines and columns, end-exclusive on
/// the column. Callers supply start ≤ end; no clamping or reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Range {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl Range {
    /// Normalize a 4-tuple of bounds into the canonical range. Pure and
    /// total over non-negative integers.
    #[must_use]
    pub fn new(start_line: u32, start_column: u32, end_line: u32, end_column: u32) -> Self {
        Self {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }
}

/// One possible outcome of a conditional construct, trackable
/// independently of the line it appears on. Built fresh from a
/// `CoverageResult` snapshot on every analysis call; never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    /// Originating construct category ("if", "case", ...).
    pub kind: String,
    /// Outcome label within the construct ("then", "else", ...).
    pub outcome: String,
    /// Source range of this specific outcome.
    pub range: Range,
    pub hit_count: u64,
}

impl Branch {
    /// True iff this outcome executed at least once.
    #[must_use]
    pub fn covered(&self) -> bool {
        self.hit_count > 0
    }
}

/// Category of a reportable finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    UncoveredLine,
    UncoveredBranch,
    TestFailing,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::UncoveredLine => "uncovered_line",
            DiagnosticKind::UncoveredBranch => "uncovered_branch",
            DiagnosticKind::TestFailing => "test_failing",
        }
    }
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding, ready for direct translation into an editor-facing
/// diagnostic record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub range: Range,
    pub kind: DiagnosticKind,
    pub message: String,
}
