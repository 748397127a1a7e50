//! Composes the analyzer's outputs into the flat, ordered diagnostic list
//! handed to the presentation layer: line warnings first, then branch
//! warnings, then a single test-failure warning when the run failed.

use crate::analyze::{uncovered_branches, uncovered_lines};
use crate::model::{Branch, CoverageResult, Diagnostic, DiagnosticKind, Range};
use crate::source::PositionResolver;

/// Build every diagnostic for one source file and one coverage run.
///
/// Output length is always `uncovered lines + uncovered branches + (1 if
/// the test run failed)`, in exactly that order. Pure: repeated calls on
/// the same input produce the same list.
#[must_use]
pub fn build_messages(source: &dyn PositionResolver, result: &CoverageResult) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for line in uncovered_lines(result) {
        diagnostics.push(line_warning(source, line));
    }

    for branch in uncovered_branches(result) {
        diagnostics.push(branch_warning(&branch));
    }

    if !result.test_status {
        diagnostics.push(test_failing_warning(source));
    }

    diagnostics
}

fn line_warning(source: &dyn PositionResolver, line: u32) -> Diagnostic {
    // A line the resolver doesn't know (source changed since the run)
    // still gets reported, with a zero-width anchor at the line start.
    let (start, end) = source.line_span(line).unwrap_or((0, 0));
    Diagnostic {
        range: Range::new(line, start, line, end),
        kind: DiagnosticKind::UncoveredLine,
        message: format!("Line {} is not covered by tests", line + 1),
    }
}

fn branch_warning(branch: &Branch) -> Diagnostic {
    let line = branch.range.start_line + 1;
    let message = if branch.outcome.is_empty() {
        format!("Branch of `{}` on line {} is never taken", branch.kind, line)
    } else {
        format!(
            "`{}` branch of `{}` on line {} is never taken",
            branch.outcome, branch.kind, line
        )
    };
    Diagnostic {
        range: branch.range,
        kind: DiagnosticKind::UncoveredBranch,
        message,
    }
}

fn test_failing_warning(source: &dyn PositionResolver) -> Diagnostic {
    Diagnostic {
        range: source.full_range(),
        kind: DiagnosticKind::TestFailing,
        message: "Associated test run is failing".to_string(),
    }
}
