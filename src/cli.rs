//! Command handler functions for the covdiag CLI.
//!
//! Each `cmd_*` function returns its output as a `String`, making them easy
//! to test without capturing stdout.

use std::fmt::Write;
use std::path::Path;

use anyhow::Result;
use clap::ValueEnum;

use crate::compose::build_messages;
use crate::model::{Diagnostic, RawReport};
use crate::runner::{
    extract_result, ExplicitResolver, HarnessCommand, PatternResolver, TestResolver, TestRunner,
};
use crate::source::TextSource;

/// Output style for diagnostics.
#[derive(Clone, ValueEnum)]
pub enum Style {
    Text,
    Json,
}

/// Run the source file's test under coverage instrumentation in an
/// isolated child process and render the resulting diagnostics.
pub fn cmd_check(
    source: &Path,
    runner_template: &str,
    test_file: Option<&Path>,
    test_pattern: Option<&str>,
    style: &Style,
) -> Result<String> {
    let resolver: Box<dyn TestResolver> = match (test_file, test_pattern) {
        (Some(path), _) => Box::new(ExplicitResolver::new(path.to_path_buf())),
        (None, Some(pattern)) => Box::new(PatternResolver::new(pattern)),
        (None, None) => anyhow::bail!("either --test-file or --test-pattern is required"),
    };

    let harness = HarnessCommand::parse(runner_template)?;
    let runner = TestRunner::new(harness, resolver);
    let result = runner.run_test(source)?;

    let text = TextSource::load(source)?;
    render(&build_messages(&text, &result), style)
}

/// Compose diagnostics from an existing harness report file, without
/// running anything. `test_failed` marks the recorded run as failing.
pub fn cmd_analyze(
    source: &Path,
    report_path: &Path,
    test_failed: bool,
    style: &Style,
) -> Result<String> {
    let raw = std::fs::read(report_path)?;
    let report: RawReport = serde_json::from_slice(&raw)?;
    let result = extract_result(report, source, !test_failed);

    let text = TextSource::load(source)?;
    render(&build_messages(&text, &result), style)
}

fn render(diagnostics: &[Diagnostic], style: &Style) -> Result<String> {
    match style {
        Style::Json => {
            let mut out = serde_json::to_string_pretty(diagnostics)?;
            out.push('\n');
            Ok(out)
        }
        Style::Text => {
            if diagnostics.is_empty() {
                return Ok("No findings.\n".to_string());
            }
            let mut out = String::new();
            for d in diagnostics {
                writeln!(
                    out,
                    "{}:{}-{}:{}  {:<16}  {}",
                    d.range.start_line,
                    d.range.start_column,
                    d.range.end_line,
                    d.range.end_column,
                    d.kind.as_str(),
                    d.message
                )
                .unwrap();
            }
            Ok(out)
        }
    }
}
