//! Runs a source file's associated test in a disposable child process with
//! coverage instrumentation enabled, and collects the merged coverage +
//! pass/fail result for that one file.
//!
//! Coverage instrumentation is process-global in most runtimes, so every
//! run gets its own child process and its own report file: nothing leaks
//! into the caller and nothing survives between calls. The harness
//! contract is: enable line+branch instrumentation, execute the test file,
//! write the report JSON to the given path, and exit zero iff the tests
//! passed. A run that exits without writing a report is treated as a
//! crash, never as "all covered" or "passed".

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::{CovdiagError, Result};
use crate::model::{CoverageResult, RawReport};

/// Locates the test file associated with a source file.
pub trait TestResolver {
    fn resolve(&self, source: &Path) -> Result<PathBuf>;
}

/// Resolver returning a fixed, caller-supplied test file.
pub struct ExplicitResolver {
    test_file: PathBuf,
}

impl ExplicitResolver {
    #[must_use]
    pub fn new(test_file: PathBuf) -> Self {
        Self { test_file }
    }
}

impl TestResolver for ExplicitResolver {
    fn resolve(&self, _source: &Path) -> Result<PathBuf> {
        if !self.test_file.exists() {
            return Err(CovdiagError::TestFileNotFound(self.test_file.clone()));
        }
        Ok(self.test_file.clone())
    }
}

/// Resolver deriving the test file from a template with `{dir}`, `{stem}`,
/// `{ext}` and `{path}` placeholders, e.g. `tests/{stem}_test.{ext}`.
pub struct PatternResolver {
    pattern: String,
}

impl PatternResolver {
    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }
}

impl TestResolver for PatternResolver {
    fn resolve(&self, source: &Path) -> Result<PathBuf> {
        let dir = source
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| ".".to_string(), |p| p.to_string_lossy().into_owned());
        let stem = source
            .file_stem()
            .map_or_else(String::new, |s| s.to_string_lossy().into_owned());
        let ext = source
            .extension()
            .map_or_else(String::new, |e| e.to_string_lossy().into_owned());

        let resolved = PathBuf::from(
            self.pattern
                .replace("{dir}", &dir)
                .replace("{stem}", &stem)
                .replace("{ext}", &ext)
                .replace("{path}", &source.to_string_lossy()),
        );

        if !resolved.exists() {
            return Err(CovdiagError::TestFileNotFound(resolved));
        }
        Ok(resolved)
    }
}

/// The harness invocation: a program and argument template. `{test}`,
/// `{source}` and `{report}` are substituted per run.
pub struct HarnessCommand {
    program: String,
    args: Vec<String>,
}

impl HarnessCommand {
    /// Parse a whitespace-separated command template, e.g.
    /// `"ruby harness.rb {test} {report}"`. The template must mention
    /// `{report}` somewhere, otherwise the harness has no way to deliver
    /// results.
    pub fn parse(template: &str) -> Result<Self> {
        let mut parts = template.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| CovdiagError::InvalidHarness("empty command template".to_string()))?;
        let args: Vec<String> = parts.collect();

        if !args.iter().any(|a| a.contains("{report}")) {
            return Err(CovdiagError::InvalidHarness(
                "command template must contain a {report} placeholder".to_string(),
            ));
        }

        Ok(Self { program, args })
    }

    fn substituted_args(&self, test: &Path, source: &Path, report: &Path) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{test}", &test.to_string_lossy())
                    .replace("{source}", &source.to_string_lossy())
                    .replace("{report}", &report.to_string_lossy())
            })
            .collect()
    }
}

/// Executes one test run per call, each in its own child process.
pub struct TestRunner {
    harness: HarnessCommand,
    resolver: Box<dyn TestResolver>,
}

impl TestRunner {
    #[must_use]
    pub fn new(harness: HarnessCommand, resolver: Box<dyn TestResolver>) -> Self {
        Self { harness, resolver }
    }

    /// Run the test associated with `source` in an isolated child process
    /// and return its coverage record merged with the pass/fail status.
    ///
    /// A source file the test run never touched yields an empty record
    /// (not an error). A harness that exits without writing a report, or
    /// that cannot be spawned at all, is a fatal error for this call.
    pub fn run_test(&self, source: &Path) -> Result<CoverageResult> {
        let test_file = self.resolver.resolve(source)?;

        // Fresh report location per run; removed when the dir drops.
        let report_dir = tempfile::tempdir()?;
        let report_path = report_dir.path().join("coverage.json");

        let args = self
            .harness
            .substituted_args(&test_file, source, &report_path);
        debug!(program = %self.harness.program, ?args, "spawning coverage harness");

        let output = Command::new(&self.harness.program)
            .args(&args)
            .output()
            .map_err(|err| CovdiagError::HarnessSpawn {
                program: self.harness.program.clone(),
                source: err,
            })?;

        let test_status = output.status.success();
        debug!(status = %output.status, "harness finished");

        let raw = std::fs::read(&report_path).ok().filter(|r| !r.is_empty());
        let raw = raw.ok_or_else(|| CovdiagError::HarnessCrashed {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })?;

        let report: RawReport = serde_json::from_slice(&raw)?;
        Ok(extract_result(report, source, test_status))
    }
}

/// Pick out the record for `source` from a harness report, discarding
/// coverage collected for any other file the run touched (the test file
/// itself, dependencies). A missing entry yields an empty record.
pub fn extract_result(report: RawReport, source: &Path, test_status: bool) -> CoverageResult {
    let mut files = report.files;
    let canonical = source.canonicalize().unwrap_or_else(|_| source.to_path_buf());
    let record = files
        .remove(canonical.to_string_lossy().as_ref())
        .or_else(|| files.remove(source.to_string_lossy().as_ref()))
        .unwrap_or_default();
    CoverageResult::from_record(record, test_status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_harness_parse_requires_report_placeholder() {
        assert!(HarnessCommand::parse("ruby harness.rb {test}").is_err());
        assert!(HarnessCommand::parse("").is_err());
        assert!(HarnessCommand::parse("ruby harness.rb {test} {report}").is_ok());
    }

    #[test]
    fn test_harness_substitution() {
        let harness = HarnessCommand::parse("runner --test={test} --out={report} {source}").unwrap();
        let args = harness.substituted_args(
            Path::new("t/foo_test.rb"),
            Path::new("lib/foo.rb"),
            Path::new("/tmp/r.json"),
        );
        assert_eq!(
            args,
            vec!["--test=t/foo_test.rb", "--out=/tmp/r.json", "lib/foo.rb"]
        );
    }

    #[test]
    fn test_explicit_resolver_missing_file() {
        let resolver = ExplicitResolver::new(PathBuf::from("/no/such/test.rb"));
        let err = resolver.resolve(Path::new("lib/foo.rb")).unwrap_err();
        assert!(matches!(err, CovdiagError::TestFileNotFound(_)));
    }

    #[test]
    fn test_pattern_resolver_substitutes_and_checks_existence() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("widget.rb");
        let test = dir.path().join("widget_test.rb");
        std::fs::File::create(&source).unwrap();
        let mut f = std::fs::File::create(&test).unwrap();
        writeln!(f, "# test").unwrap();

        let resolver = PatternResolver::new("{dir}/{stem}_test.{ext}");
        assert_eq!(resolver.resolve(&source).unwrap(), test);

        let resolver = PatternResolver::new("{dir}/{stem}_spec.{ext}");
        let err = resolver.resolve(&source).unwrap_err();
        assert!(matches!(err, CovdiagError::TestFileNotFound(_)));
    }

    #[test]
    fn test_extract_result_discards_other_files() {
        let json = r#"{
            "files": {
                "lib/foo.rb": { "lines": [null, 1, 0] },
                "test/foo_test.rb": { "lines": [1, 1] }
            }
        }"#;
        let report: RawReport = serde_json::from_str(json).unwrap();
        let result = extract_result(report, Path::new("lib/foo.rb"), true);
        assert_eq!(result.lines.len(), 3);
        assert!(result.test_status);
    }

    #[test]
    fn test_extract_result_missing_entry_is_empty() {
        let json = r#"{ "files": { "lib/other.rb": { "lines": [1] } } }"#;
        let report: RawReport = serde_json::from_str(json).unwrap();
        let result = extract_result(report, Path::new("lib/foo.rb"), false);
        assert!(result.is_empty());
        assert!(!result.test_status);
    }
}
