use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A fake project on disk: a source file, its test file, and a shell
/// harness that writes a canned coverage report and exits with the given
/// code. The caller must hold onto `dir` to keep the files alive.
pub struct Project {
    pub dir: TempDir,
    pub source: PathBuf,
    pub test_file: PathBuf,
    pub harness: PathBuf,
}

/// Create a project whose harness writes `report_template` (with
/// `{source}` replaced by the canonical source path) to the report path
/// and exits with `exit_code`.
pub fn setup(source_text: &str, report_template: &str, exit_code: i32) -> Project {
    let dir = tempfile::tempdir().unwrap();

    let source = dir.path().join("widget.rb");
    std::fs::write(&source, source_text).unwrap();
    let source = source.canonicalize().unwrap();

    let test_file = dir.path().join("widget_test.rb");
    std::fs::write(&test_file, "# exercised by the harness\n").unwrap();

    let report = report_template.replace("{source}", &source.display().to_string());
    let harness = dir.path().join("harness.sh");
    let script = format!(
        "#!/bin/sh\ncat > \"$2\" <<'REPORT_EOF'\n{report}\nREPORT_EOF\nexit {exit_code}\n"
    );
    std::fs::write(&harness, script).unwrap();

    Project {
        dir,
        source,
        test_file,
        harness,
    }
}

/// Create a project whose harness exits without ever writing a report.
pub fn setup_crashing(source_text: &str, exit_code: i32) -> Project {
    let project = setup(source_text, "", 0);
    std::fs::write(&project.harness, format!("#!/bin/sh\nexit {exit_code}\n")).unwrap();
    project
}

/// Harness command template invoking the project's shell harness with the
/// test file and report path.
pub fn runner_template(harness: &Path) -> String {
    format!("sh {} {{test}} {{report}}", harness.display())
}
