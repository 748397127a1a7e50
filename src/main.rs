use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use covdiag::cli::{self, Style};

/// covdiag — per-file test coverage diagnostics for editor integrations.
#[derive(Parser)]
#[command(name = "covdiag", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a source file's test under coverage and print diagnostics.
    Check {
        /// The source file to analyze.
        source: PathBuf,

        /// Harness command template; {test}, {source} and {report} are
        /// substituted per run, e.g. "ruby harness.rb {test} {report}".
        #[arg(long)]
        runner: String,

        /// Explicit test file associated with the source.
        #[arg(long, conflicts_with = "test_pattern")]
        test_file: Option<PathBuf>,

        /// Test file template with {dir}, {stem}, {ext} and {path}
        /// placeholders, e.g. "tests/{stem}_test.{ext}".
        #[arg(long)]
        test_pattern: Option<String>,

        /// Output style.
        #[arg(long, value_enum, default_value = "text")]
        format: Style,
    },

    /// Compose diagnostics from an existing harness report file.
    Analyze {
        /// The source file the report describes.
        source: PathBuf,

        /// Path to the harness report JSON.
        #[arg(long)]
        report: PathBuf,

        /// Treat the recorded test run as failing.
        #[arg(long)]
        test_failed: bool,

        /// Output style.
        #[arg(long, value_enum, default_value = "text")]
        format: Style,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let output = match cli.command {
        Commands::Check {
            source,
            runner,
            test_file,
            test_pattern,
            format,
        } => cli::cmd_check(
            &source,
            &runner,
            test_file.as_deref(),
            test_pattern.as_deref(),
            &format,
        )
        .with_context(|| format!("Analysis failed for {}", source.display()))?,
        Commands::Analyze {
            source,
            report,
            test_failed,
            format,
        } => cli::cmd_analyze(&source, &report, test_failed, &format)
            .with_context(|| format!("Analysis failed for {}", source.display()))?,
    };

    print!("{output}");
    Ok(())
}
