use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CovdiagError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Report parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Test file not found: {0}")]
    TestFileNotFound(PathBuf),

    #[error("Invalid harness command: {0}")]
    InvalidHarness(String),

    #[error("Failed to spawn harness '{program}': {source}")]
    HarnessSpawn {
        program: String,
        source: std::io::Error,
    },

    #[error("Harness exited ({status}) without producing a report: {stderr}")]
    HarnessCrashed { status: String, stderr: String },
}

pub type Result<T> = std::result::Result<T, CovdiagError>;
