//! Error types for VectorCAST SI generation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for SI generation operations.
pub type SiResult<T> = Result<T, SiError>;

/// Errors that can occur while preparing or running an SI generation.
///
/// A failing clicast invocation is not an error at this level: it is
/// recorded in the run report and the run moves on. Only spawning failures
/// and timeouts surface from a [`CommandRunner`](crate::runner::CommandRunner).
#[derive(Debug, Error)]
pub enum SiError {
    /// Compound test case menu answer was neither `1` nor `2`.
    #[error("Invalid selection '{input}': enter 1 to include compound test cases or 2 to skip them")]
    InvalidSelection { input: String },

    /// Unit name resolved to an empty string.
    #[error("Unit name must not be empty")]
    EmptyUnitName,

    /// Unit name cannot be used in a clicast argument or file name.
    #[error("Unit name '{name}' is not usable: {reason}")]
    UnsafeUnitName { name: String, reason: String },

    /// Environment file does not exist.
    #[error("Environment file not found: {path}")]
    EnvFileNotFound { path: PathBuf },

    /// Environment file is not valid UTF-8.
    #[error("Environment file is not valid UTF-8: {path}")]
    EnvFileEncoding { path: PathBuf },

    /// Environment file exists but could not be read.
    #[error("Failed to read environment file {path}: {source}")]
    ReadEnvFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output folder could not be created.
    #[error("Could not create folder {path}: {source}")]
    CreateFolderFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A non-directory entry already occupies the folder path.
    #[error("Cannot create folder {path}: a file with that name already exists")]
    NotADirectory { path: PathBuf },

    /// Failed to spawn the shell that runs clicast.
    #[error("Failed to spawn command: {0}")]
    SpawnFailed(#[source] std::io::Error),

    /// Invocation did not finish in time and was killed.
    #[error("Command timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// Run report could not be written.
    #[error("Failed to write run report {path}: {source}")]
    WriteReportFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize the run report.
    #[error("Failed to serialize run report: {0}")]
    SerializeFailed(#[source] serde_json::Error),
}

impl SiError {
    /// Creates a new invalid selection error.
    pub fn invalid_selection(input: impl Into<String>) -> Self {
        Self::InvalidSelection {
            input: input.into(),
        }
    }

    /// Stable error code for reporting.
    pub fn code(&self) -> &'static str {
        match self {
            SiError::InvalidSelection { .. } => "VCAST_001",
            SiError::EmptyUnitName => "VCAST_002",
            SiError::EnvFileNotFound { .. } => "VCAST_003",
            SiError::EnvFileEncoding { .. } => "VCAST_004",
            SiError::ReadEnvFailed { .. } => "VCAST_005",
            SiError::CreateFolderFailed { .. } => "VCAST_006",
            SiError::NotADirectory { .. } => "VCAST_007",
            SiError::SpawnFailed(_) => "VCAST_008",
            SiError::Timeout { .. } => "VCAST_009",
            SiError::WriteReportFailed { .. } => "VCAST_010",
            SiError::SerializeFailed(_) => "VCAST_011",
            SiError::UnsafeUnitName { .. } => "VCAST_012",
        }
    }

    /// Error category for grouping related errors.
    pub fn category(&self) -> &'static str {
        "vcast"
    }
}
