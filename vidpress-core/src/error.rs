//! Error types shared across the vidpress core library.

use std::io;
use std::process::ExitStatus;
use thiserror::Error;

/// Custom error types for vidpress.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Bad constraints supplied before any work started (modulus, denoise spec).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unusable input: missing source, destination conflict, empty clip list.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid path: {0}")]
    PathError(String),

    #[error("External dependency '{0}' not found")]
    DependencyNotFound(String),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Command '{0}' failed with status {1}: {2}")]
    CommandFailed(String, ExitStatus, String),

    #[error("ffprobe parse error: {0}")]
    FfprobeParse(String),

    #[error("Video info error: {0}")]
    VideoInfoError(String),

    #[error("No usable streams found in {0}")]
    NoStreamsFound(String),
}

/// Result type for vidpress core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Creates a `CommandStart` error for a tool that could not be spawned.
pub fn command_start_error(tool: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(tool.into(), err)
}

/// Creates a `CommandFailed` error from an exit status and captured stderr.
pub fn command_failed_error(
    tool: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed(tool.into(), status, stderr.into())
}
