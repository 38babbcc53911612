//! Error types for mission execution.
//!
//! Only two failures ever leave the pipeline: the engine could not run, or it
//! ran and printed something that is not a report. Failing tests are report
//! data, not errors.

use thiserror::Error;

/// Result type alias for mission operations
pub type Result<T> = std::result::Result<T, MissionError>;

/// The engine could not be run, or exited without usable output
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Command template is empty")]
    EmptyCommand,

    #[error("Invalid command template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("Test engine '{program}' not found in PATH")]
    EngineNotFound { program: String },

    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' exited with {status} and produced no output: {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },
}

/// The engine's stdout was not a report
#[derive(Error, Debug)]
#[error("JSON parse error: {message}")]
pub struct MalformedOutputError {
    pub message: String,
}

impl MalformedOutputError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure of a mission operation, as surfaced to callers
#[derive(Error, Debug)]
pub enum MissionError {
    #[error("Failed to perform a command: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Failed to produce a test report: {0}")]
    MalformedOutput(#[from] MalformedOutputError),
}

impl MissionError {
    pub fn is_execution(&self) -> bool {
        matches!(self, MissionError::Execution(_))
    }

    pub fn is_malformed_output(&self) -> bool {
        matches!(self, MissionError::MalformedOutput(_))
    }
}
