//! Pipeline error taxonomy.
//!
//! Configuration problems surface before any I/O; conduit and spawn
//! failures carry the path or tool involved; collaborator exits are
//! checked, never ignored. Stream truncation is deliberately absent here,
//! the passes recover from it locally.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use thiserror::Error;

use crate::audio::AudioError;
use crate::motion::MotionError;

/// Errors surfaced by a pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Source file not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Source decoded to zero frames: {0}")]
    EmptyStream(PathBuf),

    #[error("I/O failure while {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create conduit {path}: {source}")]
    Conduit {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to spawn {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },

    #[error("{tool} exited with {status}")]
    CollaboratorFailed { tool: String, status: ExitStatus },

    #[error(transparent)]
    Motion(#[from] MotionError),

    #[error(transparent)]
    Audio(#[from] AudioError),
}

impl PipelineError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        PipelineError::InvalidRequest(message.into())
    }

    pub fn io(operation: impl Into<String>, source: io::Error) -> Self {
        PipelineError::Io {
            operation: operation.into(),
            source,
        }
    }

    pub fn conduit(path: &Path, source: io::Error) -> Self {
        PipelineError::Conduit {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn spawn(tool: impl Into<String>, source: io::Error) -> Self {
        PipelineError::Spawn {
            tool: tool.into(),
            source,
        }
    }

    pub fn collaborator(tool: impl Into<String>, status: ExitStatus) -> Self {
        PipelineError::CollaboratorFailed {
            tool: tool.into(),
            status,
        }
    }
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
