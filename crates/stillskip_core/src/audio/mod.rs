//! Audio re-timing.
//!
//! Dropping video frames makes the cut play faster than the source, and
//! unevenly so. The planner walks the selection bitmap and emits one
//! segment instruction per accumulation window; the resample module lowers
//! the whole plan to a single sox invocation over a lossless intermediate
//! extracted with ffmpeg.

mod planner;
mod resample;

pub use planner::{plan_segments, AudioSegment};
pub use resample::{extract_audio, resample_args, run_resample};

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use thiserror::Error;

/// Errors from the audio extraction and resampling collaborators.
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Audio source not found: {0}")]
    MissingInput(PathBuf),

    #[error("Failed to spawn {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },

    #[error("{tool} failed ({status}): {stderr}")]
    CommandFailed {
        tool: String,
        status: String,
        stderr: String,
    },
}

impl AudioError {
    pub fn missing_input(path: &Path) -> Self {
        AudioError::MissingInput(path.to_path_buf())
    }

    pub fn spawn(tool: impl Into<String>, source: io::Error) -> Self {
        AudioError::Spawn {
            tool: tool.into(),
            source,
        }
    }

    pub fn command_failed(tool: impl Into<String>, status: ExitStatus, stderr: &[u8]) -> Self {
        AudioError::CommandFailed {
            tool: tool.into(),
            status: status.to_string(),
            stderr: String::from_utf8_lossy(stderr).trim().to_string(),
        }
    }
}

/// Result type for audio operations.
pub type AudioResult<T> = Result<T, AudioError>;
