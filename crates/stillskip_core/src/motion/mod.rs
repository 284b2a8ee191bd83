//! Motion profiling of raw grayscale frame streams.
//!
//! The profiler turns consecutive raw frames into one scalar score per
//! frame; the window pass smooths the sequence in place; the cache module
//! persists and reloads scores so a tuning re-run can skip the decode.

mod cache;
mod profiler;
mod window;

pub use cache::{load_scores, save_scores};
pub use profiler::MotionProfiler;
pub use window::{apply_trailing_window, effective_window};

pub(crate) use profiler::read_full_frame;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from motion profiling and the score cache.
#[derive(Error, Debug)]
pub enum MotionError {
    #[error("Failed to read the raw frame stream: {0}")]
    Stream(#[source] io::Error),

    #[error("Failed to read score cache {path}: {source}")]
    CacheRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write score cache {path}: {source}")]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for motion operations.
pub type MotionResult<T> = Result<T, MotionError>;
