//! Flat binary score cache.
//!
//! The cache file is the raw score sequence as little-endian IEEE-754
//! doubles in frame order, no header or length prefix; the score count is
//! the file size divided by eight and a trailing partial record is
//! ignored.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::{MotionError, MotionResult};

/// Load a score sequence from `path`.
pub fn load_scores(path: &Path) -> MotionResult<Vec<f64>> {
    let bytes = fs::read(path).map_err(|source| MotionError::CacheRead {
        path: path.to_path_buf(),
        source,
    })?;

    let scores: Vec<f64> = bytes
        .chunks_exact(8)
        .map(|chunk| {
            let arr: [u8; 8] = chunk.try_into().unwrap();
            f64::from_le_bytes(arr)
        })
        .collect();

    debug!(count = scores.len(), path = %path.display(), "loaded score cache");
    Ok(scores)
}

/// Persist a score sequence to `path`, replacing any existing file.
pub fn save_scores(path: &Path, scores: &[f64]) -> MotionResult<()> {
    let mut bytes = Vec::with_capacity(scores.len() * 8);
    for score in scores {
        bytes.extend_from_slice(&score.to_le_bytes());
    }

    fs::write(path, bytes).map_err(|source| MotionError::CacheWrite {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(count = scores.len(), path = %path.display(), "wrote score cache");
    Ok(())
}
