//! Named pipes connecting this process to its collaborators.

use std::path::{Path, PathBuf};

use nix::sys::stat::Mode;
use nix::unistd;
use tempfile::TempDir;
use tracing::debug;

use super::errors::{PipelineError, PipelineResult};

/// A FIFO in a private temporary directory. The FIFO and the directory
/// are removed when the conduit is dropped.
#[derive(Debug)]
pub struct Conduit {
    /// Held only so the directory outlives the FIFO; removal is its drop.
    _dir: TempDir,
    path: PathBuf,
}

impl Conduit {
    /// Create a FIFO named `name` inside a fresh temporary directory.
    pub fn new(name: &str) -> PipelineResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix("stillskip-")
            .tempdir()
            .map_err(|e| PipelineError::io("creating conduit directory", e))?;
        let path = dir.path().join(name);
        unistd::mkfifo(&path, Mode::S_IRUSR | Mode::S_IWUSR).map_err(|errno| {
            PipelineError::conduit(&path, std::io::Error::from_raw_os_error(errno as i32))
        })?;
        debug!("Created conduit at {}", path.display());
        Ok(Conduit { _dir: dir, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
