//! The streaming pipeline: conduits, collaborator processes, and the
//! orchestrator that moves frames between them.

mod conduit;
mod errors;
mod ffmpeg;
mod process;
mod run;
mod types;

pub use conduit::Conduit;
pub use errors::{PipelineError, PipelineResult};
pub use process::Collaborator;
pub use run::StreamPipeline;
pub use types::{RawFormat, RunSummary, SpeedupRequest, SpeedupTarget};
