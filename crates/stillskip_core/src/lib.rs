//! stillskip core - content-aware temporal video downsampling.
//!
//! This crate contains the full speedup engine with no CLI dependencies:
//! motion profiling of raw frame streams, trailing-window smoothing, the
//! ranked-pool frame selector, the audio re-timing planner, and the
//! FIFO-based pipeline that drives the external decode/encode/resample
//! tools. It can be driven by the `stillskip` binary or embedded directly.

pub mod audio;
pub mod config;
pub mod logging;
pub mod motion;
pub mod pipeline;
pub mod selection;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
