//! Argument construction for the ffmpeg collaborators.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::config::EncoderSettings;

use super::errors::{PipelineError, PipelineResult};
use super::process::Collaborator;
use super::types::RawFormat;

/// Decode `input` into a raw stream written to `conduit`.
pub fn spawn_decoder(
    ffmpeg: &str,
    input: &Path,
    format: RawFormat,
    conduit: &Path,
) -> PipelineResult<Collaborator> {
    if !input.exists() {
        return Err(PipelineError::SourceNotFound(input.to_path_buf()));
    }
    let mut cmd = Command::new(ffmpeg);
    cmd.arg("-v")
        .arg("error")
        .arg("-i")
        .arg(input)
        .arg("-f")
        .arg("rawvideo")
        .arg("-pix_fmt")
        .arg(format.pix_fmt())
        .arg("-y")
        .arg(conduit)
        .stdin(Stdio::null());
    Collaborator::spawn("ffmpeg decoder", &mut cmd)
}

/// Encode the raw yuv420p stream read from `conduit` into `output`.
pub fn spawn_encoder(
    ffmpeg: &str,
    conduit: &Path,
    output: &Path,
    width: u32,
    height: u32,
    fps: u32,
    encoder: &EncoderSettings,
) -> PipelineResult<Collaborator> {
    let mut cmd = Command::new(ffmpeg);
    cmd.arg("-v")
        .arg("error")
        .arg("-f")
        .arg("rawvideo")
        .arg("-pixel_format")
        .arg(RawFormat::Yuv420p.pix_fmt())
        .arg("-r")
        .arg(fps.to_string())
        .arg("-video_size")
        .arg(format!("{width}x{height}"))
        .arg("-i")
        .arg(conduit)
        .arg("-c:v")
        .arg(&encoder.codec)
        .arg("-crf")
        .arg(encoder.crf.to_string())
        .arg("-y")
        .arg(output)
        .stdin(Stdio::null());
    Collaborator::spawn("ffmpeg encoder", &mut cmd)
}
