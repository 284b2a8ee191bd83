//! End-to-end orchestration of a speedup run.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::audio;
use crate::config::Settings;
use crate::motion::{self, MotionProfiler};
use crate::selection::{plan_drops, Selection};

use super::conduit::Conduit;
use super::errors::{PipelineError, PipelineResult};
use super::ffmpeg::{spawn_decoder, spawn_encoder};
use super::types::{RawFormat, RunSummary, SpeedupRequest};

/// Drives one request through scoring, selection, reassembly, and
/// audio re-timing.
pub struct StreamPipeline<'a> {
    settings: &'a Settings,
    request: &'a SpeedupRequest,
}

impl<'a> StreamPipeline<'a> {
    pub fn new(settings: &'a Settings, request: &'a SpeedupRequest) -> StreamPipeline<'a> {
        StreamPipeline { settings, request }
    }

    pub fn run(&self) -> PipelineResult<RunSummary> {
        self.request.validate()?;

        let mut scores = self.motion_scores()?;

        if self.request.motion_only {
            info!("Motion-only run complete, {} frames scored", scores.len());
            return Ok(RunSummary {
                frame_count: scores.len(),
                dropped_frames: 0,
                kept_frames: scores.len(),
                audio_resynced: false,
            });
        }

        if scores.is_empty() {
            return Err(PipelineError::EmptyStream(self.request.input.clone()));
        }

        let window = motion::effective_window(self.request.window, self.request.fps);
        if window > 1 {
            debug!("Smoothing scores over a {window}-frame trailing window");
            motion::apply_trailing_window(&mut scores, window);
        }

        let target = self
            .request
            .target
            .ok_or_else(|| PipelineError::invalid_request("no speedup target"))?;
        let drop_count = target.drop_count(scores.len())?;
        info!(
            "Dropping {} of {} frames (divisor {})",
            drop_count,
            scores.len(),
            self.request.divisor
        );
        let selection = plan_drops(&scores, drop_count, self.request.divisor);

        let output = self
            .request
            .output
            .as_deref()
            .ok_or_else(|| PipelineError::invalid_request("no output path"))?;
        self.reassemble(&selection, output)?;

        let audio_resynced = match &self.request.audio_output {
            Some(audio_out) => {
                self.resync_audio(&selection, audio_out)?;
                true
            }
            None => false,
        };

        let summary = RunSummary {
            frame_count: selection.len(),
            dropped_frames: selection.dropped_count(),
            kept_frames: selection.kept_count(),
            audio_resynced,
        };
        info!(
            "Wrote {} with {} of {} frames kept",
            output.display(),
            summary.kept_frames,
            summary.frame_count
        );
        Ok(summary)
    }

    /// Per-frame motion scores, from the cache when it already exists.
    pub fn motion_scores(&self) -> PipelineResult<Vec<f64>> {
        if let Some(cache) = &self.request.score_cache {
            if cache.exists() {
                info!("Loading motion scores from {}", cache.display());
                return Ok(motion::load_scores(cache)?);
            }
        }

        let scores = self.score_frames()?;
        if let Some(cache) = &self.request.score_cache {
            motion::save_scores(cache, &scores)?;
        }
        Ok(scores)
    }

    /// Decode the source as grayscale and score every frame.
    fn score_frames(&self) -> PipelineResult<Vec<f64>> {
        let conduit = Conduit::new("gray.raw")?;
        let mut decoder = spawn_decoder(
            &self.settings.tools.ffmpeg,
            &self.request.input,
            RawFormat::Gray,
            conduit.path(),
        )?;

        // Blocks until the decoder opens the write end.
        let reader = File::open(conduit.path())
            .map_err(|e| PipelineError::io("opening scoring conduit", e))?;
        let mut profiler = MotionProfiler::new(self.request.width, self.request.height);
        let scores = profiler.profile(reader)?;
        decoder.wait()?;

        info!("Scored {} frames", scores.len());
        Ok(scores)
    }

    /// Stream the kept frames from a fresh decode into the encoder.
    fn reassemble(&self, selection: &Selection, output: &Path) -> PipelineResult<()> {
        let frame_len = RawFormat::Yuv420p.frame_len(self.request.width, self.request.height);
        let decode = Conduit::new("decode.raw")?;
        let encode = Conduit::new("encode.raw")?;

        let mut decoder = spawn_decoder(
            &self.settings.tools.ffmpeg,
            &self.request.input,
            RawFormat::Yuv420p,
            decode.path(),
        )?;
        let mut encoder = spawn_encoder(
            &self.settings.tools.ffmpeg,
            encode.path(),
            output,
            self.request.width,
            self.request.height,
            self.request.fps,
            &self.settings.encoder,
        )?;

        let mut reader = File::open(decode.path())
            .map_err(|e| PipelineError::io("opening decode conduit", e))?;
        let mut writer = OpenOptions::new()
            .write(true)
            .open(encode.path())
            .map_err(|e| PipelineError::io("opening encode conduit", e))?;

        let copied = copy_selected(&mut reader, &mut writer, selection, frame_len)?;

        // The encoder sees end-of-stream only once the write end of its
        // conduit closes, so close it before collecting either child.
        drop(writer);
        io::copy(&mut reader, &mut io::sink())
            .map_err(|e| PipelineError::io("draining decode conduit", e))?;
        drop(reader);
        decoder.wait()?;
        encoder.wait()?;

        info!("Reassembled {copied} frames");
        Ok(())
    }

    /// Extract the source audio and re-time it to match the selection.
    fn resync_audio(&self, selection: &Selection, audio_out: &Path) -> PipelineResult<()> {
        let plan = audio::plan_segments(selection, self.request.fps);
        let workdir = tempfile::Builder::new()
            .prefix("stillskip-audio-")
            .tempdir()
            .map_err(|e| PipelineError::io("creating audio work directory", e))?;
        let wav = workdir.path().join("source.wav");
        audio::extract_audio(&self.settings.tools.ffmpeg, &self.request.input, &wav)?;
        audio::run_resample(
            &self.settings.tools.sox,
            &wav,
            audio_out,
            &plan,
            self.settings.audio.sample_rate,
        )?;
        info!("Re-timed audio into {}", audio_out.display());
        Ok(())
    }
}

/// Copy kept frames from `reader` to `writer`, discarding dropped ones.
///
/// Stops quietly when the stream runs out of full frames before the
/// selection does. Returns the number of frames written.
fn copy_selected<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    selection: &Selection,
    frame_len: usize,
) -> PipelineResult<usize> {
    let mut buf = vec![0u8; frame_len];
    let mut copied = 0;
    for frame in 0..selection.len() {
        let full = motion::read_full_frame(reader, &mut buf)
            .map_err(|e| PipelineError::io("reading decoded frame", e))?;
        if !full {
            warn!("Decode stream ended early at frame {frame}");
            break;
        }
        if !selection.is_dropped(frame) {
            writer
                .write_all(&buf)
                .map_err(|e| PipelineError::io("writing frame to encoder", e))?;
            copied += 1;
        }
    }
    Ok(copied)
}
