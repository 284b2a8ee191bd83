//! Command-line front end for the stillskip pipeline.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use stillskip_core::config::Settings;
use stillskip_core::logging;
use stillskip_core::pipeline::{SpeedupRequest, SpeedupTarget, StreamPipeline};

#[derive(Parser, Debug)]
#[command(name = "stillskip")]
#[command(about = "Content-aware temporal video downsampler")]
#[command(version)]
struct Args {
    /// Input video file
    input: PathBuf,

    /// Output video file (scores file instead when --motion-only)
    output: Option<PathBuf>,

    /// Frame width in pixels
    #[arg(short, long)]
    width: u32,

    /// Frame height in pixels
    #[arg(short = 'H', long)]
    height: u32,

    /// Frames per second of the input stream
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Integer speedup factor
    #[arg(short, long)]
    speedup: Option<u64>,

    /// Exact number of frames to drop
    #[arg(long)]
    drop_frames: Option<u64>,

    /// Exact number of frames to keep
    #[arg(long)]
    keep_frames: Option<u64>,

    /// Score share divisor for dropped frames; 0 disables redistribution
    #[arg(long, default_value_t = 1.0)]
    divisor: f64,

    /// Trailing smoothing window in frames; 0 selects fps/3
    #[arg(long, default_value_t = 0)]
    window: usize,

    /// Motion score cache, loaded when present and written otherwise
    #[arg(short, long)]
    motion_file: Option<PathBuf>,

    /// Compute and save motion scores, then exit
    #[arg(short = 'M', long)]
    motion_only: bool,

    /// Write a re-timed audio track to this file
    #[arg(short, long)]
    audio_output: Option<PathBuf>,

    /// ffmpeg binary to use
    #[arg(long)]
    ffmpeg: Option<String>,

    /// sox binary to use
    #[arg(long)]
    sox: Option<String>,

    /// Configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Resolve the three target flags into at most one target.
fn speedup_target(args: &Args) -> Result<Option<SpeedupTarget>> {
    let targets: Vec<SpeedupTarget> = [
        args.speedup.map(SpeedupTarget::Speedup),
        args.drop_frames.map(SpeedupTarget::DropFrames),
        args.keep_frames.map(SpeedupTarget::KeepFrames),
    ]
    .into_iter()
    .flatten()
    .collect();

    // Motion-only runs never act on a target, so none is required.
    if args.motion_only {
        return Ok(targets.first().copied());
    }
    match targets.as_slice() {
        [] => bail!("one of --speedup, --drop-frames, or --keep-frames is required"),
        [target] => Ok(Some(*target)),
        _ => bail!("--speedup, --drop-frames, and --keep-frames are mutually exclusive"),
    }
}

/// The score cache path; motion-only runs without --motion-file reuse
/// the output positional as the scores file.
fn score_cache_path(args: &Args) -> Option<PathBuf> {
    match &args.motion_file {
        Some(path) => Some(path.clone()),
        None if args.motion_only => args.output.clone(),
        None => None,
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_tracing(args.verbose);

    let mut settings = match &args.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(ffmpeg) = args.ffmpeg.clone() {
        settings.tools.ffmpeg = ffmpeg;
    }
    if let Some(sox) = args.sox.clone() {
        settings.tools.sox = sox;
    }

    let target = speedup_target(&args)?;
    let score_cache = score_cache_path(&args);

    let request = SpeedupRequest {
        input: args.input.clone(),
        output: if args.motion_only {
            None
        } else {
            args.output.clone()
        },
        width: args.width,
        height: args.height,
        fps: args.fps,
        target,
        window: args.window,
        divisor: args.divisor,
        score_cache,
        motion_only: args.motion_only,
        audio_output: args.audio_output.clone(),
    };

    let summary = StreamPipeline::new(&settings, &request).run()?;
    if args.motion_only {
        info!("Scored {} frames", summary.frame_count);
    } else {
        info!(
            "Kept {} of {} frames ({} dropped)",
            summary.kept_frames, summary.frame_count, summary.dropped_frames
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn parses_a_minimal_speedup_invocation() {
        let args = parse(&[
            "stillskip", "in.mkv", "out.mkv", "-w", "640", "-H", "360", "-s", "2",
        ]);
        assert_eq!(args.width, 640);
        assert_eq!(args.height, 360);
        assert_eq!(args.fps, 30);
        assert_eq!(
            speedup_target(&args).unwrap(),
            Some(SpeedupTarget::Speedup(2))
        );
    }

    #[test]
    fn rejects_conflicting_targets() {
        let args = parse(&[
            "stillskip",
            "in.mkv",
            "out.mkv",
            "-w",
            "640",
            "-H",
            "360",
            "-s",
            "2",
            "--drop-frames",
            "10",
        ]);
        assert!(speedup_target(&args).is_err());
    }

    #[test]
    fn requires_a_target_for_full_runs() {
        let args = parse(&["stillskip", "in.mkv", "out.mkv", "-w", "640", "-H", "360"]);
        assert!(speedup_target(&args).is_err());
    }

    #[test]
    fn motion_only_needs_no_target() {
        let args = parse(&[
            "stillskip",
            "in.mkv",
            "-w",
            "640",
            "-H",
            "360",
            "-M",
            "-m",
            "scores.bin",
        ]);
        assert_eq!(speedup_target(&args).unwrap(), None);
        assert_eq!(score_cache_path(&args), Some(PathBuf::from("scores.bin")));
    }

    #[test]
    fn motion_only_falls_back_to_the_positional_output() {
        let args = parse(&[
            "stillskip",
            "in.mkv",
            "scores.bin",
            "-w",
            "640",
            "-H",
            "360",
            "-M",
        ]);
        assert_eq!(score_cache_path(&args), Some(PathBuf::from("scores.bin")));
    }
}
