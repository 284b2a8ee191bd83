//! Request and result types for a pipeline run.

use std::path::PathBuf;

use super::errors::{PipelineError, PipelineResult};

/// Raw stream formats the decode collaborator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawFormat {
    /// Single-channel 8-bit samples, used for scoring.
    Gray,
    /// Planar 4:2:0 color, used for reassembly.
    Yuv420p,
}

impl RawFormat {
    /// Pixel format name understood by the decoder.
    pub fn pix_fmt(self) -> &'static str {
        match self {
            RawFormat::Gray => "gray",
            RawFormat::Yuv420p => "yuv420p",
        }
    }

    /// Byte length of one raw frame at the given geometry.
    pub fn frame_len(self, width: u32, height: u32) -> usize {
        let pixels = width as usize * height as usize;
        match self {
            RawFormat::Gray => pixels,
            RawFormat::Yuv420p => pixels * 6 / 4,
        }
    }
}

/// How many frames a run should shed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedupTarget {
    /// Integer playback speedup `s`; drops `frames * (s - 1) / s`.
    Speedup(u64),
    /// Explicit number of frames to drop.
    DropFrames(u64),
    /// Explicit number of frames to keep.
    KeepFrames(u64),
}

impl SpeedupTarget {
    /// Resolve the target to a concrete drop count for `frame_count`
    /// scored frames, in truncating integer arithmetic.
    pub fn drop_count(self, frame_count: usize) -> PipelineResult<usize> {
        let frames = frame_count as u64;
        let dropped = match self {
            SpeedupTarget::Speedup(factor) => {
                if factor == 0 {
                    return Err(PipelineError::invalid_request(
                        "speedup factor must be at least 1",
                    ));
                }
                ((u128::from(frames) * u128::from(factor - 1)) / u128::from(factor)) as u64
            }
            SpeedupTarget::DropFrames(count) => {
                if count > frames {
                    return Err(PipelineError::invalid_request(format!(
                        "cannot drop {count} of {frames} frames"
                    )));
                }
                count
            }
            SpeedupTarget::KeepFrames(count) => {
                if count > frames {
                    return Err(PipelineError::invalid_request(format!(
                        "cannot keep {count} of {frames} frames"
                    )));
                }
                frames - count
            }
        };
        Ok(dropped as usize)
    }
}

/// Everything one pipeline run needs to know.
#[derive(Debug, Clone)]
pub struct SpeedupRequest {
    pub input: PathBuf,
    /// Output container; required unless the run is motion-only.
    pub output: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// Required unless the run is motion-only.
    pub target: Option<SpeedupTarget>,
    /// Smoothing window in frames; 0 selects the fps/3 default.
    pub window: usize,
    /// Redistribution divisor; 0 disables redistribution.
    pub divisor: f64,
    /// Score cache: loaded when it exists, written after a scoring pass.
    pub score_cache: Option<PathBuf>,
    /// Compute and persist scores, then stop.
    pub motion_only: bool,
    /// Re-time the audio track into this file.
    pub audio_output: Option<PathBuf>,
}

impl SpeedupRequest {
    /// Check the request for contradictions before any I/O happens.
    pub fn validate(&self) -> PipelineResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PipelineError::invalid_request(
                "frame dimensions must be nonzero",
            ));
        }
        if self.fps == 0 {
            return Err(PipelineError::invalid_request("fps must be nonzero"));
        }
        if !self.divisor.is_finite() || self.divisor < 0.0 {
            return Err(PipelineError::invalid_request(
                "redistribution divisor must be finite and non-negative",
            ));
        }

        if self.motion_only {
            if self.score_cache.is_none() {
                return Err(PipelineError::invalid_request(
                    "motion-only mode needs a score cache path",
                ));
            }
        } else {
            if self.output.is_none() {
                return Err(PipelineError::invalid_request("an output path is required"));
            }
            if self.target.is_none() {
                return Err(PipelineError::invalid_request(
                    "one of speedup, drop-frames, or keep-frames is required",
                ));
            }
        }

        Ok(())
    }
}

/// Outcome counters for a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub frame_count: usize,
    pub dropped_frames: usize,
    pub kept_frames: usize,
    /// True when an audio track was re-timed.
    pub audio_resynced: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn request() -> SpeedupRequest {
        SpeedupRequest {
            input: Path::new("in.mkv").to_path_buf(),
            output: Some(Path::new("out.mkv").to_path_buf()),
            width: 640,
            height: 480,
            fps: 30,
            target: Some(SpeedupTarget::Speedup(2)),
            window: 0,
            divisor: 1.0,
            score_cache: None,
            motion_only: false,
            audio_output: None,
        }
    }

    #[test]
    fn frame_lengths_match_the_raw_profiles() {
        assert_eq!(RawFormat::Gray.frame_len(640, 480), 640 * 480);
        assert_eq!(RawFormat::Yuv420p.frame_len(640, 480), 640 * 480 * 6 / 4);
        // Odd geometry truncates, matching the decoder's integer math.
        assert_eq!(RawFormat::Yuv420p.frame_len(3, 3), 13);
    }

    #[test]
    fn speedup_factor_drops_the_complement() {
        assert_eq!(SpeedupTarget::Speedup(1).drop_count(300).unwrap(), 0);
        assert_eq!(SpeedupTarget::Speedup(2).drop_count(300).unwrap(), 150);
        assert_eq!(SpeedupTarget::Speedup(3).drop_count(300).unwrap(), 200);
        // Truncating division: 10 * 2 / 3.
        assert_eq!(SpeedupTarget::Speedup(3).drop_count(10).unwrap(), 6);
    }

    #[test]
    fn zero_speedup_is_rejected() {
        assert!(matches!(
            SpeedupTarget::Speedup(0).drop_count(10),
            Err(PipelineError::InvalidRequest(_))
        ));
    }

    #[test]
    fn explicit_counts_resolve_and_validate() {
        assert_eq!(SpeedupTarget::DropFrames(4).drop_count(10).unwrap(), 4);
        assert_eq!(SpeedupTarget::KeepFrames(4).drop_count(10).unwrap(), 6);
        assert_eq!(SpeedupTarget::KeepFrames(0).drop_count(10).unwrap(), 10);

        assert!(SpeedupTarget::DropFrames(11).drop_count(10).is_err());
        assert!(SpeedupTarget::KeepFrames(11).drop_count(10).is_err());
    }

    #[test]
    fn valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let mut bad = request();
        bad.width = 0;
        assert!(bad.validate().is_err());

        let mut bad = request();
        bad.height = 0;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn full_run_requires_output_and_target() {
        let mut bad = request();
        bad.output = None;
        assert!(bad.validate().is_err());

        let mut bad = request();
        bad.target = None;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn motion_only_requires_a_cache_path() {
        let mut motion_only = request();
        motion_only.motion_only = true;
        motion_only.output = None;
        motion_only.target = None;
        assert!(motion_only.validate().is_err());

        motion_only.score_cache = Some(Path::new("scores.bin").to_path_buf());
        assert!(motion_only.validate().is_ok());
    }

    #[test]
    fn bad_divisors_are_rejected() {
        for divisor in [-1.0, f64::NAN, f64::INFINITY] {
            let mut bad = request();
            bad.divisor = divisor;
            assert!(bad.validate().is_err(), "divisor {divisor}");
        }
    }
}
