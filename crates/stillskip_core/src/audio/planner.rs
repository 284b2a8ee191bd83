//! Segment planning for audio re-timing.

use crate::selection::Selection;

/// Output duration at which the current segment is closed.
const FLUSH_THRESHOLD_SECS: f64 = 0.1;

/// Substitute duration for a segment whose accumulators are degenerate.
const DEGENERATE_SECS: f64 = 0.1;

/// One re-timing instruction: consume `input_secs` of source audio and
/// emit it as `output_secs`, via a pitch-shifting speed change of `speed`
/// followed by a pitch-preserving tempo change of `tempo`.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSegment {
    pub input_secs: f64,
    pub output_secs: f64,
    pub speed: f64,
    pub tempo: f64,
}

impl AudioSegment {
    /// Segment for the given durations with the tempo ratio decomposed
    /// into factors. If either duration is exactly zero the segment
    /// becomes a degenerate 0.1 s passthrough, avoiding a division by
    /// zero when a window contains no kept frames at all.
    fn from_durations(mut input_secs: f64, mut output_secs: f64) -> AudioSegment {
        if input_secs == 0.0 || output_secs == 0.0 {
            input_secs = DEGENERATE_SECS;
            output_secs = DEGENERATE_SECS;
        }

        let ratio = input_secs / output_secs;
        let (speed, tempo) = split_tempo_ratio(ratio);

        AudioSegment {
            input_secs,
            output_secs,
            speed,
            tempo,
        }
    }
}

/// Decompose a tempo ratio into a resampling speed factor and a residual
/// pitch-preserving tempo factor.
///
/// Extreme tempo stretches smear audibly, so the tempo residual is held
/// at 10 while speed scales, until the ratio passes 40; from there speed
/// is pinned at 4 and tempo takes the rest.
fn split_tempo_ratio(ratio: f64) -> (f64, f64) {
    if ratio >= 40.0 {
        (4.0, ratio / 4.0)
    } else if ratio >= 10.0 {
        let speed = ratio / 10.0;
        (speed, ratio / speed)
    } else {
        (1.0, ratio)
    }
}

/// Plan the audio segments for a selection at the given frame rate.
///
/// Input duration accumulates for every frame and output duration only
/// for kept frames. A segment closes once at least 0.1 s of output has
/// accumulated, and one final segment covers whatever remains when the
/// stream ends.
pub fn plan_segments(selection: &Selection, fps: u32) -> Vec<AudioSegment> {
    assert!(fps > 0, "fps must be nonzero");
    let frame_secs = 1.0 / f64::from(fps);

    let mut plan = Vec::new();
    let mut input_secs = 0.0;
    let mut output_secs = 0.0;

    for frame in 0..selection.len() {
        input_secs += frame_secs;
        if !selection.is_dropped(frame) {
            output_secs += frame_secs;
        }

        if output_secs >= FLUSH_THRESHOLD_SECS {
            plan.push(AudioSegment::from_durations(input_secs, output_secs));
            input_secs = 0.0;
            output_secs = 0.0;
        }
    }

    if input_secs > 0.0 || output_secs > 0.0 {
        plan.push(AudioSegment::from_durations(input_secs, output_secs));
    }

    plan
}
