//! Per-frame motion scoring.

use std::io::{self, Read};

use tracing::warn;

use super::{MotionError, MotionResult};

/// Scores consecutive raw grayscale frames by summed log-intensity change.
///
/// The reference buffer starts as an all-zero frame, so the first frame
/// scores its own intensity profile against black. That is deliberate:
/// the opening frame always counts as maximal motion and is never a cheap
/// drop.
pub struct MotionProfiler {
    frame_len: usize,
    /// `ln(v + 1)` for every sample value, so scoring never calls `ln`.
    log_lut: [f64; 256],
    prev: Vec<u8>,
}

impl MotionProfiler {
    /// Profiler for frames of `width * height` single-byte samples.
    pub fn new(width: u32, height: u32) -> MotionProfiler {
        let frame_len = width as usize * height as usize;
        assert!(frame_len > 0, "frame dimensions must be nonzero");

        let mut log_lut = [0.0f64; 256];
        for (value, slot) in log_lut.iter_mut().enumerate() {
            *slot = ((value + 1) as f64).ln();
        }

        MotionProfiler {
            frame_len,
            log_lut,
            prev: vec![0; frame_len],
        }
    }

    /// Expected byte length of one frame.
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    /// Score one frame against the current reference, then copy it into
    /// the reference buffer (the caller is free to reuse `frame`).
    pub fn score_frame(&mut self, frame: &[u8]) -> f64 {
        assert_eq!(frame.len(), self.frame_len, "frame byte length mismatch");

        let mut score = 0.0;
        for (&cur, &prev) in frame.iter().zip(self.prev.iter()) {
            score += (self.log_lut[cur as usize] - self.log_lut[prev as usize]).abs();
        }

        self.prev.copy_from_slice(frame);
        score
    }

    /// Score every full frame in `reader` until end of stream.
    ///
    /// A trailing partial frame means the stream was truncated; it is
    /// discarded, not scored, and the scores gathered so far are returned.
    pub fn profile<R: Read>(&mut self, mut reader: R) -> MotionResult<Vec<f64>> {
        let mut scores = Vec::new();
        let mut frame = vec![0u8; self.frame_len];

        loop {
            match read_full_frame(&mut reader, &mut frame) {
                Ok(true) => scores.push(self.score_frame(&frame)),
                Ok(false) => break,
                Err(err) => return Err(MotionError::Stream(err)),
            }
        }

        Ok(scores)
    }
}

/// Fill `buf` completely from `reader`.
///
/// Returns `Ok(true)` for a full buffer and `Ok(false)` at end of stream,
/// whether the stream ended cleanly on a frame boundary or mid-frame.
pub(crate) fn read_full_frame<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                if filled > 0 {
                    warn!(
                        got = filled,
                        expected = buf.len(),
                        "stream truncated mid-frame; discarding partial frame"
                    );
                }
                return Ok(false);
            }
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn identical_frames_score_zero() {
        let mut profiler = MotionProfiler::new(4, 2);
        let frame = [9u8; 8];

        profiler.score_frame(&frame);
        assert_close(profiler.score_frame(&frame), 0.0);
    }

    #[test]
    fn black_frame_against_black_reference_scores_zero() {
        let mut profiler = MotionProfiler::new(4, 2);
        assert_close(profiler.score_frame(&[0u8; 8]), 0.0);
    }

    #[test]
    fn first_frame_scores_against_black() {
        let mut profiler = MotionProfiler::new(4, 2);
        let score = profiler.score_frame(&[7u8; 8]);
        assert_close(score, 8.0 * 8.0f64.ln());
    }

    #[test]
    fn score_is_symmetric_in_direction() {
        // |log a - log b| does not care which frame came first.
        let mut up = MotionProfiler::new(2, 2);
        up.score_frame(&[10u8; 4]);
        let rising = up.score_frame(&[200u8; 4]);

        let mut down = MotionProfiler::new(2, 2);
        down.score_frame(&[200u8; 4]);
        let falling = down.score_frame(&[10u8; 4]);

        assert_close(rising, falling);
    }

    #[test]
    fn profile_scores_each_full_frame() {
        let mut profiler = MotionProfiler::new(2, 2);
        let mut stream = Vec::new();
        stream.extend_from_slice(&[0u8; 4]);
        stream.extend_from_slice(&[3u8; 4]);
        stream.extend_from_slice(&[3u8; 4]);

        let scores = profiler.profile(Cursor::new(stream)).unwrap();
        assert_eq!(scores.len(), 3);
        assert_close(scores[0], 0.0);
        assert_close(scores[1], 4.0 * 4.0f64.ln());
        assert_close(scores[2], 0.0);
    }

    #[test]
    fn truncated_trailing_frame_is_discarded() {
        crate::logging::init_test_tracing();
        let mut profiler = MotionProfiler::new(2, 2);
        let mut stream = vec![5u8; 4];
        stream.extend_from_slice(&[9u8; 3]);

        let scores = profiler.profile(Cursor::new(stream)).unwrap();
        assert_eq!(scores.len(), 1);
    }

    #[test]
    fn empty_stream_yields_no_scores() {
        let mut profiler = MotionProfiler::new(2, 2);
        let scores = profiler.profile(Cursor::new(Vec::new())).unwrap();
        assert!(scores.is_empty());
    }

    #[test]
    #[should_panic(expected = "frame byte length mismatch")]
    fn wrong_frame_length_is_rejected() {
        let mut profiler = MotionProfiler::new(4, 2);
        profiler.score_frame(&[0u8; 7]);
    }
}
