//! Trailing-window smoothing of the score sequence.
//!
//! Raw per-frame motion is spiky; summing a short trailing window gives
//! the selector local context, so an isolated one-frame spike does not
//! shield its genuinely static neighbors from being dropped.

/// Replace every score with the sum of the trailing `window` scores,
/// clipped at the start of the sequence. `window == 1` is the identity.
///
/// The pass runs right to left, each window summing from its newest
/// element backwards, so no read ever sees an already-overwritten value.
pub fn apply_trailing_window(scores: &mut [f64], window: usize) {
    assert!(window >= 1, "window must be at least 1");
    if window == 1 {
        return;
    }

    for i in (0..scores.len()).rev() {
        let lo = i.saturating_sub(window - 1);
        let mut sum = 0.0;
        for j in (lo..=i).rev() {
            sum += scores[j];
        }
        scores[i] = sum;
    }
}

/// Resolve a requested window size: 0 selects the default of a third of a
/// second worth of frames. The result can still be 0 or 1 at very low
/// frame rates, which callers treat as "no smoothing".
pub fn effective_window(window: usize, fps: u32) -> usize {
    if window == 0 {
        (fps / 3) as usize
    } else {
        window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_of_one_is_identity() {
        let mut scores = vec![4.0, 2.5, 0.0, 7.0];
        apply_trailing_window(&mut scores, 1);
        assert_eq!(scores, vec![4.0, 2.5, 0.0, 7.0]);
    }

    #[test]
    fn window_sums_trailing_values() {
        let mut scores = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        apply_trailing_window(&mut scores, 3);
        // index i becomes scores[max(0, i-2) ..= i] summed
        assert_eq!(scores, vec![1.0, 3.0, 6.0, 9.0, 12.0]);
    }

    #[test]
    fn window_is_clipped_at_the_start() {
        let mut scores = vec![1.0, 2.0, 3.0];
        apply_trailing_window(&mut scores, 10);
        assert_eq!(scores, vec![1.0, 3.0, 6.0]);
    }

    #[test]
    fn window_two_matches_pairwise_sums() {
        let mut scores = vec![0.5, 0.25, 4.0, 1.0];
        apply_trailing_window(&mut scores, 2);
        assert_eq!(scores, vec![0.5, 0.75, 4.25, 5.0]);
    }

    #[test]
    fn empty_sequence_is_fine() {
        let mut scores: Vec<f64> = Vec::new();
        apply_trailing_window(&mut scores, 5);
        assert!(scores.is_empty());
    }

    #[test]
    fn zero_window_defaults_to_a_third_of_a_second() {
        assert_eq!(effective_window(0, 30), 10);
        assert_eq!(effective_window(0, 24), 8);
        assert_eq!(effective_window(0, 2), 0);
    }

    #[test]
    fn explicit_window_is_passed_through() {
        assert_eq!(effective_window(7, 30), 7);
        assert_eq!(effective_window(1, 30), 1);
    }
}
