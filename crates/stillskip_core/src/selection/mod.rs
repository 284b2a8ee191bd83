//! Frame selection: which frames of the input survive into the output.
//!
//! The selection stage consumes the smoothed motion scores and a target
//! drop count and produces a [`Selection`] bitmap. The work happens in two
//! layers: [`RankedPool`] keeps the per-frame records in composite-key
//! order, and [`plan_drops`] runs the greedy drop loop with score
//! redistribution on top of it.

mod pool;
mod selector;

pub use pool::{FrameScore, RankedPool};
pub use selector::plan_drops;

/// Per-frame drop decisions for one run, `true` meaning "omit this frame".
///
/// Produced once by [`plan_drops`] and then read by both the reassembly
/// pass and the audio planner; nothing mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    dropped: Vec<bool>,
}

impl Selection {
    /// A selection over `frame_count` frames with every frame kept.
    pub fn all_kept(frame_count: usize) -> Selection {
        Selection {
            dropped: vec![false; frame_count],
        }
    }

    /// Build a selection from explicit per-frame drop flags.
    pub fn from_flags(dropped: Vec<bool>) -> Selection {
        Selection { dropped }
    }

    /// Number of frames covered by the selection.
    pub fn len(&self) -> usize {
        self.dropped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dropped.is_empty()
    }

    /// Whether `frame` is omitted from the output.
    pub fn is_dropped(&self, frame: usize) -> bool {
        self.dropped[frame]
    }

    pub(crate) fn drop_frame(&mut self, frame: usize) {
        self.dropped[frame] = true;
    }

    /// Number of frames marked dropped.
    pub fn dropped_count(&self) -> usize {
        self.dropped.iter().filter(|&&d| d).count()
    }

    /// Number of frames that survive into the output.
    pub fn kept_count(&self) -> usize {
        self.len() - self.dropped_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_kept_has_no_drops() {
        let selection = Selection::all_kept(4);
        assert_eq!(selection.len(), 4);
        assert_eq!(selection.dropped_count(), 0);
        assert_eq!(selection.kept_count(), 4);
        assert!(!selection.is_dropped(3));
    }

    #[test]
    fn drop_flags_are_counted() {
        let selection = Selection::from_flags(vec![true, false, true, false]);
        assert_eq!(selection.dropped_count(), 2);
        assert_eq!(selection.kept_count(), 2);
        assert!(selection.is_dropped(0));
        assert!(!selection.is_dropped(1));
    }
}
