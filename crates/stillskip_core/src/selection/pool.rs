//! Order-statistic pool over per-frame motion scores.
//!
//! One [`FrameScore`] record exists per input frame, addressed by its dense
//! 0-based frame index. The pool maintains two views over the records:
//! `order`, every frame index sorted ascending by the composite key
//! `(value, frame index)`, and `succ`, skip pointers that answer "what is
//! the next not-yet-dropped frame after this one" in physical frame order.
//!
//! The drop loop consumes `order` from the front: the frame at the cursor
//! becomes the victim and stays in the consumed prefix, and the only
//! physical mutations are the removal and reinsertion of a frame whose
//! score changed, both confined to the suffix at the cursor.

use std::cmp::Ordering;

/// Score record for one input frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameScore {
    /// Motion score; changes only when a dropped neighbor's share lands here.
    pub value: f64,
    /// Set once when the frame is chosen as a victim, never cleared.
    pub dropped: bool,
}

/// Sorted pool of frame scores with survivor lookup.
#[derive(Debug)]
pub struct RankedPool {
    frames: Vec<FrameScore>,
    /// Frame indices, ascending by `(value, frame index)`.
    order: Vec<u32>,
    /// `succ[i]` starts the forward scan for the survivor after frame `i`;
    /// `frames.len()` is the end sentinel.
    succ: Vec<u32>,
}

impl RankedPool {
    /// Build the pool from raw scores, one frame per element.
    pub fn build(values: &[f64]) -> RankedPool {
        let frames: Vec<FrameScore> = values
            .iter()
            .map(|&value| FrameScore {
                value,
                dropped: false,
            })
            .collect();

        let mut order: Vec<u32> = (0..frames.len() as u32).collect();
        order.sort_unstable_by(|&a, &b| key_cmp(&frames, a, b));

        let succ: Vec<u32> = (1..=frames.len() as u32).collect();

        RankedPool {
            frames,
            order,
            succ,
        }
    }

    /// Number of frames in the pool. The pool never physically shrinks;
    /// consumption is tracked by the caller's cursor.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame index occupying sorted position `pos`.
    pub fn frame_at(&self, pos: usize) -> u32 {
        self.order[pos]
    }

    /// Current score of `frame`.
    pub fn value(&self, frame: u32) -> f64 {
        self.frames[frame as usize].value
    }

    pub fn is_dropped(&self, frame: u32) -> bool {
        self.frames[frame as usize].dropped
    }

    /// Mark `frame` as dropped. The flag is never cleared.
    pub fn mark_dropped(&mut self, frame: u32) {
        self.frames[frame as usize].dropped = true;
    }

    /// The nearest frame after `frame` in physical order that has not been
    /// dropped, if any remains.
    ///
    /// Walks the skip pointers over any run of dropped frames and repoints
    /// the visited nodes at the survivor, so repeated scans across the
    /// same run stay short.
    pub fn next_surviving(&mut self, frame: u32) -> Option<u32> {
        let end = self.frames.len() as u32;

        let mut next = self.succ[frame as usize];
        while next < end && self.frames[next as usize].dropped {
            next = self.succ[next as usize];
        }

        let mut node = frame;
        while node != next {
            let hop = self.succ[node as usize];
            self.succ[node as usize] = next;
            node = hop;
        }

        (next < end).then_some(next)
    }

    /// Sorted position of `frame`, searching `order[start..]` by the
    /// frame's current composite key.
    ///
    /// # Panics
    ///
    /// Panics when the key's position does not hold `frame`: the ordering
    /// invariant is broken and continuing would select the wrong frames.
    pub fn locate(&self, frame: u32, start: usize) -> usize {
        let pos = start + self.lower_bound(frame, start);
        if pos >= self.order.len() || self.order[pos] != frame {
            panic!(
                "ranked pool order broken: frame {frame} is not at its key's \
                 position {pos} (searched from {start})"
            );
        }
        pos
    }

    /// Remove the sorted slot at `pos`, shifting later slots left.
    pub fn remove_at(&mut self, pos: usize) -> u32 {
        self.order.remove(pos)
    }

    /// Insert `frame` at its key's ascending position within
    /// `order[start..]`, shifting later slots right. Returns the position.
    pub fn insert_sorted(&mut self, frame: u32, start: usize) -> usize {
        let pos = start + self.lower_bound(frame, start);
        self.order.insert(pos, frame);
        pos
    }

    /// Add `delta` to a frame's score. The frame must currently be removed
    /// from the sorted order; reinsert it afterwards.
    pub fn add_to_value(&mut self, frame: u32, delta: f64) {
        debug_assert!(!self.order.contains(&frame));
        self.frames[frame as usize].value += delta;
    }

    /// Count of elements in `order[start..]` strictly below `frame`'s key.
    fn lower_bound(&self, frame: u32, start: usize) -> usize {
        self.order[start..]
            .partition_point(|&other| key_cmp(&self.frames, other, frame) == Ordering::Less)
    }
}

/// Composite sort key: score ascending, equal scores ordered by frame index.
fn key_cmp(frames: &[FrameScore], a: u32, b: u32) -> Ordering {
    frames[a as usize]
        .value
        .total_cmp(&frames[b as usize].value)
        .then_with(|| a.cmp(&b))
}
