//! Greedy frame-drop planning over the ranked pool.

use tracing::trace;

use super::pool::RankedPool;
use super::Selection;

/// Plan which frames to drop.
///
/// One pool position is consumed per iteration: the lowest-keyed surviving
/// frame becomes the victim, and the nearest surviving later frame absorbs
/// `victim.value / divisor` and is re-ranked under its new score. The
/// absorbed share is what discourages dropping long runs of consecutive
/// frames. A `divisor` of 0 disables redistribution entirely, and a victim
/// with no surviving later frame redistributes nothing. Ties on score drop
/// the earlier frame first.
///
/// The result is a pure function of the inputs.
///
/// # Panics
///
/// Panics if `drop_count` exceeds `scores.len()`, if `divisor` is
/// negative, or if the pool ordering invariant breaks mid-run.
pub fn plan_drops(scores: &[f64], drop_count: usize, divisor: f64) -> Selection {
    let (selection, _) = run_selection(scores, drop_count, divisor);
    selection
}

/// Drop loop, also yielding the final pool so callers here can inspect
/// post-redistribution scores.
fn run_selection(scores: &[f64], drop_count: usize, divisor: f64) -> (Selection, RankedPool) {
    assert!(
        drop_count <= scores.len(),
        "cannot drop {drop_count} of {} frames",
        scores.len()
    );
    assert!(
        divisor >= 0.0,
        "redistribution divisor must be non-negative, got {divisor}"
    );

    let mut pool = RankedPool::build(scores);
    let mut selection = Selection::all_kept(scores.len());

    for cursor in 0..drop_count {
        let victim = pool.frame_at(cursor);
        pool.mark_dropped(victim);
        selection.drop_frame(victim as usize);

        if let Some(next) = pool.next_surviving(victim) {
            let pos = pool.locate(next, cursor);
            if pos == cursor {
                panic!("ranked pool order broken: survivor {next} ranked at the cursor {cursor}");
            }
            pool.remove_at(pos);
            if divisor != 0.0 {
                let share = pool.value(victim) / divisor;
                pool.add_to_value(next, share);
            }
            pool.insert_sorted(next, cursor);
        }

        if (cursor + 1) % 1000 == 0 {
            trace!(dropped = cursor + 1, drop_count, "selection progress");
        }
    }

    (selection, pool)
}
