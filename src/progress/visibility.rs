//! Which top-level blocks of a document a learner can currently see.

use crate::language::{Block, GateRef, VisibilityMode, VisibilityModes};

/// Walk the blocks in order and decide, for each, whether it is shown.
///
/// A `show` marker makes everything after it visible until a `hide` marker
/// resumes gating. Markers themselves are never shown. Otherwise blocks are
/// visible up to and including the first gate that is unsolved and whose
/// kind is gated; everything after it is hidden. A gate of a kind set to
/// `show` counts as solved.
pub fn compute(
    blocks: &[Block],
    modes: &VisibilityModes,
    is_solved: impl Fn(GateRef) -> bool,
) -> Vec<bool> {
    let mut show_all = false;
    let mut stopped = false;

    blocks
        .iter()
        .map(|block| {
            if let Block::Marker(mode) = block {
                show_all = *mode == VisibilityMode::Show;
                return false;
            }

            if show_all {
                return true;
            }
            if stopped {
                return false;
            }

            if let Block::Gate(gate) = block {
                let gated = modes.get(gate.kind) == VisibilityMode::Hide;
                if gated && !is_solved(*gate) {
                    stopped = true;
                }
            }

            true
        })
        .collect()
}
