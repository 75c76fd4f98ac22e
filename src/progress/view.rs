//! Drawing a document as a learner currently sees it.

use crate::language::{Document, GateKind, GateRef};
use crate::progress::snapshot::Snapshot;
use crate::progress::visibility;
use crate::rendering::{render_blocks, GateState, Presenter};

pub struct View<'s> {
    snapshot: &'s Snapshot,
    skip_locked: bool,
    visible: Vec<bool>,
}

impl<'s> View<'s> {
    pub fn new(document: &Document, snapshot: &'s Snapshot, skip_locked: bool) -> View<'s> {
        let visible = visibility::compute(&document.blocks, &document.visibility, |gate| {
            snapshot.is_solved(gate)
        });

        View {
            snapshot,
            skip_locked,
            visible,
        }
    }
}

impl Presenter for View<'_> {
    fn state(&self, gate: GateRef) -> GateState {
        match gate.kind {
            GateKind::Problem => match self
                .snapshot
                .problem_states
                .get(&gate.id)
            {
                Some(state) => GateState {
                    solved: state.solved,
                    input: state
                        .last_answer
                        .clone(),
                    result_text: state
                        .result_text
                        .clone(),
                    result_class: state
                        .result_class
                        .clone(),
                },
                None => GateState::default(),
            },
            GateKind::Wait => match self
                .snapshot
                .wait_states
                .get(&gate.id)
            {
                Some(state) => GateState {
                    solved: state.unlocked,
                    input: state
                        .last_input
                        .clone(),
                    result_text: state
                        .result_text
                        .clone(),
                    result_class: state
                        .result_class
                        .clone(),
                },
                None => GateState::default(),
            },
        }
    }

    fn revealed(&self, gate: GateRef) -> bool {
        self.snapshot
            .is_revealed(gate)
    }

    fn skip_locked(&self) -> bool {
        self.skip_locked
    }

    fn visible(&self, index: usize) -> bool {
        self.visible
            .get(index)
            .copied()
            .unwrap_or(false)
    }
}

/// Render only what is visible given the saved progress, with solved gates
/// disabled and their last inputs and results filled in.
pub fn render_with_progress(document: &Document, snapshot: &Snapshot, skip_locked: bool) -> String {
    let view = View::new(document, snapshot, skip_locked);
    render_blocks(document, &view)
}
