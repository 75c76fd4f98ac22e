//! A learner's progress through one compiled document, restored from and
//! saved back to a store.

use std::time::SystemTime;

use tracing::{debug, error, info, warn};

use crate::config::Messages;
use crate::encoding::{Codec, Prefixed};
use crate::language::{Document, GateKind, GateRef};
use crate::progress::machine::{Event, Machine, Outcome, State};
use crate::progress::snapshot::{SkipLock, Snapshot};
use crate::progress::storage::{read_json, write_json, Storage};
use crate::progress::view::render_with_progress;
use crate::progress::visibility;

/// A solved gate and the answers it accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolvedAnswer {
    pub gate: GateRef,
    pub answers: Vec<String>,
}

pub struct Session<'d, S: Storage> {
    document: &'d Document,
    messages: &'d Messages,
    storage: S,
    key: String,
    state: State,
}

impl<'d, S: Storage> Session<'d, S> {
    /// Restore progress saved under the key. Nothing saved, a store that
    /// can't be read, or a blob that can't be parsed all start afresh. A
    /// skip cooldown still running from an earlier session stays in force.
    pub fn load(document: &'d Document, messages: &'d Messages, storage: S, key: &str) -> Self {
        let snapshot = match read_json::<Snapshot>(&storage, key) {
            Ok(Some(snapshot)) => reconcile(document, snapshot),
            Ok(None) => Snapshot::fresh(document.total_problems),
            Err(error) => {
                warn!(key, %error, "Progress could not be loaded");
                Snapshot::fresh(document.total_problems)
            }
        };

        let skip_locked = match read_json::<SkipLock>(&storage, &lock_key(key)) {
            Ok(Some(lock)) => lock.is_active(SystemTime::now()),
            Ok(None) => false,
            Err(error) => {
                warn!(key, %error, "Ignoring unreadable skip cooldown");
                false
            }
        };

        Session {
            document,
            messages,
            storage,
            key: key.to_string(),
            state: State {
                snapshot,
                skip_locked,
            },
        }
    }

    /// Write the current snapshot to the store. Failure is logged and
    /// otherwise ignored.
    pub fn save(&mut self) {
        if let Err(error) = write_json(&mut self.storage, &self.key, &self.state.snapshot) {
            error!(key = %self.key, %error, "Progress could not be saved");
        }
    }

    fn apply(&mut self, event: Event) -> Outcome {
        let machine = Machine::new(&self.document.gates, self.messages);
        let transition = machine.apply(&self.state, event);

        let changed = transition
            .state
            .snapshot
            != self
                .state
                .snapshot;
        self.state = transition.state;

        if changed {
            self.save();
        }

        debug!(outcome = ?transition.outcome);
        transition.outcome
    }

    pub fn check_problem_answer(&mut self, id: u32, input: &str) -> Outcome {
        self.apply(Event::CheckProblem {
            id,
            input: input.to_string(),
        })
    }

    pub fn check_wait_condition(&mut self, id: u32, input: &str) -> Outcome {
        self.apply(Event::CheckWait {
            id,
            input: input.to_string(),
        })
    }

    /// The question put to the learner before skipping a problem.
    pub fn skip_confirmation(&self, id: u32) -> String {
        let mut message = self
            .messages
            .confirm_skip
            .clone();

        if let Some(gate) = self
            .document
            .gate(GateRef::problem(id))
        {
            let seconds = gate
                .cooldown
                .as_secs();
            if seconds >= 1 {
                message.push_str(&format!(
                    "\n(Skipping will be possible again after about {} second{}.)",
                    seconds,
                    if seconds == 1 { "" } else { "s" }
                ));
            }
        }

        message
    }

    /// Give up on a problem. The learner is asked to confirm only when the
    /// skip would actually happen.
    pub fn skip_problem(&mut self, id: u32, confirm: impl FnOnce(&str) -> bool) -> Outcome {
        let reference = GateRef::problem(id);
        let possible = self
            .document
            .gate(reference)
            .is_some()
            && !self
                .state
                .snapshot
                .is_solved(reference)
            && !self
                .state
                .skip_locked;

        if possible && !confirm(&self.skip_confirmation(id)) {
            return Outcome::Declined;
        }

        let outcome = self.apply(Event::Skip { id });

        if let Outcome::Skipped { cooldown, .. } = &outcome {
            let lock = SkipLock::after(SystemTime::now(), *cooldown);
            if let Err(error) = write_json(&mut self.storage, &lock_key(&self.key), &lock) {
                error!(key = %self.key, %error, "Skip cooldown could not be saved");
            }
        }

        outcome
    }

    /// Delivered when a skip cooldown runs out. Safe to deliver more than
    /// once.
    pub fn cooldown_elapsed(&mut self) {
        self.apply(Event::CooldownElapsed);
        self.forget_lock();
    }

    fn forget_lock(&mut self) {
        if let Err(error) = self
            .storage
            .remove(&lock_key(&self.key))
        {
            error!(key = %self.key, %error, "Skip cooldown could not be removed");
        }
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        match self.apply(Event::ToggleSidebar) {
            Outcome::SidebarToggled(visible) => visible,
            _ => self
                .state
                .snapshot
                .is_sidebar_visible,
        }
    }

    /// Visibility of each top-level block of the document.
    pub fn visibility(&self) -> Vec<bool> {
        visibility::compute(
            &self
                .document
                .blocks,
            &self
                .document
                .visibility,
            |gate| {
                self.state
                    .snapshot
                    .is_solved(gate)
            },
        )
    }

    /// Each solved gate, in document order, with its accepted answers
    /// decoded.
    pub fn solved_answers(&self) -> Vec<SolvedAnswer> {
        self.document
            .gates
            .iter()
            .filter(|gate| {
                self.state
                    .snapshot
                    .is_solved(gate.reference)
            })
            .map(|gate| {
                let codec = Prefixed::new(&gate.prefix);
                SolvedAnswer {
                    gate: gate.reference,
                    answers: gate
                        .accepted
                        .iter()
                        .filter_map(|token| codec.decode(token))
                        .collect(),
                }
            })
            .collect()
    }

    /// Forget everything saved for this page and start over.
    pub fn clear(&mut self) {
        if let Err(error) = self
            .storage
            .remove(&self.key)
        {
            error!(key = %self.key, %error, "Saved progress could not be removed");
        }
        self.forget_lock();
        info!(key = %self.key, "Progress cleared");

        self.state = State {
            snapshot: Snapshot::fresh(self.document.total_problems),
            skip_locked: false,
        };
    }

    pub fn render(&self) -> String {
        render_with_progress(self.document, &self.state.snapshot, self.state.skip_locked)
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self
            .state
            .snapshot
    }

    pub fn skip_locked(&self) -> bool {
        self.state
            .skip_locked
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}

/// Where the skip cooldown is kept, next to the progress blob.
fn lock_key(key: &str) -> String {
    format!("{}.skip-lock", key)
}

/// Drop saved state for gates the document no longer has, and take the
/// problem count from the document rather than the blob.
fn reconcile(document: &Document, mut snapshot: Snapshot) -> Snapshot {
    let exists = |kind: GateKind, id: u32| {
        document
            .gate(GateRef { kind, id })
            .is_some()
    };

    snapshot
        .problem_states
        .retain(|id, _| exists(GateKind::Problem, *id));
    snapshot
        .wait_states
        .retain(|id, _| exists(GateKind::Wait, *id));

    let sections: Vec<String> = document
        .gates
        .iter()
        .map(|gate| {
            gate.reference
                .reveal_id()
        })
        .collect();
    snapshot
        .revealed_sections
        .retain(|id| sections.contains(id));

    snapshot.total_problems_count = document.total_problems;
    snapshot.correct_problems_count = snapshot
        .correct_problems_count
        .min(document.total_problems);

    snapshot
}
