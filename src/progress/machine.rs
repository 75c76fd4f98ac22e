//! Transitions of progress state in response to a learner's actions.
//!
//! Applying an event never touches storage or output; it takes the current
//! state and returns the next one along with what happened, so the caller
//! decides whether to persist and what to show.

use std::time::Duration;

use tracing::{debug, warn};

use crate::config::Messages;
use crate::encoding::{Codec, Prefixed};
use crate::language::{Gate, GateRef};
use crate::progress::snapshot::{ProblemState, Snapshot, WaitState};

pub const RESULT_CORRECT: &str = "result-correct";
pub const RESULT_INCORRECT: &str = "result-incorrect";
pub const RESULT_EMPTY: &str = "result-empty";
pub const RESULT_SKIPPED: &str = "result-skipped";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    pub snapshot: Snapshot,
    /// Skip controls are locked for every problem while a cooldown runs.
    /// This is not saved.
    pub skip_locked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    CheckProblem { id: u32, input: String },
    CheckWait { id: u32, input: String },
    Skip { id: u32 },
    CooldownElapsed,
    ToggleSidebar,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
    Empty,
    Unlocked,
    WrongPassword,
    EmptyPassword,
    /// The answer given up on, and how long skipping stays locked.
    Skipped {
        answer: String,
        cooldown: Duration,
    },
    CoolingDown,
    CooldownOver,
    AlreadySolved,
    UnknownGate(GateRef),
    SidebarToggled(bool),
    /// The learner did not confirm a skip.
    Declined,
}

#[derive(Debug)]
pub struct Transition {
    pub state: State,
    pub outcome: Outcome,
}

pub struct Machine<'d> {
    gates: &'d [Gate],
    messages: &'d Messages,
}

impl<'d> Machine<'d> {
    pub fn new(gates: &'d [Gate], messages: &'d Messages) -> Machine<'d> {
        Machine { gates, messages }
    }

    fn gate(&self, reference: GateRef) -> Option<&'d Gate> {
        self.gates
            .iter()
            .find(|gate| gate.reference == reference)
    }

    pub fn apply(&self, state: &State, event: Event) -> Transition {
        let mut next = state.clone();

        let outcome = match event {
            Event::CheckProblem { id, input } => self.check_problem(&mut next, id, &input),
            Event::CheckWait { id, input } => self.check_wait(&mut next, id, &input),
            Event::Skip { id } => self.skip(&mut next, id),
            Event::CooldownElapsed => {
                next.skip_locked = false;
                Outcome::CooldownOver
            }
            Event::ToggleSidebar => {
                next.snapshot
                    .is_sidebar_visible = !next
                    .snapshot
                    .is_sidebar_visible;
                Outcome::SidebarToggled(
                    next.snapshot
                        .is_sidebar_visible,
                )
            }
        };

        Transition {
            state: next,
            outcome,
        }
    }

    fn check_problem(&self, next: &mut State, id: u32, input: &str) -> Outcome {
        let reference = GateRef::problem(id);
        let gate = match self.gate(reference) {
            Some(gate) => gate,
            None => {
                warn!("Check against unknown {}", reference);
                return Outcome::UnknownGate(reference);
            }
        };

        if next
            .snapshot
            .is_solved(reference)
        {
            return Outcome::AlreadySolved;
        }

        let input = input.trim();
        let state = next
            .snapshot
            .problem_states
            .entry(id)
            .or_insert_with(ProblemState::default);
        state.last_answer = input.to_string();

        if input.is_empty() {
            state.result_text = self
                .messages
                .empty
                .clone();
            state.result_class = RESULT_EMPTY.to_string();
            return Outcome::Empty;
        }

        if !accepts(gate, input) {
            state.result_text = self
                .messages
                .incorrect
                .clone();
            state.result_class = RESULT_INCORRECT.to_string();
            return Outcome::Incorrect;
        }

        state.solved = true;
        state.result_text = self
            .messages
            .correct
            .clone();
        state.result_class = RESULT_CORRECT.to_string();

        next.snapshot
            .correct_problems_count += 1;
        next.snapshot
            .reveal(reference);

        debug!("Solved {}", reference);
        Outcome::Correct
    }

    fn check_wait(&self, next: &mut State, id: u32, input: &str) -> Outcome {
        let reference = GateRef::wait(id);
        let gate = match self.gate(reference) {
            Some(gate) => gate,
            None => {
                warn!("Check against unknown {}", reference);
                return Outcome::UnknownGate(reference);
            }
        };

        if next
            .snapshot
            .is_solved(reference)
        {
            return Outcome::AlreadySolved;
        }

        let input = input.trim();
        let state = next
            .snapshot
            .wait_states
            .entry(id)
            .or_insert_with(WaitState::default);
        state.last_input = input.to_string();

        if !gate.is_open() {
            if input.is_empty() {
                state.result_text = self
                    .messages
                    .empty_password
                    .clone();
                state.result_class = RESULT_EMPTY.to_string();
                return Outcome::EmptyPassword;
            }
            if !accepts(gate, input) {
                state.result_text = self
                    .messages
                    .wrong_password
                    .clone();
                state.result_class = RESULT_INCORRECT.to_string();
                return Outcome::WrongPassword;
            }
        }

        state.unlocked = true;
        state.result_text = self
            .messages
            .unlocked
            .clone();
        state.result_class = RESULT_CORRECT.to_string();

        next.snapshot
            .reveal(reference);

        debug!("Unlocked {}", reference);
        Outcome::Unlocked
    }

    fn skip(&self, next: &mut State, id: u32) -> Outcome {
        let reference = GateRef::problem(id);
        let gate = match self.gate(reference) {
            Some(gate) => gate,
            None => {
                warn!("Skip of unknown {}", reference);
                return Outcome::UnknownGate(reference);
            }
        };

        if next
            .snapshot
            .is_solved(reference)
        {
            return Outcome::AlreadySolved;
        }
        if next.skip_locked {
            return Outcome::CoolingDown;
        }

        let answer = first_answer(gate);

        let state = next
            .snapshot
            .problem_states
            .entry(id)
            .or_insert_with(ProblemState::default);
        state.solved = true;
        state.skipped = true;
        state.last_answer = answer.clone();
        state.result_text = self
            .messages
            .skipped
            .clone();
        state.result_class = RESULT_SKIPPED.to_string();

        next.snapshot
            .skip_count += 1;
        next.snapshot
            .reveal(reference);
        next.skip_locked = true;

        debug!("Skipped {}", reference);
        Outcome::Skipped {
            answer,
            cooldown: gate.cooldown,
        }
    }
}

fn accepts(gate: &Gate, input: &str) -> bool {
    let token = Prefixed::new(&gate.prefix).encode(input);
    gate.accepted
        .iter()
        .any(|accepted| accepted.trim() == token)
}

/// The first accepted answer, decoded, or empty if there is none.
pub fn first_answer(gate: &Gate) -> String {
    let codec = Prefixed::new(&gate.prefix);
    gate.accepted
        .first()
        .and_then(|token| codec.decode(token))
        .unwrap_or_default()
}
