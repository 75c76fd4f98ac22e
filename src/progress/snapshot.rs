//! The saved form of a learner's progress through one document.

use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::language::{GateKind, GateRef};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProblemState {
    pub solved: bool,
    pub last_answer: String,
    pub result_text: String,
    pub result_class: String,
    /// Solved by giving up rather than by answering.
    pub skipped: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WaitState {
    pub unlocked: bool,
    pub last_input: String,
    pub result_text: String,
    pub result_class: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub correct_problems_count: u32,
    pub total_problems_count: u32,
    pub skip_count: u32,
    pub problem_states: BTreeMap<u32, ProblemState>,
    pub wait_states: BTreeMap<u32, WaitState>,
    #[serde(with = "revealed")]
    pub revealed_sections: BTreeSet<String>,
    pub is_sidebar_visible: bool,
}

impl Default for Snapshot {
    fn default() -> Self {
        Snapshot {
            correct_problems_count: 0,
            total_problems_count: 0,
            skip_count: 0,
            problem_states: BTreeMap::new(),
            wait_states: BTreeMap::new(),
            revealed_sections: BTreeSet::new(),
            is_sidebar_visible: true,
        }
    }
}

impl Snapshot {
    pub fn fresh(total_problems: u32) -> Snapshot {
        Snapshot {
            total_problems_count: total_problems,
            ..Snapshot::default()
        }
    }

    /// Whether the gate's check action has been permanently disabled.
    pub fn is_solved(&self, gate: GateRef) -> bool {
        match gate.kind {
            GateKind::Problem => self
                .problem_states
                .get(&gate.id)
                .map(|state| state.solved)
                .unwrap_or(false),
            GateKind::Wait => self
                .wait_states
                .get(&gate.id)
                .map(|state| state.unlocked)
                .unwrap_or(false),
        }
    }

    pub fn reveal(&mut self, gate: GateRef) {
        self.revealed_sections
            .insert(gate.reveal_id());
    }

    pub fn is_revealed(&self, gate: GateRef) -> bool {
        self.revealed_sections
            .contains(&gate.reveal_id())
    }
}

/// When skipping becomes possible again. Saved beside the progress blob so
/// that a cooldown started in one session holds in the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkipLock {
    /// Milliseconds since the Unix epoch.
    pub locked_until: u64,
}

impl SkipLock {
    pub fn after(now: SystemTime, cooldown: Duration) -> SkipLock {
        SkipLock {
            locked_until: epoch_millis(now).saturating_add(
                u64::try_from(cooldown.as_millis()).unwrap_or(u64::MAX),
            ),
        }
    }

    pub fn is_active(&self, now: SystemTime) -> bool {
        epoch_millis(now) < self.locked_until
    }
}

fn epoch_millis(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Revealed sections are written as an object of `{"id": true}` entries.
/// Reading also accepts a plain list of ids.
mod revealed {
    use std::collections::{BTreeMap, BTreeSet};

    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Form {
        Map(BTreeMap<String, bool>),
        List(Vec<String>),
    }

    pub fn serialize<S>(sections: &BTreeSet<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(
            sections
                .iter()
                .map(|id| (id, true)),
        )
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Form::deserialize(deserializer)? {
            Form::Map(map) => map
                .into_iter()
                .filter(|(_, revealed)| *revealed)
                .map(|(id, _)| id)
                .collect(),
            Form::List(list) => list
                .into_iter()
                .collect(),
        })
    }
}
