//! Learner progress: which gates are solved, what was typed into them, and
//! so what parts of a document can be seen.

mod machine;
mod session;
mod snapshot;
mod storage;
mod view;
pub mod visibility;

pub use machine::{first_answer, Event, Machine, Outcome, State, Transition};
pub use machine::{RESULT_CORRECT, RESULT_EMPTY, RESULT_INCORRECT, RESULT_SKIPPED};
pub use session::{Session, SolvedAnswer};
pub use snapshot::{ProblemState, SkipLock, Snapshot, WaitState};
pub use storage::{read_json, storage_key, write_json, FileStorage, MemoryStorage, Storage, StorageError};
pub use view::{render_with_progress, View};
