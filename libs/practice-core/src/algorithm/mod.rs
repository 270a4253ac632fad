//! Spaced repetition scheduling and due-item selection.

pub mod due;
pub mod sm2;

use crate::types::{AttemptResult, ItemMemoryState};
use chrono::{DateTime, Utc};

pub use due::{select_due, to_due_item, DueItem};
pub use sm2::{advance, Sm2};

/// Trait for schedulers that turn a graded attempt into the next memory state.
pub trait ReviewScheduler: Send + Sync {
    /// Algorithm identifier.
    fn name(&self) -> &'static str;

    /// Next state after one attempt. `in_session` selects the short retry
    /// window for lapses instead of next-day review.
    fn advance(
        &self,
        state: &ItemMemoryState,
        result: AttemptResult,
        now: DateTime<Utc>,
        in_session: bool,
    ) -> ItemMemoryState;

    /// State for an item that has never been attempted.
    fn initial_state(&self, now: DateTime<Utc>) -> ItemMemoryState;
}
