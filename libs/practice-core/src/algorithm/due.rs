//! Due-item selection for review injection.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::ItemMemoryState;

/// Scheduling summary of one item, enough to rank it for review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueItem<T = String> {
    pub item_id: T,
    pub next_due_at: DateTime<Utc>,
    pub lapses: u32,
    pub repetitions: u32,
}

pub fn to_due_item<T>(item_id: T, state: &ItemMemoryState) -> DueItem<T> {
    DueItem {
        item_id,
        next_due_at: state.next_due_at,
        lapses: state.lapses,
        repetitions: state.repetitions,
    }
}

/// Items due at `now`, earliest first, at most `limit` of them.
///
/// Equally due items are ordered by more lapses first, then fewer
/// repetitions, then item id so that the result does not depend on input
/// order.
pub fn select_due<T>(items: &[DueItem<T>], now: DateTime<Utc>, limit: usize) -> Vec<DueItem<T>>
where
    T: Ord + Clone,
{
    let mut due: Vec<DueItem<T>> = items
        .iter()
        .filter(|item| item.next_due_at <= now)
        .cloned()
        .collect();
    due.sort_by(review_priority);
    due.truncate(limit);
    due
}

fn review_priority<T: Ord>(a: &DueItem<T>, b: &DueItem<T>) -> Ordering {
    a.next_due_at
        .cmp(&b.next_due_at)
        .then_with(|| b.lapses.cmp(&a.lapses))
        .then_with(|| a.repetitions.cmp(&b.repetitions))
        .then_with(|| a.item_id.cmp(&b.item_id))
}
