//! SM-2 variant with three outcome grades.
//!
//! Exact answers earn geometric growth on the ease factor from the third
//! repetition on. Near misses grow by a fixed 1.2x and never compound on ease.
//! Incorrect answers reset repetitions and come back either later in the same
//! session or the next day.

use super::ReviewScheduler;
use crate::config::{
    INITIAL_EASE_FACTOR, MAXIMUM_INTERVAL_DAYS, MINIMUM_EASE_FACTOR, SHORT_RETRY_WINDOW_MINUTES,
};
use crate::types::{AttemptResult, ItemMemoryState};
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// SM-2 scheduler with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub initial_ease: f64,
    pub minimum_ease: f64,
    pub exact_bonus: f64,
    pub near_miss_penalty: f64,
    pub lapse_penalty: f64,
    pub near_miss_multiplier: f64,
    /// Interval granted on the second consecutive exact answer.
    pub second_interval: u32,
    /// Upper bound on any granted interval.
    pub maximum_interval: u32,
    pub short_retry_window_minutes: i64,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: INITIAL_EASE_FACTOR,
            minimum_ease: MINIMUM_EASE_FACTOR,
            exact_bonus: 0.1,
            near_miss_penalty: 0.05,
            lapse_penalty: 0.2,
            near_miss_multiplier: 1.2,
            second_interval: 3,
            maximum_interval: MAXIMUM_INTERVAL_DAYS,
            short_retry_window_minutes: SHORT_RETRY_WINDOW_MINUTES,
        }
    }
}

impl Sm2 {
    pub fn with_retry_window(short_retry_window_minutes: i64) -> Self {
        Self {
            short_retry_window_minutes,
            ..Self::default()
        }
    }

    fn lapse(
        &self,
        state: &ItemMemoryState,
        now: DateTime<Utc>,
        in_session: bool,
    ) -> ItemMemoryState {
        let next_due_at = if in_session {
            let max_minutes = i64::from(self.maximum_interval) * 24 * 60;
            due_after(
                now,
                Duration::minutes(self.short_retry_window_minutes.clamp(0, max_minutes)),
            )
        } else {
            due_after(now, Duration::days(1))
        };

        ItemMemoryState {
            ease_factor: (state.ease_factor - self.lapse_penalty).max(self.minimum_ease),
            interval_days: 1,
            repetitions: 0,
            next_due_at,
            last_reviewed_at: Some(now),
            lapses: state.lapses.saturating_add(1),
        }
    }

    fn near_miss(&self, state: &ItemMemoryState, now: DateTime<Utc>) -> ItemMemoryState {
        let repetitions = state.repetitions.saturating_add(1);
        // A never-reviewed item (interval 0) grows as if its interval were 1.
        let previous = state.interval_days.max(1);
        let interval_days = if repetitions <= 1 {
            1
        } else {
            self.grow(previous, self.near_miss_multiplier)
        };

        ItemMemoryState {
            ease_factor: (state.ease_factor - self.near_miss_penalty).max(self.minimum_ease),
            interval_days,
            repetitions,
            next_due_at: due_after(now, Duration::days(i64::from(interval_days))),
            last_reviewed_at: Some(now),
            lapses: state.lapses,
        }
    }

    fn exact(&self, state: &ItemMemoryState, now: DateTime<Utc>) -> ItemMemoryState {
        let repetitions = state.repetitions.saturating_add(1);
        let ease_factor = (state.ease_factor + self.exact_bonus).max(self.minimum_ease);
        let previous = state.interval_days.max(1);
        let interval_days = match repetitions {
            0 | 1 => 1,
            2 => self.second_interval,
            _ => self.grow(previous, ease_factor),
        };

        ItemMemoryState {
            ease_factor,
            interval_days,
            repetitions,
            next_due_at: due_after(now, Duration::days(i64::from(interval_days))),
            last_reviewed_at: Some(now),
            lapses: state.lapses,
        }
    }

    /// `clamp(round(previous * multiplier), 1, maximum_interval)`.
    fn grow(&self, previous: u32, multiplier: f64) -> u32 {
        let grown = (f64::from(previous) * multiplier).round();
        if grown >= f64::from(self.maximum_interval) {
            self.maximum_interval
        } else {
            (grown as u32).max(1)
        }
    }
}

/// `now + delta`, saturating at the latest representable instant.
fn due_after(now: DateTime<Utc>, delta: Duration) -> DateTime<Utc> {
    now.checked_add_signed(delta).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

impl ReviewScheduler for Sm2 {
    fn name(&self) -> &'static str {
        "sm2"
    }

    fn initial_state(&self, now: DateTime<Utc>) -> ItemMemoryState {
        ItemMemoryState {
            ease_factor: self.initial_ease,
            ..ItemMemoryState::new(now)
        }
    }

    fn advance(
        &self,
        state: &ItemMemoryState,
        result: AttemptResult,
        now: DateTime<Utc>,
        in_session: bool,
    ) -> ItemMemoryState {
        let next = match result {
            AttemptResult::Incorrect => self.lapse(state, now, in_session),
            AttemptResult::NearMiss => self.near_miss(state, now),
            AttemptResult::Exact => self.exact(state, now),
        };

        debug!(
            scheduler = self.name(),
            %result,
            repetitions = next.repetitions,
            interval_days = next.interval_days,
            ease_factor = next.ease_factor,
            lapses = next.lapses,
            "advanced item state"
        );
        next
    }
}

/// Advance `state` by one attempt using the default parameters and the given
/// short retry window.
pub fn advance(
    state: &ItemMemoryState,
    result: AttemptResult,
    now: DateTime<Utc>,
    in_session: bool,
    short_retry_window_minutes: i64,
) -> ItemMemoryState {
    Sm2::with_retry_window(short_retry_window_minutes).advance(state, result, now, in_session)
}
