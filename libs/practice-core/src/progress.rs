//! Learner-facing progress policy: XP, item strength, feedback tips, streaks.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AttemptResult, ReasonCode};

const STRENGTH_LAPSE_WEIGHT: f64 = 0.8;
const STRENGTH_MAX: f64 = 10.0;

/// XP needed for a fully grown sapling.
const SAPLING_FULL_GROWTH_XP: f64 = 1200.0;

const SPEAKING_RECOMMENDATION_ACCURACY: f64 = 0.7;

/// Fixed XP award per attempt outcome.
pub fn xp_for_result(result: AttemptResult) -> u32 {
    match result {
        AttemptResult::Exact => 12,
        AttemptResult::NearMiss => 9,
        AttemptResult::Incorrect => 3,
    }
}

/// Display strength of an item on a 0-10 scale, two decimals.
pub fn compute_strength(repetitions: u32, lapses: u32, ease_factor: f64) -> f64 {
    let raw = f64::from(repetitions) * ease_factor - f64::from(lapses) * STRENGTH_LAPSE_WEIGHT;
    (raw.clamp(0.0, STRENGTH_MAX) * 100.0).round() / 100.0
}

/// Feedback sentence shown after an attempt.
pub fn tip_for_reason(reason: ReasonCode) -> &'static str {
    match reason {
        ReasonCode::AccentOnly => {
            "Good meaning match. Next time try the accent marks for a native-like answer."
        }
        ReasonCode::TokenSwap => "You got the right words. Keep the order steady and try again.",
        ReasonCode::EditDistance => "Close answer. Focus on one small spelling/sound detail.",
        ReasonCode::AsrSubsequence => {
            "Your spoken response was understood with extra words. Keep it short and crisp."
        }
        ReasonCode::ExactMatch | ReasonCode::NoMatch => {
            "Nice effort. Listen once more and mirror the phrase rhythm."
        }
    }
}

pub fn speaking_practice_recommended(accuracy: f64) -> bool {
    accuracy > SPEAKING_RECOMMENDATION_ACCURACY
}

/// Sapling growth percentage for a lifetime XP total.
pub fn sapling_growth(xp_total: u32) -> u32 {
    let percent = (f64::from(xp_total) / SAPLING_FULL_GROWTH_XP * 100.0).round();
    percent.min(100.0) as u32
}

/// Daily practice streak, counted in UTC calendar days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub current: u32,
    pub best: u32,
}

impl Streak {
    /// Streak after activity at `now`, given the previous activity time.
    pub fn record_activity(self, last_active: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let current = match last_active.map(|at| at.date_naive()) {
            None => 1,
            Some(day) if day == today => self.current,
            Some(day) if is_previous_day(day, today) => self.current.saturating_add(1),
            Some(_) => 1,
        };

        Self {
            current,
            best: self.best.max(current),
        }
    }
}

fn is_previous_day(day: NaiveDate, today: NaiveDate) -> bool {
    today.pred_opt() == Some(day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn xp_table() {
        assert_eq!(xp_for_result(AttemptResult::Exact), 12);
        assert_eq!(xp_for_result(AttemptResult::NearMiss), 9);
        assert_eq!(xp_for_result(AttemptResult::Incorrect), 3);
    }

    #[test]
    fn strength_is_clamped_and_rounded() {
        assert_eq!(compute_strength(0, 0, 2.5), 0.0);
        assert_eq!(compute_strength(1, 0, 2.6), 2.6);
        assert_eq!(compute_strength(1, 2, 2.3), 0.7);
        assert_eq!(compute_strength(0, 3, 2.5), 0.0);
        assert_eq!(compute_strength(9, 0, 2.5), 10.0);
    }

    #[test]
    fn tips_cover_near_misses() {
        assert!(tip_for_reason(ReasonCode::AccentOnly).contains("accent"));
        assert_eq!(
            tip_for_reason(ReasonCode::NoMatch),
            tip_for_reason(ReasonCode::ExactMatch)
        );
    }

    #[test]
    fn growth_caps_at_full() {
        assert_eq!(sapling_growth(0), 0);
        assert_eq!(sapling_growth(600), 50);
        assert_eq!(sapling_growth(5000), 100);
    }

    #[test]
    fn speaking_recommendation_threshold() {
        assert!(speaking_practice_recommended(0.8));
        assert!(!speaking_practice_recommended(0.7));
    }

    #[test]
    fn streak_transitions() {
        let fresh = Streak::default().record_activity(None, at(10, 9));
        assert_eq!(fresh, Streak { current: 1, best: 1 });

        let same_day = fresh.record_activity(Some(at(10, 9)), at(10, 22));
        assert_eq!(same_day, fresh);

        let next_day = same_day.record_activity(Some(at(10, 22)), at(11, 1));
        assert_eq!(next_day, Streak { current: 2, best: 2 });

        let broken = next_day.record_activity(Some(at(11, 1)), at(14, 8));
        assert_eq!(broken, Streak { current: 1, best: 2 });
    }
}
