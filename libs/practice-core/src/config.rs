//! Fixed practice policy and the settings struct that carries it.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

pub const TARGET_LANGUAGE: &str = "fr";
pub const TARGET_LOCALE: &str = "fr-FR";
pub const NATIVE_LANGUAGE: &str = "en";

pub const DAILY_GOAL_DEFAULT: u32 = 10;
pub const GRAMMAR_UNLOCK_UNIT: u32 = 4;

/// Units 1..=N form the comprehension phase, where production is capped.
pub const COMPREHENSION_PHASE_UNITS: u32 = 2;
/// Production/speaking exercises kept per lesson during the comprehension phase.
pub const COMPREHENSION_PRODUCTION_CAP: usize = 2;

pub const SHORT_RETRY_WINDOW_MINUTES: i64 = 10;

pub const SESSION_DEFAULT_EXERCISE_COUNT: usize = 8;
pub const SESSION_MIN_EXERCISES: usize = 6;
pub const SESSION_MAX_EXERCISES: usize = 12;
pub const REVIEW_INJECTION_LIMIT: usize = 3;
/// A review exercise is spliced in after every Nth lesson exercise.
pub const REVIEW_INJECTION_STRIDE: usize = 3;

pub const INITIAL_EASE_FACTOR: f64 = 2.5;
pub const MINIMUM_EASE_FACTOR: f64 = 1.3;
/// Longest review interval the scheduler grants, about one hundred years.
pub const MAXIMUM_INTERVAL_DAYS: u32 = 36_500;

/// Tunable practice settings. Defaults reproduce the fixed policy above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticeSettings {
    pub short_retry_window_minutes: i64,
    pub session_default_exercise_count: usize,
    pub review_injection_limit: usize,
    pub comprehension_phase_units: u32,
    pub daily_goal: u32,
}

impl Default for PracticeSettings {
    fn default() -> Self {
        Self {
            short_retry_window_minutes: SHORT_RETRY_WINDOW_MINUTES,
            session_default_exercise_count: SESSION_DEFAULT_EXERCISE_COUNT,
            review_injection_limit: REVIEW_INJECTION_LIMIT,
            comprehension_phase_units: COMPREHENSION_PHASE_UNITS,
            daily_goal: DAILY_GOAL_DEFAULT,
        }
    }
}

impl PracticeSettings {
    /// Reject settings that would produce nonsensical schedules or sessions.
    pub fn validate(&self) -> Result<()> {
        if self.short_retry_window_minutes <= 0 {
            return Err(CoreError::InvalidSetting {
                name: "short_retry_window_minutes",
                reason: format!("must be positive, got {}", self.short_retry_window_minutes),
            });
        }
        if self.session_default_exercise_count == 0 {
            return Err(CoreError::InvalidSetting {
                name: "session_default_exercise_count",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.daily_goal == 0 {
            return Err(CoreError::InvalidSetting {
                name: "daily_goal",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Apply per-course overrides on top of these settings.
    pub fn merge(&self, overrides: Option<&PracticeSettingsOverride>) -> Self {
        match overrides {
            Some(o) => Self {
                short_retry_window_minutes: o
                    .short_retry_window_minutes
                    .unwrap_or(self.short_retry_window_minutes),
                session_default_exercise_count: o
                    .session_default_exercise_count
                    .unwrap_or(self.session_default_exercise_count),
                review_injection_limit: o
                    .review_injection_limit
                    .unwrap_or(self.review_injection_limit),
                comprehension_phase_units: o
                    .comprehension_phase_units
                    .unwrap_or(self.comprehension_phase_units),
                daily_goal: self.daily_goal,
            },
            None => self.clone(),
        }
    }
}

/// Per-course overrides (all fields optional).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PracticeSettingsOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_retry_window_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_default_exercise_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_injection_limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comprehension_phase_units: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_policy() {
        let settings = PracticeSettings::default();
        assert_eq!(settings.short_retry_window_minutes, 10);
        assert_eq!(settings.session_default_exercise_count, 8);
        assert_eq!(settings.review_injection_limit, 3);
        assert_eq!(settings.comprehension_phase_units, 2);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn merge_prefers_overrides() {
        let global = PracticeSettings::default();
        let overrides = PracticeSettingsOverride {
            review_injection_limit: Some(5),
            ..Default::default()
        };
        let merged = global.merge(Some(&overrides));
        assert_eq!(merged.review_injection_limit, 5);
        assert_eq!(merged.short_retry_window_minutes, 10);
        assert_eq!(global.merge(None), global);
    }

    #[test]
    fn rejects_non_positive_retry_window() {
        let settings = PracticeSettings {
            short_retry_window_minutes: 0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(CoreError::InvalidSetting { name: "short_retry_window_minutes", .. })
        ));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let settings: PracticeSettings =
            serde_json::from_str(r#"{"review_injection_limit": 1}"#).unwrap();
        assert_eq!(settings.review_injection_limit, 1);
        assert_eq!(settings.session_default_exercise_count, SESSION_DEFAULT_EXERCISE_COUNT);
    }
}
