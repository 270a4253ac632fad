//! Service configuration loaded from the environment.

use std::str::FromStr;

use practice_core::PracticeSettings;

use crate::error::{Result, ServiceError};

pub const ENV_SHORT_RETRY_MINUTES: &str = "SAPLING_SHORT_RETRY_MINUTES";
pub const ENV_SESSION_EXERCISES: &str = "SAPLING_SESSION_EXERCISES";
pub const ENV_REVIEW_LIMIT: &str = "SAPLING_REVIEW_LIMIT";
pub const ENV_COMPREHENSION_UNITS: &str = "SAPLING_COMPREHENSION_UNITS";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceConfig {
    pub settings: PracticeSettings,
}

impl ServiceConfig {
    /// Load `.env` if present, then read overrides from the environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = PracticeSettings::default();
        let settings = PracticeSettings {
            short_retry_window_minutes: read(&lookup, ENV_SHORT_RETRY_MINUTES)?
                .unwrap_or(defaults.short_retry_window_minutes),
            session_default_exercise_count: read(&lookup, ENV_SESSION_EXERCISES)?
                .unwrap_or(defaults.session_default_exercise_count),
            review_injection_limit: read(&lookup, ENV_REVIEW_LIMIT)?
                .unwrap_or(defaults.review_injection_limit),
            comprehension_phase_units: read(&lookup, ENV_COMPREHENSION_UNITS)?
                .unwrap_or(defaults.comprehension_phase_units),
            ..defaults
        };

        settings.validate()?;
        tracing::info!(?settings, "Loaded practice settings");
        Ok(Self { settings })
    }
}

fn read<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ServiceError::Config(format!("{key}={raw:?}: {e}"))),
        None => Ok(None),
    }
}
