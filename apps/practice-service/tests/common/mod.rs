//! Common test utilities and fixtures for integration tests.
//!
//! Tests run against the in-memory store with a fixed clock, so they need no
//! external services.

pub mod fixtures;

use chrono::{DateTime, Duration, TimeZone, Utc};

use sapling_practice::config::ServiceConfig;
use sapling_practice::models::{ItemMemoryState, ItemStateRecord, ProfileRecord};
use sapling_practice::store::{MemoryStore, PracticeStore};
use sapling_practice::AppState;

pub const PROFILE_ID: &str = "profile-lea";

/// Test context holding the service state and a fixed "now".
pub struct TestContext {
    pub state: AppState<MemoryStore>,
    pub now: DateTime<Utc>,
}

impl TestContext {
    /// Context with default settings and one learner profile.
    pub fn new() -> Self {
        Self::with_config(ServiceConfig::default())
    }

    pub fn with_config(config: ServiceConfig) -> Self {
        let store = MemoryStore::new();
        store
            .insert_profile(ProfileRecord::new(PROFILE_ID, "Léa"))
            .expect("Failed to insert test profile");

        Self {
            state: AppState::new(store, config),
            now: Utc.with_ymd_and_hms(2025, 1, 2, 9, 0, 0).unwrap(),
        }
    }

    pub fn store(&self) -> &MemoryStore {
        &self.state.store
    }

    pub fn hours_ago(&self, hours: i64) -> DateTime<Utc> {
        self.now - Duration::hours(hours)
    }

    /// Seed a memory state for an item.
    pub fn seed_state(&self, item_id: &str, next_due_at: DateTime<Utc>, lapses: u32) {
        let state = ItemMemoryState {
            ease_factor: 2.5,
            interval_days: 1,
            repetitions: 1,
            next_due_at,
            last_reviewed_at: Some(next_due_at - Duration::days(1)),
            lapses,
        };
        self.store()
            .upsert_item_state(&ItemStateRecord {
                profile_id: PROFILE_ID.to_string(),
                item_id: item_id.to_string(),
                state,
                strength: 0.0,
            })
            .expect("Failed to seed item state");
    }

    /// Current memory state for an item.
    pub fn state_of(&self, item_id: &str) -> ItemMemoryState {
        self.store()
            .item_state(PROFILE_ID, item_id)
            .expect("store error")
            .unwrap_or_else(|| panic!("no state for {item_id}"))
            .state
    }
}
