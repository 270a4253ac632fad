//! Storage collaborator for the practice service

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{Result, ServiceError};
use crate::models::*;

/// Records the practice flows read and write.
///
/// Implementations own persistence; the service only sequences the calls.
pub trait PracticeStore: Send + Sync {
    // === Content ===

    fn exercise(&self, exercise_id: &str) -> Result<Option<ExerciseRecord>>;

    fn lesson(&self, lesson_id: &str) -> Result<Option<LessonRecord>>;

    /// Exercises linked to any of `item_ids`, ordered by difficulty then id.
    fn exercises_for_items(&self, item_ids: &[String]) -> Result<Vec<ExerciseRecord>>;

    // === Profiles ===

    fn profile(&self, profile_id: &str) -> Result<Option<ProfileRecord>>;

    fn update_profile(&self, profile: &ProfileRecord) -> Result<()>;

    /// Add XP and minutes to the profile's activity for the UTC day of `at`.
    fn add_daily_activity(
        &self,
        profile_id: &str,
        at: DateTime<Utc>,
        xp_earned: u32,
        minutes: u32,
    ) -> Result<()>;

    /// Most recent days of activity, oldest first.
    fn recent_activity(&self, profile_id: &str, days: usize) -> Result<Vec<DailyActivity>>;

    // === Item state ===

    fn item_state(&self, profile_id: &str, item_id: &str) -> Result<Option<ItemStateRecord>>;

    fn item_states(&self, profile_id: &str) -> Result<Vec<ItemStateRecord>>;

    fn upsert_item_state(&self, record: &ItemStateRecord) -> Result<()>;

    // === History ===

    fn insert_attempt(&self, attempt: &AttemptRecord) -> Result<()>;

    /// Insert or replace the completion for (profile, lesson); returns its id.
    fn upsert_lesson_completion(&self, completion: &LessonCompletion) -> Result<Uuid>;
}

#[derive(Default)]
struct MemoryData {
    lessons: HashMap<String, LessonRecord>,
    exercises: HashMap<String, ExerciseRecord>,
    profiles: HashMap<String, ProfileRecord>,
    item_states: HashMap<(String, String), ItemStateRecord>,
    activity: HashMap<String, Vec<DailyActivity>>,
    attempts: Vec<AttemptRecord>,
    completions: HashMap<(String, String), LessonCompletion>,
}

/// In-memory store for embedding and tests
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<MemoryData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryData>> {
        self.data
            .read()
            .map_err(|_| ServiceError::Store("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryData>> {
        self.data
            .write()
            .map_err(|_| ServiceError::Store("memory store lock poisoned".to_string()))
    }

    /// Add a lesson and index its exercises.
    pub fn insert_lesson(&self, lesson: LessonRecord) -> Result<()> {
        let mut data = self.write()?;
        for exercise in &lesson.exercises {
            data.exercises.insert(exercise.id.clone(), exercise.clone());
        }
        data.lessons.insert(lesson.id.clone(), lesson);
        Ok(())
    }

    /// Add an exercise that belongs to no lesson (review-only content).
    pub fn insert_exercise(&self, exercise: ExerciseRecord) -> Result<()> {
        self.write()?.exercises.insert(exercise.id.clone(), exercise);
        Ok(())
    }

    pub fn insert_profile(&self, profile: ProfileRecord) -> Result<()> {
        self.write()?.profiles.insert(profile.id.clone(), profile);
        Ok(())
    }

    /// Attempts recorded for a profile, in insertion order.
    pub fn attempts(&self, profile_id: &str) -> Result<Vec<AttemptRecord>> {
        Ok(self
            .read()?
            .attempts
            .iter()
            .filter(|a| a.profile_id == profile_id)
            .cloned()
            .collect())
    }
}

impl PracticeStore for MemoryStore {
    fn exercise(&self, exercise_id: &str) -> Result<Option<ExerciseRecord>> {
        Ok(self.read()?.exercises.get(exercise_id).cloned())
    }

    fn lesson(&self, lesson_id: &str) -> Result<Option<LessonRecord>> {
        Ok(self.read()?.lessons.get(lesson_id).cloned())
    }

    fn exercises_for_items(&self, item_ids: &[String]) -> Result<Vec<ExerciseRecord>> {
        let data = self.read()?;
        let mut found: Vec<ExerciseRecord> = data
            .exercises
            .values()
            .filter(|e| e.references_any(item_ids))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.difficulty.cmp(&b.difficulty).then_with(|| a.id.cmp(&b.id)));
        Ok(found)
    }

    fn profile(&self, profile_id: &str) -> Result<Option<ProfileRecord>> {
        Ok(self.read()?.profiles.get(profile_id).cloned())
    }

    fn update_profile(&self, profile: &ProfileRecord) -> Result<()> {
        let mut data = self.write()?;
        match data.profiles.get_mut(&profile.id) {
            Some(existing) => {
                *existing = profile.clone();
                Ok(())
            }
            None => Err(ServiceError::NotFound(format!("Profile {}", profile.id))),
        }
    }

    fn add_daily_activity(
        &self,
        profile_id: &str,
        at: DateTime<Utc>,
        xp_earned: u32,
        minutes: u32,
    ) -> Result<()> {
        let date = at.date_naive();
        let mut data = self.write()?;
        let days = data.activity.entry(profile_id.to_string()).or_default();
        match days.iter_mut().find(|d| d.date == date) {
            Some(day) => {
                day.xp_earned = day.xp_earned.saturating_add(xp_earned);
                day.minutes = day.minutes.saturating_add(minutes);
            }
            None => {
                days.push(DailyActivity {
                    date,
                    xp_earned,
                    minutes,
                });
                days.sort_by_key(|d| d.date);
            }
        }
        Ok(())
    }

    fn recent_activity(&self, profile_id: &str, days: usize) -> Result<Vec<DailyActivity>> {
        let data = self.read()?;
        let all = data.activity.get(profile_id).map(Vec::as_slice).unwrap_or_default();
        Ok(all[all.len().saturating_sub(days)..].to_vec())
    }

    fn item_state(&self, profile_id: &str, item_id: &str) -> Result<Option<ItemStateRecord>> {
        let key = (profile_id.to_string(), item_id.to_string());
        Ok(self.read()?.item_states.get(&key).cloned())
    }

    fn item_states(&self, profile_id: &str) -> Result<Vec<ItemStateRecord>> {
        let data = self.read()?;
        let mut states: Vec<ItemStateRecord> = data
            .item_states
            .values()
            .filter(|r| r.profile_id == profile_id)
            .cloned()
            .collect();
        states.sort_by(|a, b| a.item_id.cmp(&b.item_id));
        Ok(states)
    }

    fn upsert_item_state(&self, record: &ItemStateRecord) -> Result<()> {
        let key = (record.profile_id.clone(), record.item_id.clone());
        self.write()?.item_states.insert(key, record.clone());
        Ok(())
    }

    fn insert_attempt(&self, attempt: &AttemptRecord) -> Result<()> {
        self.write()?.attempts.push(attempt.clone());
        Ok(())
    }

    fn upsert_lesson_completion(&self, completion: &LessonCompletion) -> Result<Uuid> {
        let key = (completion.profile_id.clone(), completion.lesson_id.clone());
        let mut data = self.write()?;
        let id = match data.completions.get(&key) {
            Some(existing) => existing.id,
            None => completion.id,
        };
        data.completions.insert(
            key,
            LessonCompletion {
                id,
                ..completion.clone()
            },
        );
        Ok(id)
    }
}
