//! Stored records and request/response types

pub mod exercise;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use practice_core::types::{
    AnswerMode, AttemptResult, ExerciseModality, ExerciseType, ItemMemoryState, ReasonCode,
    SessionExercise, VerdictMetrics,
};
pub use practice_core::Streak;

use self::exercise::parse_exercise_data;

// === Stored Records ===

/// Vocabulary item linked to an exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemLink {
    pub item_id: String,
    /// Canonical target-language rendering of the item
    pub target_text: String,
}

/// Exercise as authored, with its raw JSON data blob
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseRecord {
    pub id: String,
    pub lesson_id: Option<String>,
    pub exercise_type: ExerciseType,
    pub modality: ExerciseModality,
    pub prompt_text: Option<String>,
    pub difficulty: u32,
    pub data: String,
    pub items: Vec<ItemLink>,
    pub pattern_ids: Vec<String>,
}

impl ExerciseRecord {
    /// Convert to the session representation
    pub fn to_session_exercise(&self, is_review: bool) -> SessionExercise {
        SessionExercise {
            id: self.id.clone(),
            lesson_id: self.lesson_id.clone(),
            exercise_type: self.exercise_type,
            modality: self.modality,
            prompt_text: self.prompt_text.clone(),
            difficulty: self.difficulty,
            data: parse_exercise_data(&self.data),
            item_ids: self.items.iter().map(|link| link.item_id.clone()).collect(),
            pattern_ids: self.pattern_ids.clone(),
            is_review,
        }
    }

    pub fn references_any(&self, item_ids: &[String]) -> bool {
        self.items.iter().any(|link| item_ids.contains(&link.item_id))
    }
}

/// Lesson with its exercises in authored order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonRecord {
    pub id: String,
    pub title: String,
    pub unit_order: u32,
    pub unit_title: String,
    pub exercises: Vec<ExerciseRecord>,
}

/// Learner profile counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub id: String,
    pub display_name: String,
    pub xp_total: u32,
    pub streak: Streak,
    pub last_active_at: Option<DateTime<Utc>>,
}

impl ProfileRecord {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            xp_total: 0,
            streak: Streak::default(),
            last_active_at: None,
        }
    }
}

/// Per-profile, per-item scheduling row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStateRecord {
    pub profile_id: String,
    pub item_id: String,
    #[serde(flatten)]
    pub state: ItemMemoryState,
    pub strength: f64,
}

/// Audit record of one graded attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub id: Uuid,
    pub profile_id: String,
    pub exercise_id: String,
    pub item_id: Option<String>,
    pub session_id: Option<String>,
    pub result: AttemptResult,
    pub submitted_answer: String,
    pub normalized_answer: String,
    pub reason_code: ReasonCode,
    pub best_match: String,
    /// Verdict metrics serialized as JSON
    pub metrics: String,
    pub created_at: DateTime<Utc>,
}

/// XP and minutes practised on one UTC day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub xp_earned: u32,
    pub minutes: u32,
}

/// Latest completion of a lesson by a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonCompletion {
    pub id: Uuid,
    pub profile_id: String,
    pub lesson_id: String,
    pub accuracy: f64,
    pub xp_earned: u32,
    pub completed_at: DateTime<Utc>,
}

// === Requests and Responses ===

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAttemptRequest {
    pub profile_id: String,
    pub exercise_id: String,
    pub answer: String,
    #[serde(default)]
    pub mode: AnswerMode,
    pub session_id: Option<String>,
    #[serde(default = "default_in_session")]
    pub in_session: bool,
}

fn default_in_session() -> bool {
    true
}

#[derive(Debug, Clone, Serialize)]
pub struct AttemptOutcome {
    pub result: AttemptResult,
    pub reason_code: ReasonCode,
    pub best_match: String,
    pub counts_as_correct: bool,
    pub xp_awarded: u32,
    pub correct_answer: String,
    pub replay_text: String,
    pub tip: String,
    pub metrics: VerdictMetrics,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StartSessionRequest {
    pub profile_id: String,
    pub lesson_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LessonSummary {
    pub id: String,
    pub title: String,
    pub unit_order: u32,
    pub unit_title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedSession {
    pub session_id: Uuid,
    pub lesson: LessonSummary,
    pub exercises: Vec<SessionExercise>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompleteSessionRequest {
    pub profile_id: String,
    pub lesson_id: String,
    pub accuracy: f64,
    pub xp_earned: u32,
    #[serde(default)]
    pub strengthened_item_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionCompletion {
    pub completion_id: Uuid,
    pub xp_earned: u32,
    pub accuracy: f64,
    pub strengthened_items: Vec<String>,
    pub due_reviews: usize,
    pub speaking_practice_recommended: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemStrength {
    pub item_id: String,
    pub strength: f64,
    pub next_due_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressSummary {
    pub streak_current: u32,
    pub streak_best: u32,
    pub xp_total: u32,
    pub due_reviews: usize,
    pub sapling_growth: u32,
    pub strengths: Vec<ItemStrength>,
    pub recent_activity: Vec<DailyActivity>,
}
