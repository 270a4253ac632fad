//! Core types shared by the grader, the scheduler and the session composer.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::INITIAL_EASE_FACTOR;
use crate::error::CoreError;

/// Outcome category of one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptResult {
    Exact,
    NearMiss,
    Incorrect,
}

impl AttemptResult {
    /// Ordinal used when reducing verdicts: exact=2, near_miss=1, incorrect=0.
    pub fn ordinal(self) -> u8 {
        match self {
            Self::Exact => 2,
            Self::NearMiss => 1,
            Self::Incorrect => 0,
        }
    }

    /// Anything but `incorrect` is credited to the learner.
    pub fn counts_as_correct(self) -> bool {
        !matches!(self, Self::Incorrect)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::NearMiss => "near_miss",
            Self::Incorrect => "incorrect",
        }
    }
}

impl fmt::Display for AttemptResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttemptResult {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(Self::Exact),
            "near_miss" => Ok(Self::NearMiss),
            "incorrect" => Ok(Self::Incorrect),
            other => Err(CoreError::UnknownResult(other.to_string())),
        }
    }
}

/// Machine-readable reason attached to a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    ExactMatch,
    AccentOnly,
    TokenSwap,
    EditDistance,
    AsrSubsequence,
    NoMatch,
}

impl ReasonCode {
    /// The result category each reason code implies.
    pub fn result(self) -> AttemptResult {
        match self {
            Self::ExactMatch => AttemptResult::Exact,
            Self::AccentOnly | Self::TokenSwap | Self::EditDistance | Self::AsrSubsequence => {
                AttemptResult::NearMiss
            }
            Self::NoMatch => AttemptResult::Incorrect,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExactMatch => "exact_match",
            Self::AccentOnly => "accent_only",
            Self::TokenSwap => "token_swap",
            Self::EditDistance => "edit_distance",
            Self::AsrSubsequence => "asr_subsequence",
            Self::NoMatch => "no_match",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReasonCode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact_match" => Ok(Self::ExactMatch),
            "accent_only" => Ok(Self::AccentOnly),
            "token_swap" => Ok(Self::TokenSwap),
            "edit_distance" => Ok(Self::EditDistance),
            "asr_subsequence" => Ok(Self::AsrSubsequence),
            "no_match" => Ok(Self::NoMatch),
            other => Err(CoreError::UnknownReasonCode(other.to_string())),
        }
    }
}

/// Normalized forms and measurements computed while grading one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictMetrics {
    pub normalized_input: String,
    pub normalized_target: String,
    pub normalized_input_no_diacritics: String,
    pub normalized_target_no_diacritics: String,
    /// Levenshtein distance between the diacritic-free forms.
    pub distance: usize,
    /// Largest distance still forgiven as a near miss.
    pub threshold: usize,
    pub token_swap: bool,
    pub asr_subsequence: bool,
}

/// Result of classifying one answer against its acceptable targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptVerdict {
    pub result: AttemptResult,
    pub reason_code: ReasonCode,
    /// The target phrase this verdict was computed against.
    pub best_match: String,
    pub metrics: VerdictMetrics,
}

/// Per-(learner, item) scheduling record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemMemoryState {
    pub ease_factor: f64,
    /// 0 means the item has never been reviewed.
    pub interval_days: u32,
    pub repetitions: u32,
    pub next_due_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub lapses: u32,
}

impl ItemMemoryState {
    /// State for an item the learner has never attempted, due immediately.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            ease_factor: INITIAL_EASE_FACTOR,
            interval_days: 0,
            repetitions: 0,
            next_due_at: now,
            last_reviewed_at: None,
            lapses: 0,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_due_at <= now
    }
}

/// Complexity tier used when ordering a lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseTier {
    Recognition,
    GuidedProduction,
    Speaking,
}

/// Closed set of exercise kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    ListenPickImage,
    ImagePickWord,
    ListenType,
    TileOrder,
    SpeakRepeat,
    PhraseComplete,
}

impl ExerciseType {
    pub fn tier(self) -> ExerciseTier {
        match self {
            Self::ListenPickImage | Self::ImagePickWord => ExerciseTier::Recognition,
            Self::ListenType | Self::TileOrder | Self::PhraseComplete => {
                ExerciseTier::GuidedProduction
            }
            Self::SpeakRepeat => ExerciseTier::Speaking,
        }
    }

    pub fn is_recognition(self) -> bool {
        self.tier() == ExerciseTier::Recognition
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListenPickImage => "listen_pick_image",
            Self::ImagePickWord => "image_pick_word",
            Self::ListenType => "listen_type",
            Self::TileOrder => "tile_order",
            Self::SpeakRepeat => "speak_repeat",
            Self::PhraseComplete => "phrase_complete",
        }
    }
}

impl FromStr for ExerciseType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "listen_pick_image" => Ok(Self::ListenPickImage),
            "image_pick_word" => Ok(Self::ImagePickWord),
            "listen_type" => Ok(Self::ListenType),
            "tile_order" => Ok(Self::TileOrder),
            "speak_repeat" => Ok(Self::SpeakRepeat),
            "phrase_complete" => Ok(Self::PhraseComplete),
            other => Err(CoreError::UnknownExerciseType(other.to_string())),
        }
    }
}

/// Sensory channel an exercise works through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseModality {
    Listen,
    Speak,
    Type,
    Mixed,
}

impl Default for ExerciseModality {
    fn default() -> Self {
        Self::Mixed
    }
}

impl FromStr for ExerciseModality {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "listen" => Ok(Self::Listen),
            "speak" => Ok(Self::Speak),
            "type" => Ok(Self::Type),
            "mixed" => Ok(Self::Mixed),
            other => Err(CoreError::UnknownModality(other.to_string())),
        }
    }
}

/// How the learner produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerMode {
    Typed,
    Choice,
    Asr,
    Speak,
}

impl Default for AnswerMode {
    fn default() -> Self {
        Self::Typed
    }
}

impl AnswerMode {
    /// Spoken answers arrive through a recognizer and get the ASR leniency.
    pub fn is_asr(self) -> bool {
        matches!(self, Self::Asr | Self::Speak)
    }
}

impl FromStr for AnswerMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "typed" => Ok(Self::Typed),
            "choice" => Ok(Self::Choice),
            "asr" => Ok(Self::Asr),
            "speak" => Ok(Self::Speak),
            other => Err(CoreError::UnknownAnswerMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackRate {
    Slow,
    Normal,
}

/// Structured prompt data authored for an exercise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExerciseData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default)]
    pub answers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_choices: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playback_rate: Option<PlaybackRate>,
}

/// One unit of practice content within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionExercise {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson_id: Option<String>,
    #[serde(rename = "type")]
    pub exercise_type: ExerciseType,
    #[serde(default)]
    pub modality: ExerciseModality,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_text: Option<String>,
    #[serde(default)]
    pub difficulty: u32,
    #[serde(default)]
    pub data: ExerciseData,
    #[serde(default)]
    pub item_ids: Vec<String>,
    #[serde(default)]
    pub pattern_ids: Vec<String>,
    /// Injected from the review pool rather than native to the lesson.
    #[serde(default)]
    pub is_review: bool,
}

impl SessionExercise {
    pub fn references_item(&self, item_id: &str) -> bool {
        self.item_ids.iter().any(|id| id == item_id)
    }

    /// Copy of this exercise flagged as review material.
    pub fn as_review(&self) -> Self {
        Self {
            is_review: true,
            ..self.clone()
        }
    }
}
