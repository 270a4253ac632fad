//! Adaptive practice engine shared by the tutoring services.
//!
//! Provides:
//! - Text normalization for answer comparison
//! - Attempt grading with accent, word-order, typo and speech leniency
//! - SM-2 style review scheduling and due-item selection
//! - Session composition with review injection
//! - Progress policy (XP, item strength, streaks)
//!
//! Everything here is pure: callers pass `now` explicitly and persist the
//! returned values themselves.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod matching;
pub mod normalize;
pub mod progress;
pub mod session;
pub mod types;

pub use algorithm::{advance, select_due, to_due_item, DueItem, ReviewScheduler, Sm2};
pub use config::{PracticeSettings, PracticeSettingsOverride};
pub use error::{CoreError, Result};
pub use matching::{classify, collect_targets, levenshtein_distance, ClassifyOptions};
pub use normalize::{normalize, normalize_no_diacritics, strip_diacritics};
pub use progress::{compute_strength, tip_for_reason, xp_for_result, Streak};
pub use session::{compose_session, SessionComposer};
pub use types::{
    AnswerMode, AttemptResult, AttemptVerdict, ExerciseData, ExerciseModality, ExerciseTier,
    ExerciseType, ItemMemoryState, PlaybackRate, ReasonCode, SessionExercise, VerdictMetrics,
};
