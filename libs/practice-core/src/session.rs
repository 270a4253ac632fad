//! Session composition: orders a lesson by complexity and injects reviews.

use tracing::{debug, warn};

use crate::algorithm::DueItem;
use crate::config::{
    PracticeSettings, COMPREHENSION_PRODUCTION_CAP, REVIEW_INJECTION_STRIDE,
    SESSION_MAX_EXERCISES, SESSION_MIN_EXERCISES,
};
use crate::types::{ExerciseTier, SessionExercise};

/// Builds practice sessions from a lesson pool and a review pool.
#[derive(Debug, Clone)]
pub struct SessionComposer {
    pub default_exercise_count: usize,
    pub comprehension_phase_units: u32,
}

impl Default for SessionComposer {
    fn default() -> Self {
        Self::from_settings(&PracticeSettings::default())
    }
}

impl SessionComposer {
    pub fn from_settings(settings: &PracticeSettings) -> Self {
        Self {
            default_exercise_count: settings.session_default_exercise_count,
            comprehension_phase_units: settings.comprehension_phase_units,
        }
    }

    /// Compose the ordered exercise list for one session.
    ///
    /// `due_items` must already be in review priority order (see
    /// [`crate::algorithm::select_due`]); `due_exercise_pool` holds candidate
    /// exercises referencing those items.
    pub fn compose<T: AsRef<str>>(
        &self,
        lesson_exercises: &[SessionExercise],
        due_items: &[DueItem<T>],
        due_exercise_pool: &[SessionExercise],
        unit_order: u32,
    ) -> Vec<SessionExercise> {
        let base = self.order_by_complexity(lesson_exercises, unit_order);
        let reviews = pick_review_exercises(due_items, due_exercise_pool);
        let merged = inject_reviews(base, reviews);

        let target = self.target_count(merged.len());
        debug!(unit_order, merged = merged.len(), target, "composed session");
        merged.into_iter().take(target).collect()
    }

    /// Recognition, then guided production, then speaking. Early units keep
    /// only the first few production and speaking exercises.
    pub fn order_by_complexity(
        &self,
        exercises: &[SessionExercise],
        unit_order: u32,
    ) -> Vec<SessionExercise> {
        let mut ordered: Vec<SessionExercise> =
            in_tier(exercises, ExerciseTier::Recognition).collect();
        let production = in_tier(exercises, ExerciseTier::GuidedProduction)
            .chain(in_tier(exercises, ExerciseTier::Speaking));

        if unit_order <= self.comprehension_phase_units {
            ordered.extend(production.take(COMPREHENSION_PRODUCTION_CAP));
        } else {
            ordered.extend(production);
        }
        ordered
    }

    /// `clamp(default, clamp(merged_len, MIN, MAX), MAX)`.
    pub fn target_count(&self, merged_len: usize) -> usize {
        let minimum = merged_len.clamp(SESSION_MIN_EXERCISES, SESSION_MAX_EXERCISES);
        self.default_exercise_count.max(minimum).min(SESSION_MAX_EXERCISES)
    }
}

fn in_tier(
    exercises: &[SessionExercise],
    tier: ExerciseTier,
) -> impl Iterator<Item = SessionExercise> + '_ {
    exercises
        .iter()
        .filter(move |e| e.exercise_type.tier() == tier)
        .cloned()
}

/// One exercise per due item, preferring recognition exercises. Items with no
/// candidate in the pool are skipped.
pub fn pick_review_exercises<T: AsRef<str>>(
    due_items: &[DueItem<T>],
    pool: &[SessionExercise],
) -> Vec<SessionExercise> {
    let mut picked = Vec::new();
    for due in due_items {
        let item_id = due.item_id.as_ref();
        let candidates: Vec<&SessionExercise> =
            pool.iter().filter(|e| e.references_item(item_id)).collect();

        let chosen = candidates
            .iter()
            .find(|e| e.exercise_type.is_recognition())
            .or_else(|| candidates.first());

        match chosen {
            Some(exercise) => picked.push(exercise.as_review()),
            None => warn!(item_id, "no review exercise for due item"),
        }
    }
    picked
}

/// Splice a review exercise in after every third base exercise, then append
/// whatever reviews are left.
pub fn inject_reviews(
    base: Vec<SessionExercise>,
    reviews: Vec<SessionExercise>,
) -> Vec<SessionExercise> {
    let mut output = Vec::with_capacity(base.len() + reviews.len());
    let mut reviews = reviews.into_iter();

    for (index, exercise) in base.into_iter().enumerate() {
        output.push(exercise);
        if (index + 1) % REVIEW_INJECTION_STRIDE == 0 {
            if let Some(review) = reviews.next() {
                output.push(review);
            }
        }
    }
    output.extend(reviews);
    output
}

/// [`SessionComposer::compose`] with default settings.
pub fn compose_session<T: AsRef<str>>(
    lesson_exercises: &[SessionExercise],
    due_items: &[DueItem<T>],
    due_exercise_pool: &[SessionExercise],
    unit_order: u32,
) -> Vec<SessionExercise> {
    SessionComposer::default().compose(lesson_exercises, due_items, due_exercise_pool, unit_order)
}
