//! Session start and completion

use chrono::{DateTime, Utc};
use uuid::Uuid;

use practice_core::algorithm::{select_due, to_due_item, DueItem};
use practice_core::progress::speaking_practice_recommended;

use crate::error::{Result, ServiceError};
use crate::models::*;
use crate::store::PracticeStore;
use crate::AppState;

/// Build a practice session for a lesson, with due reviews injected.
pub fn start_session<S: PracticeStore>(
    state: &AppState<S>,
    request: StartSessionRequest,
    now: DateTime<Utc>,
) -> Result<GeneratedSession> {
    if state.store.profile(&request.profile_id)?.is_none() {
        return Err(ServiceError::NotFound(format!("Profile {}", request.profile_id)));
    }
    let lesson = state
        .store
        .lesson(&request.lesson_id)?
        .ok_or_else(|| ServiceError::NotFound(format!("Lesson {}", request.lesson_id)))?;

    let candidates: Vec<DueItem> = state
        .store
        .item_states(&request.profile_id)?
        .into_iter()
        .map(|record| to_due_item(record.item_id, &record.state))
        .collect();
    let due_items = select_due(&candidates, now, state.config.settings.review_injection_limit);

    let due_ids: Vec<String> = due_items.iter().map(|d| d.item_id.clone()).collect();
    let review_pool: Vec<SessionExercise> = if due_ids.is_empty() {
        Vec::new()
    } else {
        state
            .store
            .exercises_for_items(&due_ids)?
            .iter()
            .map(|e| e.to_session_exercise(true))
            .collect()
    };

    let lesson_exercises: Vec<SessionExercise> = lesson
        .exercises
        .iter()
        .map(|e| e.to_session_exercise(false))
        .collect();

    let exercises = state.composer().compose(
        &lesson_exercises,
        &due_items,
        &review_pool,
        lesson.unit_order,
    );

    let session_id = Uuid::new_v4();
    tracing::info!(
        "Started session {} for lesson {}: {} exercises, {} due items",
        session_id,
        lesson.id,
        exercises.len(),
        due_items.len()
    );

    Ok(GeneratedSession {
        session_id,
        lesson: LessonSummary {
            id: lesson.id,
            title: lesson.title,
            unit_order: lesson.unit_order,
            unit_title: lesson.unit_title,
        },
        exercises,
    })
}

/// Record a finished lesson and report what comes next.
pub fn complete_session<S: PracticeStore>(
    state: &AppState<S>,
    request: CompleteSessionRequest,
    now: DateTime<Utc>,
) -> Result<SessionCompletion> {
    if !(0.0..=1.0).contains(&request.accuracy) {
        return Err(ServiceError::BadRequest(format!(
            "accuracy must be within 0..=1, got {}",
            request.accuracy
        )));
    }

    let completion_id = state.store.upsert_lesson_completion(&LessonCompletion {
        id: Uuid::new_v4(),
        profile_id: request.profile_id.clone(),
        lesson_id: request.lesson_id.clone(),
        accuracy: request.accuracy,
        xp_earned: request.xp_earned,
        completed_at: now,
    })?;

    let due_reviews = state
        .store
        .item_states(&request.profile_id)?
        .iter()
        .filter(|r| r.state.is_due(now))
        .count();

    tracing::info!(
        "Completed lesson {} for profile {} at accuracy {:.2}",
        request.lesson_id,
        request.profile_id,
        request.accuracy
    );

    Ok(SessionCompletion {
        completion_id,
        xp_earned: request.xp_earned,
        accuracy: request.accuracy,
        strengthened_items: request.strengthened_item_ids,
        due_reviews,
        speaking_practice_recommended: speaking_practice_recommended(request.accuracy),
    })
}
