//! Attempt submission

use chrono::{DateTime, Utc};
use uuid::Uuid;

use practice_core::algorithm::ReviewScheduler;
use practice_core::matching::{classify, collect_targets, ClassifyOptions};
use practice_core::normalize::normalize;
use practice_core::progress::{compute_strength, tip_for_reason, xp_for_result};

use crate::error::{Result, ServiceError};
use crate::models::exercise::parse_exercise_data;
use crate::models::*;
use crate::services::progress::apply_profile_activity;
use crate::store::PracticeStore;
use crate::AppState;

/// Minutes of practice credited per attempt
const MINUTES_PER_ATTEMPT: u32 = 1;

/// Grade an answer, advance every linked item, and record the attempt.
pub fn submit_attempt<S: PracticeStore>(
    state: &AppState<S>,
    request: SubmitAttemptRequest,
    now: DateTime<Utc>,
) -> Result<AttemptOutcome> {
    if request.answer.trim().is_empty() {
        return Err(ServiceError::BadRequest("answer must not be empty".to_string()));
    }

    let exercise = state
        .store
        .exercise(&request.exercise_id)?
        .ok_or_else(|| ServiceError::NotFound(format!("Exercise {}", request.exercise_id)))?;

    let data = parse_exercise_data(&exercise.data);
    let item_phrases: Vec<String> = exercise.items.iter().map(|l| l.target_text.clone()).collect();
    let targets = collect_targets(&data.answers, &item_phrases);
    if targets.is_empty() {
        tracing::warn!("Exercise {} has no target phrases", exercise.id);
    }

    let verdict = classify(
        &request.answer,
        &targets,
        ClassifyOptions {
            is_asr: request.mode.is_asr(),
        },
    );
    let xp_awarded = xp_for_result(verdict.result);

    // Record the attempt
    let attempt = AttemptRecord {
        id: Uuid::new_v4(),
        profile_id: request.profile_id.clone(),
        exercise_id: exercise.id.clone(),
        item_id: exercise.items.first().map(|l| l.item_id.clone()),
        session_id: request.session_id.clone(),
        result: verdict.result,
        submitted_answer: request.answer.clone(),
        normalized_answer: normalize(&request.answer),
        reason_code: verdict.reason_code,
        best_match: verdict.best_match.clone(),
        metrics: serde_json::to_string(&verdict.metrics)?,
        created_at: now,
    };
    state.store.insert_attempt(&attempt)?;

    // Advance every linked item
    let scheduler = state.scheduler();
    for link in &exercise.items {
        let current = state
            .store
            .item_state(&request.profile_id, &link.item_id)?
            .map(|record| record.state)
            .unwrap_or_else(|| scheduler.initial_state(now));

        let next = scheduler.advance(&current, verdict.result, now, request.in_session);
        let strength = compute_strength(next.repetitions, next.lapses, next.ease_factor);

        state.store.upsert_item_state(&ItemStateRecord {
            profile_id: request.profile_id.clone(),
            item_id: link.item_id.clone(),
            state: next,
            strength,
        })?;
    }

    apply_profile_activity(
        state.store.as_ref(),
        &request.profile_id,
        xp_awarded,
        MINUTES_PER_ATTEMPT,
        now,
    )?;

    tracing::info!(
        "Recorded attempt {} on {}: {} ({})",
        attempt.id,
        exercise.id,
        verdict.result,
        verdict.reason_code
    );

    let correct_answer = targets.first().cloned().unwrap_or_default();
    let replay_text = data.audio_text.unwrap_or_else(|| correct_answer.clone());

    Ok(AttemptOutcome {
        result: verdict.result,
        reason_code: verdict.reason_code,
        best_match: verdict.best_match,
        counts_as_correct: verdict.result.counts_as_correct(),
        xp_awarded,
        correct_answer,
        replay_text,
        tip: tip_for_reason(verdict.reason_code).to_string(),
        metrics: verdict.metrics,
    })
}
