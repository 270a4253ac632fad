//! Profile activity and progress reporting

use chrono::{DateTime, Utc};

use practice_core::progress::sapling_growth;

use crate::error::{Result, ServiceError};
use crate::models::*;
use crate::store::PracticeStore;
use crate::AppState;

/// Days of activity included in a progress summary
const RECENT_ACTIVITY_DAYS: usize = 14;
/// Items listed in a progress summary
const TOP_STRENGTHS: usize = 8;

/// Credit XP and minutes to a profile and advance its streak.
///
/// Unknown profiles are ignored, matching guest sessions that never created
/// a profile record.
pub fn apply_profile_activity<S: PracticeStore + ?Sized>(
    store: &S,
    profile_id: &str,
    xp_earned: u32,
    minutes: u32,
    now: DateTime<Utc>,
) -> Result<()> {
    let Some(mut profile) = store.profile(profile_id)? else {
        tracing::debug!("No profile {}, skipping activity", profile_id);
        return Ok(());
    };

    store.add_daily_activity(profile_id, now, xp_earned, minutes)?;

    profile.streak = profile.streak.record_activity(profile.last_active_at, now);
    profile.xp_total = profile.xp_total.saturating_add(xp_earned);
    profile.last_active_at = Some(now);
    store.update_profile(&profile)
}

/// Streak, XP, due reviews and strongest items for a profile.
pub fn progress_summary<S: PracticeStore>(
    state: &AppState<S>,
    profile_id: &str,
    now: DateTime<Utc>,
) -> Result<ProgressSummary> {
    let profile = state
        .store
        .profile(profile_id)?
        .ok_or_else(|| ServiceError::NotFound(format!("Profile {}", profile_id)))?;

    let mut states = state.store.item_states(profile_id)?;
    let due_reviews = states.iter().filter(|r| r.state.is_due(now)).count();

    states.sort_by(|a, b| b.strength.total_cmp(&a.strength));
    let strengths = states
        .into_iter()
        .take(TOP_STRENGTHS)
        .map(|r| ItemStrength {
            item_id: r.item_id,
            strength: r.strength,
            next_due_at: r.state.next_due_at,
        })
        .collect();

    Ok(ProgressSummary {
        streak_current: profile.streak.current,
        streak_best: profile.streak.best,
        xp_total: profile.xp_total,
        due_reviews,
        sapling_growth: sapling_growth(profile.xp_total),
        strengths,
        recent_activity: state.store.recent_activity(profile_id, RECENT_ACTIVITY_DAYS)?,
    })
}
