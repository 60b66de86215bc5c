pub mod exercise;
pub mod split;
pub mod workout;

use crate::catalog::rep_range_label;
use crate::db::AppState;
use crate::engine::build_recommendation;
use crate::history::{
  delete_set, fetch_all_sets, fetch_recent_sets, find_open_session, insert_sets, load_day_exercises,
  load_exercise,
};
use crate::models::{DailyBest, Exercise, Recommendation};
use crate::progress::daily_best;
use crate::session::{draft_rows, is_exercise_complete, parse_drafts, WorkingSetDraft};
use crate::split::next_exercise;
use chrono::Utc;
use serde::Serialize;
use workout::{ensure_session, logged_counts};

/// ---------------------------------------------------------------------------
/// Recommendation Commands
/// ---------------------------------------------------------------------------

/// What the lifter sees before starting an exercise
#[derive(Debug, Clone, Serialize)]
pub struct ExercisePlan {
  pub exercise: Exercise,
  pub reps_label: String,
  pub recommendation: Recommendation,
  pub working_sets: Vec<WorkingSetDraft>,
  /// Open session of the exercise's split day, if any
  pub session_id: Option<i64>,
  pub sets_logged: i64,
  pub completed: bool,
}

async fn build_plan(state: &AppState, user_id: &str, exercise: Exercise) -> Result<ExercisePlan, String> {
  let history = fetch_recent_sets(&state.db, user_id, exercise.id, state.config.history_window)
    .await
    .map_err(|e| format!("Failed to fetch history: {}", e))?;

  let recommendation = build_recommendation(&history, &exercise.target);

  let session = match exercise.split_day_id {
    Some(day_id) => find_open_session(&state.db, user_id, day_id)
      .await
      .map_err(|e| format!("Failed to load session: {}", e))?,
    None => None,
  };
  let counts = logged_counts(state, user_id, session.as_ref()).await?;
  let sets_logged = counts.get(&exercise.id).copied().unwrap_or(0);
  let completed = is_exercise_complete(&exercise.target, usize::try_from(sets_logged).unwrap_or(0));

  tracing::debug!(
    exercise_id = exercise.id,
    history_rows = history.len(),
    load = ?recommendation.working_set_load,
    "Built recommendation"
  );

  Ok(ExercisePlan {
    reps_label: rep_range_label(exercise.target.rep_range_start, exercise.target.rep_range_end),
    working_sets: draft_rows(&exercise.target),
    recommendation,
    session_id: session.map(|s| s.id),
    sets_logged,
    completed,
    exercise,
  })
}

/// Recommendation, warm-ups and blank working-set rows for one exercise
pub async fn get_recommendation(
  state: &AppState,
  user_id: &str,
  exercise_id: i64,
) -> Result<ExercisePlan, String> {
  let exercise = load_exercise(&state.db, user_id, exercise_id)
    .await
    .map_err(|e| format!("Failed to load exercise: {}", e))?;

  build_plan(state, user_id, exercise).await
}

/// ---------------------------------------------------------------------------
/// Logging Commands
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct LogResult {
  pub inserted_ids: Vec<i64>,
  /// Plan recomputed with the new sets included
  pub plan: ExercisePlan,
  /// Exercise after this one on its split day; `None` after the last
  pub next_exercise_id: Option<i64>,
}

/// Log filled-in working sets, then recompute the plan.
///
/// Sets of an exercise placed on a split day go into that day's open
/// session, which is started if needed.
pub async fn log_sets(
  state: &AppState,
  user_id: &str,
  exercise_id: i64,
  drafts: &[WorkingSetDraft],
) -> Result<LogResult, String> {
  let exercise = load_exercise(&state.db, user_id, exercise_id)
    .await
    .map_err(|e| format!("Failed to load exercise: {}", e))?;

  let sets = parse_drafts(drafts, Utc::now()).map_err(|e| e.to_string())?;

  let session_id = match exercise.split_day_id {
    Some(day_id) => Some(ensure_session(state, user_id, day_id).await?.id),
    None => None,
  };

  let inserted_ids = insert_sets(&state.db, user_id, exercise_id, session_id, &sets)
    .await
    .map_err(|e| format!("Failed to log sets: {}", e))?;

  tracing::info!(exercise_id, count = inserted_ids.len(), "Logged working sets");

  let next_exercise_id = match exercise.split_day_id {
    Some(day_id) => {
      let day_exercises = load_day_exercises(&state.db, user_id, day_id)
        .await
        .map_err(|e| format!("Failed to load day exercises: {}", e))?;
      next_exercise(&day_exercises, exercise.id).map(|e| e.id)
    }
    None => None,
  };

  let plan = build_plan(state, user_id, exercise).await?;
  Ok(LogResult {
    inserted_ids,
    plan,
    next_exercise_id,
  })
}

/// Remove one logged set
pub async fn delete_logged_set(state: &AppState, user_id: &str, set_id: i64) -> Result<(), String> {
  let deleted = delete_set(&state.db, user_id, set_id)
    .await
    .map_err(|e| format!("Failed to delete set: {}", e))?;

  if !deleted {
    return Err(format!("Set not found: {}", set_id));
  }
  Ok(())
}

/// ---------------------------------------------------------------------------
/// Progress Commands
/// ---------------------------------------------------------------------------

/// Best estimated max per day for one exercise
pub async fn get_progress(
  state: &AppState,
  user_id: &str,
  exercise_id: i64,
) -> Result<Vec<DailyBest>, String> {
  // Unknown exercise is an error, not an empty series
  load_exercise(&state.db, user_id, exercise_id)
    .await
    .map_err(|e| format!("Failed to load exercise: {}", e))?;

  let sets = fetch_all_sets(&state.db, user_id, exercise_id)
    .await
    .map_err(|e| format!("Failed to fetch history: {}", e))?;

  Ok(daily_best(&sets))
}
