//! Workout commands: the active split's current day, its session, and
//! finishing a workout to advance the rotation

use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;

use crate::catalog::rep_range_label;
use crate::db::AppState;
use crate::history::{
  find_open_session, finish_session, insert_session, load_day_exercises, load_split,
  load_split_day, load_split_days, load_user_info, session_set_counts,
};
use crate::models::{Exercise, Split, SplitDay, UserInfo, WorkoutSession};
use crate::session::is_exercise_complete;
use crate::split::{next_day, resolve_day};

/// ---------------------------------------------------------------------------
/// Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ExerciseProgress {
  pub exercise: Exercise,
  pub reps_label: String,
  pub sets_logged: i64,
  pub completed: bool,
}

/// The day to train and how far the open session has got
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutStatus {
  pub split: Split,
  pub day: SplitDay,
  pub session: Option<WorkoutSession>,
  pub exercises: Vec<ExerciseProgress>,
  /// First exercise whose working sets are not all logged yet
  pub current_exercise_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FinishedWorkout {
  pub session: WorkoutSession,
  pub next_day: i32,
  pub next_day_name: Option<String>,
}

struct ActiveDay {
  info: UserInfo,
  split: Split,
  days: Vec<SplitDay>,
  day: SplitDay,
}

/// ---------------------------------------------------------------------------
/// Helpers
/// ---------------------------------------------------------------------------

async fn active_day(state: &AppState, user_id: &str) -> Result<ActiveDay, String> {
  let info = load_user_info(&state.db, user_id)
    .await
    .map_err(|e| format!("Failed to load user info: {}", e))?;

  let split_id = info
    .active_split
    .ok_or_else(|| "No active split. Pick a split first.".to_string())?;

  let split = load_split(&state.db, user_id, split_id)
    .await
    .map_err(|e| format!("Failed to load split: {}", e))?;

  let days = load_split_days(&state.db, split.id)
    .await
    .map_err(|e| format!("Failed to load split days: {}", e))?;

  let day = resolve_day(&days, info.current_day)
    .cloned()
    .ok_or_else(|| format!("Split {} has no days", split.id))?;

  Ok(ActiveDay {
    info,
    split,
    days,
    day,
  })
}

/// Open session for a split day, starting one today if there is none
pub async fn ensure_session(
  state: &AppState,
  user_id: &str,
  split_day_id: i64,
) -> Result<WorkoutSession, String> {
  if let Some(session) = find_open_session(&state.db, user_id, split_day_id)
    .await
    .map_err(|e| format!("Failed to load session: {}", e))?
  {
    return Ok(session);
  }

  let day = load_split_day(&state.db, user_id, split_day_id)
    .await
    .map_err(|e| format!("Failed to load split day: {}", e))?;

  let session = insert_session(&state.db, user_id, &day, Utc::now().date_naive())
    .await
    .map_err(|e| format!("Failed to start session: {}", e))?;

  tracing::info!(session_id = session.id, day = day.day, "Started workout session");
  Ok(session)
}

/// Sets logged per exercise in a session; empty when there is no session
pub async fn logged_counts(
  state: &AppState,
  user_id: &str,
  session: Option<&WorkoutSession>,
) -> Result<HashMap<i64, i64>, String> {
  match session {
    Some(session) => session_set_counts(&state.db, user_id, session.id)
      .await
      .map_err(|e| format!("Failed to count session sets: {}", e)),
    None => Ok(HashMap::new()),
  }
}

async fn build_status(
  state: &AppState,
  user_id: &str,
  active: ActiveDay,
  session: Option<WorkoutSession>,
) -> Result<WorkoutStatus, String> {
  let exercises = load_day_exercises(&state.db, user_id, active.day.id)
    .await
    .map_err(|e| format!("Failed to load day exercises: {}", e))?;

  let counts = logged_counts(state, user_id, session.as_ref()).await?;

  let exercises: Vec<ExerciseProgress> = exercises
    .into_iter()
    .map(|exercise| {
      let sets_logged = counts.get(&exercise.id).copied().unwrap_or(0);
      let completed = is_exercise_complete(&exercise.target, usize::try_from(sets_logged).unwrap_or(0));
      ExerciseProgress {
        reps_label: rep_range_label(exercise.target.rep_range_start, exercise.target.rep_range_end),
        sets_logged,
        completed,
        exercise,
      }
    })
    .collect();

  let current_exercise_id = exercises
    .iter()
    .find(|p| !p.completed)
    .map(|p| p.exercise.id);

  Ok(WorkoutStatus {
    split: active.split,
    day: active.day,
    session,
    exercises,
    current_exercise_id,
  })
}

/// ---------------------------------------------------------------------------
/// Commands
/// ---------------------------------------------------------------------------

/// Current day of the active split, with the open session if any
pub async fn workout_status(state: &AppState, user_id: &str) -> Result<WorkoutStatus, String> {
  let active = active_day(state, user_id).await?;

  let session = find_open_session(&state.db, user_id, active.day.id)
    .await
    .map_err(|e| format!("Failed to load session: {}", e))?;

  build_status(state, user_id, active, session).await
}

/// Open (or resume) the session for the current day
pub async fn start_workout(state: &AppState, user_id: &str) -> Result<WorkoutStatus, String> {
  let active = active_day(state, user_id).await?;
  let session = ensure_session(state, user_id, active.day.id).await?;

  build_status(state, user_id, active, Some(session)).await
}

/// Complete the current day's session and advance to the next day, wrapping
/// to day 1 after the last one
pub async fn finish_workout(state: &AppState, user_id: &str) -> Result<FinishedWorkout, String> {
  let active = active_day(state, user_id).await?;

  let mut session = find_open_session(&state.db, user_id, active.day.id)
    .await
    .map_err(|e| format!("Failed to load session: {}", e))?
    .ok_or_else(|| "No workout in progress.".to_string())?;

  let next = next_day(
    active.info.current_day,
    active.split.days_per_week,
    active.days.len(),
  );
  let completed_at = Utc::now();

  let finished = finish_session(&state.db, user_id, session.id, completed_at, next)
    .await
    .map_err(|e| format!("Failed to finish workout: {}", e))?;
  if !finished {
    return Err("No workout in progress.".to_string());
  }
  session.completed_at = Some(completed_at);

  tracing::info!(session_id = session.id, next_day = next, "Finished workout");

  Ok(FinishedWorkout {
    session,
    next_day: next,
    next_day_name: active
      .days
      .iter()
      .find(|d| d.day == next)
      .map(|d| d.name.clone()),
  })
}
