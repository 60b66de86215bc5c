//! Exercise catalog commands

use crate::catalog::{parse_exercise_csv, rep_range_label, ExerciseDraft};
use crate::db::AppState;
use crate::history::{
  delete_exercise, insert_exercise, insert_exercises, load_exercise, load_exercises,
  load_split_day, next_order_index, update_exercise,
};
use crate::models::Exercise;
use serde::Serialize;

/// Text fields of an exercise as typed by the user
#[derive(Debug, Clone, Default)]
pub struct ExerciseFields {
  pub name: String,
  pub warmups: String,
  pub working: String,
  pub reps: String,
  pub rpe: String,
}

/// Partial edit; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct ExerciseEdit {
  pub name: Option<String>,
  pub warmups: Option<String>,
  pub working: Option<String>,
  pub reps: Option<String>,
  pub rpe: Option<String>,
  /// Move the exercise to the end of this split day's list
  pub split_day_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExerciseSummary {
  #[serde(flatten)]
  pub exercise: Exercise,
  pub reps_label: String,
}

impl From<Exercise> for ExerciseSummary {
  fn from(exercise: Exercise) -> Self {
    let reps_label = rep_range_label(exercise.target.rep_range_start, exercise.target.rep_range_end);
    Self {
      exercise,
      reps_label,
    }
  }
}

/// Reject split days the user does not own
async fn check_split_day(state: &AppState, user_id: &str, split_day_id: Option<i64>) -> Result<(), String> {
  if let Some(day_id) = split_day_id {
    load_split_day(&state.db, user_id, day_id)
      .await
      .map_err(|e| format!("Failed to load split day: {}", e))?;
  }
  Ok(())
}

/// Add one exercise at the end of a split day's list, or of the unassigned
/// exercises when `split_day_id` is `None`
pub async fn add_exercise(
  state: &AppState,
  user_id: &str,
  split_day_id: Option<i64>,
  fields: &ExerciseFields,
) -> Result<Exercise, String> {
  let draft = ExerciseDraft::from_fields(
    &fields.name,
    &fields.warmups,
    &fields.working,
    &fields.reps,
    &fields.rpe,
  )
  .map_err(|e| e.to_string())?;

  check_split_day(state, user_id, split_day_id).await?;

  let order_index = next_order_index(&state.db, user_id, split_day_id)
    .await
    .map_err(|e| format!("Failed to read exercise order: {}", e))?;

  let id = insert_exercise(&state.db, &draft.into_new_exercise(user_id, split_day_id, order_index))
    .await
    .map_err(|e| format!("Failed to add exercise: {}", e))?;

  let exercise = load_exercise(&state.db, user_id, id)
    .await
    .map_err(|e| format!("Failed to reload exercise: {}", e))?;

  tracing::info!(exercise_id = exercise.id, name = %exercise.name, "Added exercise");
  Ok(exercise)
}

/// Add every exercise in a pasted CSV block. Nothing is stored if any row is
/// bad or any insert fails.
pub async fn import_exercises(
  state: &AppState,
  user_id: &str,
  split_day_id: Option<i64>,
  csv_text: &str,
) -> Result<Vec<Exercise>, String> {
  let drafts = parse_exercise_csv(csv_text).map_err(|e| e.to_string())?;

  check_split_day(state, user_id, split_day_id).await?;

  let first_index = next_order_index(&state.db, user_id, split_day_id)
    .await
    .map_err(|e| format!("Failed to read exercise order: {}", e))?;

  let new_exercises: Vec<_> = (first_index..)
    .zip(drafts)
    .map(|(order_index, draft)| draft.into_new_exercise(user_id, split_day_id, order_index))
    .collect();

  let ids = insert_exercises(&state.db, &new_exercises)
    .await
    .map_err(|e| format!("Failed to import exercises: {}", e))?;

  let mut added = Vec::with_capacity(ids.len());
  for id in ids {
    let exercise = load_exercise(&state.db, user_id, id)
      .await
      .map_err(|e| format!("Failed to reload exercise: {}", e))?;
    added.push(exercise);
  }

  tracing::info!(count = added.len(), "Imported exercises");
  Ok(added)
}

pub async fn list_exercises(state: &AppState, user_id: &str) -> Result<Vec<ExerciseSummary>, String> {
  let exercises = load_exercises(&state.db, user_id)
    .await
    .map_err(|e| format!("Failed to fetch exercises: {}", e))?;

  Ok(exercises.into_iter().map(ExerciseSummary::from).collect())
}

/// Apply a partial edit, validating the merged fields like a new exercise
pub async fn edit_exercise(
  state: &AppState,
  user_id: &str,
  exercise_id: i64,
  edit: ExerciseEdit,
) -> Result<Exercise, String> {
  let current = load_exercise(&state.db, user_id, exercise_id)
    .await
    .map_err(|e| format!("Failed to load exercise: {}", e))?;

  let t = &current.target;
  let keep_range = edit.reps.is_none();

  let mut draft = ExerciseDraft::from_fields(
    edit.name.as_deref().unwrap_or(&current.name),
    &edit.warmups.unwrap_or_else(|| t.warmup_set_count.to_string()),
    &edit.working.unwrap_or_else(|| t.working_set_count.to_string()),
    edit.reps.as_deref().unwrap_or(""),
    &edit
      .rpe
      .unwrap_or_else(|| t.target_effort.map(|e| e.to_string()).unwrap_or_default()),
  )
  .map_err(|e| e.to_string())?;

  // Stored bounds are carried over as-is, including half-open ranges
  if keep_range {
    draft.target.rep_range_start = t.rep_range_start;
    draft.target.rep_range_end = t.rep_range_end;
  }

  let (split_day_id, order_index) = match edit.split_day_id {
    Some(day_id) if current.split_day_id != Some(day_id) => {
      check_split_day(state, user_id, Some(day_id)).await?;
      let order_index = next_order_index(&state.db, user_id, Some(day_id))
        .await
        .map_err(|e| format!("Failed to read exercise order: {}", e))?;
      (Some(day_id), order_index)
    }
    _ => (current.split_day_id, current.order_index),
  };

  let updated = Exercise {
    name: draft.name,
    target: draft.target,
    split_day_id,
    order_index,
    ..current
  };

  update_exercise(&state.db, &updated)
    .await
    .map_err(|e| format!("Failed to update exercise: {}", e))?;

  Ok(updated)
}

/// Remove an exercise and its logged sets
pub async fn remove_exercise(state: &AppState, user_id: &str, exercise_id: i64) -> Result<(), String> {
  let deleted = delete_exercise(&state.db, user_id, exercise_id)
    .await
    .map_err(|e| format!("Failed to delete exercise: {}", e))?;

  if !deleted {
    return Err(format!("Exercise not found: {}", exercise_id));
  }
  tracing::info!(exercise_id, "Removed exercise");
  Ok(())
}
