//! Split commands: create, inspect, rename days, pick the active split, delete

use serde::Serialize;

use crate::db::AppState;
use crate::history::{
  delete_split, insert_split, load_day_exercises, load_split, load_split_days, load_splits,
  load_user_info, rename_split_day, set_active_split,
};
use crate::models::{Split, SplitDay, UserInfo};
use crate::split::{validate_day_name, SplitDraft};

use super::exercise::ExerciseSummary;

#[derive(Debug, Clone, Serialize)]
pub struct SplitListing {
  #[serde(flatten)]
  pub split: Split,
  pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayDetail {
  #[serde(flatten)]
  pub day: SplitDay,
  pub exercises: Vec<ExerciseSummary>,
}

/// A split with its days and each day's exercises
#[derive(Debug, Clone, Serialize)]
pub struct SplitDetail {
  #[serde(flatten)]
  pub split: Split,
  pub active: bool,
  pub days: Vec<DayDetail>,
}

/// Create a split with days named "Day 1".."Day N"
pub async fn create_split(
  state: &AppState,
  user_id: &str,
  name: &str,
  days_per_week: &str,
) -> Result<SplitDetail, String> {
  let draft = SplitDraft::from_fields(name, days_per_week).map_err(|e| e.to_string())?;

  let split_id = insert_split(&state.db, user_id, &draft)
    .await
    .map_err(|e| format!("Failed to create split: {}", e))?;

  tracing::info!(split_id, days = draft.days_per_week, "Created split");
  show_split(state, user_id, split_id).await
}

pub async fn list_splits(state: &AppState, user_id: &str) -> Result<Vec<SplitListing>, String> {
  let info = load_user_info(&state.db, user_id)
    .await
    .map_err(|e| format!("Failed to load user info: {}", e))?;

  let splits = load_splits(&state.db, user_id)
    .await
    .map_err(|e| format!("Failed to fetch splits: {}", e))?;

  Ok(
    splits
      .into_iter()
      .map(|split| SplitListing {
        active: info.active_split == Some(split.id),
        split,
      })
      .collect(),
  )
}

pub async fn show_split(state: &AppState, user_id: &str, split_id: i64) -> Result<SplitDetail, String> {
  let split = load_split(&state.db, user_id, split_id)
    .await
    .map_err(|e| format!("Failed to load split: {}", e))?;

  let info = load_user_info(&state.db, user_id)
    .await
    .map_err(|e| format!("Failed to load user info: {}", e))?;

  let days = load_split_days(&state.db, split.id)
    .await
    .map_err(|e| format!("Failed to load split days: {}", e))?;

  let mut details = Vec::with_capacity(days.len());
  for day in days {
    let exercises = load_day_exercises(&state.db, user_id, day.id)
      .await
      .map_err(|e| format!("Failed to load day exercises: {}", e))?;
    details.push(DayDetail {
      day,
      exercises: exercises.into_iter().map(ExerciseSummary::from).collect(),
    });
  }

  Ok(SplitDetail {
    active: info.active_split == Some(split.id),
    split,
    days: details,
  })
}

pub async fn rename_day(
  state: &AppState,
  user_id: &str,
  split_id: i64,
  day: i32,
  name: &str,
) -> Result<SplitDetail, String> {
  let name = validate_day_name(name).map_err(|e| e.to_string())?;

  let renamed = rename_split_day(&state.db, user_id, split_id, day, &name)
    .await
    .map_err(|e| format!("Failed to rename day: {}", e))?;
  if !renamed {
    return Err(format!("Split {} has no day {}", split_id, day));
  }

  show_split(state, user_id, split_id).await
}

/// Make a split active, starting its rotation at day 1
pub async fn use_split(state: &AppState, user_id: &str, split_id: i64) -> Result<UserInfo, String> {
  load_split(&state.db, user_id, split_id)
    .await
    .map_err(|e| format!("Failed to load split: {}", e))?;

  set_active_split(&state.db, user_id, Some(split_id))
    .await
    .map_err(|e| format!("Failed to update active split: {}", e))?;

  tracing::info!(split_id, "Active split updated");

  load_user_info(&state.db, user_id)
    .await
    .map_err(|e| format!("Failed to load user info: {}", e))
}

/// Delete a split with its days, exercises, logged sets and sessions
pub async fn remove_split(state: &AppState, user_id: &str, split_id: i64) -> Result<(), String> {
  let deleted = delete_split(&state.db, user_id, split_id)
    .await
    .map_err(|e| format!("Failed to delete split: {}", e))?;

  if !deleted {
    return Err(format!("Split not found: {}", split_id));
  }
  tracing::info!(split_id, "Deleted split");
  Ok(())
}
