use serde::{Deserialize, Serialize};

/// Lowest and highest perceived-effort (RPE) levels an exercise may target
pub const MIN_EFFORT: i32 = 6;
pub const MAX_EFFORT: i32 = 10;

/// Per-exercise prescription the recommendation is computed against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseTarget {
  pub rep_range_start: Option<i32>,
  pub rep_range_end: Option<i32>,
  pub target_effort: Option<i32>,
  pub warmup_set_count: i32,
  pub working_set_count: i32,
}

impl Default for ExerciseTarget {
  fn default() -> Self {
    Self {
      rep_range_start: None,
      rep_range_end: None,
      target_effort: None,
      warmup_set_count: 0,
      working_set_count: 1,
    }
  }
}

impl ExerciseTarget {
  /// Normalize user-authored values into a valid target.
  ///
  /// Non-positive bounds and efforts outside 6-10 become absent, missing or
  /// negative warm-up counts become 0, missing or non-positive working counts
  /// become 1. Returns `None` when both bounds are present and `start > end`.
  pub fn normalized(
    rep_range_start: Option<i64>,
    rep_range_end: Option<i64>,
    target_effort: Option<i64>,
    warmup_set_count: Option<i64>,
    working_set_count: Option<i64>,
  ) -> Option<Self> {
    let positive = |v: Option<i64>| v.filter(|n| *n > 0).and_then(|n| i32::try_from(n).ok());

    let start = positive(rep_range_start);
    let end = positive(rep_range_end);
    if let (Some(a), Some(b)) = (start, end) {
      if a > b {
        return None;
      }
    }

    let target_effort = target_effort
      .and_then(|n| i32::try_from(n).ok())
      .filter(|n| (MIN_EFFORT..=MAX_EFFORT).contains(n));

    Some(Self {
      rep_range_start: start,
      rep_range_end: end,
      target_effort,
      warmup_set_count: positive(warmup_set_count).unwrap_or(0),
      working_set_count: positive(working_set_count).unwrap_or(1),
    })
  }
}

/// Catalog entry: a named exercise owned by a user, optionally placed on a
/// split day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
  pub id: i64,
  pub user_id: String,
  pub split_day_id: Option<i64>,
  pub name: String,
  pub order_index: i64,
  #[serde(flatten)]
  pub target: ExerciseTarget,
}

/// Exercise not yet stored (no id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExercise {
  pub user_id: String,
  pub split_day_id: Option<i64>,
  pub name: String,
  pub order_index: i64,
  #[serde(flatten)]
  pub target: ExerciseTarget,
}

/// Raw `exercises` row as stored
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExerciseRow {
  pub id: i64,
  pub user_id: String,
  pub split_day_id: Option<i64>,
  pub name: String,
  pub rep_range_start: Option<i64>,
  pub rep_range_end: Option<i64>,
  pub rpe: Option<i64>,
  pub warmup_sets: Option<i64>,
  pub working_sets: Option<i64>,
  pub order_index: i64,
}

impl ExerciseRow {
  pub fn into_exercise(self) -> Option<Exercise> {
    let name = self.name.trim();
    if name.is_empty() {
      return None;
    }
    let target = ExerciseTarget::normalized(
      self.rep_range_start,
      self.rep_range_end,
      self.rpe,
      self.warmup_sets,
      self.working_sets,
    )?;
    Some(Exercise {
      id: self.id,
      user_id: self.user_id,
      split_day_id: self.split_day_id,
      name: name.to_string(),
      order_index: self.order_index,
      target,
    })
  }
}
