use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A named training rotation of `days_per_week` numbered days
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Split {
  pub id: i64,
  pub user_id: String,
  pub name: String,
  pub days_per_week: i32,
}

/// One day of a split, numbered from 1
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SplitDay {
  pub id: i64,
  pub split_id: i64,
  pub day: i32,
  pub name: String,
}

/// Which split a user trains and where they are in its rotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserInfo {
  pub user_id: String,
  pub active_split: Option<i64>,
  pub current_day: i32,
}

impl UserInfo {
  /// State of a user who has never picked a split
  pub fn new(user_id: &str) -> Self {
    Self {
      user_id: user_id.to_string(),
      active_split: None,
      current_day: 1,
    }
  }
}

/// A workout of one split day. Open while `completed_at` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WorkoutSession {
  pub id: i64,
  pub user_id: String,
  pub split_id: i64,
  pub split_day_id: i64,
  pub day: i32,
  pub started_at: NaiveDate,
  pub completed_at: Option<DateTime<Utc>>,
}

impl WorkoutSession {
  pub fn is_open(&self) -> bool {
    self.completed_at.is_none()
  }
}
