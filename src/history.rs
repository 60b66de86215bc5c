//! SQLite-backed lift history, exercise catalog, splits and workout sessions
//!
//! Rows are read loosely and validated on the way out: a malformed lift row
//! is treated as absent history, a malformed exercise row is skipped.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::models::{
  Exercise, ExerciseRow, LiftRow, LoggedSet, NewExercise, Split, SplitDay, UserInfo,
  WorkoutSession,
};
use crate::split::SplitDraft;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Exercise not found: {0}")]
  ExerciseNotFound(i64),

  #[error("Exercise {0} has an invalid prescription")]
  InvalidExercise(i64),

  #[error("Split not found: {0}")]
  SplitNotFound(i64),

  #[error("Split day not found: {0}")]
  SplitDayNotFound(i64),
}

impl Serialize for StoreError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Lift History
/// ---------------------------------------------------------------------------

fn into_valid_sets(rows: Vec<LiftRow>) -> Vec<LoggedSet> {
  let total = rows.len();
  let sets: Vec<LoggedSet> = rows.into_iter().filter_map(LiftRow::into_logged_set).collect();
  if sets.len() < total {
    tracing::debug!(dropped = total - sets.len(), "Skipped malformed lift rows");
  }
  sets
}

/// The `window` heaviest valid sets for one exercise
pub async fn fetch_recent_sets(
  pool: &SqlitePool,
  user_id: &str,
  exercise_id: i64,
  window: u32,
) -> Result<Vec<LoggedSet>, StoreError> {
  let rows = sqlx::query_as::<_, LiftRow>(
    r#"
    SELECT id, weight, reps, created_at
    FROM lifts
    WHERE user_id = ?1 AND exercise_id = ?2
    ORDER BY weight DESC
    LIMIT ?3
    "#,
  )
  .bind(user_id)
  .bind(exercise_id)
  .bind(i64::from(window))
  .fetch_all(pool)
  .await?;

  Ok(into_valid_sets(rows))
}

/// Every valid set for one exercise, oldest first
pub async fn fetch_all_sets(
  pool: &SqlitePool,
  user_id: &str,
  exercise_id: i64,
) -> Result<Vec<LoggedSet>, StoreError> {
  let rows = sqlx::query_as::<_, LiftRow>(
    r#"
    SELECT id, weight, reps, created_at
    FROM lifts
    WHERE user_id = ?1 AND exercise_id = ?2
    ORDER BY created_at ASC, id ASC
    "#,
  )
  .bind(user_id)
  .bind(exercise_id)
  .fetch_all(pool)
  .await?;

  Ok(into_valid_sets(rows))
}

/// Sets logged in one session, per exercise id
pub async fn session_set_counts(
  pool: &SqlitePool,
  user_id: &str,
  session_id: i64,
) -> Result<HashMap<i64, i64>, StoreError> {
  let rows: Vec<(i64, i64)> = sqlx::query_as(
    r#"
    SELECT exercise_id, COUNT(*)
    FROM lifts
    WHERE user_id = ?1 AND session_id = ?2
    GROUP BY exercise_id
    "#,
  )
  .bind(user_id)
  .bind(session_id)
  .fetch_all(pool)
  .await?;

  Ok(rows.into_iter().collect())
}

/// Insert sets in one transaction, returning their row ids
pub async fn insert_sets(
  pool: &SqlitePool,
  user_id: &str,
  exercise_id: i64,
  session_id: Option<i64>,
  sets: &[LoggedSet],
) -> Result<Vec<i64>, StoreError> {
  let mut tx = pool.begin().await?;
  let mut ids = Vec::with_capacity(sets.len());

  for set in sets {
    let result = sqlx::query(
      r#"
      INSERT INTO lifts (user_id, exercise_id, session_id, weight, reps, created_at)
      VALUES (?1, ?2, ?3, ?4, ?5, ?6)
      "#,
    )
    .bind(user_id)
    .bind(exercise_id)
    .bind(session_id)
    .bind(set.weight)
    .bind(i64::from(set.reps))
    .bind(set.recorded_at.to_rfc3339())
    .execute(&mut *tx)
    .await?;

    ids.push(result.last_insert_rowid());
  }

  tx.commit().await?;
  Ok(ids)
}

/// Delete one logged set. Returns false when nothing matched.
pub async fn delete_set(pool: &SqlitePool, user_id: &str, set_id: i64) -> Result<bool, StoreError> {
  let result = sqlx::query("DELETE FROM lifts WHERE id = ?1 AND user_id = ?2")
    .bind(set_id)
    .bind(user_id)
    .execute(pool)
    .await?;

  Ok(result.rows_affected() > 0)
}

/// ---------------------------------------------------------------------------
/// Exercise Catalog
/// ---------------------------------------------------------------------------

const EXERCISE_COLUMNS: &str = "id, user_id, split_day_id, name, rep_range_start, rep_range_end, \
   rpe, warmup_sets, working_sets, order_index";

fn into_valid_exercises(rows: Vec<ExerciseRow>) -> Vec<Exercise> {
  let mut exercises = Vec::with_capacity(rows.len());
  for row in rows {
    let id = row.id;
    match row.into_exercise() {
      Some(ex) => exercises.push(ex),
      None => tracing::warn!(exercise_id = id, "Skipping exercise with invalid prescription"),
    }
  }
  exercises
}

/// All valid exercises for a user in display order
pub async fn load_exercises(pool: &SqlitePool, user_id: &str) -> Result<Vec<Exercise>, StoreError> {
  let rows = sqlx::query_as::<_, ExerciseRow>(&format!(
    "SELECT {} FROM exercises WHERE user_id = ?1 ORDER BY order_index ASC, id ASC",
    EXERCISE_COLUMNS
  ))
  .bind(user_id)
  .fetch_all(pool)
  .await?;

  Ok(into_valid_exercises(rows))
}

/// Valid exercises placed on one split day, in workout order
pub async fn load_day_exercises(
  pool: &SqlitePool,
  user_id: &str,
  split_day_id: i64,
) -> Result<Vec<Exercise>, StoreError> {
  let rows = sqlx::query_as::<_, ExerciseRow>(&format!(
    "SELECT {} FROM exercises WHERE user_id = ?1 AND split_day_id = ?2 \
     ORDER BY order_index ASC, id ASC",
    EXERCISE_COLUMNS
  ))
  .bind(user_id)
  .bind(split_day_id)
  .fetch_all(pool)
  .await?;

  Ok(into_valid_exercises(rows))
}

/// Load a single exercise owned by `user_id`
pub async fn load_exercise(
  pool: &SqlitePool,
  user_id: &str,
  exercise_id: i64,
) -> Result<Exercise, StoreError> {
  let row = sqlx::query_as::<_, ExerciseRow>(&format!(
    "SELECT {} FROM exercises WHERE id = ?1 AND user_id = ?2",
    EXERCISE_COLUMNS
  ))
  .bind(exercise_id)
  .bind(user_id)
  .fetch_optional(pool)
  .await?
  .ok_or(StoreError::ExerciseNotFound(exercise_id))?;

  row
    .into_exercise()
    .ok_or(StoreError::InvalidExercise(exercise_id))
}

/// Next free position at the end of a split day's list, or of the user's
/// unassigned exercises when `split_day_id` is `None`
pub async fn next_order_index(
  pool: &SqlitePool,
  user_id: &str,
  split_day_id: Option<i64>,
) -> Result<i64, StoreError> {
  let (next,): (i64,) = sqlx::query_as(
    "SELECT COALESCE(MAX(order_index), 0) + 1 FROM exercises \
     WHERE user_id = ?1 AND split_day_id IS ?2",
  )
  .bind(user_id)
  .bind(split_day_id)
  .fetch_one(pool)
  .await?;

  Ok(next)
}

async fn insert_exercise_with<'e, E>(executor: E, ex: &NewExercise) -> Result<i64, StoreError>
where
  E: sqlx::SqliteExecutor<'e>,
{
  let result = sqlx::query(
    r#"
    INSERT INTO exercises (
      user_id, split_day_id, name, rep_range_start, rep_range_end, rpe,
      warmup_sets, working_sets, order_index
    )
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
    "#,
  )
  .bind(&ex.user_id)
  .bind(ex.split_day_id)
  .bind(&ex.name)
  .bind(ex.target.rep_range_start)
  .bind(ex.target.rep_range_end)
  .bind(ex.target.target_effort)
  .bind(ex.target.warmup_set_count)
  .bind(ex.target.working_set_count)
  .bind(ex.order_index)
  .execute(executor)
  .await?;

  Ok(result.last_insert_rowid())
}

pub async fn insert_exercise(pool: &SqlitePool, ex: &NewExercise) -> Result<i64, StoreError> {
  insert_exercise_with(pool, ex).await
}

/// Insert several exercises in one transaction; none are stored on failure
pub async fn insert_exercises(
  pool: &SqlitePool,
  exercises: &[NewExercise],
) -> Result<Vec<i64>, StoreError> {
  let mut tx = pool.begin().await?;
  let mut ids = Vec::with_capacity(exercises.len());

  for ex in exercises {
    ids.push(insert_exercise_with(&mut *tx, ex).await?);
  }

  tx.commit().await?;
  Ok(ids)
}

/// Overwrite a stored exercise
pub async fn update_exercise(pool: &SqlitePool, ex: &Exercise) -> Result<(), StoreError> {
  let result = sqlx::query(
    r#"
    UPDATE exercises
    SET name = ?1,
        rep_range_start = ?2,
        rep_range_end = ?3,
        rpe = ?4,
        warmup_sets = ?5,
        working_sets = ?6,
        order_index = ?7,
        split_day_id = ?8
    WHERE id = ?9 AND user_id = ?10
    "#,
  )
  .bind(&ex.name)
  .bind(ex.target.rep_range_start)
  .bind(ex.target.rep_range_end)
  .bind(ex.target.target_effort)
  .bind(ex.target.warmup_set_count)
  .bind(ex.target.working_set_count)
  .bind(ex.order_index)
  .bind(ex.split_day_id)
  .bind(ex.id)
  .bind(&ex.user_id)
  .execute(pool)
  .await?;

  if result.rows_affected() == 0 {
    return Err(StoreError::ExerciseNotFound(ex.id));
  }
  Ok(())
}

/// Delete an exercise and its logged sets. Returns false when nothing matched.
pub async fn delete_exercise(
  pool: &SqlitePool,
  user_id: &str,
  exercise_id: i64,
) -> Result<bool, StoreError> {
  let mut tx = pool.begin().await?;

  sqlx::query("DELETE FROM lifts WHERE exercise_id = ?1 AND user_id = ?2")
    .bind(exercise_id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

  let result = sqlx::query("DELETE FROM exercises WHERE id = ?1 AND user_id = ?2")
    .bind(exercise_id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

  tx.commit().await?;
  Ok(result.rows_affected() > 0)
}

/// ---------------------------------------------------------------------------
/// Splits
/// ---------------------------------------------------------------------------

/// Store a split together with its numbered days
pub async fn insert_split(
  pool: &SqlitePool,
  user_id: &str,
  draft: &SplitDraft,
) -> Result<i64, StoreError> {
  let mut tx = pool.begin().await?;

  let split_id = sqlx::query("INSERT INTO splits (user_id, name, days_per_week) VALUES (?1, ?2, ?3)")
    .bind(user_id)
    .bind(&draft.name)
    .bind(draft.days_per_week)
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

  for (day, name) in (1_i64..).zip(draft.day_names()) {
    sqlx::query("INSERT INTO split_days (split_id, day, name) VALUES (?1, ?2, ?3)")
      .bind(split_id)
      .bind(day)
      .bind(name)
      .execute(&mut *tx)
      .await?;
  }

  tx.commit().await?;
  Ok(split_id)
}

pub async fn load_splits(pool: &SqlitePool, user_id: &str) -> Result<Vec<Split>, StoreError> {
  let splits = sqlx::query_as::<_, Split>(
    "SELECT id, user_id, name, days_per_week FROM splits WHERE user_id = ?1 ORDER BY id ASC",
  )
  .bind(user_id)
  .fetch_all(pool)
  .await?;

  Ok(splits)
}

pub async fn load_split(pool: &SqlitePool, user_id: &str, split_id: i64) -> Result<Split, StoreError> {
  sqlx::query_as::<_, Split>(
    "SELECT id, user_id, name, days_per_week FROM splits WHERE id = ?1 AND user_id = ?2",
  )
  .bind(split_id)
  .bind(user_id)
  .fetch_optional(pool)
  .await?
  .ok_or(StoreError::SplitNotFound(split_id))
}

/// Days of a split ordered by day number
pub async fn load_split_days(pool: &SqlitePool, split_id: i64) -> Result<Vec<SplitDay>, StoreError> {
  let days = sqlx::query_as::<_, SplitDay>(
    "SELECT id, split_id, day, name FROM split_days WHERE split_id = ?1 ORDER BY day ASC",
  )
  .bind(split_id)
  .fetch_all(pool)
  .await?;

  Ok(days)
}

/// A split day, provided its split belongs to `user_id`
pub async fn load_split_day(
  pool: &SqlitePool,
  user_id: &str,
  split_day_id: i64,
) -> Result<SplitDay, StoreError> {
  sqlx::query_as::<_, SplitDay>(
    r#"
    SELECT d.id, d.split_id, d.day, d.name
    FROM split_days d
    JOIN splits s ON s.id = d.split_id
    WHERE d.id = ?1 AND s.user_id = ?2
    "#,
  )
  .bind(split_day_id)
  .bind(user_id)
  .fetch_optional(pool)
  .await?
  .ok_or(StoreError::SplitDayNotFound(split_day_id))
}

/// Rename day number `day` of a split. Returns false when nothing matched.
pub async fn rename_split_day(
  pool: &SqlitePool,
  user_id: &str,
  split_id: i64,
  day: i32,
  name: &str,
) -> Result<bool, StoreError> {
  let result = sqlx::query(
    r#"
    UPDATE split_days
    SET name = ?1
    WHERE split_id = ?2 AND day = ?3
      AND split_id IN (SELECT id FROM splits WHERE user_id = ?4)
    "#,
  )
  .bind(name)
  .bind(split_id)
  .bind(day)
  .bind(user_id)
  .execute(pool)
  .await?;

  Ok(result.rows_affected() > 0)
}

/// Delete a split with its days, their exercises and logged sets, and its
/// sessions. Returns false when the user owns no such split.
pub async fn delete_split(pool: &SqlitePool, user_id: &str, split_id: i64) -> Result<bool, StoreError> {
  let mut tx = pool.begin().await?;

  let (owned,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM splits WHERE id = ?1 AND user_id = ?2")
    .bind(split_id)
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;
  if owned == 0 {
    return Ok(false);
  }

  let statements = [
    "DELETE FROM lifts WHERE exercise_id IN (
       SELECT e.id FROM exercises e
       JOIN split_days d ON d.id = e.split_day_id
       WHERE d.split_id = ?1
     )",
    "DELETE FROM exercises WHERE split_day_id IN (SELECT id FROM split_days WHERE split_id = ?1)",
    "UPDATE lifts SET session_id = NULL WHERE session_id IN (SELECT id FROM sessions WHERE split_id = ?1)",
    "DELETE FROM sessions WHERE split_id = ?1",
    "UPDATE user_info SET active_split = NULL, current_day = 1 WHERE active_split = ?1",
    "DELETE FROM split_days WHERE split_id = ?1",
    "DELETE FROM splits WHERE id = ?1",
  ];
  for sql in statements {
    sqlx::query(sql).bind(split_id).execute(&mut *tx).await?;
  }

  tx.commit().await?;
  Ok(true)
}

/// ---------------------------------------------------------------------------
/// Active Split & Rotation
/// ---------------------------------------------------------------------------

pub async fn load_user_info(pool: &SqlitePool, user_id: &str) -> Result<UserInfo, StoreError> {
  let info = sqlx::query_as::<_, UserInfo>(
    "SELECT user_id, active_split, current_day FROM user_info WHERE user_id = ?1",
  )
  .bind(user_id)
  .fetch_optional(pool)
  .await?;

  Ok(info.unwrap_or_else(|| UserInfo::new(user_id)))
}

/// Make `split_id` the active split (or clear it) and restart at day 1
pub async fn set_active_split(
  pool: &SqlitePool,
  user_id: &str,
  split_id: Option<i64>,
) -> Result<(), StoreError> {
  sqlx::query(
    r#"
    INSERT INTO user_info (user_id, active_split, current_day)
    VALUES (?1, ?2, 1)
    ON CONFLICT(user_id) DO UPDATE SET active_split = excluded.active_split, current_day = 1
    "#,
  )
  .bind(user_id)
  .bind(split_id)
  .execute(pool)
  .await?;

  Ok(())
}

/// ---------------------------------------------------------------------------
/// Workout Sessions
/// ---------------------------------------------------------------------------

const SESSION_COLUMNS: &str = "id, user_id, split_id, split_day_id, day, started_at, completed_at";

/// Latest unfinished session for a split day
pub async fn find_open_session(
  pool: &SqlitePool,
  user_id: &str,
  split_day_id: i64,
) -> Result<Option<WorkoutSession>, StoreError> {
  let session = sqlx::query_as::<_, WorkoutSession>(&format!(
    "SELECT {} FROM sessions \
     WHERE user_id = ?1 AND split_day_id = ?2 AND completed_at IS NULL \
     ORDER BY id DESC LIMIT 1",
    SESSION_COLUMNS
  ))
  .bind(user_id)
  .bind(split_day_id)
  .fetch_optional(pool)
  .await?;

  Ok(session)
}

pub async fn insert_session(
  pool: &SqlitePool,
  user_id: &str,
  day: &SplitDay,
  started_at: NaiveDate,
) -> Result<WorkoutSession, StoreError> {
  let result = sqlx::query(
    r#"
    INSERT INTO sessions (user_id, split_id, split_day_id, day, started_at)
    VALUES (?1, ?2, ?3, ?4, ?5)
    "#,
  )
  .bind(user_id)
  .bind(day.split_id)
  .bind(day.id)
  .bind(day.day)
  .bind(started_at.format("%Y-%m-%d").to_string())
  .execute(pool)
  .await?;

  Ok(WorkoutSession {
    id: result.last_insert_rowid(),
    user_id: user_id.to_string(),
    split_id: day.split_id,
    split_day_id: day.id,
    day: day.day,
    started_at,
    completed_at: None,
  })
}

/// Complete an open session and move the user's rotation to `next_day`, in
/// one transaction. Returns false when no open session matched.
pub async fn finish_session(
  pool: &SqlitePool,
  user_id: &str,
  session_id: i64,
  completed_at: DateTime<Utc>,
  next_day: i32,
) -> Result<bool, StoreError> {
  let mut tx = pool.begin().await?;

  let result = sqlx::query(
    r#"
    UPDATE sessions
    SET completed_at = ?1
    WHERE id = ?2 AND user_id = ?3 AND completed_at IS NULL
    "#,
  )
  .bind(completed_at.to_rfc3339())
  .bind(session_id)
  .bind(user_id)
  .execute(&mut *tx)
  .await?;
  if result.rows_affected() == 0 {
    return Ok(false);
  }

  sqlx::query(
    r#"
    INSERT INTO user_info (user_id, current_day)
    VALUES (?1, ?2)
    ON CONFLICT(user_id) DO UPDATE SET current_day = excluded.current_day
    "#,
  )
  .bind(user_id)
  .bind(next_day)
  .execute(&mut *tx)
  .await?;

  tx.commit().await?;
  Ok(true)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::ExerciseTarget;
  use crate::test_utils::{
    seed_exercise, seed_exercise_on, seed_raw_lift, seed_split, setup_test_db, teardown_test_db,
    test_target, TEST_USER,
  };
  use chrono::{TimeZone, Utc};

  #[tokio::test]
  async fn test_insert_and_fetch_sets() {
    let pool = setup_test_db().await;
    let exercise_id = seed_exercise(&pool, TEST_USER, "Squat", test_target()).await;

    let at = Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap();
    let sets = vec![
      LoggedSet::new(185.0, 5, at).unwrap(),
      LoggedSet::new(175.0, 8, at).unwrap(),
    ];
    let ids = insert_sets(&pool, TEST_USER, exercise_id, None, &sets)
      .await
      .expect("Should insert sets");
    assert_eq!(ids.len(), 2);

    let fetched = fetch_recent_sets(&pool, TEST_USER, exercise_id, 60)
      .await
      .expect("Should fetch sets");
    assert_eq!(fetched, sets);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_recent_window_keeps_heaviest_rows() {
    let pool = setup_test_db().await;
    let exercise_id = seed_exercise(&pool, TEST_USER, "Bench", test_target()).await;

    for weight in [100.0, 140.0, 120.0, 160.0] {
      seed_raw_lift(&pool, TEST_USER, exercise_id, Some(weight), Some(5), Some("2025-05-01")).await;
    }

    let fetched = fetch_recent_sets(&pool, TEST_USER, exercise_id, 2).await.unwrap();
    let weights: Vec<f64> = fetched.iter().map(|s| s.weight).collect();
    assert_eq!(weights, vec![160.0, 140.0]);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_malformed_rows_are_dropped() {
    let pool = setup_test_db().await;
    let exercise_id = seed_exercise(&pool, TEST_USER, "Row", test_target()).await;

    seed_raw_lift(&pool, TEST_USER, exercise_id, None, Some(5), Some("2025-05-01")).await;
    seed_raw_lift(&pool, TEST_USER, exercise_id, Some(-5.0), Some(5), Some("2025-05-01")).await;
    seed_raw_lift(&pool, TEST_USER, exercise_id, Some(95.0), Some(0), Some("2025-05-01")).await;
    seed_raw_lift(&pool, TEST_USER, exercise_id, Some(95.0), Some(8), None).await;
    seed_raw_lift(&pool, TEST_USER, exercise_id, Some(95.0), Some(8), Some("2025-05-02")).await;

    let fetched = fetch_all_sets(&pool, TEST_USER, exercise_id).await.unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].weight, 95.0);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_sets_are_scoped_to_user() {
    let pool = setup_test_db().await;
    let exercise_id = seed_exercise(&pool, TEST_USER, "Deadlift", test_target()).await;
    seed_raw_lift(&pool, "someone-else", exercise_id, Some(315.0), Some(3), Some("2025-05-01")).await;

    let fetched = fetch_recent_sets(&pool, TEST_USER, exercise_id, 60).await.unwrap();
    assert!(fetched.is_empty());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_session_set_counts() {
    let pool = setup_test_db().await;
    let (_, days) = seed_split(&pool, TEST_USER, "Full Body", 1).await;
    let squat = seed_exercise_on(&pool, TEST_USER, Some(days[0].id), "Squat", test_target()).await;
    let press = seed_exercise_on(&pool, TEST_USER, Some(days[0].id), "Press", test_target()).await;

    let session = insert_session(&pool, TEST_USER, &days[0], NaiveDate::from_ymd_opt(2025, 5, 3).unwrap())
      .await
      .unwrap();
    let at = Utc.with_ymd_and_hms(2025, 5, 3, 17, 45, 0).unwrap();
    let set = LoggedSet::new(95.0, 8, at).unwrap();
    insert_sets(&pool, TEST_USER, squat, Some(session.id), &vec![set.clone(); 2]).await.unwrap();
    insert_sets(&pool, TEST_USER, press, Some(session.id), &[set.clone()]).await.unwrap();
    // Outside the session
    insert_sets(&pool, TEST_USER, squat, None, &[set]).await.unwrap();

    let counts = session_set_counts(&pool, TEST_USER, session.id).await.unwrap();
    assert_eq!(counts.get(&squat), Some(&2));
    assert_eq!(counts.get(&press), Some(&1));
    assert!(session_set_counts(&pool, "someone-else", session.id).await.unwrap().is_empty());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_delete_set() {
    let pool = setup_test_db().await;
    let exercise_id = seed_exercise(&pool, TEST_USER, "Curl", test_target()).await;
    let ids = insert_sets(
      &pool,
      TEST_USER,
      exercise_id,
      None,
      &[LoggedSet::new(30.0, 12, Utc::now()).unwrap()],
    )
    .await
    .unwrap();

    assert!(!delete_set(&pool, "someone-else", ids[0]).await.unwrap());
    assert!(delete_set(&pool, TEST_USER, ids[0]).await.unwrap());
    assert!(!delete_set(&pool, TEST_USER, ids[0]).await.unwrap());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_exercise_roundtrip_and_order() {
    let pool = setup_test_db().await;

    assert_eq!(next_order_index(&pool, TEST_USER, None).await.unwrap(), 1);
    let squat = seed_exercise(&pool, TEST_USER, "Squat", test_target()).await;
    assert_eq!(next_order_index(&pool, TEST_USER, None).await.unwrap(), 2);
    seed_exercise(&pool, TEST_USER, "Bench", ExerciseTarget::default()).await;

    let list = load_exercises(&pool, TEST_USER).await.unwrap();
    let names: Vec<&str> = list.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Squat", "Bench"]);

    let mut loaded = load_exercise(&pool, TEST_USER, squat).await.unwrap();
    assert_eq!(loaded.target, test_target());

    loaded.target.target_effort = Some(9);
    loaded.name = "Back Squat".to_string();
    update_exercise(&pool, &loaded).await.expect("Should update exercise");

    let reloaded = load_exercise(&pool, TEST_USER, squat).await.unwrap();
    assert_eq!(reloaded.name, "Back Squat");
    assert_eq!(reloaded.target.target_effort, Some(9));

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_load_exercise_errors() {
    let pool = setup_test_db().await;

    let err = load_exercise(&pool, TEST_USER, 999).await.unwrap_err();
    assert!(matches!(err, StoreError::ExerciseNotFound(999)));

    sqlx::query(
      "INSERT INTO exercises (id, user_id, name, rep_range_start, rep_range_end, order_index) \
       VALUES (50, ?1, 'Broken', 12, 8, 1)",
    )
    .bind(TEST_USER)
    .execute(&pool)
    .await
    .unwrap();

    let err = load_exercise(&pool, TEST_USER, 50).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidExercise(50)));
    assert!(load_exercises(&pool, TEST_USER).await.unwrap().is_empty());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_delete_exercise_removes_sets() {
    let pool = setup_test_db().await;
    let exercise_id = seed_exercise(&pool, TEST_USER, "Dip", test_target()).await;
    seed_raw_lift(&pool, TEST_USER, exercise_id, Some(45.0), Some(8), Some("2025-05-01")).await;

    assert!(delete_exercise(&pool, TEST_USER, exercise_id).await.unwrap());
    assert!(fetch_all_sets(&pool, TEST_USER, exercise_id).await.unwrap().is_empty());
    assert!(!delete_exercise(&pool, TEST_USER, exercise_id).await.unwrap());

    teardown_test_db(pool).await;
  }

  fn new_exercise(name: &str, split_day_id: Option<i64>, order_index: i64) -> NewExercise {
    NewExercise {
      user_id: TEST_USER.to_string(),
      split_day_id,
      name: name.to_string(),
      order_index,
      target: test_target(),
    }
  }

  #[tokio::test]
  async fn test_insert_exercises_is_atomic() {
    let pool = setup_test_db().await;

    // The second row points at a split day that does not exist
    let batch = vec![new_exercise("Squat", None, 1), new_exercise("Bench", Some(999), 2)];
    assert!(insert_exercises(&pool, &batch).await.is_err());
    assert!(load_exercises(&pool, TEST_USER).await.unwrap().is_empty());

    let batch = vec![new_exercise("Squat", None, 1), new_exercise("Bench", None, 2)];
    let ids = insert_exercises(&pool, &batch).await.unwrap();
    assert_eq!(ids.len(), 2);
    assert_eq!(load_exercises(&pool, TEST_USER).await.unwrap().len(), 2);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_order_index_is_per_split_day() {
    let pool = setup_test_db().await;
    let (_, days) = seed_split(&pool, TEST_USER, "Upper/Lower", 2).await;

    seed_exercise(&pool, TEST_USER, "Curl", test_target()).await;
    seed_exercise_on(&pool, TEST_USER, Some(days[0].id), "Bench", test_target()).await;
    seed_exercise_on(&pool, TEST_USER, Some(days[0].id), "Row", test_target()).await;

    assert_eq!(next_order_index(&pool, TEST_USER, None).await.unwrap(), 2);
    assert_eq!(next_order_index(&pool, TEST_USER, Some(days[0].id)).await.unwrap(), 3);
    assert_eq!(next_order_index(&pool, TEST_USER, Some(days[1].id)).await.unwrap(), 1);

    let day_one = load_day_exercises(&pool, TEST_USER, days[0].id).await.unwrap();
    let names: Vec<&str> = day_one.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Bench", "Row"]);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_split_with_days() {
    let pool = setup_test_db().await;
    let (split_id, days) = seed_split(&pool, TEST_USER, "Push/Pull/Legs", 3).await;

    let split = load_split(&pool, TEST_USER, split_id).await.unwrap();
    assert_eq!(split.days_per_week, 3);
    assert_eq!(days.iter().map(|d| d.day).collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(days[2].name, "Day 3");

    assert!(rename_split_day(&pool, TEST_USER, split_id, 2, "Pull").await.unwrap());
    assert!(!rename_split_day(&pool, TEST_USER, split_id, 4, "Extra").await.unwrap());
    assert!(!rename_split_day(&pool, "someone-else", split_id, 1, "Mine").await.unwrap());
    let days = load_split_days(&pool, split_id).await.unwrap();
    assert_eq!(days[1].name, "Pull");
    assert_eq!(days[0].name, "Day 1");

    assert!(load_split_day(&pool, TEST_USER, days[1].id).await.is_ok());
    assert!(matches!(
      load_split_day(&pool, "someone-else", days[1].id).await,
      Err(StoreError::SplitDayNotFound(_))
    ));
    assert!(matches!(
      load_split(&pool, "someone-else", split_id).await,
      Err(StoreError::SplitNotFound(_))
    ));
    assert_eq!(load_splits(&pool, TEST_USER).await.unwrap(), vec![split]);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_active_split_and_rotation() {
    let pool = setup_test_db().await;
    let (split_id, days) = seed_split(&pool, TEST_USER, "Upper/Lower", 2).await;

    let info = load_user_info(&pool, TEST_USER).await.unwrap();
    assert_eq!(info, UserInfo::new(TEST_USER));

    set_active_split(&pool, TEST_USER, Some(split_id)).await.unwrap();
    let session = insert_session(&pool, TEST_USER, &days[0], NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
      .await
      .unwrap();
    assert!(session.is_open());

    let found = find_open_session(&pool, TEST_USER, days[0].id).await.unwrap();
    assert_eq!(found, Some(session.clone()));
    assert!(find_open_session(&pool, TEST_USER, days[1].id).await.unwrap().is_none());

    let done_at = Utc.with_ymd_and_hms(2025, 6, 1, 19, 0, 0).unwrap();
    assert!(finish_session(&pool, TEST_USER, session.id, done_at, 2).await.unwrap());
    assert!(!finish_session(&pool, TEST_USER, session.id, done_at, 1).await.unwrap());
    assert!(find_open_session(&pool, TEST_USER, days[0].id).await.unwrap().is_none());

    let info = load_user_info(&pool, TEST_USER).await.unwrap();
    assert_eq!(info.active_split, Some(split_id));
    assert_eq!(info.current_day, 2);

    // Picking a split again restarts the rotation
    set_active_split(&pool, TEST_USER, Some(split_id)).await.unwrap();
    assert_eq!(load_user_info(&pool, TEST_USER).await.unwrap().current_day, 1);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_delete_split_cascades() {
    let pool = setup_test_db().await;
    let (split_id, days) = seed_split(&pool, TEST_USER, "Full Body", 1).await;
    let squat = seed_exercise_on(&pool, TEST_USER, Some(days[0].id), "Squat", test_target()).await;
    let curl = seed_exercise(&pool, TEST_USER, "Curl", test_target()).await;
    set_active_split(&pool, TEST_USER, Some(split_id)).await.unwrap();

    let session = insert_session(&pool, TEST_USER, &days[0], NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
      .await
      .unwrap();
    let set = LoggedSet::new(100.0, 5, Utc::now()).unwrap();
    insert_sets(&pool, TEST_USER, squat, Some(session.id), &[set.clone()]).await.unwrap();
    insert_sets(&pool, TEST_USER, curl, None, &[set]).await.unwrap();

    assert!(!delete_split(&pool, "someone-else", split_id).await.unwrap());
    assert!(delete_split(&pool, TEST_USER, split_id).await.unwrap());

    assert!(matches!(
      load_exercise(&pool, TEST_USER, squat).await,
      Err(StoreError::ExerciseNotFound(_))
    ));
    assert_eq!(fetch_all_sets(&pool, TEST_USER, curl).await.unwrap().len(), 1);
    assert!(load_splits(&pool, TEST_USER).await.unwrap().is_empty());
    assert_eq!(load_user_info(&pool, TEST_USER).await.unwrap().active_split, None);
    assert!(!delete_split(&pool, TEST_USER, split_id).await.unwrap());

    teardown_test_db(pool).await;
  }
}
