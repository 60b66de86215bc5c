//! Test utilities and helpers for database-backed tests
//!
//! - In-memory database setup/teardown
//! - Seeding helpers for splits, exercises and raw lift rows

use crate::history::{insert_split, load_split_days};
use crate::models::{ExerciseTarget, SplitDay};
use crate::split::SplitDraft;
use sqlx::SqlitePool;

pub const TEST_USER: &str = "test-user";

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// ---------------------------------------------------------------------------
/// Fixtures
/// ---------------------------------------------------------------------------

/// 6-8 reps at RPE 8, two warm-ups, three working sets
pub fn test_target() -> ExerciseTarget {
  ExerciseTarget {
    rep_range_start: Some(6),
    rep_range_end: Some(8),
    target_effort: Some(8),
    warmup_set_count: 2,
    working_set_count: 3,
  }
}

/// Insert a split with `days_per_week` days named "Day N", returning the
/// split id and its days in order
pub async fn seed_split(
  pool: &SqlitePool,
  user_id: &str,
  name: &str,
  days_per_week: i32,
) -> (i64, Vec<SplitDay>) {
  let draft = SplitDraft {
    name: name.to_string(),
    days_per_week,
  };
  let split_id = insert_split(pool, user_id, &draft)
    .await
    .expect("Failed to insert test split");
  let days = load_split_days(pool, split_id)
    .await
    .expect("Failed to load test split days");

  (split_id, days)
}

/// Insert an unassigned exercise at the end of the user's list
pub async fn seed_exercise(
  pool: &SqlitePool,
  user_id: &str,
  name: &str,
  target: ExerciseTarget,
) -> i64 {
  seed_exercise_on(pool, user_id, None, name, target).await
}

/// Insert an exercise at the end of a split day's list (or the unassigned
/// list), returning its id
pub async fn seed_exercise_on(
  pool: &SqlitePool,
  user_id: &str,
  split_day_id: Option<i64>,
  name: &str,
  target: ExerciseTarget,
) -> i64 {
  let result = sqlx::query(
    r#"
    INSERT INTO exercises (
      user_id, split_day_id, name, rep_range_start, rep_range_end, rpe,
      warmup_sets, working_sets, order_index
    )
    VALUES (
      ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8,
      (SELECT COALESCE(MAX(order_index), 0) + 1 FROM exercises
       WHERE user_id = ?1 AND split_day_id IS ?2)
    )
    "#,
  )
  .bind(user_id)
  .bind(split_day_id)
  .bind(name)
  .bind(target.rep_range_start)
  .bind(target.rep_range_end)
  .bind(target.target_effort)
  .bind(target.warmup_set_count)
  .bind(target.working_set_count)
  .execute(pool)
  .await
  .expect("Failed to insert test exercise");

  result.last_insert_rowid()
}

/// Insert a lift row as-is, including values the reader must reject
pub async fn seed_raw_lift(
  pool: &SqlitePool,
  user_id: &str,
  exercise_id: i64,
  weight: Option<f64>,
  reps: Option<i64>,
  created_at: Option<&str>,
) -> i64 {
  let result = sqlx::query(
    "INSERT INTO lifts (user_id, exercise_id, weight, reps, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
  )
  .bind(user_id)
  .bind(exercise_id)
  .bind(weight)
  .bind(reps)
  .bind(created_at)
  .execute(pool)
  .await
  .expect("Failed to insert test lift");

  result.last_insert_rowid()
}
