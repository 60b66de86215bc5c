use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One completed set, validated: finite positive weight, at least one rep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedSet {
  pub weight: f64,
  pub reps: u32,
  pub recorded_at: DateTime<Utc>,
}

impl LoggedSet {
  pub fn new(weight: f64, reps: u32, recorded_at: DateTime<Utc>) -> Option<Self> {
    if !weight.is_finite() || weight <= 0.0 || reps == 0 {
      return None;
    }
    Some(Self {
      weight,
      reps,
      recorded_at,
    })
  }

  /// Map a loosely-typed JSON row into a set.
  ///
  /// Numbers may arrive as JSON numbers or numeric strings. The timestamp is
  /// read from `recorded_at`, falling back to `created_at`. Anything that does
  /// not describe a valid set yields `None`.
  pub fn from_json(row: &Value) -> Option<Self> {
    let weight = loose_number(row.get("weight")?)?;
    let reps = whole_reps(loose_number(row.get("reps")?)?)?;
    let stamp = row
      .get("recorded_at")
      .or_else(|| row.get("created_at"))?
      .as_str()?;
    Self::new(weight, reps, parse_timestamp(stamp)?)
  }
}

/// Raw `lifts` row as stored; every column may be missing or malformed
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LiftRow {
  pub id: i64,
  pub weight: Option<f64>,
  pub reps: Option<i64>,
  pub created_at: Option<String>,
}

impl LiftRow {
  pub fn into_logged_set(self) -> Option<LoggedSet> {
    let reps = u32::try_from(self.reps?).ok()?;
    let recorded_at = parse_timestamp(self.created_at.as_deref()?)?;
    LoggedSet::new(self.weight?, reps, recorded_at)
  }
}

/// Accepts RFC 3339, SQLite's `YYYY-MM-DD HH:MM:SS`, or a bare date (midnight UTC)
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
  let s = s.trim();
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Some(dt.with_timezone(&Utc));
  }
  if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
    return Some(naive.and_utc());
  }
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .ok()
    .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

fn loose_number(v: &Value) -> Option<f64> {
  match v {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => s.trim().parse::<f64>().ok(),
    _ => None,
  }
  .filter(|n| n.is_finite())
}

fn whole_reps(n: f64) -> Option<u32> {
  if n.fract() != 0.0 || n < 1.0 || n > f64::from(u32::MAX) {
    return None;
  }
  Some(n as u32)
}
