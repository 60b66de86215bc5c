//! Split rotation: validating splits, picking the day to train and moving
//! through a day's exercises
//!
//! A split has 1-7 numbered days. The user's `current_day` points into it and
//! wraps back to day 1 after the last day's workout is finished.

use serde::Serialize;

use crate::catalog::int_or_none;
use crate::models::{Exercise, SplitDay};

pub const MIN_DAYS_PER_WEEK: i32 = 1;
pub const MAX_DAYS_PER_WEEK: i32 = 7;

#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    #[error("Split name is required.")]
    MissingName,

    #[error("Days per week is required and must be 1-7.")]
    BadDaysPerWeek,

    #[error("Day name is required.")]
    MissingDayName,
}

impl Serialize for SplitError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Validated fields of a new split
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitDraft {
    pub name: String,
    pub days_per_week: i32,
}

impl SplitDraft {
    pub fn from_fields(name: &str, days_per_week: &str) -> Result<Self, SplitError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SplitError::MissingName);
        }

        let days = int_or_none(days_per_week)
            .and_then(|n| i32::try_from(n).ok())
            .filter(|n| (MIN_DAYS_PER_WEEK..=MAX_DAYS_PER_WEEK).contains(n))
            .ok_or(SplitError::BadDaysPerWeek)?;

        Ok(Self {
            name: name.to_string(),
            days_per_week: days,
        })
    }

    /// Names given to the days of a fresh split: "Day 1", "Day 2", ...
    pub fn day_names(&self) -> Vec<String> {
        (1..=self.days_per_week).map(|d| format!("Day {}", d)).collect()
    }
}

pub fn validate_day_name(name: &str) -> Result<String, SplitError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(SplitError::MissingDayName);
    }
    Ok(name.to_string())
}

/// The day to train: the one numbered `current_day`, else the first day.
///
/// A non-positive `current_day` counts as day 1.
pub fn resolve_day(days: &[SplitDay], current_day: i32) -> Option<&SplitDay> {
    let current = if current_day > 0 { current_day } else { 1 };
    days.iter().find(|d| d.day == current).or_else(|| days.first())
}

/// Day that follows `current_day` once its workout is finished.
///
/// The rotation length is `days_per_week`, or the number of stored days when
/// that is not positive. The last day wraps to day 1.
pub fn next_day(current_day: i32, days_per_week: i32, day_count: usize) -> i32 {
    let rotation = if days_per_week > 0 {
        days_per_week
    } else {
        i32::try_from(day_count).unwrap_or(i32::MAX).max(1)
    };
    let current = if current_day > 0 { current_day } else { 1 };

    if current >= rotation {
        1
    } else {
        current + 1
    }
}

/// Exercise after `current_id` in day order, `None` after the last one
pub fn next_exercise(exercises: &[Exercise], current_id: i64) -> Option<&Exercise> {
    let idx = exercises.iter().position(|e| e.id == current_id)?;
    exercises.get(idx + 1)
}
