//! Working-set entry for one exercise
//!
//! The UI owns the in-progress text; these helpers only turn a target into
//! blank rows and turn filled-in rows back into sets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::int_or_none;
use crate::engine::reps_target_from_range;
use crate::models::{ExerciseTarget, LoggedSet};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Enter weight and reps for at least one working set.")]
    NoValidSets,
}

impl Serialize for SessionError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Text of one working-set row as typed by the lifter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingSetDraft {
    pub weight: String,
    pub reps: String,
}

fn working_sets_needed(target: &ExerciseTarget) -> usize {
    usize::try_from(target.working_set_count)
        .ok()
        .filter(|n| *n > 0)
        .unwrap_or(1)
}

/// One blank row per working set, reps prefilled with the rep target
pub fn draft_rows(target: &ExerciseTarget) -> Vec<WorkingSetDraft> {
    let reps = reps_target_from_range(target.rep_range_start, target.rep_range_end)
        .map(|r| r.to_string())
        .unwrap_or_default();

    vec![
        WorkingSetDraft {
            weight: String::new(),
            reps,
        };
        working_sets_needed(target)
    ]
}

/// Convert filled rows into sets, skipping incomplete ones.
///
/// Weight and reps truncate toward zero ("185.9" logs as 185). At least one
/// row must carry a positive weight and positive reps.
pub fn parse_drafts(
    drafts: &[WorkingSetDraft],
    recorded_at: DateTime<Utc>,
) -> Result<Vec<LoggedSet>, SessionError> {
    let sets: Vec<LoggedSet> = drafts
        .iter()
        .filter_map(|d| {
            let weight = int_or_none(&d.weight)?;
            let reps = u32::try_from(int_or_none(&d.reps)?).ok()?;
            LoggedSet::new(weight as f64, reps, recorded_at)
        })
        .collect();

    if sets.is_empty() {
        return Err(SessionError::NoValidSets);
    }
    Ok(sets)
}

/// Whether the sets logged in a session cover every prescribed working set
pub fn is_exercise_complete(target: &ExerciseTarget, logged_sets: usize) -> bool {
    logged_sets >= working_sets_needed(target)
}
