//! RPE chart: fraction of one-rep max movable for N reps at a given effort

use crate::models::exercise::{MAX_EFFORT, MIN_EFFORT};

/// Highest rep count the chart covers; more reps read the last column
pub const MAX_TABLE_REPS: i32 = 12;

// ---------------------------------------------------------------------------
/// Effort level (RPE 6..=10) -> reps (1..=12) -> fraction of e1RM
// ---------------------------------------------------------------------------

const EFFORT_TABLE: [(i32, [f64; 12]); 5] = [
    (10, [1.0, 0.955, 0.922, 0.892, 0.863, 0.837, 0.811, 0.786, 0.762, 0.739, 0.716, 0.694]),
    (9, [0.955, 0.922, 0.892, 0.863, 0.837, 0.811, 0.786, 0.762, 0.739, 0.716, 0.694, 0.672]),
    (8, [0.922, 0.892, 0.863, 0.837, 0.811, 0.786, 0.762, 0.739, 0.716, 0.694, 0.672, 0.651]),
    (7, [0.892, 0.863, 0.837, 0.811, 0.786, 0.762, 0.739, 0.716, 0.694, 0.672, 0.651, 0.63]),
    (6, [0.863, 0.837, 0.811, 0.786, 0.762, 0.739, 0.716, 0.694, 0.672, 0.651, 0.63, 0.61]),
];

/// Fraction of e1RM for `target_reps` at `effort_level`.
///
/// Exact chart hits only. `None` for efforts outside 6-10 or reps below 1;
/// reps above 12 use the 12-rep entry.
pub fn percent_of_max(effort_level: i32, target_reps: i32) -> Option<f64> {
    if !(MIN_EFFORT..=MAX_EFFORT).contains(&effort_level) || target_reps < 1 {
        return None;
    }
    let (_, row) = EFFORT_TABLE.iter().find(|(level, _)| *level == effort_level)?;
    let reps = target_reps.min(MAX_TABLE_REPS);
    row.get((reps - 1) as usize).copied()
}
