//! Progressive-Overload Recommendation Engine
//!
//! Pure functions, no I/O, no state:
//! - estimator: Epley e1RM per set, best-of over a history window
//! - effort: RPE chart lookup (fraction of e1RM for reps at effort)
//! - policy: rep target selection, working-set load, plate rounding
//! - warmup: warm-up ramp below the working set
//!
//! Bad or missing input degrades to `None` / empty output. Nothing here
//! returns an error or panics on malformed history.

pub mod effort;
pub mod estimator;
pub mod policy;
pub mod warmup;

pub use effort::percent_of_max;
pub use estimator::{best_estimate, estimate_max};
pub use policy::{recommend, reps_target_from_range, round_to_nearest, LoadRecommendation};
pub use warmup::plan_warmups;

use crate::models::{ExerciseTarget, LoggedSet, Recommendation};

/// Full recommendation for one exercise: history -> best e1RM -> load -> ramp
pub fn build_recommendation(history: &[LoggedSet], target: &ExerciseTarget) -> Recommendation {
    let max_estimate = best_estimate(history);
    let reps_target = reps_target_from_range(target.rep_range_start, target.rep_range_end);
    let load = recommend(max_estimate.estimated_max, reps_target, target.target_effort);
    let warmup_sets = plan_warmups(load.working_set_load, target.warmup_set_count);

    Recommendation {
        working_set_load: load.working_set_load,
        reps_target,
        effort_fraction: load.effort_fraction,
        warmup_sets,
        max_estimate,
    }
}
