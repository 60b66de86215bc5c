//! Working-set load policy: e1RM x chart fraction, rounded to plate increments

use super::effort::percent_of_max;

/// Smallest practical load jump (plates)
pub const LOAD_INCREMENT: f64 = 5.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadRecommendation {
    /// `None` means "not enough information", never a zero load
    pub working_set_load: Option<f64>,
    pub effort_fraction: Option<f64>,
}

/// Round to the nearest multiple of `step`, halves rounding up.
///
/// `None` for non-finite input or a non-positive step.
pub fn round_to_nearest(value: f64, step: f64) -> Option<f64> {
    if !value.is_finite() || !step.is_finite() || step <= 0.0 {
        return None;
    }
    let quotient = value / step;
    let floor = quotient.floor();
    let steps = if quotient - floor >= 0.5 { floor + 1.0 } else { floor };
    Some(steps * step)
}

/// Rep target for a prescribed range: the upper bound when usable, else the
/// lower bound. Biased toward the harder end of the range.
pub fn reps_target_from_range(start: Option<i32>, end: Option<i32>) -> Option<i32> {
    end.filter(|r| *r > 0).or_else(|| start.filter(|r| *r > 0))
}

/// Suggested working-set load for a rep and effort target.
pub fn recommend(
    max_estimate: Option<f64>,
    reps_target: Option<i32>,
    effort_target: Option<i32>,
) -> LoadRecommendation {
    let reps = reps_target.filter(|r| *r > 0);
    let effort_fraction = match (effort_target, reps) {
        (Some(effort), Some(reps)) => percent_of_max(effort, reps),
        _ => None,
    };

    let max = max_estimate.filter(|m| m.is_finite() && *m > 0.0);
    let working_set_load = match (max, effort_fraction) {
        (Some(max), Some(fraction)) => round_to_nearest(max * fraction, LOAD_INCREMENT),
        _ => None,
    };

    LoadRecommendation {
        working_set_load,
        effort_fraction,
    }
}
