//! One-rep max estimation (Epley) and best-of selection over history

use crate::models::{LoggedSet, MaxEstimate};

/// Epley: `weight * (1 + reps / 30)`
const EPLEY_DIVISOR: f64 = 30.0;

/// Estimate a one-rep max from a single set.
///
/// `None` for non-finite or non-positive weight and for zero reps. Reps are
/// not clamped; beyond roughly 12 reps the estimate gets increasingly
/// optimistic.
pub fn estimate_max(weight: f64, reps: u32) -> Option<f64> {
    if !weight.is_finite() || weight <= 0.0 || reps == 0 {
        return None;
    }
    Some(weight * (1.0 + f64::from(reps) / EPLEY_DIVISOR))
}

/// Highest estimate across `sets`. Ties keep the first set seen.
pub fn best_estimate(sets: &[LoggedSet]) -> MaxEstimate {
    let mut best = MaxEstimate::default();

    for set in sets {
        let Some(estimate) = estimate_max(set.weight, set.reps) else {
            continue;
        };
        let is_better = match best.estimated_max {
            Some(current) => estimate > current,
            None => true,
        };
        if is_better {
            best = MaxEstimate {
                estimated_max: Some(estimate),
                source_weight: Some(set.weight),
                source_reps: Some(set.reps),
            };
        }
    }

    best
}
