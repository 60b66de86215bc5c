//! Warm-up ramp leading into the working set

use crate::models::WarmupSet;

use super::policy::{round_to_nearest, LOAD_INCREMENT};

/// (fraction of top set, reps) per ramp length. Longer ramps use the last.
const WARMUP_TEMPLATES: [&[(f64, i32)]; 4] = [
    &[(0.6, 5)],
    &[(0.5, 5), (0.7, 3)],
    &[(0.4, 5), (0.6, 3), (0.75, 2)],
    &[(0.4, 5), (0.6, 3), (0.75, 2), (0.85, 1)],
];

/// Warm-up sets for a top set, lightest first.
///
/// Empty when there is no usable top set or `warmup_set_count <= 0`. Counts
/// above four are capped at the four-set ramp.
pub fn plan_warmups(top_set_weight: Option<f64>, warmup_set_count: i32) -> Vec<WarmupSet> {
    let Some(top) = top_set_weight.filter(|w| w.is_finite() && *w > 0.0) else {
        return Vec::new();
    };
    if warmup_set_count <= 0 {
        return Vec::new();
    }

    let idx = (warmup_set_count as usize).min(WARMUP_TEMPLATES.len()) - 1;
    WARMUP_TEMPLATES[idx]
        .iter()
        .map(|&(pct, reps)| WarmupSet {
            weight: round_to_nearest(top * pct, LOAD_INCREMENT),
            reps,
        })
        .collect()
}
