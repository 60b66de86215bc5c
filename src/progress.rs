//! Estimated-max progress series: best e1RM per calendar day

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::engine::estimate_max;
use crate::models::{DailyBest, LoggedSet};

/// Reps above this count as this many when charting
pub const MAX_CHART_REPS: u32 = 30;

/// Best estimate per UTC date, oldest first. Invalid sets are skipped and
/// reps are capped at [`MAX_CHART_REPS`].
pub fn daily_best(sets: &[LoggedSet]) -> Vec<DailyBest> {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();

    for set in sets {
        let Some(estimate) = estimate_max(set.weight, set.reps.min(MAX_CHART_REPS)) else {
            continue;
        };
        let best = by_date
            .entry(set.recorded_at.date_naive())
            .or_insert(estimate);
        if estimate > *best {
            *best = estimate;
        }
    }

    by_date
        .into_iter()
        .map(|(date, estimated_max)| DailyBest {
            date,
            estimated_max,
        })
        .collect()
}
