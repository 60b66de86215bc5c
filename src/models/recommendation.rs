use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Best estimated one-rep max in the history window, and the set it came from.
///
/// `estimated_max: None` means "not enough history", never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MaxEstimate {
  pub estimated_max: Option<f64>,
  pub source_weight: Option<f64>,
  pub source_reps: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WarmupSet {
  pub weight: Option<f64>,
  pub reps: i32,
}

/// Everything the UI needs to render the suggested loads for one exercise
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
  pub working_set_load: Option<f64>,
  pub reps_target: Option<i32>,
  pub effort_fraction: Option<f64>,
  pub warmup_sets: Vec<WarmupSet>,
  pub max_estimate: MaxEstimate,
}

/// Best estimated max on one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyBest {
  pub date: NaiveDate,
  pub estimated_max: f64,
}
