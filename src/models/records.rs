use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Heaviest weight lifted for one exercise on one date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayTopSet {
  pub date: NaiveDate,
  pub top_weight: f64,
}

/// Lifetime bests for one exercise. The two maxima are computed
/// independently and may come from different sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalRecord {
  pub exercise: String,
  pub best_weight: f64,
  pub best_estimated_one_rep_max: f64,
}

/// The last session's top set, used for quick-logging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastTopSet {
  pub date: NaiveDate,
  pub weight: f64,
  pub reps: u32,
}
