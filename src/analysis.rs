//! Deterministic analysis layer for logged sets
//!
//! Pure aggregations over whatever the record store returned. Nothing here
//! is cached; callers recompute from the current collection on every action.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{DayTopSet, LastTopSet, LoggedSet, PersonalRecord};

/// ---------------------------------------------------------------------------
/// Estimated One-Rep Max
/// ---------------------------------------------------------------------------

/// Epley estimate: weight * (1 + reps / 30).
///
/// Departs from plain Epley at one rep: plain Epley gives weight * 31/30,
/// but a single is already a one-rep max, so it returns the weight as-is.
/// Missing (zero) reps are treated as a single.
pub fn estimate_one_rep_max(weight: f64, reps: u32) -> f64 {
  if reps <= 1 {
    return weight;
  }
  weight * (1.0 + reps as f64 / 30.0)
}

/// ---------------------------------------------------------------------------
/// Daily Top Sets
/// ---------------------------------------------------------------------------

/// Heaviest weight per distinct date, ascending by date.
/// Expects the sets of a single exercise.
pub fn top_sets_by_day(sets: &[LoggedSet]) -> Vec<DayTopSet> {
  let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();

  for set in sets {
    by_day
      .entry(set.date)
      .and_modify(|top| {
        if set.weight > *top {
          *top = set.weight;
        }
      })
      .or_insert(set.weight);
  }

  by_day
    .into_iter()
    .map(|(date, top_weight)| DayTopSet { date, top_weight })
    .collect()
}

/// Top set of the most recent date. Ties on weight resolve to the set
/// logged last that day.
pub fn last_top_set(sets: &[LoggedSet]) -> Option<LastTopSet> {
  let last_date = sets.iter().map(|s| s.date).max()?;

  sets
    .iter()
    .filter(|s| s.date == last_date)
    .max_by(|a, b| {
      a.weight
        .total_cmp(&b.weight)
        .then_with(|| a.created_at.cmp(&b.created_at))
    })
    .map(|top| LastTopSet {
      date: top.date,
      weight: top.weight,
      reps: top.reps,
    })
}

/// ---------------------------------------------------------------------------
/// Personal Records
/// ---------------------------------------------------------------------------

/// Lifetime best weight and best e1RM per exercise, keyed by exercise name
pub fn personal_records(all_sets: &[LoggedSet]) -> BTreeMap<String, PersonalRecord> {
  let mut records: BTreeMap<String, PersonalRecord> = BTreeMap::new();

  for set in all_sets {
    let e1rm = estimate_one_rep_max(set.weight, set.reps);
    records
      .entry(set.exercise.clone())
      .and_modify(|pr| {
        pr.best_weight = pr.best_weight.max(set.weight);
        pr.best_estimated_one_rep_max = pr.best_estimated_one_rep_max.max(e1rm);
      })
      .or_insert_with(|| PersonalRecord {
        exercise: set.exercise.clone(),
        best_weight: set.weight,
        best_estimated_one_rep_max: e1rm,
      });
  }

  records
}

/// ---------------------------------------------------------------------------
/// Overview
/// ---------------------------------------------------------------------------

pub const RECENT_ENTRY_LIMIT: usize = 30;

/// Headline numbers for the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overview {
  pub total_sets: usize,
  pub exercise_count: usize,
  pub last_logged: Option<NaiveDate>,
  /// Newest first, exercises alphabetical within a day
  pub recent: Vec<LoggedSet>,
}

impl Overview {
  pub fn compute(all_sets: &[LoggedSet]) -> Self {
    let exercises: BTreeSet<&str> = all_sets.iter().map(|s| s.exercise.as_str()).collect();

    let mut recent: Vec<LoggedSet> = all_sets.to_vec();
    recent.sort_by(|a, b| {
      b.date
        .cmp(&a.date)
        .then_with(|| a.exercise.cmp(&b.exercise))
        .then_with(|| b.created_at.cmp(&a.created_at))
    });
    recent.truncate(RECENT_ENTRY_LIMIT);

    Self {
      total_sets: all_sets.len(),
      exercise_count: exercises.len(),
      last_logged: all_sets.iter().map(|s| s.date).max(),
      recent,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
