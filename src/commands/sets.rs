//! Commands that change the set log: log, quick-log, delete

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analysis::last_top_set;
use crate::error::AppError;
use crate::models::set::{non_blank, normalize_exercise_name};
use crate::models::{LoggedSet, NewLoggedSet};
use crate::session::Session;
use crate::store::SetQuery;
use crate::units::WeightUnit;

/// ---------------------------------------------------------------------------
/// Log a Set
/// ---------------------------------------------------------------------------

/// Raw user input for one set, before validation and unit conversion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetInput {
  pub date: NaiveDate,
  pub exercise: String,
  pub weight: f64,
  #[serde(default)]
  pub unit: WeightUnit,
  pub reps: u32,
  #[serde(default)]
  pub rpe: Option<String>,
  #[serde(default)]
  pub notes: Option<String>,
}

impl SetInput {
  /// Validate and convert to a storable set in pounds
  pub fn into_new_set(self, owner_id: Option<&str>) -> Result<NewLoggedSet, AppError> {
    let exercise = normalize_exercise_name(&self.exercise);
    if exercise.is_empty() {
      return Err(AppError::Validation("Please enter an exercise name.".to_string()));
    }
    if !self.weight.is_finite() || self.weight <= 0.0 {
      return Err(AppError::Validation("Please enter a weight > 0.".to_string()));
    }
    if self.reps == 0 {
      return Err(AppError::Validation("Reps must be at least 1.".to_string()));
    }

    Ok(NewLoggedSet {
      owner_id: owner_id.map(String::from),
      date: self.date,
      exercise,
      weight: self.unit.to_pounds(self.weight),
      reps: self.reps,
      rpe: non_blank(self.rpe.as_deref()),
      notes: non_blank(self.notes.as_deref()),
    })
  }
}

pub async fn log_set(session: &Session, input: SetInput) -> Result<LoggedSet, AppError> {
  let new_set = input.into_new_set(session.owner())?;
  let stored = session.store.insert_set(&new_set).await?;
  Ok(stored)
}

/// Log today's set at the same weight as the last session's top set
pub async fn quick_log(
  session: &Session,
  exercise: &str,
  reps: Option<u32>,
  date: NaiveDate,
) -> Result<LoggedSet, AppError> {
  let exercise = normalize_exercise_name(exercise);
  let sets = session
    .store
    .fetch_sets(SetQuery::owned_by(session.owner()).exercise(&exercise))
    .await?;

  let last = last_top_set(&sets).ok_or_else(|| {
    AppError::Validation(format!("No previous top set found for {}.", exercise))
  })?;

  let input = SetInput {
    date,
    exercise,
    weight: last.weight,
    unit: WeightUnit::Lb,
    reps: reps.unwrap_or(last.reps).max(1),
    rpe: None,
    notes: Some(format!("Quick-log from last top set {}", last.date)),
  };

  log_set(session, input).await
}

/// ---------------------------------------------------------------------------
/// Delete Sets
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteFailure {
  pub id: i64,
  pub reason: String,
}

/// Outcome of a batch delete; one failure never aborts the rest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteReport {
  pub deleted: Vec<i64>,
  pub failures: Vec<DeleteFailure>,
}

impl DeleteReport {
  pub fn deleted_count(&self) -> usize {
    self.deleted.len()
  }

  pub fn is_complete(&self) -> bool {
    self.failures.is_empty()
  }
}

/// Delete sets by stable id, continuing past per-row failures
pub async fn delete_sets(session: &Session, ids: &[i64]) -> Result<DeleteReport, AppError> {
  if ids.is_empty() {
    return Err(AppError::Validation("No rows selected for deletion.".to_string()));
  }

  let mut seen = std::collections::HashSet::new();
  let mut report = DeleteReport::default();

  for &id in ids.iter().filter(|id| seen.insert(**id)) {
    match session.store.delete_set(session.owner(), id).await {
      Ok(()) => report.deleted.push(id),
      Err(e) => {
        tracing::warn!(id, error = %e, "Failed to delete set");
        report.failures.push(DeleteFailure {
          id,
          reason: e.to_string(),
        });
      }
    }
  }

  Ok(report)
}
