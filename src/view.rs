//! Immutable view snapshots
//!
//! Every user action produces a brand-new `ViewState` computed from the
//! store's current contents. A failed action returns the previous snapshot
//! unchanged apart from an error status.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analysis::Overview;
use crate::commands::{self, ExerciseDetailView, SetInput};
use crate::error::AppError;
use crate::models::PersonalRecord;
use crate::progression::GoalAdvisor;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
  Success,
  Info,
  Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
  pub kind: StatusKind,
  pub message: String,
}

impl Status {
  fn success(message: impl Into<String>) -> Self {
    Self {
      kind: StatusKind::Success,
      message: message.into(),
    }
  }

  fn error(message: impl Into<String>) -> Self {
    Self {
      kind: StatusKind::Error,
      message: message.into(),
    }
  }
}

/// Something the user did
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
  Refresh,
  LogSet(SetInput),
  QuickLog {
    exercise: String,
    reps: Option<u32>,
    date: NaiveDate,
  },
  SelectExercise { exercise: String },
  DeleteSets { ids: Vec<i64> },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
  pub overview: Overview,
  pub exercises: Vec<String>,
  pub selected: Option<ExerciseDetailView>,
  pub records: Vec<PersonalRecord>,
  pub status: Option<Status>,
}

impl ViewState {
  /// Build a snapshot from the store, optionally with one exercise selected
  pub async fn load(
    session: &Session,
    advisor: &dyn GoalAdvisor,
    selected: Option<&str>,
  ) -> Result<Self, AppError> {
    let overview = commands::dashboard(session).await?;
    let exercises = commands::list_exercises(session).await?;
    let records = commands::personal_records_view(session).await?;
    let selected = match selected {
      Some(exercise) => Some(commands::exercise_detail(session, exercise, advisor).await?),
      None => None,
    };

    Ok(Self {
      overview,
      exercises,
      selected,
      records,
      status: None,
    })
  }

  fn selected_exercise(&self) -> Option<&str> {
    self.selected.as_ref().map(|s| s.exercise.as_str())
  }

  fn with_status(&self, status: Status) -> Self {
    Self {
      status: Some(status),
      ..self.clone()
    }
  }

  /// Apply one action and return the next snapshot
  pub async fn apply(&self, session: &Session, advisor: &dyn GoalAdvisor, action: Action) -> Self {
    let outcome = self.perform(session, advisor, action).await;

    match outcome {
      Ok(next) => next,
      Err(e) => {
        tracing::warn!(error = %e, "Action failed");
        self.with_status(Status::error(e.to_string()))
      }
    }
  }

  async fn perform(
    &self,
    session: &Session,
    advisor: &dyn GoalAdvisor,
    action: Action,
  ) -> Result<Self, AppError> {
    let (selected, status) = match action {
      Action::Refresh => (self.selected_exercise().map(String::from), None),
      Action::LogSet(input) => {
        let stored = commands::log_set(session, input).await?;
        (
          Some(stored.exercise.clone()),
          Some(Status::success(format!(
            "Logged {}: {:.1} lb x {}",
            stored.exercise, stored.weight, stored.reps
          ))),
        )
      }
      Action::QuickLog {
        exercise,
        reps,
        date,
      } => {
        let stored = commands::quick_log(session, &exercise, reps, date).await?;
        (
          Some(stored.exercise.clone()),
          Some(Status::success(format!(
            "Logged {}: {:.0} lb x {}",
            stored.exercise, stored.weight, stored.reps
          ))),
        )
      }
      Action::SelectExercise { exercise } => (Some(exercise), None),
      Action::DeleteSets { ids } => {
        let report = commands::delete_sets(session, &ids).await?;
        let mut message = format!("Deleted {} record(s).", report.deleted_count());
        let status = if report.is_complete() {
          Status::success(message)
        } else {
          let failed: Vec<String> = report.failures.iter().map(|f| f.reason.clone()).collect();
          message.push_str(&format!(" {} failed: {}", report.failures.len(), failed.join("; ")));
          Status::error(message)
        };
        (self.selected_exercise().map(String::from), Some(status))
      }
    };

    let mut next = Self::load(session, advisor, selected.as_deref()).await?;
    next.status = status;
    Ok(next)
  }
}
