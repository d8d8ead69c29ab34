//! Read-only commands that build view snapshots for the presentation layer

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analysis::{last_top_set, personal_records, top_sets_by_day, Overview};
use crate::error::AppError;
use crate::models::set::normalize_exercise_name;
use crate::models::{DayTopSet, LastTopSet, LoggedSet, PersonalRecord};
use crate::progression::{suggest_next_goal, GoalAdvisor};
use crate::session::Session;
use crate::store::SetQuery;

/// ---------------------------------------------------------------------------
/// Dashboard
/// ---------------------------------------------------------------------------

pub async fn list_exercises(session: &Session) -> Result<Vec<String>, AppError> {
  Ok(session.store.fetch_exercises(session.owner()).await?)
}

pub async fn dashboard(session: &Session) -> Result<Overview, AppError> {
  let all = session
    .store
    .fetch_sets(SetQuery::owned_by(session.owner()))
    .await?;
  Ok(Overview::compute(&all))
}

/// ---------------------------------------------------------------------------
/// Exercise Detail
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
  pub text: String,
  /// Which advisor produced the text
  pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseDetailView {
  pub exercise: String,
  pub sets: Vec<LoggedSet>,
  pub top_sets: Vec<DayTopSet>,
  pub last_top_set: Option<LastTopSet>,
  pub suggestion: Suggestion,
}

impl ExerciseDetailView {
  pub fn last_logged(&self) -> Option<NaiveDate> {
    self.top_sets.last().map(|t| t.date)
  }
}

/// History, chart series and next-goal suggestion for one exercise.
/// If the advisor fails, the rule-based suggestion is used instead.
pub async fn exercise_detail(
  session: &Session,
  exercise: &str,
  advisor: &dyn GoalAdvisor,
) -> Result<ExerciseDetailView, AppError> {
  let exercise = normalize_exercise_name(exercise);
  let sets = session
    .store
    .fetch_sets(SetQuery::owned_by(session.owner()).exercise(&exercise))
    .await?;

  let suggestion = match advisor.suggest_next_goal(&sets).await {
    Ok(text) => Suggestion {
      text,
      source: advisor.name().to_string(),
    },
    Err(e) => {
      tracing::warn!(advisor = advisor.name(), error = %e, "Advisor failed, using rule-based suggestion");
      Suggestion {
        text: suggest_next_goal(&sets),
        source: "rules".to_string(),
      }
    }
  };

  Ok(ExerciseDetailView {
    top_sets: top_sets_by_day(&sets),
    last_top_set: last_top_set(&sets),
    exercise,
    sets,
    suggestion,
  })
}

/// ---------------------------------------------------------------------------
/// Personal Records
/// ---------------------------------------------------------------------------

/// Lifetime PRs, sorted by exercise name
pub async fn personal_records_view(session: &Session) -> Result<Vec<PersonalRecord>, AppError> {
  let all = session
    .store
    .fetch_sets(SetQuery::owned_by(session.owner()))
    .await?;
  Ok(personal_records(&all).into_values().collect())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::commands::sets::{log_set, SetInput};
  use crate::llm::LlmError;
  use crate::progression::RuleBasedAdvisor;
  use crate::test_utils::{date, sqlite_session};
  use crate::units::WeightUnit;
  use async_trait::async_trait;

  struct FailingAdvisor;

  #[async_trait]
  impl GoalAdvisor for FailingAdvisor {
    fn name(&self) -> &'static str {
      "failing"
    }

    async fn suggest_next_goal(&self, _sets: &[LoggedSet]) -> Result<String, LlmError> {
      Err(LlmError::Request("connection refused".to_string()))
    }
  }

  async fn log(session: &Session, day: &str, exercise: &str, weight: f64, reps: u32) {
    log_set(
      session,
      SetInput {
        date: date(day),
        exercise: exercise.to_string(),
        weight,
        unit: WeightUnit::Lb,
        reps,
        rpe: None,
        notes: None,
      },
    )
    .await
    .unwrap();
  }

  #[tokio::test]
  async fn test_detail_builds_series_and_suggestion() {
    let session = sqlite_session().await;
    log(&session, "2024-01-01", "Squat", 95.0, 5).await;
    log(&session, "2024-01-01", "Squat", 100.0, 5).await;
    log(&session, "2024-01-03", "Squat", 105.0, 5).await;
    log(&session, "2024-01-05", "Squat", 110.0, 5).await;
    log(&session, "2024-01-05", "Bench", 135.0, 5).await;

    let view = exercise_detail(&session, "squat", &RuleBasedAdvisor).await.unwrap();
    assert_eq!(view.exercise, "Squat");
    assert_eq!(view.sets.len(), 4);
    let series: Vec<f64> = view.top_sets.iter().map(|t| t.top_weight).collect();
    assert_eq!(series, vec![100.0, 105.0, 110.0]);
    assert!(view.suggestion.text.contains("115 lb"));
    assert_eq!(view.suggestion.source, "rules");
    assert_eq!(view.last_logged(), Some(date("2024-01-05")));
  }

  #[tokio::test]
  async fn test_detail_falls_back_when_advisor_fails() {
    let session = sqlite_session().await;
    log(&session, "2024-01-01", "Bench Press", 135.0, 5).await;

    let view = exercise_detail(&session, "Bench Press", &FailingAdvisor).await.unwrap();
    assert_eq!(view.suggestion.source, "rules");
    assert!(view.suggestion.text.contains("repeating 135 lb"));
  }

  #[tokio::test]
  async fn test_personal_records_view_sorted() {
    let session = sqlite_session().await;
    log(&session, "2024-01-01", "Squat", 200.0, 5).await;
    log(&session, "2024-01-02", "Squat", 225.0, 1).await;
    log(&session, "2024-01-02", "Bench", 135.0, 8).await;

    let prs = personal_records_view(&session).await.unwrap();
    let names: Vec<&str> = prs.iter().map(|p| p.exercise.as_str()).collect();
    assert_eq!(names, vec!["Bench", "Squat"]);
    assert_eq!(prs[1].best_weight, 225.0);
  }

  #[tokio::test]
  async fn test_dashboard_and_exercise_list() {
    let session = sqlite_session().await;
    assert_eq!(dashboard(&session).await.unwrap(), Overview::default());

    log(&session, "2024-01-01", "Squat", 200.0, 5).await;
    log(&session, "2024-01-02", "Bench", 135.0, 8).await;

    let overview = dashboard(&session).await.unwrap();
    assert_eq!(overview.total_sets, 2);
    assert_eq!(overview.exercise_count, 2);
    assert_eq!(overview.last_logged, Some(date("2024-01-02")));

    assert_eq!(list_exercises(&session).await.unwrap(), vec!["Bench", "Squat"]);
  }
}
