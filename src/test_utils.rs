//! Test utilities and helpers for integration and unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Mock data factories
//! - Helper assertions

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::models::{LoggedSet, NewLoggedSet};
use crate::session::Session;
use crate::store::SqliteStore;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Single-user session over a fresh in-memory store
pub async fn sqlite_session() -> Session {
  let pool = setup_test_db().await;
  Session::new(None, Arc::new(SqliteStore::new(pool)))
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

pub fn date(s: &str) -> NaiveDate {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
}

fn base_time() -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
}

/// A stored set with created_at derived from its id
pub fn mock_logged_set(id: i64, day: &str, exercise: &str, weight: f64, reps: u32) -> LoggedSet {
  mock_logged_set_at(id, day, exercise, weight, reps, id)
}

/// A stored set with an explicit insertion offset in minutes
pub fn mock_logged_set_at(
  id: i64,
  day: &str,
  exercise: &str,
  weight: f64,
  reps: u32,
  minutes: i64,
) -> LoggedSet {
  LoggedSet {
    id,
    owner_id: None,
    date: date(day),
    exercise: exercise.to_string(),
    weight,
    reps,
    rpe: None,
    notes: None,
    created_at: base_time() + Duration::minutes(minutes),
  }
}

/// One set per consecutive day, weights in order
pub fn mock_series(exercise: &str, weights: &[f64]) -> Vec<LoggedSet> {
  let start = date("2024-01-01");
  weights
    .iter()
    .enumerate()
    .map(|(i, &weight)| {
      let day = (start + Duration::days(i as i64)).format("%Y-%m-%d").to_string();
      mock_logged_set(i as i64 + 1, &day, exercise, weight, 5)
    })
    .collect()
}

pub fn mock_new_set(day: &str, exercise: &str, weight: f64, reps: u32) -> NewLoggedSet {
  NewLoggedSet {
    owner_id: None,
    date: date(day),
    exercise: exercise.to_string(),
    weight,
    reps,
    rpe: None,
    notes: None,
  }
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> =
      sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name = 'workouts'")
        .fetch_all(&pool)
        .await
        .expect("Failed to query tables");

    assert_eq!(tables.len(), 1);

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_mock_series_uses_consecutive_days() {
    let sets = mock_series("Squat", &[100.0, 105.0, 110.0]);
    assert_eq!(sets.len(), 3);
    assert_eq!(sets[0].date, date("2024-01-01"));
    assert_eq!(sets[2].date, date("2024-01-03"));
    assert!(sets[0].created_at < sets[1].created_at);
  }
}
