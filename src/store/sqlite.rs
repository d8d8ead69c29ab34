use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

use super::{RecordStore, SetQuery, StoreError};
use crate::db::DbPool;
use crate::models::{LoggedSet, NewLoggedSet};

/// Local single-file store
pub struct SqliteStore {
  pool: DbPool,
}

impl SqliteStore {
  pub fn new(pool: DbPool) -> Self {
    Self { pool }
  }

  pub fn pool(&self) -> &DbPool {
    &self.pool
  }
}

/// Fixed-width timestamps keep `ORDER BY created_at` chronological
fn format_created_at(at: DateTime<Utc>) -> String {
  at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[async_trait]
impl RecordStore for SqliteStore {
  async fn fetch_sets(&self, query: SetQuery<'_>) -> Result<Vec<LoggedSet>, StoreError> {
    let sets = sqlx::query_as::<_, LoggedSet>(
      r#"
      SELECT id, owner_id, date, exercise, weight_lb, reps, rpe, notes, created_at
      FROM workouts
      WHERE owner_id IS ?1
        AND (?2 IS NULL OR exercise = ?2)
      ORDER BY date ASC, created_at ASC, id ASC
      "#,
    )
    .bind(query.owner_id)
    .bind(query.exercise)
    .fetch_all(&self.pool)
    .await?;

    tracing::debug!(count = sets.len(), exercise = ?query.exercise, "Fetched sets");
    Ok(sets)
  }

  async fn fetch_exercises(&self, owner_id: Option<&str>) -> Result<Vec<String>, StoreError> {
    let exercises: Vec<String> = sqlx::query_scalar(
      "SELECT DISTINCT exercise FROM workouts WHERE owner_id IS ?1 ORDER BY exercise ASC",
    )
    .bind(owner_id)
    .fetch_all(&self.pool)
    .await?;

    Ok(exercises)
  }

  async fn insert_set(&self, set: &NewLoggedSet) -> Result<LoggedSet, StoreError> {
    let created_at = Utc::now().trunc_subsecs(6);

    let result = sqlx::query(
      r#"
      INSERT INTO workouts (owner_id, date, exercise, weight_lb, reps, rpe, notes, created_at)
      VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
      "#,
    )
    .bind(&set.owner_id)
    .bind(set.date)
    .bind(&set.exercise)
    .bind(set.weight)
    .bind(set.reps)
    .bind(&set.rpe)
    .bind(&set.notes)
    .bind(format_created_at(created_at))
    .execute(&self.pool)
    .await?;

    let id = result.last_insert_rowid();
    tracing::info!(id, exercise = %set.exercise, weight = set.weight, reps = set.reps, "Logged set");

    Ok(LoggedSet {
      id,
      owner_id: set.owner_id.clone(),
      date: set.date,
      exercise: set.exercise.clone(),
      weight: set.weight,
      reps: set.reps,
      rpe: set.rpe.clone(),
      notes: set.notes.clone(),
      created_at,
    })
  }

  async fn delete_set(&self, owner_id: Option<&str>, id: i64) -> Result<(), StoreError> {
    let result = sqlx::query("DELETE FROM workouts WHERE id = ?1 AND owner_id IS ?2")
      .bind(id)
      .bind(owner_id)
      .execute(&self.pool)
      .await?;

    if result.rows_affected() == 0 {
      return Err(StoreError::NotFound(id));
    }

    tracing::info!(id, "Deleted set");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{mock_new_set, setup_test_db, teardown_test_db};

  #[tokio::test]
  async fn test_insert_then_fetch_orders_by_date_then_insertion() {
    let pool = setup_test_db().await;
    let store = SqliteStore::new(pool.clone());

    store.insert_set(&mock_new_set("2024-01-03", "Squat", 205.0, 5)).await.unwrap();
    store.insert_set(&mock_new_set("2024-01-01", "Squat", 195.0, 5)).await.unwrap();
    store.insert_set(&mock_new_set("2024-01-03", "Squat", 215.0, 3)).await.unwrap();
    store.insert_set(&mock_new_set("2024-01-02", "Bench", 135.0, 8)).await.unwrap();

    let squats = store
      .fetch_sets(SetQuery::default().exercise("Squat"))
      .await
      .unwrap();
    let weights: Vec<f64> = squats.iter().map(|s| s.weight).collect();
    assert_eq!(weights, vec![195.0, 205.0, 215.0]);

    let all = store.fetch_sets(SetQuery::default()).await.unwrap();
    assert_eq!(all.len(), 4);
    assert_eq!(all[1].exercise, "Bench");

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_insert_round_trips_optional_fields() {
    let pool = setup_test_db().await;
    let store = SqliteStore::new(pool.clone());

    let mut new_set = mock_new_set("2024-01-01", "Deadlift", 315.0, 3);
    new_set.rpe = Some("8.5".to_string());
    new_set.notes = Some("belt".to_string());
    let stored = store.insert_set(&new_set).await.unwrap();

    let fetched = store.fetch_sets(SetQuery::default()).await.unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].id, stored.id);
    assert_eq!(fetched[0].rpe.as_deref(), Some("8.5"));
    assert_eq!(fetched[0].notes.as_deref(), Some("belt"));
    assert_eq!(fetched[0].reps, 3);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_fetch_exercises_distinct_sorted() {
    let pool = setup_test_db().await;
    let store = SqliteStore::new(pool.clone());

    for name in ["Squat", "Bench", "Squat", "Deadlift"] {
      store.insert_set(&mock_new_set("2024-01-01", name, 100.0, 5)).await.unwrap();
    }

    let exercises = store.fetch_exercises(None).await.unwrap();
    assert_eq!(exercises, vec!["Bench", "Deadlift", "Squat"]);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_owner_partitions_are_isolated() {
    let pool = setup_test_db().await;
    let store = SqliteStore::new(pool.clone());

    let mut alice = mock_new_set("2024-01-01", "Squat", 200.0, 5);
    alice.owner_id = Some("alice".to_string());
    let alice_set = store.insert_set(&alice).await.unwrap();
    store.insert_set(&mock_new_set("2024-01-01", "Bench", 135.0, 5)).await.unwrap();

    let for_alice = store.fetch_sets(SetQuery::owned_by(Some("alice"))).await.unwrap();
    assert_eq!(for_alice.len(), 1);
    assert_eq!(for_alice[0].exercise, "Squat");

    let anonymous = store.fetch_sets(SetQuery::owned_by(None)).await.unwrap();
    assert_eq!(anonymous.len(), 1);
    assert_eq!(anonymous[0].exercise, "Bench");

    // Another owner cannot delete alice's row
    assert!(matches!(
      store.delete_set(Some("bob"), alice_set.id).await,
      Err(StoreError::NotFound(_))
    ));
    store.delete_set(Some("alice"), alice_set.id).await.unwrap();

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_delete_missing_row_is_not_found() {
    let pool = setup_test_db().await;
    let store = SqliteStore::new(pool.clone());

    let stored = store.insert_set(&mock_new_set("2024-01-01", "Squat", 200.0, 5)).await.unwrap();
    store.delete_set(None, stored.id).await.unwrap();

    match store.delete_set(None, stored.id).await {
      Err(StoreError::NotFound(id)) => assert_eq!(id, stored.id),
      other => panic!("expected NotFound, got {:?}", other),
    }

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_closed_pool_reports_unavailable() {
    let pool = setup_test_db().await;
    let store = SqliteStore::new(pool.clone());
    pool.close().await;

    assert!(matches!(
      store.fetch_sets(SetQuery::default()).await,
      Err(StoreError::Unavailable(_))
    ));
  }
}
