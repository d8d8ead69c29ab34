//! Record stores for logged sets
//!
//! The store owns the raw `LoggedSet` rows. Everything else in the crate
//! reads from it and recomputes; nothing writes derived data back.

pub mod sqlite;
pub mod supabase;

use async_trait::async_trait;
use serde::Serialize;

use crate::models::{LoggedSet, NewLoggedSet};

pub use sqlite::SqliteStore;
pub use supabase::SupabaseStore;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("Record store unavailable: {0}")]
  Unavailable(String),

  #[error("Set {0} not found")]
  NotFound(i64),

  #[error("Unexpected store response: {0}")]
  Decode(String),
}

impl From<sqlx::Error> for StoreError {
  fn from(e: sqlx::Error) -> Self {
    StoreError::Unavailable(e.to_string())
  }
}

impl From<reqwest::Error> for StoreError {
  fn from(e: reqwest::Error) -> Self {
    if e.is_decode() {
      StoreError::Decode(e.to_string())
    } else {
      StoreError::Unavailable(e.to_string())
    }
  }
}

impl Serialize for StoreError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Query
/// ---------------------------------------------------------------------------

/// Which sets to read. `owner_id` of None means the single-user partition.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetQuery<'a> {
  pub owner_id: Option<&'a str>,
  pub exercise: Option<&'a str>,
}

impl<'a> SetQuery<'a> {
  pub fn owned_by(owner_id: Option<&'a str>) -> Self {
    Self {
      owner_id,
      exercise: None,
    }
  }

  pub fn exercise(mut self, exercise: &'a str) -> Self {
    self.exercise = Some(exercise);
    self
  }
}

/// ---------------------------------------------------------------------------
/// Store Trait
/// ---------------------------------------------------------------------------

#[async_trait]
pub trait RecordStore: Send + Sync {
  /// Matching sets ordered by (date asc, created_at asc)
  async fn fetch_sets(&self, query: SetQuery<'_>) -> Result<Vec<LoggedSet>, StoreError>;

  /// Distinct exercise names for an owner, sorted
  async fn fetch_exercises(&self, owner_id: Option<&str>) -> Result<Vec<String>, StoreError>;

  /// Persist a new set; the store assigns id and created_at
  async fn insert_set(&self, set: &NewLoggedSet) -> Result<LoggedSet, StoreError>;

  /// Remove exactly one set. `NotFound` if no row matched.
  async fn delete_set(&self, owner_id: Option<&str>, id: i64) -> Result<(), StoreError>;
}
