use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use std::collections::BTreeSet;
use url::Url;

use super::{RecordStore, SetQuery, StoreError};
use crate::models::set::normalize_exercise_name;
use crate::models::{LoggedSet, NewLoggedSet};

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const TABLE: &str = "workouts";
/// Single-user tables have no `owner_id` column, so never name it explicitly
const SET_COLUMNS: &str = "*";

/// Hosted PostgREST store (Supabase)
pub struct SupabaseStore {
  client: Client,
  table_url: Url,
  anon_key: String,
  /// Signed-in user's token; row-level security scopes rows by it
  access_token: Option<String>,
}

impl SupabaseStore {
  pub fn new(base_url: &str, anon_key: impl Into<String>) -> Result<Self, StoreError> {
    let base = Url::parse(base_url)
      .map_err(|e| StoreError::Unavailable(format!("Invalid Supabase URL: {}", e)))?;
    let table_url = base
      .join(&format!("rest/v1/{}", TABLE))
      .map_err(|e| StoreError::Unavailable(format!("Invalid Supabase URL: {}", e)))?;

    Ok(Self {
      client: Client::new(),
      table_url,
      anon_key: anon_key.into(),
      access_token: None,
    })
  }

  pub fn with_access_token(mut self, access_token: Option<String>) -> Self {
    self.access_token = access_token;
    self
  }

  fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
    let bearer = self.access_token.as_deref().unwrap_or(&self.anon_key);
    request
      .header("apikey", &self.anon_key)
      .header("Authorization", format!("Bearer {}", bearer))
  }

  /// Without an owner the table is single-user and is read unfiltered
  fn owner_filter(owner_id: Option<&str>) -> Option<(&'static str, String)> {
    owner_id.map(|owner| ("owner_id", format!("eq.{}", owner)))
  }
}

/// PostgREST `ilike` pattern matching one name exactly, ignoring case
fn exact_ilike(name: &str) -> String {
  let mut pattern = String::from("ilike.");
  for c in name.chars() {
    if matches!(c, '%' | '_' | '\\') {
      pattern.push('\\');
    }
    pattern.push(c);
  }
  pattern
}

/// Error details PostgREST returns on failure
#[derive(Debug, Deserialize)]
struct PostgrestError {
  message: String,
}

async fn check_status(response: Response, action: &str) -> Result<Response, StoreError> {
  if response.status().is_success() {
    return Ok(response);
  }

  let status = response.status();
  let body = response.text().await.unwrap_or_default();
  let detail = serde_json::from_str::<PostgrestError>(&body)
    .map(|e| e.message)
    .unwrap_or(body);

  Err(StoreError::Unavailable(format!(
    "Failed to {} (HTTP {}): {}",
    action, status, detail
  )))
}

#[derive(Debug, Deserialize)]
struct ExerciseRow {
  exercise: String,
}

#[async_trait]
impl RecordStore for SupabaseStore {
  async fn fetch_sets(&self, query: SetQuery<'_>) -> Result<Vec<LoggedSet>, StoreError> {
    let mut params: Vec<(&str, String)> = vec![
      ("select", SET_COLUMNS.to_string()),
      ("order", "date.asc,created_at.asc".to_string()),
    ];
    params.extend(Self::owner_filter(query.owner_id));
    if let Some(exercise) = query.exercise {
      params.push(("exercise", exact_ilike(exercise)));
    }

    let response = self
      .authorized(self.client.get(self.table_url.clone()))
      .query(&params)
      .send()
      .await?;
    let response = check_status(response, "fetch sets").await?;

    let mut sets: Vec<LoggedSet> = response.json().await?;
    for set in &mut sets {
      set.exercise = normalize_exercise_name(&set.exercise);
    }
    tracing::debug!(count = sets.len(), exercise = ?query.exercise, "Fetched sets from Supabase");
    Ok(sets)
  }

  async fn fetch_exercises(&self, owner_id: Option<&str>) -> Result<Vec<String>, StoreError> {
    let mut params = vec![("select", "exercise".to_string())];
    params.extend(Self::owner_filter(owner_id));

    let response = self
      .authorized(self.client.get(self.table_url.clone()))
      .query(&params)
      .send()
      .await?;
    let response = check_status(response, "fetch exercises").await?;

    let rows: Vec<ExerciseRow> = response.json().await?;
    let unique: BTreeSet<String> = rows
      .into_iter()
      .map(|r| normalize_exercise_name(&r.exercise))
      .filter(|e| !e.is_empty())
      .collect();

    Ok(unique.into_iter().collect())
  }

  async fn insert_set(&self, set: &NewLoggedSet) -> Result<LoggedSet, StoreError> {
    let response = self
      .authorized(self.client.post(self.table_url.clone()))
      .header("Prefer", "return=representation")
      .json(set)
      .send()
      .await?;
    let response = check_status(response, "insert set").await?;

    let mut inserted: Vec<LoggedSet> = response.json().await?;
    let mut stored = inserted
      .pop()
      .ok_or_else(|| StoreError::Decode("Insert returned no rows".to_string()))?;
    stored.exercise = normalize_exercise_name(&stored.exercise);

    tracing::info!(id = stored.id, exercise = %stored.exercise, "Logged set to Supabase");
    Ok(stored)
  }

  async fn delete_set(&self, owner_id: Option<&str>, id: i64) -> Result<(), StoreError> {
    let mut params = vec![("id", format!("eq.{}", id)), ("select", "id".to_string())];
    params.extend(Self::owner_filter(owner_id));

    let response = self
      .authorized(self.client.delete(self.table_url.clone()))
      .header("Prefer", "return=representation")
      .query(&params)
      .send()
      .await?;
    let response = check_status(response, "delete set").await?;

    let deleted: Vec<serde_json::Value> = response.json().await?;
    if deleted.is_empty() {
      return Err(StoreError::NotFound(id));
    }

    tracing::info!(id, "Deleted set from Supabase");
    Ok(())
  }
}
