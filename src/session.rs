//! Request-scoped context
//!
//! A `Session` bundles who is acting and where their sets live. It is built
//! once per invocation and passed explicitly into every operation.

use std::sync::Arc;

use crate::config::{AppConfig, StoreConfig};
use crate::db::initialize_db;
use crate::error::AppError;
use crate::store::{RecordStore, SqliteStore, SupabaseStore};

#[derive(Clone)]
pub struct Session {
  /// Owner of the rows this session reads and writes; None for single-user stores
  pub user_id: Option<String>,
  pub store: Arc<dyn RecordStore>,
}

impl Session {
  pub fn new(user_id: Option<String>, store: Arc<dyn RecordStore>) -> Self {
    Self { user_id, store }
  }

  /// Open the configured store
  pub async fn open(config: &AppConfig) -> Result<Self, AppError> {
    let store: Arc<dyn RecordStore> = match &config.store {
      StoreConfig::Sqlite { path } => {
        let pool = initialize_db(path)
          .await
          .map_err(|e| AppError::StoreUnavailable(e.to_string()))?;
        Arc::new(SqliteStore::new(pool))
      }
      StoreConfig::Supabase {
        url,
        anon_key,
        access_token,
      } => {
        tracing::info!(url = %url, "Using Supabase record store");
        Arc::new(SupabaseStore::new(url, anon_key.clone())?.with_access_token(access_token.clone()))
      }
    };

    Ok(Self::new(config.user_id.clone(), store))
  }

  pub fn owner(&self) -> Option<&str> {
    self.user_id.as_deref()
  }
}

impl std::fmt::Debug for Session {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Session").field("user_id", &self.user_id).finish_non_exhaustive()
  }
}
