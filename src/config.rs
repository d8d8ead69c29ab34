//! Environment-driven configuration
//!
//! Values come from the process environment, optionally seeded from a
//! `.env` file. Blank values count as unset.

use std::env;
use std::path::PathBuf;

use crate::db::default_db_path;
use crate::error::AppError;
use crate::units::WeightUnit;

/// Where sets are persisted
#[derive(Debug, Clone, PartialEq)]
pub enum StoreConfig {
  Sqlite {
    path: PathBuf,
  },
  Supabase {
    url: String,
    anon_key: String,
    access_token: Option<String>,
  },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
  pub store: StoreConfig,
  pub user_id: Option<String>,
  pub default_unit: WeightUnit,
  pub anthropic_api_key: Option<String>,
}

fn var(name: &str) -> Option<String> {
  env::var(name)
    .ok()
    .map(|v| v.trim().to_string())
    .filter(|v| !v.is_empty())
}

impl AppConfig {
  /// Load `.env` (if present) then read the environment
  pub fn load() -> Result<Self, AppError> {
    dotenvy::dotenv().ok();
    Self::from_env()
  }

  pub fn from_env() -> Result<Self, AppError> {
    let store = match (var("SUPABASE_URL"), var("SUPABASE_ANON_KEY")) {
      (Some(url), Some(anon_key)) => StoreConfig::Supabase {
        url,
        anon_key,
        access_token: var("SUPABASE_ACCESS_TOKEN"),
      },
      (Some(_), None) => {
        return Err(AppError::Config(
          "SUPABASE_URL is set but SUPABASE_ANON_KEY is missing".to_string(),
        ))
      }
      _ => {
        let path = match var("OVERLOAD_DB_PATH") {
          Some(p) => PathBuf::from(p),
          None => default_db_path().map_err(|e| AppError::Config(e.to_string()))?,
        };
        StoreConfig::Sqlite { path }
      }
    };

    let default_unit = match var("OVERLOAD_DEFAULT_UNIT") {
      Some(u) => u.parse().map_err(AppError::Config)?,
      None => WeightUnit::default(),
    };

    Ok(Self {
      store,
      user_id: var("OVERLOAD_USER_ID"),
      default_unit,
      anthropic_api_key: var("ANTHROPIC_API_KEY"),
    })
  }
}
