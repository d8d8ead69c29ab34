use directories::ProjectDirs;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::fs;
use std::path::{Path, PathBuf};

pub type DbPool = SqlitePool;

/// Default database location
/// Stored in the platform data dir, e.g. ~/.local/share/overload-log/overload-log.db
pub fn default_db_path() -> Result<PathBuf, Box<dyn std::error::Error + Send + Sync>> {
  let dirs = ProjectDirs::from("", "", "overload-log")
    .ok_or("Failed to resolve a data directory for this platform")?;
  Ok(dirs.data_dir().join("overload-log.db"))
}

/// Initialize the database connection pool and run migrations
pub async fn initialize_db(db_path: &Path) -> Result<DbPool, Box<dyn std::error::Error + Send + Sync>> {
  // Create directory if it doesn't exist
  if let Some(parent) = db_path.parent() {
    if !parent.as_os_str().is_empty() {
      fs::create_dir_all(parent)?;
    }
  }

  let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

  tracing::info!(path = %db_path.display(), "Initializing database");

  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(&db_url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  tracing::info!("Database initialized successfully");

  Ok(pool)
}
