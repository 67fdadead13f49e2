use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::fs;
use std::path::Path;

use crate::error::AppError;

pub type DbPool = SqlitePool;

/// Storage keys. Values are JSON documents.
pub const STEP_KEY: &str = "50plus.step";
pub const PROFILE_KEY: &str = "50plus.profile";
pub const GOALS_KEY: &str = "50plus.goals";
pub const SESSION_KEY: &str = "50plus.session";

/// Keys cleared by "Reset"
pub const WIZARD_KEYS: [&str; 3] = [STEP_KEY, PROFILE_KEY, GOALS_KEY];

/// ---------------------------------------------------------------------------
/// Pool Setup
/// ---------------------------------------------------------------------------

/// Open (creating if needed) the database file and run migrations
pub async fn initialize_db(db_path: &Path) -> Result<DbPool, AppError> {
  if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent)
      .map_err(|e| AppError::Database(format!("Failed to create data dir: {}", e)))?;
  }

  let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
  tracing::info!(path = %db_path.display(), "Initializing database");

  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(&db_url)
    .await?;

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .map_err(|e| AppError::Database(format!("Migration failed: {}", e)))?;

  tracing::info!("Database initialized successfully");
  Ok(pool)
}

/// ---------------------------------------------------------------------------
/// Key-Value Store
/// ---------------------------------------------------------------------------

/// Store `value` as JSON under `key`, replacing any previous value
pub async fn save_value<T: Serialize>(db: &DbPool, key: &str, value: &T) -> Result<(), AppError> {
  let json = serde_json::to_string(value)
    .map_err(|e| AppError::Database(format!("Failed to encode {}: {}", key, e)))?;

  sqlx::query(
    r#"
    INSERT INTO kv_store (key, value)
    VALUES (?1, ?2)
    ON CONFLICT(key) DO UPDATE SET
      value = excluded.value,
      updated_at = CURRENT_TIMESTAMP
    "#,
  )
  .bind(key)
  .bind(json)
  .execute(db)
  .await?;

  Ok(())
}

/// Load the value under `key`. A missing row or a document that no longer
/// parses yields `default`.
pub async fn load_value<T: DeserializeOwned>(db: &DbPool, key: &str, default: T) -> Result<T, AppError> {
  let raw: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
    .bind(key)
    .fetch_optional(db)
    .await?;

  let Some(raw) = raw else {
    return Ok(default);
  };

  match serde_json::from_str(&raw) {
    Ok(value) => Ok(value),
    Err(e) => {
      tracing::warn!(key, error = %e, "Stored value is corrupt, using default");
      Ok(default)
    }
  }
}

pub async fn remove_values(db: &DbPool, keys: &[&str]) -> Result<(), AppError> {
  for key in keys {
    sqlx::query("DELETE FROM kv_store WHERE key = ?1")
      .bind(key)
      .execute(db)
      .await?;
  }
  Ok(())
}
