use std::sync::Arc;
use tokio::sync::Mutex;

use crate::auth::SessionManager;
use crate::config::AppConfig;
use crate::db::{self, DbPool};
use crate::error::AppError;
use crate::supabase::{Backend, SupabaseClient};

/// Shared application state handed to every command
pub struct AppState {
  pub db: DbPool,
  /// Absent when cloud features are not configured
  pub backend: Option<Arc<dyn Backend>>,
  pub sessions: SessionManager,
  pub config: AppConfig,
  /// Serializes wizard read-modify-write cycles
  pub(crate) wizard_lock: Mutex<()>,
}

impl AppState {
  /// Open the database, connect the backend if configured and restore any
  /// saved session
  pub async fn initialize(config: AppConfig) -> Result<Self, AppError> {
    let db = db::initialize_db(&config.db_path).await?;

    let backend: Option<Arc<dyn Backend>> = match &config.supabase {
      Some(supabase) => {
        tracing::info!(
          url = %supabase.masked_url(),
          anon_key_len = supabase.anon_key.len(),
          "Supabase configured"
        );
        Some(Arc::new(SupabaseClient::new(supabase)))
      }
      None => {
        tracing::warn!("Supabase env vars missing. Set SUPABASE_URL and SUPABASE_ANON_KEY.");
        None
      }
    };

    Self::with_backend(db, config, backend).await
  }

  pub async fn with_backend(
    db: DbPool,
    config: AppConfig,
    backend: Option<Arc<dyn Backend>>,
  ) -> Result<Self, AppError> {
    let sessions = SessionManager::restore(&db).await?;
    Ok(Self {
      db,
      backend,
      sessions,
      config,
      wizard_lock: Mutex::new(()),
    })
  }

  pub fn backend(&self) -> Result<&dyn Backend, AppError> {
    self.backend.as_deref().ok_or(AppError::BackendNotConfigured)
  }
}
