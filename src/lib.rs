//! 50plus Health & Wellness
//!
//! Assessment wizard, derived nutrition targets and rule-based guidance for
//! people over fifty, with optional Supabase-backed sign-in, cloud save and a
//! community feed.

pub mod auth;
pub mod cloud;
pub mod commands;
pub mod community;
pub mod config;
pub mod db;
pub mod error;
pub mod metrics;
pub mod models;
pub mod recommendations;
pub mod state;
pub mod supabase;
pub mod wizard;

#[cfg(test)]
mod test_utils;

use config::AppConfig;
use error::AppError;
use state::AppState;
use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber. `RUST_LOG` overrides the default `info`
/// level. Safe to call more than once.
pub fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Load `.env`, read configuration and open everything the commands need
pub async fn run() -> Result<AppState, AppError> {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();
  init_tracing();

  let config = AppConfig::from_env()?;
  let state = AppState::initialize(config).await?;
  tracing::info!("Database ready");
  Ok(state)
}
