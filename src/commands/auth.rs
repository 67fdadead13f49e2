use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth;
use crate::cloud;
use crate::commands::get_wizard;
use crate::error::AppError;
use crate::models::Session;
use crate::state::AppState;
use crate::supabase::AuthProvider;

/// ---------------------------------------------------------------------------
/// Auth Status
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthStatus {
  pub configured: bool,
  pub is_authenticated: bool,
  pub user_id: Option<String>,
  pub email: Option<String>,
  pub expires_at: Option<DateTime<Utc>>,
}

impl AuthStatus {
  fn new(configured: bool, session: Option<&Session>) -> Self {
    Self {
      configured,
      is_authenticated: session.is_some(),
      user_id: session.map(|s| s.user.id.clone()),
      email: session.and_then(|s| s.user.email.clone()),
      expires_at: session.map(|s| s.expires_at),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Sign-in Commands
/// ---------------------------------------------------------------------------

/// Email a sign-in link that redirects back to the configured site
pub async fn send_magic_link(state: &AppState, email: &str) -> Result<(), AppError> {
  let backend = state.backend()?;
  let email = email.trim();
  if email.is_empty() {
    return Err(AppError::Validation("Email is required".to_string()));
  }

  backend.send_magic_link(email, &state.config.site_url).await?;
  tracing::info!("Magic link sent");
  Ok(())
}

pub async fn complete_sign_in(state: &AppState, redirect_url: &str) -> Result<AuthStatus, AppError> {
  let backend = state.backend()?;
  let session = auth::complete_sign_in(backend, &state.db, &state.sessions, redirect_url).await?;
  Ok(AuthStatus::new(true, Some(&session)))
}

pub async fn get_auth_status(state: &AppState) -> Result<AuthStatus, AppError> {
  let Some(backend) = state.backend.as_deref() else {
    return Ok(AuthStatus::new(false, None));
  };
  let session = auth::get_session(backend, &state.db, &state.sessions).await?;
  Ok(AuthStatus::new(true, session.as_ref()))
}

pub async fn sign_out(state: &AppState) -> Result<AuthStatus, AppError> {
  let backend = state.backend()?;
  auth::sign_out(backend, &state.db, &state.sessions).await?;
  Ok(AuthStatus::new(true, None))
}

/// ---------------------------------------------------------------------------
/// Cloud Save
/// ---------------------------------------------------------------------------

/// Push the locally stored answers to the signed-in user's cloud rows
pub async fn save_to_cloud(state: &AppState) -> Result<(), AppError> {
  let backend = state.backend()?;
  let session = auth::get_session(backend, &state.db, &state.sessions)
    .await?
    .ok_or(AppError::NotSignedIn("save to the cloud"))?;

  let wizard = get_wizard(state).await?;
  cloud::save_to_cloud(backend, &session, &wizard.state.profile, &wizard.state.goals).await
}
