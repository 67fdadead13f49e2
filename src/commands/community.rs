use crate::auth;
use crate::community::{self, Feed};
use crate::error::AppError;
use crate::state::AppState;

/// ---------------------------------------------------------------------------
/// Community Commands
/// ---------------------------------------------------------------------------

/// Latest posts, or an unavailable feed when cloud features are off
pub async fn list_posts(state: &AppState) -> Result<Feed, AppError> {
  let Some(backend) = state.backend.as_deref() else {
    return Ok(Feed::unavailable());
  };
  let session = auth::get_session(backend, &state.db, &state.sessions).await?;
  community::load_feed(backend, session.as_ref()).await
}

pub async fn create_post(state: &AppState, content: &str) -> Result<Feed, AppError> {
  let backend = state.backend()?;
  let session = auth::get_session(backend, &state.db, &state.sessions).await?;
  community::create_post(backend, session.as_ref(), content).await
}
