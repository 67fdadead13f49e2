//! Community feed

use serde::Serialize;

use crate::error::AppError;
use crate::models::{NewPost, Post, Session};
use crate::supabase::DataStore;

/// What the feed shows. `configured` is false when cloud features are off,
/// in which case there are never any posts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feed {
  pub configured: bool,
  pub posts: Vec<Post>,
}

impl Feed {
  pub fn unavailable() -> Self {
    Self {
      configured: false,
      posts: Vec::new(),
    }
  }
}

pub async fn load_feed<D: DataStore + ?Sized>(
  store: &D,
  session: Option<&Session>,
) -> Result<Feed, AppError> {
  let posts = store.list_posts(session).await?;
  Ok(Feed {
    configured: true,
    posts,
  })
}

/// Publish a post for the signed-in user and return the refreshed feed.
pub async fn create_post<D: DataStore + ?Sized>(
  store: &D,
  session: Option<&Session>,
  content: &str,
) -> Result<Feed, AppError> {
  let content = content.trim();
  if content.is_empty() {
    return Err(AppError::Validation("Post cannot be empty".to_string()));
  }
  let session = session.ok_or(AppError::NotSignedIn("post"))?;

  let post = NewPost {
    user_id: session.user.id.clone(),
    content: content.to_string(),
  };
  store.insert_post(session, &post).await?;
  tracing::info!(user_id = %session.user.id, "Post created");

  load_feed(store, Some(session)).await
}
