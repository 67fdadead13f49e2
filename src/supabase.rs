//! Supabase backend: passwordless auth (GoTrue) and table access (PostgREST)
//!
//! The rest of the crate only sees the [`AuthProvider`] and [`DataStore`]
//! traits, so tests swap in an in-memory backend.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;

use crate::config::SupabaseConfig;
use crate::models::{AssessmentRecord, NewPost, Post, ProfileRecord, Session, User};

/// Feed page size
pub const POSTS_LIMIT: usize = 50;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
  #[error("HTTP request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("Backend error {status}: {message}")]
  Api { status: u16, message: String },

  #[error("Authentication error: {0}")]
  Auth(String),
}

/// Error bodies differ between GoTrue and PostgREST; take whichever field is
/// present.
#[derive(Debug, Deserialize)]
struct ErrorBody {
  message: Option<String>,
  msg: Option<String>,
  error_description: Option<String>,
}

async fn check(response: Response) -> Result<Response, BackendError> {
  let status = response.status();
  if status.is_success() {
    return Ok(response);
  }

  let text = response.text().await.unwrap_or_default();
  let message = serde_json::from_str::<ErrorBody>(&text)
    .ok()
    .and_then(|b| b.message.or(b.msg).or(b.error_description))
    .unwrap_or(text);

  Err(BackendError::Api {
    status: status.as_u16(),
    message,
  })
}

/// ---------------------------------------------------------------------------
/// Collaborator Traits
/// ---------------------------------------------------------------------------

#[async_trait]
pub trait AuthProvider: Send + Sync {
  /// Email a one-time sign-in link that returns the user to `redirect_to`
  async fn send_magic_link(&self, email: &str, redirect_to: &str) -> Result<(), BackendError>;

  async fn get_user(&self, access_token: &str) -> Result<User, BackendError>;

  async fn refresh_session(&self, refresh_token: &str) -> Result<Session, BackendError>;

  async fn sign_out(&self, access_token: &str) -> Result<(), BackendError>;
}

#[async_trait]
pub trait DataStore: Send + Sync {
  async fn upsert_profile(&self, session: &Session, record: &ProfileRecord) -> Result<(), BackendError>;

  /// One assessment per user; conflicts on `user_id` update in place
  async fn upsert_assessment(
    &self,
    session: &Session,
    record: &AssessmentRecord,
  ) -> Result<(), BackendError>;

  async fn insert_post(&self, session: &Session, post: &NewPost) -> Result<(), BackendError>;

  /// Newest first, at most [`POSTS_LIMIT`]
  async fn list_posts(&self, session: Option<&Session>) -> Result<Vec<Post>, BackendError>;
}

/// Both halves of the hosted backend
pub trait Backend: AuthProvider + DataStore {}

impl<T: AuthProvider + DataStore> Backend for T {}

/// ---------------------------------------------------------------------------
/// HTTP Client
/// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TokenResponse {
  access_token: String,
  refresh_token: String,
  expires_in: i64,
  user: User,
}

#[derive(Debug, Clone)]
pub struct SupabaseClient {
  client: Client,
  base_url: String,
  anon_key: String,
}

impl SupabaseClient {
  pub fn new(config: &SupabaseConfig) -> Self {
    Self {
      client: Client::new(),
      base_url: config.url.trim_end_matches('/').to_string(),
      anon_key: config.anon_key.clone(),
    }
  }

  fn auth_url(&self, path: &str) -> String {
    format!("{}/auth/v1/{}", self.base_url, path)
  }

  fn rest_url(&self, table: &str) -> String {
    format!("{}/rest/v1/{}", self.base_url, table)
  }

  /// Attach the project key and a bearer token (the user's, else the anon key)
  fn authorized(&self, request: RequestBuilder, access_token: Option<&str>) -> RequestBuilder {
    request
      .header("apikey", &self.anon_key)
      .bearer_auth(access_token.unwrap_or(self.anon_key.as_str()))
  }

  async fn upsert<T: serde::Serialize + Sync>(
    &self,
    table: &str,
    on_conflict: &str,
    session: &Session,
    body: &T,
  ) -> Result<(), BackendError> {
    tracing::debug!(table, "Upserting row");
    let request = self
      .client
      .post(self.rest_url(table))
      .query(&[("on_conflict", on_conflict)])
      .header("Prefer", "resolution=merge-duplicates,return=minimal")
      .json(body);

    check(self.authorized(request, Some(session.access_token.as_str())).send().await?).await?;
    Ok(())
  }
}

#[async_trait]
impl AuthProvider for SupabaseClient {
  async fn send_magic_link(&self, email: &str, redirect_to: &str) -> Result<(), BackendError> {
    let request = self
      .client
      .post(self.auth_url("otp"))
      .query(&[("redirect_to", redirect_to)])
      .json(&serde_json::json!({ "email": email, "create_user": true }));

    check(self.authorized(request, None).send().await?).await?;
    tracing::info!("Magic link requested");
    Ok(())
  }

  async fn get_user(&self, access_token: &str) -> Result<User, BackendError> {
    let request = self.client.get(self.auth_url("user"));
    let response = check(self.authorized(request, Some(access_token)).send().await?).await?;
    Ok(response.json().await?)
  }

  async fn refresh_session(&self, refresh_token: &str) -> Result<Session, BackendError> {
    let request = self
      .client
      .post(self.auth_url("token"))
      .query(&[("grant_type", "refresh_token")])
      .json(&serde_json::json!({ "refresh_token": refresh_token }));

    let response = check(self.authorized(request, None).send().await?).await?;
    let token: TokenResponse = response.json().await?;
    let expires_in = token.expires_in;
    Session::new(token.access_token, token.refresh_token, expires_in, token.user)
      .ok_or_else(|| BackendError::Auth(format!("Invalid token lifetime: {}", expires_in)))
  }

  async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
    let request = self.client.post(self.auth_url("logout"));
    check(self.authorized(request, Some(access_token)).send().await?).await?;
    Ok(())
  }
}

#[async_trait]
impl DataStore for SupabaseClient {
  async fn upsert_profile(&self, session: &Session, record: &ProfileRecord) -> Result<(), BackendError> {
    self.upsert("profiles", "id", session, record).await
  }

  async fn upsert_assessment(
    &self,
    session: &Session,
    record: &AssessmentRecord,
  ) -> Result<(), BackendError> {
    self.upsert("assessments", "user_id", session, record).await
  }

  async fn insert_post(&self, session: &Session, post: &NewPost) -> Result<(), BackendError> {
    let request = self
      .client
      .post(self.rest_url("posts"))
      .header("Prefer", "return=minimal")
      .json(post);

    check(self.authorized(request, Some(session.access_token.as_str())).send().await?).await?;
    Ok(())
  }

  async fn list_posts(&self, session: Option<&Session>) -> Result<Vec<Post>, BackendError> {
    let limit = POSTS_LIMIT.to_string();
    let request = self.client.get(self.rest_url("posts")).query(&[
      ("select", "*"),
      ("order", "created_at.desc"),
      ("limit", limit.as_str()),
    ]);

    let token = session.map(|s| s.access_token.as_str());
    let response = check(self.authorized(request, token).send().await?).await?;
    Ok(response.json().await?)
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
