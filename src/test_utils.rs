//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Mock data factories
//! - An in-memory backend standing in for Supabase
//! - Helper assertions

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::models::{
  ActivityLevel, AssessmentRecord, Goals, NewPost, Post, PostId, Priority, Profile, ProfileRecord,
  Session, Sex, User,
};
use crate::config::{AppConfig, SupabaseConfig};
use crate::state::AppState;
use crate::supabase::{AuthProvider, Backend, BackendError, DataStore, POSTS_LIMIT};

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// App state over a fresh in-memory database. Pass a backend to simulate a
/// configured Supabase project; keep your own `Arc` to inspect it afterwards.
pub async fn mock_app_state(backend: Option<Arc<MockBackend>>) -> AppState {
  let db = setup_test_db().await;
  let config = mock_config(backend.is_some());
  let backend = backend.map(|b| b as Arc<dyn Backend>);
  AppState::with_backend(db, config, backend)
    .await
    .expect("Failed to build app state")
}

pub fn mock_config(configured: bool) -> AppConfig {
  AppConfig {
    supabase: configured.then(|| SupabaseConfig {
      url: "https://abcd.supabase.co".to_string(),
      anon_key: "anon-key".to_string(),
    }),
    site_url: "https://50plus.example".to_string(),
    db_path: PathBuf::from(":memory:"),
  }
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

pub fn mock_profile(sex: Sex, age: i64, height_cm: f64, weight_kg: f64) -> Profile {
  Profile {
    sex,
    age,
    height_cm,
    weight_kg,
    ..Profile::default()
  }
}

/// Goals with exactly the given priorities selected
pub fn mock_goals(activity_level: ActivityLevel, priorities: &[Priority]) -> Goals {
  Goals {
    priorities: priorities.iter().copied().collect(),
    activity_level,
    ..Goals::default()
  }
}

pub fn mock_user() -> User {
  User {
    id: "user-1".to_string(),
    email: Some("pat@example.com".to_string()),
  }
}

/// Session for `mock_user` expiring `expires_in` seconds from now
pub fn mock_session(access_token: &str, expires_in: i64) -> Session {
  Session::new(
    access_token.to_string(),
    format!("{}-refresh", access_token),
    expires_in,
    mock_user(),
  )
  .expect("expiry out of range")
}

/// ---------------------------------------------------------------------------
/// In-Memory Backend
/// ---------------------------------------------------------------------------

#[derive(Default)]
struct MockState {
  profiles: Vec<ProfileRecord>,
  assessments: Vec<AssessmentRecord>,
  posts: Vec<Post>,
  magic_links: Vec<(String, String)>,
  refresh_calls: usize,
}

/// Implements both backend traits against in-process vectors. Upserts replace
/// by key the way the real tables do.
#[derive(Default)]
pub struct MockBackend {
  state: Mutex<MockState>,
  reject_refresh: bool,
  fail_sign_out: bool,
}

impl MockBackend {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn rejecting_refresh(mut self) -> Self {
    self.reject_refresh = true;
    self
  }

  pub fn failing_sign_out(mut self) -> Self {
    self.fail_sign_out = true;
    self
  }

  pub fn profiles(&self) -> Vec<ProfileRecord> {
    self.state.lock().unwrap().profiles.clone()
  }

  pub fn assessments(&self) -> Vec<AssessmentRecord> {
    self.state.lock().unwrap().assessments.clone()
  }

  pub fn posts(&self) -> Vec<Post> {
    self.state.lock().unwrap().posts.clone()
  }

  pub fn magic_links(&self) -> Vec<(String, String)> {
    self.state.lock().unwrap().magic_links.clone()
  }

  pub fn refresh_calls(&self) -> usize {
    self.state.lock().unwrap().refresh_calls
  }
}

fn post_time(n: usize) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap() + Duration::seconds(n as i64)
}

#[async_trait]
impl AuthProvider for MockBackend {
  async fn send_magic_link(&self, email: &str, redirect_to: &str) -> Result<(), BackendError> {
    self
      .state
      .lock()
      .unwrap()
      .magic_links
      .push((email.to_string(), redirect_to.to_string()));
    Ok(())
  }

  async fn get_user(&self, _access_token: &str) -> Result<User, BackendError> {
    Ok(mock_user())
  }

  async fn refresh_session(&self, _refresh_token: &str) -> Result<Session, BackendError> {
    self.state.lock().unwrap().refresh_calls += 1;
    if self.reject_refresh {
      return Err(BackendError::Api {
        status: 400,
        message: "Invalid Refresh Token: Refresh Token Not Found".to_string(),
      });
    }
    Ok(
      Session::new(
        "refreshed-access".to_string(),
        "refreshed-refresh".to_string(),
        3600,
        mock_user(),
      )
      .expect("expiry out of range"),
    )
  }

  async fn sign_out(&self, _access_token: &str) -> Result<(), BackendError> {
    if self.fail_sign_out {
      return Err(BackendError::Api {
        status: 500,
        message: "unavailable".to_string(),
      });
    }
    Ok(())
  }
}

#[async_trait]
impl DataStore for MockBackend {
  async fn upsert_profile(&self, _session: &Session, record: &ProfileRecord) -> Result<(), BackendError> {
    let mut state = self.state.lock().unwrap();
    state.profiles.retain(|p| p.id != record.id);
    state.profiles.push(record.clone());
    Ok(())
  }

  async fn upsert_assessment(
    &self,
    _session: &Session,
    record: &AssessmentRecord,
  ) -> Result<(), BackendError> {
    let mut state = self.state.lock().unwrap();
    state.assessments.retain(|a| a.user_id != record.user_id);
    state.assessments.push(record.clone());
    Ok(())
  }

  async fn insert_post(&self, _session: &Session, post: &NewPost) -> Result<(), BackendError> {
    let mut state = self.state.lock().unwrap();
    let n = state.posts.len();
    state.posts.push(Post {
      id: PostId::Int(n as i64 + 1),
      user_id: Some(post.user_id.clone()),
      content: post.content.clone(),
      created_at: post_time(n),
    });
    Ok(())
  }

  async fn list_posts(&self, _session: Option<&Session>) -> Result<Vec<Post>, BackendError> {
    let mut posts = self.state.lock().unwrap().posts.clone();
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    posts.truncate(POSTS_LIMIT);
    Ok(posts)
  }
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> =
      sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name = 'kv_store'")
        .fetch_all(&pool)
        .await
        .expect("Failed to query tables");

    assert_eq!(tables.len(), 1);

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_mock_factories_create_valid_data() {
    let profile = mock_profile(Sex::Male, 60, 175.0, 85.0);
    assert_eq!(profile.sex, Sex::Male);
    assert_eq!(profile.name, "");

    let goals = mock_goals(ActivityLevel::High, &[Priority::Bone]);
    assert_eq!(goals.priorities.len(), 1);
    assert_eq!(goals.stress, 3);

    let session = mock_session("acc", 3600);
    assert_eq!(session.refresh_token, "acc-refresh");
    assert!(!session.needs_refresh());
  }

  #[tokio::test]
  async fn test_mock_backend_upserts_replace() {
    let backend = MockBackend::new();
    let session = mock_session("acc", 3600);
    let record = ProfileRecord::from_profile("user-1", &Profile::default());

    backend.upsert_profile(&session, &record).await.unwrap();
    backend.upsert_profile(&session, &record).await.unwrap();

    assert_eq!(backend.profiles().len(), 1);
  }
}
