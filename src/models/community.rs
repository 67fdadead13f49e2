use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{Goals, Profile};

const TOKEN_REFRESH_BUFFER_MINUTES: i64 = 5;

/// ---------------------------------------------------------------------------
/// Auth Session
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id: String,
  #[serde(default)]
  pub email: Option<String>,
}

/// A signed-in session as issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  pub access_token: String,
  pub refresh_token: String,
  pub expires_at: DateTime<Utc>,
  pub user: User,
}

impl Session {
  /// Session expiring `expires_in` seconds from now. `None` when that instant
  /// cannot be represented.
  pub fn new(
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    user: User,
  ) -> Option<Self> {
    let expires_at = Duration::try_seconds(expires_in)
      .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))?;
    Some(Self {
      access_token,
      refresh_token,
      expires_at,
      user,
    })
  }

  pub fn needs_refresh(&self) -> bool {
    let buffer = Duration::minutes(TOKEN_REFRESH_BUFFER_MINUTES);
    Utc::now() + buffer >= self.expires_at
  }
}

/// ---------------------------------------------------------------------------
/// Community Posts
/// ---------------------------------------------------------------------------

/// Row id of a post; the table may use either an identity column or a uuid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostId {
  Int(i64),
  Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
  pub id: PostId,
  #[serde(default)]
  pub user_id: Option<String>,
  pub content: String,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
  /// Required by the row-level security policy on `posts`
  pub user_id: String,
  pub content: String,
}

/// ---------------------------------------------------------------------------
/// Cloud Records
/// ---------------------------------------------------------------------------

/// Row written to the `profiles` table, keyed by the auth user id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
  pub id: String,
  pub name: Option<String>,
  pub sex: String,
  pub age: i64,
  pub height_cm: f64,
  pub weight_kg: f64,
  pub menopause: Option<String>,
  pub conditions: Vec<String>,
  pub meds: Option<String>,
}

impl ProfileRecord {
  pub fn from_profile(user_id: &str, profile: &Profile) -> Self {
    Self {
      id: user_id.to_string(),
      name: profile.display_name().map(str::to_string),
      sex: profile.sex.as_str().to_string(),
      age: profile.age,
      height_cm: profile.height_cm,
      weight_kg: profile.weight_kg,
      menopause: Some(profile.menopause.as_str().to_string()),
      conditions: profile.conditions.as_slice().to_vec(),
      meds: profile.medications().map(str::to_string),
    }
  }
}

/// Row written to the `assessments` table, one per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
  pub user_id: String,
  pub goals: Goals,
  pub updated_at: DateTime<Utc>,
}

impl AssessmentRecord {
  pub fn new(user_id: &str, goals: &Goals) -> Self {
    Self {
      user_id: user_id.to_string(),
      goals: goals.clone(),
      updated_at: Utc::now(),
    }
  }
}
