//! Session lifecycle for passwordless sign-in
//!
//! The current session lives in a watch channel so any number of listeners
//! can follow sign-in/sign-out. The session is also persisted locally so it
//! survives restarts.

use tokio::sync::{watch, Mutex};

use crate::db::{self, DbPool, SESSION_KEY};
use crate::error::AppError;
use crate::models::Session;
use crate::supabase::{AuthProvider, BackendError};

/// ---------------------------------------------------------------------------
/// Session Manager
/// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct SessionManager {
  tx: watch::Sender<Option<Session>>,
  /// Held while a token refresh is in flight
  refresh_lock: Mutex<()>,
}

impl SessionManager {
  pub fn new(initial: Option<Session>) -> Self {
    let (tx, _rx) = watch::channel(initial);
    Self {
      tx,
      refresh_lock: Mutex::new(()),
    }
  }

  /// Load whatever session was persisted on a previous run
  pub async fn restore(db: &DbPool) -> Result<Self, AppError> {
    let session: Option<Session> = db::load_value(db, SESSION_KEY, None).await?;
    if let Some(s) = &session {
      tracing::info!(user_id = %s.user.id, "Restored saved session");
    }
    Ok(Self::new(session))
  }

  pub fn current(&self) -> Option<Session> {
    self.tx.borrow().clone()
  }

  /// Receive every subsequent session change
  pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
    self.tx.subscribe()
  }

  fn replace(&self, session: Option<Session>) {
    self.tx.send_replace(session);
  }
}

/// ---------------------------------------------------------------------------
/// Magic Link Redirect
/// ---------------------------------------------------------------------------

/// Tokens carried in the fragment of the magic-link redirect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTokens {
  pub access_token: String,
  pub refresh_token: String,
  pub expires_in: i64,
}

/// Parse `https://site/#access_token=...&refresh_token=...&expires_in=3600`
pub fn parse_redirect(redirect_url: &str) -> Result<RedirectTokens, BackendError> {
  let url = url::Url::parse(redirect_url)
    .map_err(|e| BackendError::Auth(format!("Invalid redirect URL: {}", e)))?;

  let fragment = url
    .fragment()
    .ok_or_else(|| BackendError::Auth("Redirect URL has no token fragment".to_string()))?;

  let mut access_token = None;
  let mut refresh_token = None;
  let mut expires_in = None;

  for (key, value) in url::form_urlencoded::parse(fragment.as_bytes()) {
    match key.as_ref() {
      "access_token" => access_token = Some(value.into_owned()),
      "refresh_token" => refresh_token = Some(value.into_owned()),
      "expires_in" => expires_in = Some(parse_expires_in(&value)?),
      "error_description" => return Err(BackendError::Auth(value.into_owned())),
      _ => {}
    }
  }

  match (access_token, refresh_token) {
    (Some(access_token), Some(refresh_token)) => Ok(RedirectTokens {
      access_token,
      refresh_token,
      expires_in: expires_in.unwrap_or(3600),
    }),
    _ => Err(BackendError::Auth("Redirect URL is missing tokens".to_string())),
  }
}

/// Token lifetime in seconds; must be a non-negative integer
fn parse_expires_in(value: &str) -> Result<i64, BackendError> {
  value
    .parse::<i64>()
    .ok()
    .filter(|secs| *secs >= 0)
    .ok_or_else(|| BackendError::Auth(format!("Invalid expires_in: {}", value)))
}

/// ---------------------------------------------------------------------------
/// Flows
/// ---------------------------------------------------------------------------

/// Finish sign-in from the magic-link redirect: verify the token, persist the
/// session and notify subscribers.
pub async fn complete_sign_in<A: AuthProvider + ?Sized>(
  auth: &A,
  db: &DbPool,
  sessions: &SessionManager,
  redirect_url: &str,
) -> Result<Session, AppError> {
  let tokens = parse_redirect(redirect_url)?;
  let user = auth.get_user(&tokens.access_token).await?;

  let expires_in = tokens.expires_in;
  let session = Session::new(tokens.access_token, tokens.refresh_token, expires_in, user)
    .ok_or_else(|| BackendError::Auth(format!("Invalid expires_in: {}", expires_in)))?;
  db::save_value(db, SESSION_KEY, &session).await?;
  sessions.replace(Some(session.clone()));

  tracing::info!(user_id = %session.user.id, "Signed in");
  Ok(session)
}

/// Current session, refreshed first if it is about to expire. A refresh the
/// backend rejects ends the session. Concurrent callers share one refresh.
pub async fn get_session<A: AuthProvider + ?Sized>(
  auth: &A,
  db: &DbPool,
  sessions: &SessionManager,
) -> Result<Option<Session>, AppError> {
  match sessions.current() {
    None => return Ok(None),
    Some(session) if !session.needs_refresh() => return Ok(Some(session)),
    Some(_) => {}
  }

  let _guard = sessions.refresh_lock.lock().await;

  // Another caller may have refreshed or signed out while we waited
  let Some(session) = sessions.current() else {
    return Ok(None);
  };
  if !session.needs_refresh() {
    return Ok(Some(session));
  }

  match auth.refresh_session(&session.refresh_token).await {
    Ok(refreshed) => {
      db::save_value(db, SESSION_KEY, &refreshed).await?;
      sessions.replace(Some(refreshed.clone()));
      tracing::info!("Session auto-refreshed");
      Ok(Some(refreshed))
    }
    Err(BackendError::Api { status, message }) => {
      tracing::warn!(status, %message, "Session refresh rejected, signing out");
      clear_session(db, sessions).await?;
      Ok(None)
    }
    Err(e) => Err(e.into()),
  }
}

/// Revoke the session remotely (best effort) and forget it locally
pub async fn sign_out<A: AuthProvider + ?Sized>(
  auth: &A,
  db: &DbPool,
  sessions: &SessionManager,
) -> Result<(), AppError> {
  if let Some(session) = sessions.current() {
    if let Err(e) = auth.sign_out(&session.access_token).await {
      tracing::warn!(error = %e, "Remote sign-out failed");
    }
  }
  clear_session(db, sessions).await?;
  tracing::info!("Signed out");
  Ok(())
}

async fn clear_session(db: &DbPool, sessions: &SessionManager) -> Result<(), AppError> {
  db::remove_values(db, &[SESSION_KEY]).await?;
  sessions.replace(None);
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{mock_session, setup_test_db, teardown_test_db, MockBackend};

  const REDIRECT: &str =
    "https://50plus.example/#access_token=acc&expires_in=3600&refresh_token=ref&token_type=bearer&type=magiclink";

  #[test]
  fn test_parse_redirect() {
    let tokens = parse_redirect(REDIRECT).unwrap();
    assert_eq!(tokens.access_token, "acc");
    assert_eq!(tokens.refresh_token, "ref");
    assert_eq!(tokens.expires_in, 3600);
  }

  #[test]
  fn test_parse_redirect_error_fragment() {
    let err = parse_redirect(
      "https://50plus.example/#error=access_denied&error_code=otp_expired&error_description=Email+link+is+invalid+or+has+expired",
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Authentication error: Email link is invalid or has expired");
  }

  #[test]
  fn test_parse_redirect_without_fragment() {
    assert!(parse_redirect("https://50plus.example/").is_err());
    assert!(parse_redirect("https://50plus.example/#access_token=only").is_err());
  }

  #[test]
  fn test_parse_redirect_rejects_bad_expiry() {
    for bad in ["soon", "-60", "1.5", ""] {
      let url = format!("https://50plus.example/#access_token=a&refresh_token=r&expires_in={}", bad);
      let err = parse_redirect(&url).unwrap_err();
      assert!(matches!(err, BackendError::Auth(_)), "accepted expires_in={:?}", bad);
    }

    let tokens = parse_redirect("https://50plus.example/#access_token=a&refresh_token=r").unwrap();
    assert_eq!(tokens.expires_in, 3600);
  }

  #[tokio::test]
  async fn test_complete_sign_in_rejects_overflowing_expiry() {
    let pool = setup_test_db().await;
    let backend = MockBackend::new();
    let sessions = SessionManager::new(None);

    let err = complete_sign_in(
      &backend,
      &pool,
      &sessions,
      "https://50plus.example/#access_token=a&refresh_token=r&expires_in=9223372036854775807",
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::Backend(BackendError::Auth(_))));
    assert_eq!(sessions.current(), None);
    let restored = SessionManager::restore(&pool).await.unwrap();
    assert_eq!(restored.current(), None);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_complete_sign_in_persists_and_notifies() {
    let pool = setup_test_db().await;
    let backend = MockBackend::new();
    let sessions = SessionManager::new(None);
    let mut rx = sessions.subscribe();

    let session = complete_sign_in(&backend, &pool, &sessions, REDIRECT).await.unwrap();
    assert_eq!(session.user.id, "user-1");

    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().as_ref(), Some(&session));

    let restored = SessionManager::restore(&pool).await.unwrap();
    assert_eq!(restored.current(), Some(session));

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_get_session_keeps_fresh_session() {
    let pool = setup_test_db().await;
    let backend = MockBackend::new();
    let session = mock_session("fresh", 3600);
    let sessions = SessionManager::new(Some(session.clone()));

    let current = get_session(&backend, &pool, &sessions).await.unwrap();
    assert_eq!(current, Some(session));
    assert_eq!(backend.refresh_calls(), 0);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_get_session_refreshes_expiring_session() {
    let pool = setup_test_db().await;
    let backend = MockBackend::new();
    let sessions = SessionManager::new(Some(mock_session("stale", 60)));

    let current = get_session(&backend, &pool, &sessions).await.unwrap().unwrap();
    assert_eq!(current.access_token, "refreshed-access");
    assert_eq!(backend.refresh_calls(), 1);
    assert_eq!(sessions.current(), Some(current));

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_concurrent_callers_share_one_refresh() {
    let pool = setup_test_db().await;
    let backend = MockBackend::new();
    let sessions = SessionManager::new(Some(mock_session("stale", 60)));

    let (first, second) = tokio::join!(
      get_session(&backend, &pool, &sessions),
      get_session(&backend, &pool, &sessions),
    );

    assert_eq!(backend.refresh_calls(), 1);
    let first = first.unwrap().unwrap();
    let second = second.unwrap().unwrap();
    assert_eq!(first.access_token, "refreshed-access");
    assert_eq!(first, second);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_rejected_refresh_clears_session() {
    let pool = setup_test_db().await;
    let backend = MockBackend::new().rejecting_refresh();
    let sessions = SessionManager::new(Some(mock_session("stale", 60)));
    db::save_value(&pool, SESSION_KEY, &sessions.current()).await.unwrap();

    let current = get_session(&backend, &pool, &sessions).await.unwrap();
    assert_eq!(current, None);
    assert_eq!(sessions.current(), None);

    let restored = SessionManager::restore(&pool).await.unwrap();
    assert_eq!(restored.current(), None);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_sign_out_clears_even_when_remote_fails() {
    let pool = setup_test_db().await;
    let backend = MockBackend::new().failing_sign_out();
    let sessions = SessionManager::new(Some(mock_session("acc", 3600)));
    let mut rx = sessions.subscribe();

    sign_out(&backend, &pool, &sessions).await.unwrap();

    assert_eq!(sessions.current(), None);
    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().is_none());

    teardown_test_db(pool).await;
  }
}
