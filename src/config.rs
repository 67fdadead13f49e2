//! Environment-driven configuration
//!
//! Cloud features (sign-in, cloud save, community) switch on only when both
//! the Supabase URL and anon key are set. Everything else has a default.

use std::env;
use std::path::PathBuf;

use crate::error::AppError;

const DEFAULT_SITE_URL: &str = "http://localhost:5173";
const DEFAULT_DB_PATH: &str = "50plus.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
  /// Project URL, e.g. `https://abcd.supabase.co`, without trailing slash
  pub url: String,
  pub anon_key: String,
}

impl SupabaseConfig {
  /// Project URL with the subdomain hidden, for logs
  pub fn masked_url(&self) -> String {
    match url::Url::parse(&self.url) {
      Ok(parsed) => format!("{}://****.supabase.co", parsed.scheme()),
      Err(_) => "****".to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
  pub supabase: Option<SupabaseConfig>,
  /// Where magic-link emails send the user back to
  pub site_url: String,
  pub db_path: PathBuf,
}

impl AppConfig {
  pub fn from_env() -> Result<Self, AppError> {
    let supabase = match (non_empty_var("SUPABASE_URL"), non_empty_var("SUPABASE_ANON_KEY")) {
      (Some(url), Some(anon_key)) => {
        url::Url::parse(&url)
          .map_err(|e| AppError::Config(format!("SUPABASE_URL is not a valid URL: {}", e)))?;
        Some(SupabaseConfig {
          url: url.trim_end_matches('/').to_string(),
          anon_key,
        })
      }
      _ => None,
    };

    Ok(Self {
      supabase,
      site_url: non_empty_var("SITE_URL").unwrap_or_else(|| DEFAULT_SITE_URL.to_string()),
      db_path: non_empty_var("FIFTYPLUS_DB_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH)),
    })
  }

  pub fn is_backend_configured(&self) -> bool {
    self.supabase.is_some()
  }
}

fn non_empty_var(name: &str) -> Option<String> {
  env::var(name).ok().filter(|v| !v.trim().is_empty())
}
