//! Cloud save of the assessment answers

use crate::error::AppError;
use crate::models::{AssessmentRecord, Goals, Profile, ProfileRecord, Session};
use crate::supabase::DataStore;

/// Upsert the profile row, then the assessment row. Stops at the first
/// failure; the profile write is not rolled back.
pub async fn save_to_cloud<D: DataStore + ?Sized>(
  store: &D,
  session: &Session,
  profile: &Profile,
  goals: &Goals,
) -> Result<(), AppError> {
  let user_id = session.user.id.as_str();

  store
    .upsert_profile(session, &ProfileRecord::from_profile(user_id, profile))
    .await?;
  store
    .upsert_assessment(session, &AssessmentRecord::new(user_id, goals))
    .await?;

  tracing::info!(user_id, "Saved profile and goals to cloud");
  Ok(())
}
