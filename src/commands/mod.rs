pub mod auth;
pub mod community;

use serde::Serialize;

use crate::db::{self, GOALS_KEY, PROFILE_KEY, STEP_KEY, WIZARD_KEYS};
use crate::error::AppError;
use crate::models::{Goals, Plan, Profile};
use crate::recommendations::{static_guidance, StaticGuidance};
use crate::state::AppState;
use crate::wizard::{reduce, WizardAction, WizardState, WizardStep};

/// ---------------------------------------------------------------------------
/// Wizard Commands
/// ---------------------------------------------------------------------------

/// Wizard state plus everything derived from it, as the front end renders it
#[derive(Debug, Clone, Serialize)]
pub struct WizardView {
  pub state: WizardState,
  pub plan: Plan,
  pub guidance: StaticGuidance,
}

impl WizardView {
  fn from_state(state: WizardState) -> Self {
    let plan = state.plan();
    Self {
      state,
      plan,
      guidance: static_guidance(),
    }
  }
}

pub async fn get_wizard(state: &AppState) -> Result<WizardView, AppError> {
  let current = load_wizard_state(&state.db).await?;
  Ok(WizardView::from_state(current))
}

/// Apply one wizard action, persist whatever changed and return the new view
pub async fn dispatch(state: &AppState, action: WizardAction) -> Result<WizardView, AppError> {
  let _guard = state.wizard_lock.lock().await;

  let current = load_wizard_state(&state.db).await?;
  let is_reset = matches!(action, WizardAction::Reset);
  let edits_answers = action.edits_answers();
  let next = reduce(&current, action);

  if is_reset {
    db::remove_values(&state.db, &WIZARD_KEYS).await?;
    tracing::info!("Wizard reset");
  } else {
    save_changes(&state.db, &current, &next, edits_answers).await?;
  }

  Ok(WizardView::from_state(next))
}

pub async fn reset_wizard(state: &AppState) -> Result<WizardView, AppError> {
  dispatch(state, WizardAction::Reset).await
}

async fn load_wizard_state(db: &db::DbPool) -> Result<WizardState, AppError> {
  Ok(WizardState {
    step: db::load_value(db, STEP_KEY, WizardStep::default()).await?,
    profile: db::load_value(db, PROFILE_KEY, Profile::default()).await?,
    goals: db::load_value(db, GOALS_KEY, Goals::default()).await?,
  })
}

async fn save_changes(
  db: &db::DbPool,
  before: &WizardState,
  after: &WizardState,
  edits_answers: bool,
) -> Result<(), AppError> {
  if before.step != after.step {
    db::save_value(db, STEP_KEY, &after.step).await?;
  }
  if !edits_answers {
    return Ok(());
  }
  if before.profile != after.profile {
    db::save_value(db, PROFILE_KEY, &after.profile).await?;
  }
  if before.goals != after.goals {
    db::save_value(db, GOALS_KEY, &after.goals).await?;
  }
  Ok(())
}
