//! Assessment wizard state
//!
//! The whole wizard is one value: the current step plus the profile and goals.
//! Every edit goes through [`reduce`], which returns a new state and never
//! touches the old one. Derived numbers come from [`WizardState::plan`].

use serde::{Deserialize, Serialize};

use crate::models::{ActivityLevel, Goals, Menopause, Plan, Priority, Profile, Sex};

// ---------------------------------------------------------------------------
/// Steps
// ---------------------------------------------------------------------------

/// Wizard pages, persisted as their zero-based index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WizardStep {
  #[default]
  Welcome,
  Assessment,
  Goals,
  Plan,
  Community,
}

impl WizardStep {
  pub const ALL: [WizardStep; 5] = [
    WizardStep::Welcome,
    WizardStep::Assessment,
    WizardStep::Goals,
    WizardStep::Plan,
    WizardStep::Community,
  ];

  pub fn index(&self) -> u8 {
    *self as u8
  }

  pub fn label(&self) -> &'static str {
    match self {
      WizardStep::Welcome => "Welcome",
      WizardStep::Assessment => "Assessment",
      WizardStep::Goals => "Goals",
      WizardStep::Plan => "Plan",
      WizardStep::Community => "Community",
    }
  }

  /// The following step, staying on the last one.
  pub fn next(&self) -> Self {
    let next = (self.index() as usize + 1).min(Self::ALL.len() - 1);
    Self::ALL[next]
  }
}

impl TryFrom<u8> for WizardStep {
  type Error = String;
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Self::ALL
      .get(value as usize)
      .copied()
      .ok_or_else(|| format!("Unknown wizard step: {}", value))
  }
}

impl From<WizardStep> for u8 {
  fn from(step: WizardStep) -> Self {
    step.index()
  }
}

impl std::fmt::Display for WizardStep {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}. {}", self.index() + 1, self.label())
  }
}

// ---------------------------------------------------------------------------
/// State & Actions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WizardState {
  pub step: WizardStep,
  pub profile: Profile,
  pub goals: Goals,
}

impl WizardState {
  pub fn plan(&self) -> Plan {
    Plan::derive(&self.profile, &self.goals)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum WizardAction {
  GoTo(WizardStep),
  Next,
  /// "Start Assessment" on the welcome page
  Start,
  SetName(String),
  SetSex(Sex),
  SetAge(i64),
  SetHeightCm(f64),
  SetWeightKg(f64),
  SetMenopause(Menopause),
  AddCondition(String),
  RemoveCondition(String),
  /// Backspace on an empty tag input
  PopCondition,
  SetMeds(String),
  TogglePriority(Priority),
  SetActivityLevel(ActivityLevel),
  SetStress(u8),
  SetSleepHours(f64),
  Reset,
}

impl WizardAction {
  /// Whether the action can change the profile or goals (as opposed to only
  /// moving between pages).
  pub fn edits_answers(&self) -> bool {
    !matches!(
      self,
      WizardAction::GoTo(_) | WizardAction::Next | WizardAction::Start
    )
  }
}

/// Apply one action and return the resulting state.
pub fn reduce(state: &WizardState, action: WizardAction) -> WizardState {
  let mut next = state.clone();
  match action {
    WizardAction::GoTo(step) => next.step = step,
    WizardAction::Next => next.step = state.step.next(),
    WizardAction::Start => next.step = WizardStep::Assessment,
    WizardAction::SetName(name) => next.profile.name = name,
    WizardAction::SetSex(sex) => next.profile.sex = sex,
    WizardAction::SetAge(age) => next.profile.age = age,
    WizardAction::SetHeightCm(cm) => next.profile.height_cm = cm,
    WizardAction::SetWeightKg(kg) => next.profile.weight_kg = kg,
    WizardAction::SetMenopause(status) => next.profile.menopause = status,
    WizardAction::AddCondition(tag) => {
      next.profile.conditions.add(&tag);
    }
    WizardAction::RemoveCondition(tag) => {
      next.profile.conditions.remove(&tag);
    }
    WizardAction::PopCondition => {
      next.profile.conditions.pop();
    }
    WizardAction::SetMeds(meds) => next.profile.meds = meds,
    WizardAction::TogglePriority(priority) => next.goals.priorities.toggle(priority),
    WizardAction::SetActivityLevel(level) => next.goals.activity_level = level,
    WizardAction::SetStress(stress) => next.goals.stress = stress,
    WizardAction::SetSleepHours(hours) => next.goals.sleep_hours = hours,
    WizardAction::Reset => next = WizardState::default(),
  }
  next
}
