use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// Priorities
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
  Weight,
  Energy,
  Mobility,
  Strength,
  Sleep,
  Stress,
  BloodPressure,
  Cholesterol,
  Bone,
}

impl Priority {
  /// Every priority in the order the goals screen lists them.
  pub const ALL: [Priority; 9] = [
    Priority::Weight,
    Priority::Energy,
    Priority::Mobility,
    Priority::Strength,
    Priority::Sleep,
    Priority::Stress,
    Priority::BloodPressure,
    Priority::Cholesterol,
    Priority::Bone,
  ];

  pub fn label(&self) -> &'static str {
    match self {
      Priority::Weight => "Weight management",
      Priority::Energy => "Energy",
      Priority::Mobility => "Mobility & balance",
      Priority::Strength => "Strength",
      Priority::Sleep => "Sleep",
      Priority::Stress => "Stress reduction",
      Priority::BloodPressure => "Blood pressure",
      Priority::Cholesterol => "Cholesterol",
      Priority::Bone => "Bone density",
    }
  }
}

/// Selected priorities. Membership is what matters; order is only kept so the
/// stored document stays stable between edits.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrioritySet(Vec<Priority>);

impl PrioritySet {
  pub fn new() -> Self {
    Self(Vec::new())
  }

  pub fn contains(&self, priority: Priority) -> bool {
    self.0.contains(&priority)
  }

  /// Remove the priority if selected, otherwise select it.
  pub fn toggle(&mut self, priority: Priority) {
    if self.contains(priority) {
      self.0.retain(|p| *p != priority);
    } else {
      self.0.push(priority);
    }
  }

  pub fn iter(&self) -> impl Iterator<Item = &Priority> {
    self.0.iter()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl FromIterator<Priority> for PrioritySet {
  fn from_iter<I: IntoIterator<Item = Priority>>(iter: I) -> Self {
    let mut set = PrioritySet::new();
    for p in iter {
      if !set.contains(p) {
        set.0.push(p);
      }
    }
    set
  }
}

/// ---------------------------------------------------------------------------
/// Activity Level
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
  #[default]
  Light,
  Moderate,
  High,
}

impl ActivityLevel {
  pub fn as_str(&self) -> &'static str {
    match self {
      ActivityLevel::Light => "light",
      ActivityLevel::Moderate => "moderate",
      ActivityLevel::High => "high",
    }
  }
}

/// ---------------------------------------------------------------------------
/// Goals
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goals {
  pub priorities: PrioritySet,
  #[serde(default)]
  pub activity_level: ActivityLevel,
  /// Self-rated stress, 1 (low) to 5 (high)
  pub stress: u8,
  pub sleep_hours: f64,
}

impl Default for Goals {
  fn default() -> Self {
    Self {
      priorities: [Priority::Energy, Priority::Weight, Priority::Mobility]
        .into_iter()
        .collect(),
      activity_level: ActivityLevel::Light,
      stress: 3,
      sleep_hours: 6.0,
    }
  }
}
