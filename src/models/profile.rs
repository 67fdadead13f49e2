use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// Sex & Menopause
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
  #[default]
  Female,
  Male,
  /// "Other / prefer not to say"
  Other,
}

impl Sex {
  pub fn as_str(&self) -> &'static str {
    match self {
      Sex::Female => "female",
      Sex::Male => "male",
      Sex::Other => "other",
    }
  }

  pub fn is_female(&self) -> bool {
    matches!(self, Sex::Female)
  }
}

/// Menopause status, only meaningful when `sex` is female.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Menopause {
  Pre,
  Peri,
  #[default]
  Post,
}

impl Menopause {
  pub fn as_str(&self) -> &'static str {
    match self {
      Menopause::Pre => "pre",
      Menopause::Peri => "peri",
      Menopause::Post => "post",
    }
  }
}

/// ---------------------------------------------------------------------------
/// Health Condition Tags
/// ---------------------------------------------------------------------------

/// Free-text condition tags. Insertion order is kept and duplicates are
/// rejected case-insensitively. Deserializing goes through the same rules.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ConditionTags(Vec<String>);

impl ConditionTags {
  pub fn new() -> Self {
    Self(Vec::new())
  }

  /// Add a tag after trimming it. Returns false when the input is blank or
  /// an existing tag already matches ignoring case.
  pub fn add(&mut self, raw: &str) -> bool {
    let value = raw.trim();
    if value.is_empty() {
      return false;
    }
    let lowered = value.to_lowercase();
    if self.0.iter().any(|t| t.to_lowercase() == lowered) {
      return false;
    }
    self.0.push(value.to_string());
    true
  }

  /// Remove the tag with exactly this text.
  pub fn remove(&mut self, tag: &str) -> bool {
    let before = self.0.len();
    self.0.retain(|t| t != tag);
    self.0.len() != before
  }

  /// Drop the most recently added tag
  pub fn pop(&mut self) -> Option<String> {
    self.0.pop()
  }

  pub fn as_slice(&self) -> &[String] {
    &self.0
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl<S: AsRef<str>> FromIterator<S> for ConditionTags {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    let mut tags = ConditionTags::new();
    for tag in iter {
      tags.add(tag.as_ref());
    }
    tags
  }
}

impl From<Vec<String>> for ConditionTags {
  fn from(tags: Vec<String>) -> Self {
    tags.into_iter().collect()
  }
}

impl From<ConditionTags> for Vec<String> {
  fn from(tags: ConditionTags) -> Self {
    tags.0
  }
}

/// ---------------------------------------------------------------------------
/// Profile
/// ---------------------------------------------------------------------------

/// The user's assessment answers. Replaced wholesale on every edit.
///
/// Range limits (age 45-100, height 130-220 cm, weight 35-200 kg) belong to
/// the input widgets; nothing here enforces them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
  /// Empty string means "not given"
  #[serde(default)]
  pub name: String,
  pub sex: Sex,
  pub age: i64,
  pub height_cm: f64,
  pub weight_kg: f64,
  #[serde(default)]
  pub menopause: Menopause,
  #[serde(default)]
  pub conditions: ConditionTags,
  #[serde(default)]
  pub meds: String,
}

impl Default for Profile {
  fn default() -> Self {
    Self {
      name: String::new(),
      sex: Sex::Female,
      age: 50,
      height_cm: 165.0,
      weight_kg: 75.0,
      menopause: Menopause::Post,
      conditions: ConditionTags::new(),
      meds: String::new(),
    }
  }
}

impl Profile {
  pub fn display_name(&self) -> Option<&str> {
    non_blank(&self.name)
  }

  pub fn medications(&self) -> Option<&str> {
    non_blank(&self.meds)
  }

  /// Peri- or post-menopausal women get the extra omega-3 guidance.
  pub fn past_menopause_onset(&self) -> bool {
    self.sex.is_female() && self.menopause != Menopause::Pre
  }
}

fn non_blank(s: &str) -> Option<&str> {
  if s.is_empty() {
    None
  } else {
    Some(s)
  }
}
