use serde::{Deserialize, Serialize};

use super::{Goals, Profile};
use crate::metrics::{compute_bmi, compute_macros};
use crate::recommendations::generate_recommendations;

/// Daily energy and macronutrient targets. Values are whole kcal / grams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Macros {
  pub tdee: i64,
  pub protein_g: i64,
  pub fat_g: i64,
  /// Remaining calories after protein and fat. Not clamped, so it goes
  /// negative for very light, high-protein inputs.
  pub carbs_g: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Recommendations {
  pub nutrition: Vec<String>,
  pub fitness: Vec<String>,
  pub recovery: Vec<String>,
}

/// Everything derived from a profile and goals. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
  pub bmi: f64,
  pub macros: Macros,
  pub recommendations: Recommendations,
}

impl Plan {
  pub fn derive(profile: &Profile, goals: &Goals) -> Self {
    let bmi = compute_bmi(profile.height_cm, profile.weight_kg);
    let macros = compute_macros(profile, goals);
    let recommendations = generate_recommendations(profile, goals, bmi, &macros);
    Self {
      bmi,
      macros,
      recommendations,
    }
  }
}
