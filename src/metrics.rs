//! Deterministic body metrics and nutrition targets
//!
//! Closed-form formulas only. Inputs are not range-checked here; the
//! assessment form owns that.

use crate::models::{ActivityLevel, Goals, Macros, Profile, Sex};

/// ---------------------------------------------------------------------------
/// Formula Constants
/// ---------------------------------------------------------------------------

/// Mifflin-St Jeor sex offsets (kcal/day), added to the weight/height/age terms
pub const FEMALE_BMR_OFFSET: f64 = -161.0;
pub const MALE_BMR_OFFSET: f64 = 5.0;
/// The "other" category currently takes the male offset. This is inherited
/// behaviour awaiting a product decision, not a clinical rule.
pub const OTHER_SEX_BMR_OFFSET: f64 = MALE_BMR_OFFSET;

const FEMALE_PROTEIN_G_PER_KG: f64 = 1.2;
const DEFAULT_PROTEIN_G_PER_KG: f64 = 1.1;

const FAT_CALORIE_SHARE: f64 = 0.30;
const KCAL_PER_G_FAT: f64 = 9.0;
const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARB: f64 = 4.0;

impl ActivityLevel {
  /// TDEE multiplier applied to the estimated BMR
  pub fn multiplier(&self) -> f64 {
    match self {
      ActivityLevel::High => 1.5,
      ActivityLevel::Moderate => 1.3,
      ActivityLevel::Light => 1.15,
    }
  }
}

impl Sex {
  pub fn bmr_offset(&self) -> f64 {
    match self {
      Sex::Female => FEMALE_BMR_OFFSET,
      Sex::Male => MALE_BMR_OFFSET,
      Sex::Other => OTHER_SEX_BMR_OFFSET,
    }
  }

  pub fn protein_g_per_kg(&self) -> f64 {
    match self {
      Sex::Female => FEMALE_PROTEIN_G_PER_KG,
      Sex::Male | Sex::Other => DEFAULT_PROTEIN_G_PER_KG,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Rounding
/// ---------------------------------------------------------------------------

/// Round to `places` decimals, halves away from zero.
pub fn round_to(value: f64, places: i32) -> f64 {
  let factor = 10f64.powi(places);
  (value * factor).round() / factor
}

fn round_whole(value: f64) -> i64 {
  value.round() as i64
}

/// ---------------------------------------------------------------------------
/// BMI
/// ---------------------------------------------------------------------------

/// Body mass index rounded to one decimal.
///
/// A zero (or NaN) height is replaced by 1 m so the division never fails; the
/// result is meaningless but finite.
pub fn compute_bmi(height_cm: f64, weight_kg: f64) -> f64 {
  let height_m = if height_cm == 0.0 || height_cm.is_nan() {
    1.0
  } else {
    height_cm / 100.0
  };
  round_to(weight_kg / (height_m * height_m), 1)
}

/// ---------------------------------------------------------------------------
/// Energy & Macros
/// ---------------------------------------------------------------------------

/// Mifflin-St Jeor resting energy estimate in kcal/day (unrounded)
pub fn estimate_bmr(profile: &Profile) -> f64 {
  10.0 * profile.weight_kg + 6.25 * profile.height_cm - 5.0 * profile.age as f64
    + profile.sex.bmr_offset()
}

pub fn compute_macros(profile: &Profile, goals: &Goals) -> Macros {
  let bmr = estimate_bmr(profile);
  let tdee = round_whole(bmr * goals.activity_level.multiplier());

  let protein_g = round_whole(profile.sex.protein_g_per_kg() * profile.weight_kg);
  let fat_g = round_whole(FAT_CALORIE_SHARE * tdee as f64 / KCAL_PER_G_FAT);

  let protein_kcal = protein_g as f64 * KCAL_PER_G_PROTEIN;
  let fat_kcal = fat_g as f64 * KCAL_PER_G_FAT;
  let carbs_g = round_whole((tdee as f64 - (protein_kcal + fat_kcal)) / KCAL_PER_G_CARB);

  Macros {
    tdee,
    protein_g,
    fat_g,
    carbs_g,
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
