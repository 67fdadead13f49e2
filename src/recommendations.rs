//! Rule-based plan guidance
//!
//! Fixed baseline advice plus a handful of conditional additions. The order of
//! every list is shown to the user as-is, so additions are appended in a fixed
//! sequence.

use serde::Serialize;

use crate::models::{ActivityLevel, Goals, Macros, Priority, Profile, Recommendations};

/// ---------------------------------------------------------------------------
/// Advice Text
/// ---------------------------------------------------------------------------

const PROTEIN_EACH_MEAL: &str =
  "Prioritize protein at each meal (aim ~25–35 g/meal) to support muscle maintenance.";
const CALCIUM_VITAMIN_D: &str = "Ensure adequate calcium (~1200 mg/day) and vitamin D (~800–1000 IU/day) through food/supplements per clinician guidance.";
const CARDIOMETABOLIC: &str =
  "Favor cardiometabolic support: high-fiber, lean proteins, unsaturated fats.";
const VEGETABLES_FIBER: &str = "Eat plenty of non-starchy vegetables and 25–35 g fiber/day.";
const MINIMALLY_PROCESSED: &str = "Choose minimally processed foods; limit added sugars and alcohol.";
const OMEGA3_RESISTANCE: &str =
  "Include omega-3 sources (fatty fish, walnuts) and resistance training to counter sarcopenia.";
const SODIUM_POTASSIUM: &str =
  "Limit sodium to ~1500–2000 mg/day and emphasize potassium-rich foods (leafy greens, beans).";
const VISCOUS_FIBER: &str = "Add viscous fibers (oats, barley) and plant sterols/stanols as advised.";

const FITNESS_BASELINE: [&str; 4] = [
  "Strength training 2–3x/week (full-body, 6–10 movements, 2–3 sets).",
  "Daily walking or low-impact cardio 20–40 minutes as tolerated.",
  "Balance work 3–5x/week (single-leg stands, heel-to-toe, tai chi).",
  "Mobility routine most days focusing on hips, shoulders, thoracic spine.",
];
const INTERVALS: &str = "Incorporate intervals 1–2x/week if cleared by your clinician.";

const RECOVERY_BASELINE: [&str; 3] = [
  "Target 7–9 hours of sleep; keep a consistent schedule.",
  "Use wind-down routines: low light, devices off, brief journaling.",
  "Practice 5-minute breathing or mindfulness once or twice daily.",
];

/// ---------------------------------------------------------------------------
/// Generation
/// ---------------------------------------------------------------------------

/// Build the nutrition, fitness and recovery lists for a plan.
///
/// `bmi` and `macros` are accepted so callers pass the full derived context,
/// but no current rule reads them.
pub fn generate_recommendations(
  profile: &Profile,
  goals: &Goals,
  _bmi: f64,
  _macros: &Macros,
) -> Recommendations {
  Recommendations {
    nutrition: nutrition_advice(profile, goals),
    fitness: fitness_advice(goals),
    recovery: RECOVERY_BASELINE.iter().map(|s| s.to_string()).collect(),
  }
}

fn nutrition_advice(profile: &Profile, goals: &Goals) -> Vec<String> {
  let mut nutrition = vec![
    PROTEIN_EACH_MEAL,
    if profile.sex.is_female() {
      CALCIUM_VITAMIN_D
    } else {
      CARDIOMETABOLIC
    },
    VEGETABLES_FIBER,
    MINIMALLY_PROCESSED,
  ];

  if profile.past_menopause_onset() {
    nutrition.push(OMEGA3_RESISTANCE);
  }
  if goals.priorities.contains(Priority::BloodPressure) {
    nutrition.push(SODIUM_POTASSIUM);
  }
  if goals.priorities.contains(Priority::Cholesterol) {
    nutrition.push(VISCOUS_FIBER);
  }

  nutrition.into_iter().map(String::from).collect()
}

fn fitness_advice(goals: &Goals) -> Vec<String> {
  let mut fitness: Vec<String> = FITNESS_BASELINE.iter().map(|s| s.to_string()).collect();
  if goals.activity_level == ActivityLevel::High {
    fitness.push(INTERVALS.to_string());
  }
  fitness
}

/// ---------------------------------------------------------------------------
/// Static Plan Content
/// ---------------------------------------------------------------------------

/// Fixed text shown alongside every plan.
#[derive(Debug, Clone, Serialize)]
pub struct StaticGuidance {
  pub sample_day: &'static [&'static str],
  pub safety_note: &'static str,
  pub disclaimer: &'static str,
}

const SAMPLE_DAY: [&str; 5] = [
  "Breakfast: Greek yogurt + berries + chia; or eggs + sautéed greens",
  "Lunch: Salmon salad, mixed greens, olive oil vinaigrette; whole grain",
  "Snack: Cottage cheese or edamame; fruit",
  "Dinner: Chicken or tofu, quinoa, roasted veg; add leafy greens",
  "Hydration: Aim for ~2 liters water; limit added sugars",
];

const SAFETY_NOTE: &str = "If you have conditions like hypertension, diabetes, osteoporosis, or are on medications, seek personalized guidance from your clinician before starting new programs.";

pub const MEDICAL_DISCLAIMER: &str = "Educational use only. Not medical advice. Always consult a healthcare professional or a registered dietitian before changing diet, exercise, or medications.";

pub fn static_guidance() -> StaticGuidance {
  StaticGuidance {
    sample_day: &SAMPLE_DAY,
    safety_note: SAFETY_NOTE,
    disclaimer: MEDICAL_DISCLAIMER,
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
