//! Energy expenditure
//!
//! Basal metabolic rate formulas and the activity scaling applied to them.
//!
//! - Harris, J.A. & Benedict, F.G. (1918), revised by Roza & Shizgal (1984)
//! - Mifflin, M.D. et al. (1990), *Am J Clin Nutr* 51(2):241-247

use serde::Serialize;

use crate::models::{ActivityLevel, CalorieMethod, Gender, UserProfile};

/// A BMR formula. Both formulas share the activity multiplier table.
pub trait EnergyFormula: Send + Sync {
    fn method(&self) -> CalorieMethod;

    /// Basal metabolic rate in kcal/day
    fn bmr(&self, profile: &UserProfile) -> f64;

    /// BMR scaled by the profile's activity level
    fn target_calories(&self, profile: &UserProfile) -> f64 {
        self.bmr(profile) * profile.activity_level.multiplier()
    }
}

/// Revised Harris-Benedict equation
#[derive(Debug, Clone, Copy, Default)]
pub struct HarrisBenedict;

impl EnergyFormula for HarrisBenedict {
    fn method(&self) -> CalorieMethod {
        CalorieMethod::HarrisBenedict
    }

    fn bmr(&self, p: &UserProfile) -> f64 {
        let age = f64::from(p.age);
        match p.gender {
            Gender::Male => 88.362 + 13.397 * p.weight + 4.799 * p.height - 5.677 * age,
            Gender::Female => 447.593 + 9.247 * p.weight + 3.098 * p.height - 4.330 * age,
        }
    }
}

/// Mifflin-St Jeor equation
#[derive(Debug, Clone, Copy, Default)]
pub struct MifflinStJeor;

impl EnergyFormula for MifflinStJeor {
    fn method(&self) -> CalorieMethod {
        CalorieMethod::MifflinStJeor
    }

    fn bmr(&self, p: &UserProfile) -> f64 {
        let offset = match p.gender {
            Gender::Male => 5.0,
            Gender::Female => -161.0,
        };
        10.0 * p.weight + 6.25 * p.height - 5.0 * f64::from(p.age) + offset
    }
}

impl CalorieMethod {
    pub fn formula(&self) -> &'static dyn EnergyFormula {
        match self {
            CalorieMethod::HarrisBenedict => &HarrisBenedict,
            CalorieMethod::MifflinStJeor => &MifflinStJeor,
        }
    }
}

/// Multiplier for a free-text activity level; unknown levels get 1.2
pub fn activity_multiplier(level: &str) -> f64 {
    ActivityLevel::from_str(level).multiplier()
}

/// A computed calorie target with its inputs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyTarget {
    pub method: CalorieMethod,
    pub bmr: f64,
    pub activity_multiplier: f64,
    pub target_calories: f64,
}

/// Estimate the daily calorie target for a profile
pub fn estimate(formula: &dyn EnergyFormula, profile: &UserProfile) -> EnergyTarget {
    EnergyTarget {
        method: formula.method(),
        bmr: formula.bmr(profile),
        activity_multiplier: profile.activity_level.multiplier(),
        target_calories: formula.target_calories(profile),
    }
}
