//! Nutrition calculation module
//!
//! Calorie resolution through composite foods and energy-expenditure estimates.

pub mod energy;
pub mod resolver;

pub use energy::{
    activity_multiplier, estimate, EnergyFormula, EnergyTarget, HarrisBenedict, MifflinStJeor,
};
pub use resolver::{calories_from, resolve_calories, round_half_up, sum_calories};
