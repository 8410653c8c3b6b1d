//! Profile Tools
//!
//! Tools for setting biometrics and computing the daily calorie target.

use serde::Serialize;

use crate::models::{ActivityLevel, CalorieMethod, Gender, ProfileUpdate, UserProfile};
use crate::nutrition::round_half_up;
use crate::tracker::Tracker;

/// Profile as shown to clients
#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub gender: Gender,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub age: u32,
    pub activity_level: ActivityLevel,
    /// Formula stored on the profile
    pub calorie_method: CalorieMethod,
    /// Formula actually used for targets (may be overridden by configuration)
    pub active_method: CalorieMethod,
    pub is_set: bool,
}

impl ProfileView {
    fn new(profile: &UserProfile, active_method: CalorieMethod) -> Self {
        Self {
            gender: profile.gender,
            height_cm: profile.height,
            weight_kg: profile.weight,
            age: profile.age,
            activity_level: profile.activity_level,
            calorie_method: profile.calorie_method,
            active_method,
            is_set: profile.is_set(),
        }
    }
}

/// Response for target_calories
#[derive(Debug, Serialize)]
pub struct TargetCaloriesResponse {
    pub method: CalorieMethod,
    pub bmr: f64,
    pub activity_level: ActivityLevel,
    pub activity_multiplier: f64,
    pub target_calories: f64,
    pub target_calories_rounded: u64,
}

/// Set the profile. Unknown activity levels count as sedentary; an omitted
/// method keeps the current one.
pub fn set_profile(
    tracker: &mut Tracker,
    gender: &str,
    height_cm: f64,
    weight_kg: f64,
    age: i64,
    activity_level: &str,
    calorie_method: Option<&str>,
) -> Result<ProfileView, String> {
    let age = u32::try_from(age).map_err(|_| format!("Invalid age: {}", age))?;
    let calorie_method = match calorie_method.map(str::trim) {
        None | Some("") => None,
        Some(m) => Some(CalorieMethod::parse(m).ok_or_else(|| {
            format!("Unknown calorie method '{}': use harris-benedict or mifflin-st-jeor", m)
        })?),
    };

    let update = ProfileUpdate {
        gender: Gender::from_str(gender),
        height: height_cm,
        weight: weight_kg,
        age,
        activity_level: ActivityLevel::from_str(activity_level),
        calorie_method,
    };
    tracker.update_profile(update).map_err(|e| e.to_string())?;
    Ok(get_profile(tracker))
}

pub fn get_profile(tracker: &Tracker) -> ProfileView {
    ProfileView::new(tracker.profile(), tracker.calorie_method())
}

/// Daily calorie target for the current profile
pub fn target_calories(tracker: &Tracker) -> Result<TargetCaloriesResponse, String> {
    let target = tracker.target_calories().map_err(|e| e.to_string())?;
    Ok(TargetCaloriesResponse {
        method: target.method,
        bmr: target.bmr,
        activity_level: tracker.profile().activity_level,
        activity_multiplier: target.activity_multiplier,
        target_calories: target.target_calories,
        target_calories_rounded: round_half_up(target.target_calories),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn tracker() -> Tracker {
        Tracker::open(Box::new(MemoryStorage::new()))
    }

    #[test]
    fn test_target_before_profile_fails() {
        let tracker = tracker();
        assert!(target_calories(&tracker).unwrap_err().contains("profile"));
        assert!(!get_profile(&tracker).is_set);
    }

    #[test]
    fn test_set_profile_and_target() {
        let mut tracker = tracker();
        let view = set_profile(&mut tracker, "male", 175.0, 70.0, 25, "moderate", None).unwrap();
        assert!(view.is_set);
        assert_eq!(view.active_method, CalorieMethod::HarrisBenedict);

        let target = target_calories(&tracker).unwrap();
        assert!((target.bmr - 1724.052).abs() < 0.001);
        assert_eq!(target.activity_multiplier, 1.55);
        // 1724.052 * 1.55 = 2672.2806
        assert_eq!(target.target_calories_rounded, 2672);
    }

    #[test]
    fn test_set_profile_lenient_and_strict_parts() {
        let mut tracker = tracker();
        let view =
            set_profile(&mut tracker, "F", 160.0, 55.0, 40, "zumba", Some("mifflin")).unwrap();
        assert_eq!(view.gender, Gender::Female);
        assert_eq!(view.activity_level, ActivityLevel::Sedentary);
        assert_eq!(view.calorie_method, CalorieMethod::MifflinStJeor);

        assert!(set_profile(&mut tracker, "male", 170.0, 70.0, -3, "light", None).is_err());
        let katch = Some("katch");
        assert!(set_profile(&mut tracker, "male", 170.0, 70.0, 30, "light", katch).is_err());
        assert!(set_profile(&mut tracker, "male", 0.0, 70.0, 30, "light", None).is_err());
        assert_eq!(get_profile(&tracker).age, 40);
    }

    #[test]
    fn test_configured_method_wins() {
        let mut tracker = tracker().with_calorie_method(Some(CalorieMethod::MifflinStJeor));
        let method = Some("harris-benedict");
        set_profile(&mut tracker, "male", 175.0, 70.0, 25, "active", method).unwrap();
        let target = target_calories(&tracker).unwrap();
        assert_eq!(target.method, CalorieMethod::MifflinStJeor);
        assert!((target.bmr - 1673.75).abs() < 1e-9);
    }
}
