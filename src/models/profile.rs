//! User profile model
//!
//! Biometrics used to estimate a daily calorie target.

use serde::{Deserialize, Serialize};

use crate::error::{TrackerError, TrackerResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    /// Anything other than "male" is treated as female
    pub fn from_str(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("male") {
            Gender::Male
        } else {
            Gender::Female
        }
    }
}

impl From<String> for Gender {
    fn from(s: String) -> Self {
        Gender::from_str(&s)
    }
}

/// Activity level and its BMR multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ActivityLevel {
    #[default]
    Sedentary,
    Light,
    Moderate,
    Active,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
        }
    }

    /// Case-insensitive; unrecognised levels fall back to sedentary
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "light" => ActivityLevel::Light,
            "moderate" => ActivityLevel::Moderate,
            "active" => ActivityLevel::Active,
            _ => ActivityLevel::Sedentary,
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
        }
    }
}

impl From<String> for ActivityLevel {
    fn from(s: String) -> Self {
        ActivityLevel::from_str(&s)
    }
}

/// Which BMR formula to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String")]
pub enum CalorieMethod {
    #[default]
    HarrisBenedict,
    MifflinStJeor,
}

impl CalorieMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalorieMethod::HarrisBenedict => "HarrisBenedict",
            CalorieMethod::MifflinStJeor => "MifflinStJeor",
        }
    }

    /// Accepts "HarrisBenedict", "harris-benedict", "mifflin_st_jeor", "mifflin"...
    pub fn parse(s: &str) -> Option<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "harrisbenedict" | "harris" | "hb" => Some(CalorieMethod::HarrisBenedict),
            "mifflinstjeor" | "mifflin" | "msj" => Some(CalorieMethod::MifflinStJeor),
            _ => None,
        }
    }

    /// Lenient parse; unknown methods fall back to Harris-Benedict
    pub fn from_str(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }
}

impl From<String> for CalorieMethod {
    fn from(s: String) -> Self {
        CalorieMethod::from_str(&s)
    }
}

/// A person's biometrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub gender: Gender,
    /// Centimetres
    pub height: f64,
    /// Kilograms
    pub weight: f64,
    /// Years
    pub age: u32,
    pub activity_level: ActivityLevel,
    pub calorie_method: CalorieMethod,
}

/// Data for setting the profile. The calorie method is kept when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub gender: Gender,
    pub height: f64,
    pub weight: f64,
    pub age: u32,
    pub activity_level: ActivityLevel,
    pub calorie_method: Option<CalorieMethod>,
}

impl UserProfile {
    /// Whether biometrics have been entered
    pub fn is_set(&self) -> bool {
        self.height > 0.0 && self.weight > 0.0
    }

    /// Validate and apply an update
    pub fn apply(&mut self, update: ProfileUpdate) -> TrackerResult<()> {
        if !update.height.is_finite() || update.height <= 0.0 {
            return Err(TrackerError::invalid("height must be positive"));
        }
        if !update.weight.is_finite() || update.weight <= 0.0 {
            return Err(TrackerError::invalid("weight must be positive"));
        }
        if update.age == 0 {
            return Err(TrackerError::invalid("age must be positive"));
        }

        self.gender = update.gender;
        self.height = update.height;
        self.weight = update.weight;
        self.age = update.age;
        self.activity_level = update.activity_level;
        if let Some(method) = update.calorie_method {
            self.calorie_method = method;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update() -> ProfileUpdate {
        ProfileUpdate {
            gender: Gender::Female,
            height: 165.0,
            weight: 60.0,
            age: 30,
            activity_level: ActivityLevel::Light,
            calorie_method: None,
        }
    }

    #[test]
    fn test_activity_level_lookup() {
        assert_eq!(ActivityLevel::from_str("MODERATE"), ActivityLevel::Moderate);
        assert_eq!(ActivityLevel::from_str(" active "), ActivityLevel::Active);
        assert_eq!(ActivityLevel::from_str("extreme").multiplier(), 1.2);
        assert_eq!(ActivityLevel::Light.multiplier(), 1.375);
    }

    #[test]
    fn test_gender_lenient() {
        assert_eq!(Gender::from_str("Male"), Gender::Male);
        assert_eq!(Gender::from_str("female"), Gender::Female);
        assert_eq!(Gender::from_str("f"), Gender::Female);
    }

    #[test]
    fn test_calorie_method_parse() {
        assert_eq!(CalorieMethod::parse("harris-benedict"), Some(CalorieMethod::HarrisBenedict));
        assert_eq!(CalorieMethod::parse("Mifflin St Jeor"), Some(CalorieMethod::MifflinStJeor));
        assert_eq!(CalorieMethod::parse("katch"), None);
        assert_eq!(CalorieMethod::from_str("katch"), CalorieMethod::HarrisBenedict);
    }

    #[test]
    fn test_apply_keeps_method_when_omitted() {
        let mut profile = UserProfile {
            calorie_method: CalorieMethod::MifflinStJeor,
            ..Default::default()
        };
        assert!(!profile.is_set());
        profile.apply(update()).unwrap();
        assert!(profile.is_set());
        assert_eq!(profile.calorie_method, CalorieMethod::MifflinStJeor);
        assert_eq!(profile.gender, Gender::Female);
    }

    #[test]
    fn test_apply_rejects_bad_biometrics() {
        let mut profile = UserProfile::default();
        let bad_height = ProfileUpdate { height: 0.0, ..update() };
        let bad_weight = ProfileUpdate { weight: f64::NAN, ..update() };
        let bad_age = ProfileUpdate { age: 0, ..update() };
        assert!(profile.apply(bad_height).is_err());
        assert!(profile.apply(bad_weight).is_err());
        assert!(profile.apply(bad_age).is_err());
        assert_eq!(profile, UserProfile::default());
    }

    #[test]
    fn test_profile_json_round_trip_is_lenient() {
        let json = r#"{"gender":"FEMALE","height":170.5,"weight":65,"age":41,
                       "activityLevel":"Very Active","calorieMethod":"MifflinStJeor"}"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.gender, Gender::Female);
        assert_eq!(profile.activity_level, ActivityLevel::Sedentary);
        assert_eq!(profile.calorie_method, CalorieMethod::MifflinStJeor);

        let out = serde_json::to_value(&profile).unwrap();
        assert_eq!(out["activityLevel"], "sedentary");
        assert_eq!(out["calorieMethod"], "MifflinStJeor");
        assert_eq!(out["gender"], "female");

        let empty: UserProfile = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, UserProfile::default());
    }
}
