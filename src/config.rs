//! Configuration
//!
//! Settings read from the environment at startup.

use std::path::PathBuf;

use crate::models::CalorieMethod;

pub const DATA_DIR_VAR: &str = "YADA_DATA_DIR";
pub const CALORIE_METHOD_VAR: &str = "YADA_CALORIE_METHOD";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding the JSON data files
    pub data_dir: PathBuf,
    /// BMR formula forced for every profile, if any
    pub calorie_method: Option<CalorieMethod>,
}

impl Config {
    pub fn from_env() -> Self {
        let data_dir = std::env::var(DATA_DIR_VAR)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let calorie_method = std::env::var(CALORIE_METHOD_VAR)
            .ok()
            .and_then(|v| parse_method_override(&v));

        Self {
            data_dir,
            calorie_method,
        }
    }
}

fn parse_method_override(value: &str) -> Option<CalorieMethod> {
    if value.trim().is_empty() {
        return None;
    }
    let method = CalorieMethod::parse(value);
    if method.is_none() {
        tracing::warn!("Ignoring unknown {}={:?}", CALORIE_METHOD_VAR, value);
    }
    method
}

/// `data/` at the project root, found from the executable location
fn default_data_dir() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(parent) = path.parent() {
            if let Some(grandparent) = parent.parent() {
                path = grandparent.to_path_buf();
            }
        }
    }

    path.push("data");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_override_parsing() {
        assert_eq!(parse_method_override("mifflin-st-jeor"), Some(CalorieMethod::MifflinStJeor));
        assert_eq!(parse_method_override("Harris Benedict"), Some(CalorieMethod::HarrisBenedict));
        assert_eq!(parse_method_override("  "), None);
        assert_eq!(parse_method_override("katch-mcardle"), None);
    }

    #[test]
    fn test_default_data_dir_ends_in_data() {
        assert!(default_data_dir().ends_with("data"));
    }
}
